//! Team assignment HTTP handlers.
//!
//! ```text
//! GET    /api/v1/teams
//! POST   /api/v1/teams
//! GET    /api/v1/teams/unassigned-users
//! GET    /api/v1/teams/unassigned-categories
//! GET    /api/v1/teams/{team_id}
//! DELETE /api/v1/teams/{team_id}
//! GET    /api/v1/teams/{team_id}/members
//! POST   /api/v1/teams/{team_id}/members
//! GET    /api/v1/teams/{team_id}/categories
//! POST   /api/v1/teams/{team_id}/categories
//! GET    /api/v1/users/{user_id}/team
//! ```
//!
//! The two `unassigned-*` routes must be registered before
//! `/teams/{team_id}` so the literal segments win.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::CreateTeamRequest;
use crate::domain::{CategorySummary, Error, Team, UserSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::deletion::DeleteResponseBody;
use crate::inbound::http::schemas::{
    CategorySummarySchema, CreatedTeamSchema, ErrorSchema, TeamSchema, UserSummarySchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_user_id, parse_user_id_list, parse_uuid, parse_uuid_list,
};

/// Path parameters naming a team.
#[derive(Debug, Deserialize)]
pub struct TeamPath {
    team_id: String,
}

/// Path parameters naming a user.
#[derive(Debug, Deserialize)]
pub struct UserPath {
    user_id: String,
}

/// Request payload for creating a team.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequestBody {
    #[schema(example = "Network")]
    pub name: String,
    #[serde(default)]
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub member_ids: Vec<String>,
    #[serde(default)]
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub category_ids: Vec<String>,
}

/// Request payload for adding members to a team.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMembersRequestBody {
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub member_ids: Vec<String>,
}

/// Request payload for giving a team more categories.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCategoriesRequestBody {
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub category_ids: Vec<String>,
}

/// The team a user belongs to, if any.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserTeamResponseBody {
    #[schema(example = "Network")]
    pub team_name: Option<String>,
}

fn parse_team_id(path: TeamPath) -> Result<Uuid, Error> {
    parse_uuid(path.team_id, FieldName::new("teamId"))
}

fn parse_create_team(payload: CreateTeamRequestBody) -> Result<CreateTeamRequest, Error> {
    Ok(CreateTeamRequest {
        name: payload.name,
        member_ids: parse_user_id_list(payload.member_ids, FieldName::new("memberIds"))?,
        category_ids: parse_uuid_list(payload.category_ids, FieldName::new("categoryIds"))?,
    })
}

/// List every team.
#[utoipa::path(
    get,
    path = "/api/v1/teams",
    responses(
        (status = 200, description = "Teams", body = [TeamSchema]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "listTeams"
)]
#[get("/teams")]
pub async fn list_teams(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Team>>> {
    Ok(web::Json(state.teams_query.list_teams().await?))
}

/// Create a team with its initial members and categories.
///
/// Either every assignment is recorded or none is.
#[utoipa::path(
    post,
    path = "/api/v1/teams",
    request_body = CreateTeamRequestBody,
    responses(
        (status = 201, description = "Team created", body = CreatedTeamSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "A member or category is already assigned", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "createTeam"
)]
#[post("/teams")]
pub async fn create_team(
    state: web::Data<HttpState>,
    payload: web::Json<CreateTeamRequestBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_create_team(payload.into_inner())?;
    let created = state.teams.create_team(request).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Support users that belong to no team.
#[utoipa::path(
    get,
    path = "/api/v1/teams/unassigned-users",
    responses(
        (status = 200, description = "Unassigned support users", body = [UserSummarySchema]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "listUnassignedSupportUsers"
)]
#[get("/teams/unassigned-users")]
pub async fn list_unassigned_users(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<UserSummary>>> {
    Ok(web::Json(
        state.teams_query.unassigned_support_users().await?,
    ))
}

/// Categories no team owns yet.
#[utoipa::path(
    get,
    path = "/api/v1/teams/unassigned-categories",
    responses(
        (status = 200, description = "Unassigned categories", body = [CategorySummarySchema]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "listUnassignedCategories"
)]
#[get("/teams/unassigned-categories")]
pub async fn list_unassigned_categories(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<CategorySummary>>> {
    Ok(web::Json(state.teams_query.unassigned_categories().await?))
}

/// Fetch one team.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}",
    params(("team_id" = String, Path, description = "Team identifier")),
    responses(
        (status = 200, description = "Team", body = TeamSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "getTeam"
)]
#[get("/teams/{team_id}")]
pub async fn get_team(
    state: web::Data<HttpState>,
    path: web::Path<TeamPath>,
) -> ApiResult<web::Json<Team>> {
    let team_id = parse_team_id(path.into_inner())?;
    Ok(web::Json(state.teams_query.get_team(team_id).await?))
}

/// Delete a team that no longer has members or categories.
#[utoipa::path(
    delete,
    path = "/api/v1/teams/{team_id}",
    params(("team_id" = String, Path, description = "Team identifier")),
    responses(
        (status = 200, description = "Delete outcome", body = DeleteResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Team still has assignments", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "deleteTeam"
)]
#[delete("/teams/{team_id}")]
pub async fn delete_team(
    state: web::Data<HttpState>,
    path: web::Path<TeamPath>,
) -> ApiResult<web::Json<DeleteResponseBody>> {
    let team_id = parse_team_id(path.into_inner())?;
    let outcome = state.teams.delete_team(team_id).await?;
    Ok(web::Json(DeleteResponseBody::from(outcome)))
}

/// Members of a team, ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/members",
    params(("team_id" = String, Path, description = "Team identifier")),
    responses(
        (status = 200, description = "Team roster", body = [UserSummarySchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "getTeamRoster"
)]
#[get("/teams/{team_id}/members")]
pub async fn get_team_roster(
    state: web::Data<HttpState>,
    path: web::Path<TeamPath>,
) -> ApiResult<web::Json<Vec<UserSummary>>> {
    let team_id = parse_team_id(path.into_inner())?;
    Ok(web::Json(state.teams_query.team_roster(team_id).await?))
}

/// Add support users to a team.
#[utoipa::path(
    post,
    path = "/api/v1/teams/{team_id}/members",
    params(("team_id" = String, Path, description = "Team identifier")),
    request_body = AddMembersRequestBody,
    responses(
        (status = 204, description = "Members added"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "A member already belongs to a team", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "addMembers"
)]
#[post("/teams/{team_id}/members")]
pub async fn add_members(
    state: web::Data<HttpState>,
    path: web::Path<TeamPath>,
    payload: web::Json<AddMembersRequestBody>,
) -> ApiResult<HttpResponse> {
    let team_id = parse_team_id(path.into_inner())?;
    let member_ids =
        parse_user_id_list(payload.into_inner().member_ids, FieldName::new("memberIds"))?;
    state.teams.add_members(team_id, member_ids).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Names of the categories a team owns.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/categories",
    params(("team_id" = String, Path, description = "Team identifier")),
    responses(
        (status = 200, description = "Category names", body = [String]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "getAssignedCategories"
)]
#[get("/teams/{team_id}/categories")]
pub async fn get_assigned_categories(
    state: web::Data<HttpState>,
    path: web::Path<TeamPath>,
) -> ApiResult<web::Json<Vec<String>>> {
    let team_id = parse_team_id(path.into_inner())?;
    Ok(web::Json(
        state.teams_query.assigned_categories(team_id).await?,
    ))
}

/// Give a team ownership of more categories.
#[utoipa::path(
    post,
    path = "/api/v1/teams/{team_id}/categories",
    params(("team_id" = String, Path, description = "Team identifier")),
    request_body = AddCategoriesRequestBody,
    responses(
        (status = 204, description = "Categories added"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "A category is already owned", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "addCategories"
)]
#[post("/teams/{team_id}/categories")]
pub async fn add_categories(
    state: web::Data<HttpState>,
    path: web::Path<TeamPath>,
    payload: web::Json<AddCategoriesRequestBody>,
) -> ApiResult<HttpResponse> {
    let team_id = parse_team_id(path.into_inner())?;
    let category_ids = parse_uuid_list(
        payload.into_inner().category_ids,
        FieldName::new("categoryIds"),
    )?;
    state.teams.add_categories(team_id, category_ids).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Name of the team a user belongs to.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/team",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Team name, null when unassigned", body = UserTeamResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "getTeamNameForUser"
)]
#[get("/users/{user_id}/team")]
pub async fn get_user_team(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<UserTeamResponseBody>> {
    let user_id = parse_user_id(path.into_inner().user_id, FieldName::new("userId"))?;
    let team_name = state.teams_query.team_name_for_user(&user_id).await?;
    Ok(web::Json(UserTeamResponseBody { team_name }))
}

#[cfg(test)]
#[path = "teams_tests.rs"]
mod tests;
