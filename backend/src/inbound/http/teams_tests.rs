//! Tests for team assignment HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockTeamCommand, MockTeamQuery};
use crate::domain::{CreatedTeam, DeleteOutcome, UserId};
use crate::inbound::http::configure_api;
use crate::inbound::http::test_utils::mock_state;

const TEAM_ID: &str = "7d6f1c1e-2f0b-4d8e-9a55-0c1f3f4b9a10";
const ADA_ID: &str = "11111111-1111-4111-8111-111111111111";

#[fixture]
fn network_team() -> Team {
    let now = Utc
        .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid time");
    Team {
        id: Uuid::parse_str(TEAM_ID).expect("valid uuid"),
        name: "Network".to_owned(),
        created_at: now,
        updated_at: now,
    }
}

fn ada() -> UserSummary {
    UserSummary {
        id: UserId::from_uuid(Uuid::parse_str(ADA_ID).expect("valid uuid")),
        name: "Ada".to_owned(),
        image: None,
    }
}

async fn call(
    command: MockTeamCommand,
    query: MockTeamQuery,
    request: actix_test::TestRequest,
) -> actix_web::dev::ServiceResponse {
    let mut state = mock_state();
    state.teams = Arc::new(command);
    state.teams_query = Arc::new(query);
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await;
    actix_test::call_service(&app, request.to_request()).await
}

#[rstest]
#[actix_web::test]
async fn create_team_returns_roster(network_team: Team) {
    let mut command = MockTeamCommand::new();
    command
        .expect_create_team()
        .withf(|request| {
            request.name == "Network"
                && request.member_ids.len() == 1
                && request.category_ids.is_empty()
        })
        .times(1)
        .return_once(move |_| {
            Ok(CreatedTeam {
                team: network_team,
                roster: vec![ada()],
            })
        });

    let response = call(
        command,
        MockTeamQuery::new(),
        actix_test::TestRequest::post()
            .uri("/api/v1/teams")
            .set_json(json!({ "name": "Network", "memberIds": [ADA_ID] })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["team"]["name"], json!("Network"));
    assert_eq!(body["roster"][0]["name"], json!("Ada"));
}

#[rstest]
#[actix_web::test]
async fn create_team_rejects_malformed_member_ids() {
    let response = call(
        MockTeamCommand::new(),
        MockTeamQuery::new(),
        actix_test::TestRequest::post()
            .uri("/api/v1/teams")
            .set_json(json!({ "name": "Network", "memberIds": [ADA_ID, "ada"] })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], json!("memberIds"));
    assert_eq!(body["details"]["index"], json!(1));
}

#[rstest]
#[actix_web::test]
async fn malformed_json_uses_the_error_payload() {
    let response = call(
        MockTeamCommand::new(),
        MockTeamQuery::new(),
        actix_test::TestRequest::post()
            .uri("/api/v1/teams")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\": "),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], json!("invalid_request"));
}

#[rstest]
#[actix_web::test]
async fn unassigned_users_route_is_not_shadowed_by_team_id() {
    let mut query = MockTeamQuery::new();
    query
        .expect_unassigned_support_users()
        .times(1)
        .return_once(|| Ok(vec![ada()]));

    let response = call(
        MockTeamCommand::new(),
        query,
        actix_test::TestRequest::get().uri("/api/v1/teams/unassigned-users"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!([{ "id": ADA_ID, "name": "Ada", "image": null }]));
}

#[rstest]
#[actix_web::test]
async fn add_members_conflict_maps_to_409() {
    let mut command = MockTeamCommand::new();
    command
        .expect_add_members()
        .times(1)
        .return_once(|_, _| {
            Err(Error::conflict("user is already assigned to a team")
                .with_details(json!({ "code": "already_assigned" })))
        });

    let response = call(
        command,
        MockTeamQuery::new(),
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/teams/{TEAM_ID}/members"))
            .set_json(json!({ "memberIds": [ADA_ID] })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], json!("already_assigned"));
}

#[rstest]
#[actix_web::test]
async fn add_categories_returns_no_content() {
    let mut command = MockTeamCommand::new();
    command
        .expect_add_categories()
        .withf(|team_id, ids| team_id.to_string() == TEAM_ID && ids.len() == 1)
        .times(1)
        .return_once(|_, _| Ok(()));

    let response = call(
        command,
        MockTeamQuery::new(),
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/teams/{TEAM_ID}/categories"))
            .set_json(json!({ "categoryIds": [Uuid::new_v4().to_string()] })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[rstest]
#[actix_web::test]
async fn malformed_team_id_is_rejected_before_the_query() {
    let response = call(
        MockTeamCommand::new(),
        MockTeamQuery::new(),
        actix_test::TestRequest::get().uri("/api/v1/teams/network/members"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], json!("teamId"));
}

#[rstest]
#[actix_web::test]
async fn assigned_categories_are_returned_as_names() {
    let mut query = MockTeamQuery::new();
    query
        .expect_assigned_categories()
        .times(1)
        .return_once(|_| Ok(vec!["DNS".to_owned()]));

    let response = call(
        MockTeamCommand::new(),
        query,
        actix_test::TestRequest::get().uri(&format!("/api/v1/teams/{TEAM_ID}/categories")),
    )
    .await;

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!(["DNS"]));
}

#[rstest]
#[case(DeleteOutcome::Deleted, "deleted")]
#[case(DeleteOutcome::NoRowsAffected, "no rows affected")]
#[actix_web::test]
async fn delete_team_reports_status(#[case] outcome: DeleteOutcome, #[case] expected: &str) {
    let mut command = MockTeamCommand::new();
    command
        .expect_delete_team()
        .times(1)
        .return_once(move |_| Ok(outcome));

    let response = call(
        command,
        MockTeamQuery::new(),
        actix_test::TestRequest::delete().uri(&format!("/api/v1/teams/{TEAM_ID}")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({ "status": expected }));
}

#[rstest]
#[actix_web::test]
async fn user_without_team_reports_null() {
    let mut query = MockTeamQuery::new();
    query
        .expect_team_name_for_user()
        .times(1)
        .return_once(|_| Ok(None));

    let response = call(
        MockTeamCommand::new(),
        query,
        actix_test::TestRequest::get().uri(&format!("/api/v1/users/{ADA_ID}/team")),
    )
    .await;

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({ "teamName": null }));
}
