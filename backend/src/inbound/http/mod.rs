//! HTTP inbound adapter exposing REST endpoints.

pub mod catalogue;
pub mod deletion;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod teams;
#[cfg(test)]
pub mod test_utils;
pub mod tickets;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` endpoint on `cfg`.
///
/// The literal `/teams/unassigned-*` routes precede `/teams/{team_id}`, and
/// malformed JSON bodies are answered with the shared error payload.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use helpdesk::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .service(teams::list_teams)
        .service(teams::create_team)
        .service(teams::list_unassigned_users)
        .service(teams::list_unassigned_categories)
        .service(teams::get_team)
        .service(teams::delete_team)
        .service(teams::get_team_roster)
        .service(teams::add_members)
        .service(teams::get_assigned_categories)
        .service(teams::add_categories)
        .service(teams::get_user_team)
        .service(tickets::list_tickets)
        .service(tickets::create_ticket)
        .service(tickets::get_ticket)
        .service(tickets::update_ticket)
        .service(tickets::accept_ticket)
        .service(tickets::transition_ticket)
        .service(tickets::delete_ticket)
        .service(catalogue::list_categories)
        .service(catalogue::create_category)
        .service(catalogue::list_sub_categories)
        .service(catalogue::create_sub_category)
        .service(catalogue::list_support_types)
        .service(catalogue::create_support_type);
}
