//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the helpdesk model (users, teams, catalogue, tickets) and
//! the services that enforce its consistency rules. Adapters reach the
//! domain only through the traits in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - TeamService, TicketService, CatalogueService: driving port
//!   implementations generic over their driven ports.

pub mod catalogue;
mod catalogue_service;
pub mod deletion;
pub mod error;
pub mod name;
pub mod ports;
pub mod team;
mod team_service;
pub mod ticket;
mod ticket_service;
pub mod trace_id;
pub mod user;

pub use self::catalogue::{Category, SubCategory, SubCategoryListing, SupportType};
pub use self::catalogue_service::CatalogueService;
pub use self::deletion::DeleteOutcome;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::name::{EntityName, NAME_MAX_CHARS, NameValidationError, normalise_description};
pub use self::team::{AssignmentBatch, AssignmentKind, CategorySummary, CreatedTeam, Team};
pub use self::team_service::TeamService;
pub use self::ticket::{
    Ticket, TicketDraft, TicketListing, TicketPatch, TicketStatus, TicketStatusParseError,
    TicketValidationError,
};
pub use self::ticket_service::TicketService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserId, UserRole, UserSummary};

