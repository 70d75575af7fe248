//! Integration tests for `DieselTicketRepository` against embedded
//! PostgreSQL.

use chrono::{Duration, Utc};
use helpdesk::domain::ports::{CatalogueRepository, TicketRepository, TicketRepositoryError};
use helpdesk::domain::{
    Category, DeleteOutcome, EntityName, SubCategory, SupportType, Ticket, TicketDraft,
    TicketStatus, UserId,
};
use helpdesk::outbound::persistence::{DieselCatalogueRepository, DieselTicketRepository};
use rstest::{fixture, rstest};
use uuid::Uuid;

#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;

use embedded_postgres::{TestDatabase, format_postgres_error, handle_cluster_setup_failure};

struct TestContext {
    repository: DieselTicketRepository,
    requester: UserId,
    support: UserId,
    category_id: Uuid,
    sub_category_id: Uuid,
    support_type_id: Uuid,
    database: TestDatabase,
}

impl TestContext {
    fn block_on<F: std::future::Future>(&self, fut: F) -> F::Output {
        self.database.runtime.block_on(fut)
    }

    fn draft(&self, details: &str) -> TicketDraft {
        TicketDraft {
            requestor_id: self.requester,
            category_id: self.category_id,
            sub_category_id: self.sub_category_id,
            support_type_id: self.support_type_id,
            details: details.to_owned(),
        }
    }

    /// Store an open ticket created `minutes_ago` minutes in the past.
    fn open_ticket(&self, details: &str, minutes_ago: i64) -> Ticket {
        let created = Utc::now() - Duration::minutes(minutes_ago);
        let ticket = Ticket::open(self.draft(details), created).expect("valid draft");
        self.block_on(self.repository.insert(&ticket))
            .expect("ticket stored");
        ticket
    }

    fn stored(&self, ticket_id: Uuid) -> Ticket {
        self.block_on(self.repository.find_by_id(ticket_id))
            .expect("lookup succeeds")
            .expect("ticket exists")
    }
}

fn name(raw: &str) -> EntityName {
    EntityName::new(raw).expect("valid name")
}

fn setup_context() -> Result<TestContext, String> {
    let database = embedded_postgres::setup_database()?;
    let requester = UserId::from_uuid(database.insert_user("Rita", "requester"));
    let support = UserId::from_uuid(database.insert_user("Ada", "support"));

    let now = Utc::now();
    let category = Category::new(name("Network"), None, now);
    let sub_category = SubCategory::new(category.id, name("DNS"), None, now);
    let support_type = SupportType::new(name("Incident"), None, now);
    let catalogue = DieselCatalogueRepository::new(database.pool.clone());
    database
        .runtime
        .block_on(async {
            catalogue.insert_category(&category).await?;
            catalogue.insert_sub_category(&sub_category).await?;
            catalogue.insert_support_type(&support_type).await
        })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        repository: DieselTicketRepository::new(database.pool.clone()),
        requester,
        support,
        category_id: category.id,
        sub_category_id: sub_category.id,
        support_type_id: support_type.id,
        database,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn insert_and_find_round_trip_the_stored_fields(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: insert_and_find_round_trip_the_stored_fields skipped");
        return;
    };

    let ticket = context.open_ticket("VPN drops every hour", 0);
    let stored = context.stored(ticket.id);

    assert_eq!(stored.requestor_id, context.requester);
    assert_eq!(stored.assigned_id, None);
    assert_eq!(stored.support_type_id, context.support_type_id);
    assert_eq!(stored.details, "VPN drops every hour");
    assert_eq!(stored.status, TicketStatus::Open);

    let missing = context
        .block_on(context.repository.find_by_id(Uuid::new_v4()))
        .expect("lookup succeeds");
    assert!(missing.is_none());
}

#[rstest]
fn insert_rejects_an_unknown_support_type(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: insert_rejects_an_unknown_support_type skipped");
        return;
    };

    let mut draft = context.draft("Printer on fire");
    draft.support_type_id = Uuid::new_v4();
    let ticket = Ticket::open(draft, Utc::now()).expect("valid draft");
    let error = context
        .block_on(context.repository.insert(&ticket))
        .expect_err("foreign key rejects the support type");

    assert!(
        matches!(error, TicketRepositoryError::UnknownReference { ref message } if message.contains("support type")),
        "unexpected error: {error:?}"
    );
}

#[rstest]
fn accept_matches_only_open_unassigned_tickets(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: accept_matches_only_open_unassigned_tickets skipped");
        return;
    };

    let ticket = context.open_ticket("Mailbox full", 0);
    let accepted = context
        .block_on(
            context
                .repository
                .accept(ticket.id, &context.support, Utc::now()),
        )
        .expect("accept succeeds")
        .expect("open ticket matches");
    assert_eq!(accepted.assigned_id, Some(context.support));
    assert_eq!(accepted.status, TicketStatus::Ongoing);

    let again = context
        .block_on(
            context
                .repository
                .accept(ticket.id, &context.support, Utc::now()),
        )
        .expect("accept succeeds");
    assert!(again.is_none(), "an ongoing ticket cannot be accepted twice");

    // Reopen the status without clearing the assignee; acceptance still
    // refuses because someone already owns the ticket.
    context
        .database
        .client()
        .execute(
            "UPDATE tickets SET status = 'open' WHERE id = $1",
            &[&ticket.id],
        )
        .unwrap_or_else(|err| panic!("reset status: {}", format_postgres_error(&err)));
    let assigned = context
        .block_on(
            context
                .repository
                .accept(ticket.id, &context.support, Utc::now()),
        )
        .expect("accept succeeds");
    assert!(assigned.is_none(), "an assigned ticket cannot be accepted");

    let missing = context
        .block_on(
            context
                .repository
                .accept(Uuid::new_v4(), &context.support, Utc::now()),
        )
        .expect("accept succeeds");
    assert!(missing.is_none());
}

#[rstest]
fn transition_requires_the_expected_status(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: transition_requires_the_expected_status skipped");
        return;
    };

    let ticket = context.open_ticket("Laptop will not boot", 0);
    context
        .block_on(
            context
                .repository
                .accept(ticket.id, &context.support, Utc::now()),
        )
        .expect("accept succeeds")
        .expect("open ticket matches");

    let stale = context
        .block_on(context.repository.transition(
            ticket.id,
            TicketStatus::Open,
            TicketStatus::Closed,
            Utc::now(),
        ))
        .expect("transition succeeds");
    assert!(stale.is_none(), "the ticket is no longer open");

    let resolved = context
        .block_on(context.repository.transition(
            ticket.id,
            TicketStatus::Ongoing,
            TicketStatus::Resolved,
            Utc::now(),
        ))
        .expect("transition succeeds")
        .expect("ongoing ticket matches");
    assert_eq!(resolved.status, TicketStatus::Resolved);
    assert_eq!(resolved.assigned_id, Some(context.support));
}

#[rstest]
fn update_fields_overwrites_details(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: update_fields_overwrites_details skipped");
        return;
    };

    let ticket = context.open_ticket("Screen flickers", 0);
    let mut edited = ticket.clone();
    edited.details = "Screen flickers after docking".to_owned();
    edited.updated_at = Utc::now();

    let updated = context
        .block_on(context.repository.update_fields(&edited))
        .expect("update succeeds")
        .expect("ticket exists");
    assert_eq!(updated.details, "Screen flickers after docking");
    assert_eq!(updated.status, TicketStatus::Open);
    assert_eq!(updated.category_id, context.category_id);

    let mut ghost = edited;
    ghost.id = Uuid::new_v4();
    let missing = context
        .block_on(context.repository.update_fields(&ghost))
        .expect("update succeeds");
    assert!(missing.is_none());
}

#[rstest]
fn list_listings_joins_requester_and_optional_assignee(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!(
            "SKIP-TEST-CLUSTER: list_listings_joins_requester_and_optional_assignee skipped"
        );
        return;
    };

    let older = context.open_ticket("Keyboard sticks", 10);
    let newer = context.open_ticket("Cannot print", 1);
    context
        .block_on(
            context
                .repository
                .accept(older.id, &context.support, Utc::now()),
        )
        .expect("accept succeeds")
        .expect("open ticket matches");

    let listings = context
        .block_on(context.repository.list_listings())
        .expect("listings load");

    assert_eq!(
        listings.iter().map(|listing| listing.id).collect::<Vec<_>>(),
        vec![newer.id, older.id],
        "newest ticket first"
    );
    let [unassigned, assigned] = listings.as_slice() else {
        panic!("expected two listings, got {listings:?}");
    };
    assert_eq!(unassigned.requested_by, "Rita");
    assert_eq!(unassigned.assigned_to, None);
    assert_eq!(unassigned.assigned_to_avatar, None);
    assert_eq!(unassigned.status, TicketStatus::Open);
    assert_eq!(assigned.requested_by, "Rita");
    assert_eq!(assigned.assigned_to.as_deref(), Some("Ada"));
    assert_eq!(assigned.status, TicketStatus::Ongoing);
    assert_eq!(assigned.details, "Keyboard sticks");
}

#[rstest]
fn delete_reports_no_rows_affected_the_second_time(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: delete_reports_no_rows_affected_the_second_time skipped");
        return;
    };

    let ticket = context.open_ticket("Old request", 0);
    let first = context
        .block_on(context.repository.delete(ticket.id))
        .expect("first delete");
    let second = context
        .block_on(context.repository.delete(ticket.id))
        .expect("second delete");

    assert_eq!(first, DeleteOutcome::Deleted);
    assert_eq!(second, DeleteOutcome::NoRowsAffected);
    let gone = context
        .block_on(context.repository.find_by_id(ticket.id))
        .expect("lookup succeeds");
    assert!(gone.is_none());
}
