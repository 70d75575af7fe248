//! Integration tests for `DieselAssignmentRepository`.
//!
//! Batch writes, unassigned views and team deletion run against embedded
//! PostgreSQL so the unique constraints and RESTRICT foreign keys take part.

use std::time::Duration;

use chrono::Utc;
use helpdesk::domain::ports::{
    AssignmentRepository, AssignmentRepositoryError, CatalogueRepository,
};
use helpdesk::domain::{
    AssignmentBatch, AssignmentKind, Category, DeleteOutcome, EntityName, Team, UserId,
};
use helpdesk::outbound::persistence::{DieselAssignmentRepository, DieselCatalogueRepository};
use rstest::{fixture, rstest};
use uuid::Uuid;

#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;

use embedded_postgres::{TestDatabase, format_postgres_error, handle_cluster_setup_failure};

struct TestContext {
    repository: DieselAssignmentRepository,
    catalogue: DieselCatalogueRepository,
    ada: UserId,
    grace: UserId,
    database: TestDatabase,
}

impl TestContext {
    fn block_on<F: std::future::Future>(&self, fut: F) -> F::Output {
        self.database.runtime.block_on(fut)
    }

    fn category(&self, name: &str) -> Category {
        let category = Category::new(EntityName::new(name).expect("name"), None, Utc::now());
        self.block_on(self.catalogue.insert_category(&category))
            .expect("category stored");
        category
    }

    fn team(&self, name: &str, batches: &[AssignmentBatch]) -> Team {
        let team = Team::new(EntityName::new(name).expect("name"), Utc::now());
        self.block_on(self.repository.create_team(&team, batches))
            .expect("team stored");
        team
    }
}

fn setup_context() -> Result<TestContext, String> {
    let database = embedded_postgres::setup_database()?;
    let ada = UserId::from_uuid(database.insert_user("Ada", "support"));
    let grace = UserId::from_uuid(database.insert_user("Grace", "support"));
    database.insert_user("Rita", "requester");
    Ok(TestContext {
        repository: DieselAssignmentRepository::new(database.pool.clone()),
        catalogue: DieselCatalogueRepository::new(database.pool.clone()),
        ada,
        grace,
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
fn create_team_rolls_back_when_a_member_is_taken(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: create_team_rolls_back_when_a_member_is_taken skipped");
        return;
    };

    let network = context.team("Network", &[AssignmentBatch::members(&[context.ada])]);
    let email = Team::new(EntityName::new("Email").expect("name"), Utc::now());
    let error = context
        .block_on(context.repository.create_team(
            &email,
            &[AssignmentBatch::members(&[context.grace, context.ada])],
        ))
        .expect_err("ada already belongs to Network");

    assert_eq!(
        error,
        AssignmentRepositoryError::already_assigned(AssignmentKind::Member, *context.ada.as_uuid())
    );
    let missing = context
        .block_on(context.repository.find_team(email.id))
        .expect("lookup succeeds");
    assert!(missing.is_none(), "the rejected team must not be stored");

    let unassigned = context
        .block_on(context.repository.list_unassigned_support_users())
        .expect("unassigned users");
    assert_eq!(
        unassigned.iter().map(|user| user.id).collect::<Vec<_>>(),
        vec![context.grace],
        "grace stays unassigned and requesters are never listed"
    );
    let roster = context
        .block_on(context.repository.team_roster(network.id))
        .expect("roster");
    assert_eq!(roster.len(), 1);
    assert_eq!(roster.first().map(|user| user.name.as_str()), Some("Ada"));
}

#[rstest]
fn category_ownership_drives_the_team_views(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: category_ownership_drives_the_team_views skipped");
        return;
    };

    let dns = context.category("DNS");
    context.category("Email");
    let network = context.team(
        "Network",
        &[
            AssignmentBatch::members(&[context.ada]),
            AssignmentBatch::categories(vec![dns.id]),
        ],
    );

    let names = context
        .block_on(context.repository.assigned_category_names(network.id))
        .expect("assigned names");
    assert_eq!(names, vec!["DNS".to_owned()]);

    let unassigned = context
        .block_on(context.repository.list_unassigned_categories())
        .expect("unassigned categories");
    assert_eq!(
        unassigned
            .iter()
            .map(|category| category.name.as_str())
            .collect::<Vec<_>>(),
        vec!["Email"]
    );

    let ada_team = context
        .block_on(context.repository.team_name_for_user(&context.ada))
        .expect("team lookup");
    assert_eq!(ada_team.as_deref(), Some("Network"));
    let grace_team = context
        .block_on(context.repository.team_name_for_user(&context.grace))
        .expect("team lookup");
    assert_eq!(grace_team, None);
}

#[rstest]
fn assigning_unknown_children_is_rejected(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: assigning_unknown_children_is_rejected skipped");
        return;
    };

    let network = context.team("Network", &[]);
    let stranger = Uuid::new_v4();
    let error = context
        .block_on(
            context
                .repository
                .assign(network.id, &AssignmentBatch::categories(vec![stranger])),
        )
        .expect_err("unknown category");
    assert_eq!(
        error,
        AssignmentRepositoryError::unknown_reference(AssignmentKind::Category, stranger)
    );

    let missing_team = Uuid::new_v4();
    let error = context
        .block_on(
            context
                .repository
                .assign(missing_team, &AssignmentBatch::members(&[context.ada])),
        )
        .expect_err("unknown team");
    assert_eq!(error, AssignmentRepositoryError::team_not_found(missing_team));
}

#[rstest]
fn delete_team_requires_no_assignments(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: delete_team_requires_no_assignments skipped");
        return;
    };

    let staffed = context.team("Network", &[AssignmentBatch::members(&[context.ada])]);
    let error = context
        .block_on(context.repository.delete_team(staffed.id))
        .expect_err("team still has a member");
    assert_eq!(error, AssignmentRepositoryError::team_in_use(staffed.id));

    let empty = context.team("Email", &[]);
    let first = context
        .block_on(context.repository.delete_team(empty.id))
        .expect("first delete");
    let second = context
        .block_on(context.repository.delete_team(empty.id))
        .expect("second delete");
    assert_eq!(first, DeleteOutcome::Deleted);
    assert_eq!(second, DeleteOutcome::NoRowsAffected);
}

#[rstest]
fn concurrent_member_additions_admit_one_team(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: concurrent_member_additions_admit_one_team skipped");
        return;
    };

    let network = context.team("Network", &[]);
    let email = context.team("Email", &[]);
    let ada = context.ada;
    let spawn_assign = |team_id: Uuid| {
        let repository = context.repository.clone();
        context.database.runtime.spawn(async move {
            repository
                .assign(team_id, &AssignmentBatch::members(&[ada]))
                .await
        })
    };
    let first = spawn_assign(network.id);
    let second = spawn_assign(email.id);
    let results = context.block_on(async {
        [
            first.await.expect("first task"),
            second.await.expect("second task"),
        ]
    });

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    let error = results
        .into_iter()
        .find_map(Result::err)
        .expect("one assignment loses");
    assert_eq!(
        error,
        AssignmentRepositoryError::already_assigned(AssignmentKind::Member, *ada.as_uuid())
    );
}

#[rstest]
fn assignment_racing_an_uncommitted_rival_names_the_user(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!(
            "SKIP-TEST-CLUSTER: assignment_racing_an_uncommitted_rival_names_the_user skipped"
        );
        return;
    };

    let network = context.team("Network", &[]);
    let rival = context.team("Email", &[]);
    let ada = context.ada;

    // Hold Ada's rival assignment open so the repository's pre-check cannot
    // see it and the unique constraint settles the race instead.
    let mut client = context.database.client();
    let mut rival_tx = client.transaction().expect("begin rival transaction");
    rival_tx
        .execute(
            "INSERT INTO team_assignments (team_id, user_id) VALUES ($1, $2)",
            &[&rival.id, ada.as_uuid()],
        )
        .unwrap_or_else(|err| panic!("rival insert: {}", format_postgres_error(&err)));

    let repository = context.repository.clone();
    let pending = context.database.runtime.spawn(async move {
        repository
            .assign(network.id, &AssignmentBatch::members(&[ada]))
            .await
    });
    std::thread::sleep(Duration::from_millis(300));
    rival_tx.commit().expect("commit rival assignment");

    let error = context
        .block_on(pending)
        .expect("assignment task")
        .expect_err("rival won the race");
    assert_eq!(
        error,
        AssignmentRepositoryError::already_assigned(AssignmentKind::Member, *ada.as_uuid())
    );
    let team_name = context
        .block_on(context.repository.team_name_for_user(&ada))
        .expect("team lookup");
    assert_eq!(team_name.as_deref(), Some("Email"));
}
