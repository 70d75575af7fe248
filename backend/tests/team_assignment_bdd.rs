//! Behavioural tests for team membership and category ownership.

#[expect(
    dead_code,
    reason = "Shared world carries ticket fields used only by the lifecycle suite."
)]
#[path = "support/helpdesk_world.rs"]
mod helpdesk_world;

use helpdesk::domain::DeleteOutcome;
use helpdesk::domain::ports::CreateTeamRequest;
use helpdesk_world::HelpdeskWorld;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[fixture]
fn world() -> HelpdeskWorld {
    HelpdeskWorld::default()
}

fn create_team(world: &HelpdeskWorld, name: &str, members: &[&str]) {
    let harness = world.harness();
    let request = CreateTeamRequest {
        name: name.to_owned(),
        member_ids: members.iter().map(|member| world.user(member)).collect(),
        category_ids: Vec::new(),
    };
    if let Some(created) = world.record(harness.block_on(harness.state.teams.create_team(request)))
    {
        world.remember(name, created.team.id);
    }
}

fn add_members(world: &HelpdeskWorld, team: &str, members: &[&str]) {
    let harness = world.harness();
    let user_ids = members.iter().map(|member| world.user(member)).collect();
    world.record(harness.block_on(
        harness
            .state
            .teams
            .add_members(world.entity(team), user_ids),
    ));
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("an existing team {team} with member {user}")]
fn an_existing_team_with_member(world: &HelpdeskWorld, team: String, user: String) {
    create_team(world, &team, &[&user]);
    assert!(world.last_error.get().is_none(), "team setup failed");
}

#[given("an existing empty team {team}")]
fn an_existing_empty_team(world: &HelpdeskWorld, team: String) {
    create_team(world, &team, &[]);
    assert!(world.last_error.get().is_none(), "team setup failed");
}

#[given("categories {first} and {second}")]
fn categories(world: &HelpdeskWorld, first: String, second: String) {
    world.create_category(&first);
    world.create_category(&second);
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("a team named {team} is created with member {user}")]
fn a_team_is_created_with_member(world: &HelpdeskWorld, team: String, user: String) {
    create_team(world, &team, &[&user]);
}

#[when("{user} is added to {team}")]
fn a_user_is_added_to(world: &HelpdeskWorld, user: String, team: String) {
    add_members(world, &team, &[&user]);
}

#[when("{first} and {second} are added to {team}")]
fn two_users_are_added_to(world: &HelpdeskWorld, first: String, second: String, team: String) {
    add_members(world, &team, &[&first, &second]);
}

#[when("category {category} is assigned to {team}")]
fn category_is_assigned_to(world: &HelpdeskWorld, category: String, team: String) {
    let harness = world.harness();
    world.record(harness.block_on(
        harness
            .state
            .teams
            .add_categories(world.entity(&team), vec![world.entity(&category)]),
    ));
}

#[when("team {team} is deleted")]
fn team_is_deleted(world: &HelpdeskWorld, team: String) {
    let harness = world.harness();
    if let Some(outcome) =
        world.record(harness.block_on(harness.state.teams.delete_team(world.entity(&team))))
    {
        world.last_delete.set(outcome);
    }
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the roster of {team} lists {user}")]
fn the_roster_lists(world: &HelpdeskWorld, team: String, user: String) {
    let harness = world.harness();
    let roster = harness
        .block_on(harness.state.teams_query.team_roster(world.entity(&team)))
        .expect("roster query succeeds");
    let ids: Vec<_> = roster.iter().map(|member| member.id).collect();
    assert_eq!(ids, vec![world.user(&user)]);
}

#[then("the only unassigned support user is {user}")]
fn the_only_unassigned_support_user_is(world: &HelpdeskWorld, user: String) {
    let harness = world.harness();
    let unassigned = harness
        .block_on(harness.state.teams_query.unassigned_support_users())
        .expect("unassigned query succeeds");
    let names: Vec<_> = unassigned.into_iter().map(|summary| summary.name).collect();
    assert_eq!(names, vec![user]);
}

#[then("user {user} belongs to team {team}")]
fn user_belongs_to_team(world: &HelpdeskWorld, user: String, team: String) {
    let harness = world.harness();
    let name = harness
        .block_on(
            harness
                .state
                .teams_query
                .team_name_for_user(&world.user(&user)),
        )
        .expect("team lookup succeeds");
    assert_eq!(name, Some(team));
}

#[then("user {user} has no team")]
fn user_has_no_team(world: &HelpdeskWorld, user: String) {
    let harness = world.harness();
    let name = harness
        .block_on(
            harness
                .state
                .teams_query
                .team_name_for_user(&world.user(&user)),
        )
        .expect("team lookup succeeds");
    assert_eq!(name, None);
}

#[then("the categories of {team} are {category}")]
fn the_categories_of_team_are(world: &HelpdeskWorld, team: String, category: String) {
    let harness = world.harness();
    let names = harness
        .block_on(
            harness
                .state
                .teams_query
                .assigned_categories(world.entity(&team)),
        )
        .expect("category query succeeds");
    assert_eq!(names, vec![category]);
}

#[then("the only unassigned category is {category}")]
fn the_only_unassigned_category_is(world: &HelpdeskWorld, category: String) {
    let harness = world.harness();
    let unassigned = harness
        .block_on(harness.state.teams_query.unassigned_categories())
        .expect("unassigned query succeeds");
    let names: Vec<_> = unassigned.into_iter().map(|summary| summary.name).collect();
    assert_eq!(names, vec![category]);
}

#[then("the delete reports {outcome}")]
fn the_delete_reports(world: &HelpdeskWorld, outcome: String) {
    let reported = world.last_delete.get().expect("a delete was recorded");
    let expected = match outcome.as_str() {
        "deleted" => DeleteOutcome::Deleted,
        "no rows affected" => DeleteOutcome::NoRowsAffected,
        other => panic!("unknown delete outcome: {other}"),
    };
    assert_eq!(reported, expected);
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/team_assignment.feature",
    name = "Creating a team takes its members out of the unassigned pool"
)]
fn creating_a_team_takes_members_out_of_the_pool(world: HelpdeskWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/team_assignment.feature",
    name = "A support user cannot join a second team"
)]
fn a_support_user_cannot_join_a_second_team(world: HelpdeskWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/team_assignment.feature",
    name = "Batch member assignment is all or nothing"
)]
fn batch_member_assignment_is_all_or_nothing(world: HelpdeskWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/team_assignment.feature",
    name = "Requestors cannot join a team"
)]
fn requestors_cannot_join_a_team(world: HelpdeskWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/team_assignment.feature",
    name = "Assigning a category removes it from the unassigned pool"
)]
fn assigning_a_category_removes_it_from_the_pool(world: HelpdeskWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/team_assignment.feature",
    name = "A team that still has members cannot be deleted"
)]
fn a_team_with_members_cannot_be_deleted(world: HelpdeskWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/team_assignment.feature",
    name = "Deleting an empty team twice reports no rows the second time"
)]
fn deleting_an_empty_team_twice(world: HelpdeskWorld) {
    let _ = world;
}
