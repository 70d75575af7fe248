//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. When a migration
//! changes a table, update the matching block here (or regenerate it with
//! `diesel print-schema`).

diesel::table! {
    /// Users mirrored from the identity provider.
    users (id) {
        /// Identity provider identifier.
        id -> Uuid,
        /// Display name.
        name -> Text,
        /// Role label; `support` users may join teams and accept tickets.
        role -> Text,
        /// Avatar URL.
        image -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Teams of support users.
    teams (id) {
        id -> Uuid,
        name -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// User to team membership; `user_id` is unique.
    team_assignments (id) {
        id -> Uuid,
        team_id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Top-level ticket categories; `name` is unique.
    categories (id) {
        id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Category to team ownership; `category_id` is unique.
    category_assignments (id) {
        id -> Uuid,
        team_id -> Uuid,
        category_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Sub-categories; `(category_id, name)` is unique.
    sub_categories (id) {
        id -> Uuid,
        category_id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Kinds of help a ticket can request; `name` is unique.
    support_types (id) {
        id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Support tickets.
    tickets (id) {
        id -> Uuid,
        requestor_id -> Uuid,
        /// Null until the ticket is accepted.
        assigned_id -> Nullable<Uuid>,
        category_id -> Uuid,
        sub_category_id -> Uuid,
        support_type_id -> Uuid,
        details -> Text,
        /// One of `open`, `ongoing`, `resolved`, `closed` (CHECK constraint).
        status -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(team_assignments -> teams (team_id));
diesel::joinable!(team_assignments -> users (user_id));
diesel::joinable!(category_assignments -> teams (team_id));
diesel::joinable!(category_assignments -> categories (category_id));
diesel::joinable!(sub_categories -> categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    teams,
    team_assignments,
    categories,
    category_assignments,
    sub_categories,
    support_types,
    tickets,
);
