//! Diesel table definitions for the ledger schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Stock rows, including assigned and soft-deleted ones.
    products (id) {
        id -> Uuid,
        title -> Text,
        description -> Text,
        category -> Text,
        /// Never negative (CHECK constraint).
        quantity -> Int4,
        value -> Numeric,
        asset_type -> Text,
        serial_number -> Nullable<Text>,
        image_url -> Nullable<Text>,
        status -> Text,
        assigned_to_id -> Nullable<Uuid>,
        assigned_to_name -> Nullable<Text>,
        current_transaction_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    employees (id) {
        id -> Uuid,
        name -> Text,
        cpf -> Text,
        sector -> Text,
        email -> Nullable<Text>,
        phone -> Nullable<Text>,
    }
}

diesel::table! {
    /// Append-only audit trail. `seq` records insertion order.
    history_logs (id) {
        seq -> Int8,
        id -> Uuid,
        product_id -> Nullable<Uuid>,
        action -> Text,
        date -> Timestamptz,
        employee_id -> Nullable<Uuid>,
        employee_name -> Nullable<Text>,
        transaction_id -> Nullable<Uuid>,
        protocol_signature -> Nullable<Text>,
        admin_name -> Nullable<Text>,
    }
}

diesel::table! {
    categories (id) {
        id -> Uuid,
        name -> Text,
    }
}

diesel::table! {
    signed_contracts (id) {
        id -> Uuid,
        employee_id -> Uuid,
        product_id -> Uuid,
        transaction_id -> Nullable<Uuid>,
        kind -> Text,
        file_path -> Text,
        file_url -> Text,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    products,
    employees,
    history_logs,
    categories,
    signed_contracts,
);
