//! Schemas for the browser artifact tables, with their pre-insert hooks.
//!
//! The physical tables are created by the application's migrations; these
//! declarations must list the same columns.

use super::column::Column;
use super::filter::FilterOp;
use super::order::OrderColumn;
use super::registry::SchemaRegistry;
use super::table::{ConflictAction, TableSchema};
use crate::errors::ValidationResult;
use crate::record::Record;

/// Provenance columns shared by every extracted-artifact table.
fn provenance(run_id_required: bool) -> Vec<Column> {
    let run_id = if run_id_required {
        Column::text("run_id").not_null()
    } else {
        Column::text("run_id")
    };
    vec![
        run_id,
        Column::text("source_path"),
        Column::text("discovered_by"),
        Column::integer("partition_index"),
        Column::text("fs_type"),
        Column::text("logical_path"),
        Column::text("forensic_path"),
        Column::text("tags"),
        Column::text("notes"),
        Column::text("created_at_utc"),
    ]
}

fn key_columns() -> [Column; 2] {
    [
        Column::integer("id").auto_increment(),
        Column::integer("evidence_id").not_null(),
    ]
}

// ─── Pre-insert hooks ───────────────────────────────────────────────────────

/// Replace each key with 1/0 according to its truthiness (absent → 0).
pub fn coerce_truthy(mut record: Record, keys: &[&str]) -> Record {
    for key in keys {
        let flag = i64::from(record.is_truthy(key));
        record.insert(*key, flag);
    }
    record
}

/// Fill `name_normalized` with the lowercased name unless already given.
pub fn tags_pre_insert(mut record: Record) -> Record {
    let has_normalized = record
        .get_str("name_normalized")
        .is_some_and(|s| !s.is_empty());
    let lowered = record
        .get_str("name")
        .filter(|n| !n.is_empty())
        .map(str::to_lowercase);
    if let (false, Some(lower)) = (has_normalized, lowered) {
        record.insert("name_normalized", lower);
    }
    record
}

pub fn extensions_pre_insert(record: Record) -> Record {
    coerce_truthy(record, &["enabled"])
}

pub fn hsts_pre_insert(record: Record) -> Record {
    coerce_truthy(record, &["include_subdomains"])
}

// ─── Schemas ────────────────────────────────────────────────────────────────

pub fn cookies() -> ValidationResult<TableSchema> {
    TableSchema::builder("cookies")
        .columns(key_columns())
        .columns([
            Column::text("browser").not_null(),
            Column::text("profile"),
            Column::text("name").not_null(),
            Column::text("value"),
            Column::text("domain").not_null(),
            Column::text("path"),
            Column::text("expires_utc"),
            Column::integer("is_secure"),
            Column::integer("is_httponly"),
            Column::text("samesite"),
            Column::text("creation_utc"),
            Column::text("last_access_utc"),
            Column::integer("encrypted").default_value(0),
            Column::blob("encrypted_value").exclude_from_select(),
            Column::integer("user_context_id"),
            Column::integer("private_browsing_id"),
        ])
        .columns(provenance(false))
        .sortable(["id", "browser", "domain", "name", "creation_utc", "last_access_utc"])
        .default_order([OrderColumn::asc("domain"), OrderColumn::asc("name")])
        .filterable("browser", [FilterOp::Eq])
        .filterable("domain", [FilterOp::Eq, FilterOp::Like])
        .filterable("run_id", [FilterOp::Eq])
        .filterable("user_context_id", [FilterOp::Eq])
        .filterable("private_browsing_id", [FilterOp::Eq])
        .supports_run_delete(true)
        .build()
}

pub fn bookmarks() -> ValidationResult<TableSchema> {
    TableSchema::builder("bookmarks")
        .columns(key_columns())
        .columns([
            Column::text("browser").not_null(),
            Column::text("profile"),
            Column::text("url").not_null(),
            Column::text("title"),
            Column::text("folder_path"),
            Column::text("bookmark_type").default_value("url"),
            Column::text("guid"),
            Column::text("date_added_utc"),
            Column::text("date_modified_utc"),
        ])
        .columns(provenance(false))
        .sortable(["id", "browser", "folder_path", "title", "date_added_utc"])
        .default_order([OrderColumn::asc("folder_path"), OrderColumn::asc("title")])
        .filterable("browser", [FilterOp::Eq])
        .filterable("folder_path", [FilterOp::Eq, FilterOp::Like])
        .filterable("run_id", [FilterOp::Eq])
        .supports_run_delete(true)
        .build()
}

pub fn credentials() -> ValidationResult<TableSchema> {
    TableSchema::builder("credentials")
        .columns(key_columns())
        .columns([
            Column::text("browser").not_null(),
            Column::text("profile"),
            Column::text("origin_url").not_null(),
            Column::text("action_url"),
            Column::text("username_element"),
            Column::text("username_value"),
            Column::text("password_element"),
            Column::blob("password_value_encrypted").exclude_from_select(),
            Column::text("signon_realm"),
            Column::text("date_created_utc"),
            Column::text("date_last_used_utc"),
            Column::integer("times_used"),
            Column::integer("blacklisted_by_user").default_value(0),
            Column::integer("is_insecure").default_value(0),
            Column::integer("is_breached").default_value(0),
        ])
        .columns(provenance(true))
        .sortable(["date_last_used_utc", "origin_url"])
        .default_order([OrderColumn::desc("date_last_used_utc")])
        .filterable("browser", [FilterOp::Eq])
        .filterable("origin_url", [FilterOp::Like])
        .filterable("is_insecure", [FilterOp::Eq])
        .filterable("is_breached", [FilterOp::Eq])
        .supports_run_delete(true)
        .build()
}

pub fn site_permissions() -> ValidationResult<TableSchema> {
    TableSchema::builder("site_permissions")
        .columns(key_columns())
        .columns([
            Column::text("browser").not_null(),
            Column::text("profile"),
            Column::text("origin").not_null(),
            Column::text("permission_type").not_null(),
            Column::text("permission_value").not_null(),
            Column::text("raw_type"),
            Column::integer("raw_value"),
            Column::text("granted_at_utc"),
            Column::text("expires_at_utc"),
        ])
        .columns(provenance(true))
        .sortable(["origin", "permission_type"])
        .default_order([OrderColumn::asc("origin"), OrderColumn::asc("permission_type")])
        .filterable("browser", [FilterOp::Eq])
        .filterable("permission_type", [FilterOp::Eq])
        .filterable("permission_value", [FilterOp::Eq])
        .supports_run_delete(true)
        .build()
}

pub fn browser_extensions() -> ValidationResult<TableSchema> {
    TableSchema::builder("browser_extensions")
        .columns(key_columns())
        .columns([
            Column::text("browser").not_null(),
            Column::text("profile"),
            Column::text("extension_id").not_null(),
            Column::text("name").not_null(),
            Column::text("version"),
            Column::text("description"),
            Column::text("permissions"),
            Column::text("install_time"),
            Column::integer("enabled").default_value(0),
            Column::integer("risk_score").default_value(0),
            Column::text("known_category"),
        ])
        .columns(provenance(true))
        .sortable(["risk_score", "name"])
        .default_order([OrderColumn::desc("risk_score"), OrderColumn::asc("name")])
        .filterable("browser", [FilterOp::Eq])
        .filterable("known_category", [FilterOp::Eq])
        .filterable("risk_score", [FilterOp::Gte])
        .supports_run_delete(true)
        .pre_insert_hook(extensions_pre_insert)
        .build()
}

/// UNIQUE on (evidence_id, hashed_host, source_path); REPLACE keeps re-runs current.
pub fn hsts_entries() -> ValidationResult<TableSchema> {
    TableSchema::builder("hsts_entries")
        .columns(key_columns())
        .columns([
            Column::text("browser").not_null(),
            Column::text("profile"),
            Column::text("hashed_host").not_null(),
            Column::text("decoded_host"),
            Column::real("sts_observed"),
            Column::real("expiry"),
            Column::integer("include_subdomains").default_value(0),
            Column::text("mode"),
        ])
        .columns(provenance(true))
        .conflict_action(ConflictAction::Replace)
        .sortable(["created_at_utc"])
        .default_order([OrderColumn::desc("created_at_utc")])
        .filterable("browser", [FilterOp::Eq])
        .filterable("decoded_host", [FilterOp::Like])
        .supports_run_delete(true)
        .pre_insert_hook(hsts_pre_insert)
        .build()
}

/// Case tags. UNIQUE on (evidence_id, name_normalized); duplicates are ignored.
pub fn tags() -> ValidationResult<TableSchema> {
    TableSchema::builder("tags")
        .columns(key_columns())
        .columns([
            Column::text("name").not_null(),
            Column::text("name_normalized").not_null(),
            Column::text("created_at_utc"),
            Column::text("created_by").not_null().default_value("manual"),
            Column::integer("usage_count").not_null().default_value(0),
        ])
        .conflict_action(ConflictAction::Ignore)
        .sortable(["name", "usage_count"])
        .default_order([OrderColumn::asc("name")])
        .filterable("name_normalized", [FilterOp::Eq, FilterOp::Like])
        .pre_insert_hook(tags_pre_insert)
        .build()
}

/// Registry holding every catalog schema.
pub fn registry() -> ValidationResult<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    for schema in [
        cookies()?,
        bookmarks()?,
        credentials()?,
        site_permissions()?,
        browser_extensions()?,
        hsts_entries()?,
        tags()?,
    ] {
        registry.register(schema)?;
    }
    Ok(registry)
}
