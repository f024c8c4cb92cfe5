//! Regex-based scanning of view definition text.
//!
//! Three fixed patterns cover everything this crate needs to read out of
//! SQL: the relations a definition selects from, the `CREATE VIEW ... AS`
//! prefix SQLite stores, and explicit current-database qualification MySQL
//! embeds in stored definitions.
//!
//! ## Limitations
//!
//! This is deliberately not a SQL parser. The reference scanner only sees
//! the token immediately following a `FROM` or `JOIN` keyword, so it
//! misses:
//! - additional relations in comma-separated join lists (`FROM a, b`)
//! - CTE names and subqueries without an explicit table reference
//! - exotic quoting beyond shedding simple quote characters
//!
//! A missed reference under-connects the dependency graph; it never raises
//! an error.

use once_cell::sync::Lazy;
use regex::Regex;

/// Token immediately following FROM/JOIN; the capture lands on the last
/// word-character run of that token, which sheds schema qualification and
/// surrounding quote characters in one step.
static RELATION_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:(?i:FROM|JOIN))\s+\S*\b(\S+)\b").expect("relation reference pattern is valid")
});

/// `CREATE VIEW <name> AS` prefix as stored by SQLite
static CREATE_VIEW_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\ACREATE\s+VIEW\s+\S+\s+AS\s+").expect("create view prefix pattern is valid")
});

/// Relation names referenced by a view definition, in occurrence order.
/// Duplicates are preserved; callers dedup where it matters.
pub fn referenced_relations(definition: &str) -> Vec<String> {
    RELATION_REFERENCE
        .captures_iter(definition)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Strip the stored `CREATE VIEW <name> AS` prefix from a SQLite catalog
/// entry, leaving only the query body.
pub fn strip_create_view_prefix(sql: &str) -> String {
    CREATE_VIEW_PREFIX.replace(sql, "").into_owned()
}

/// Remove explicit qualification with the current database from table
/// references. MySQL stores definitions with tables scoped to the database
/// they were created in; a dump carrying that name could not be replayed
/// against a differently-named database.
pub fn strip_database_qualification(sql: &str, quoted_database: &str) -> String {
    let pattern = format!("{}[.]", regex::escape(quoted_database));
    let re = Regex::new(&pattern).expect("escaped database name is a valid pattern");
    re.replace_all(sql, "").into_owned()
}

/// Normalize a definition to the exact SQL that would follow `AS` in a
/// `CREATE VIEW`: surrounding whitespace and trailing statement terminators
/// stripped.
pub fn normalize_definition(definition: &str) -> String {
    definition.trim().trim_end_matches(';').trim_end().to_string()
}
