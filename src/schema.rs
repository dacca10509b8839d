//! Schema model builder.
//!
//! Parses the line-oriented schema notation (`Table: name` followed by
//! `- column (type)` lines) into an in-memory catalog. Parsing is total:
//! malformed lines degrade to empty fields instead of failing, so downstream
//! consumers must tolerate partially specified schemas.

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// Raw type text as written, e.g. `int, primary key`. Empty when the
    /// declaration omitted the parentheses.
    pub ty: String,
    /// True when the type text mentions a primary or foreign key.
    pub is_key: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        let name = name.into();
        let ty = ty.into();
        let lower = ty.to_lowercase();
        let is_key = lower.contains("primary key") || lower.contains("foreign key");
        Self { name, ty, is_key }
    }

    /// Whether the declared type marks this column as a foreign key.
    pub fn is_foreign_key(&self) -> bool {
        self.ty.to_lowercase().contains("foreign key")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    /// Columns in declaration order; the order drives the generated SELECT
    /// column list.
    pub columns: Vec<Column>,
}

/// In-memory schema catalog for a single translation request.
///
/// Tables keep their declaration order (main-table resolution scans in that
/// order). Redefining a table name replaces the earlier entry in place, so
/// the original position is kept. Names are case-sensitive as written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    tables: Vec<Table>,
}

impl Catalog {
    /// Parse raw schema text into a catalog. Total: no input is rejected.
    ///
    /// Recognized lines (whitespace-trimmed first):
    /// - `Table: <name>` declares a new current table with an empty column list
    /// - `- <name> (<type>)` appends a column to the current table; the type
    ///   part is optional
    /// - blank and unrecognized lines are ignored, as are column lines seen
    ///   before any table declaration
    pub fn parse(schema: &str) -> Self {
        let mut catalog = Catalog::default();
        let mut current: Option<usize> = None;

        for line in schema.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(rest) = line.strip_prefix("Table:") {
                let table = Table {
                    name: rest.trim().to_string(),
                    columns: Vec::new(),
                };
                current = Some(catalog.upsert(table));
            } else if let Some(rest) = line.strip_prefix('-') {
                let Some(idx) = current else {
                    continue;
                };
                let (name, ty) = match rest.split_once('(') {
                    Some((name, ty)) => (name.trim(), ty.trim().trim_end_matches(')').trim()),
                    None => (rest.trim(), ""),
                };
                catalog.tables[idx].columns.push(Column::new(name, ty));
            }
        }

        debug!(tables = catalog.tables.len(), "parsed schema catalog");
        catalog
    }

    /// Insert a table, replacing any same-named entry in place.
    fn upsert(&mut self, table: Table) -> usize {
        match self.tables.iter().position(|t| t.name == table.name) {
            Some(idx) => {
                self.tables[idx] = table;
                idx
            }
            None => {
                self.tables.push(table);
                self.tables.len() - 1
            }
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Tables in declaration order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_table() {
        let catalog = Catalog::parse("Table: t\n- id (int, primary key)\n");

        assert_eq!(catalog.len(), 1);
        let table = catalog.get("t").unwrap();
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.columns[0].name, "id");
        assert_eq!(table.columns[0].ty, "int, primary key");
        assert!(table.columns[0].is_key);
    }

    #[test]
    fn test_key_detection_is_case_insensitive() {
        let catalog = Catalog::parse("Table: t\n- id (INT, Primary Key)\n- ref (Foreign Key)\n");

        let table = catalog.get("t").unwrap();
        assert!(table.columns[0].is_key);
        assert!(table.columns[1].is_key);
        assert!(table.columns[1].is_foreign_key());
        assert!(!table.columns[0].is_foreign_key());
    }

    #[test]
    fn test_column_without_type() {
        let catalog = Catalog::parse("Table: t\n- name\n");

        let table = catalog.get("t").unwrap();
        assert_eq!(table.columns[0].name, "name");
        assert_eq!(table.columns[0].ty, "");
        assert!(!table.columns[0].is_key);
    }

    #[test]
    fn test_unrecognized_lines_are_ignored() {
        let schema = "garbage line\nTable: t\n- id (int)\n\nsome note\n- name (varchar)\n";
        let catalog = Catalog::parse(schema);

        let table = catalog.get("t").unwrap();
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[1].name, "name");
    }

    #[test]
    fn test_column_before_any_table_is_dropped() {
        let catalog = Catalog::parse("- orphan (int)\nTable: t\n- id (int)\n");

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("t").unwrap().columns.len(), 1);
    }

    #[test]
    fn test_redefinition_overwrites_in_place() {
        let schema = "Table: a\n- x (int)\nTable: b\n- y (int)\nTable: a\n- z (int)\n";
        let catalog = Catalog::parse(schema);

        assert_eq!(catalog.len(), 2);
        // `a` keeps its original position but gets the new column list
        let names: Vec<&str> = catalog.tables().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        let a = catalog.get("a").unwrap();
        assert_eq!(a.columns.len(), 1);
        assert_eq!(a.columns[0].name, "z");
    }

    #[test]
    fn test_parsing_is_total_on_junk_input() {
        for schema in ["", "(((", "Table:", "-", "Table:\n- (", "- ()\nTable: \n- x ("] {
            let _ = Catalog::parse(schema);
        }
    }

    #[test]
    fn test_declaration_order_is_preserved() {
        let schema = "Table: orders\n- id (int, primary key)\nTable: users\n- id (int, primary key)\n";
        let catalog = Catalog::parse(schema);

        let names: Vec<&str> = catalog.tables().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["orders", "users"]);
    }
}
