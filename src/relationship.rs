//! Foreign-key relationship resolution between two catalog tables.
//!
//! Resolution is name-based: a foreign-key column in the source table whose
//! name mentions the target table (naively singularized) is taken as the join
//! edge. First match in declaration order wins; composite keys and per-table
//! primary key names are out of scope.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schema::Catalog;

/// A directed foreign-key edge: `source.source_column = target.target_column`.
/// Computed on demand and discarded after use, never stored in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relationship {
    pub source_column: String,
    pub target_column: String,
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Column name assumed to be every table's primary key. The resolver
    /// does not verify this against the target table's actual columns.
    pub primary_key: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            primary_key: "id".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Find a foreign-key edge from `source` to `target`.
    ///
    /// Returns `None` when either table is missing from the catalog or no
    /// column matches — an expected outcome, not an error. The match is the
    /// first source column, in declaration order, whose type text contains
    /// "foreign key" and whose lower-cased name contains the target name
    /// lower-cased with trailing `s`s stripped (`users` matches `user_id`).
    pub fn resolve(&self, catalog: &Catalog, source: &str, target: &str) -> Option<Relationship> {
        if !catalog.contains(target) {
            return None;
        }
        let table = catalog.get(source)?;

        let lowered = target.to_lowercase();
        let needle = lowered.trim_end_matches('s');

        let column = table
            .columns
            .iter()
            .find(|col| col.is_foreign_key() && col.name.to_lowercase().contains(needle))?;

        debug!(
            source,
            target,
            column = %column.name,
            "resolved foreign-key relationship"
        );

        Some(Relationship {
            source_column: column.name.clone(),
            target_column: self.config.primary_key.clone(),
        })
    }
}
