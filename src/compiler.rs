//! Intent compiler: natural-language prompt plus schema text in, SQL text
//! (or an `Error: ` string) out.
//!
//! The compiler is a pure, synchronous computation over its two string
//! inputs. It holds no shared mutable state, so concurrent invocations need
//! no coordination; every call builds its own catalog and discards it.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, info, warn};

use crate::error::{CompileError, Result};
use crate::intent::{default_extractors, IntentExtractor, QueryIntent};
use crate::relationship::{Relationship, Resolver};
use crate::schema::{Catalog, Table};

/// Table the generated query always joins against for the filter predicate.
const FILTER_TABLE: &str = "users";
/// Fallback main table when the prompt names none.
const FALLBACK_TABLE: &str = "customers";

pub struct SqlCompiler {
    extractors: Vec<Box<dyn IntentExtractor>>,
    resolver: Resolver,
}

impl Default for SqlCompiler {
    fn default() -> Self {
        Self::new(default_extractors(), Resolver::default())
    }
}

impl SqlCompiler {
    pub fn new(extractors: Vec<Box<dyn IntentExtractor>>, resolver: Resolver) -> Self {
        Self {
            extractors,
            resolver,
        }
    }

    /// Public contract: always returns a string, either a SQL statement or a
    /// human-readable message starting with `Error: `. Unresolvable prompts
    /// all collapse to one generic message; an unexpected fault is caught
    /// here and reported with its description instead of unwinding further.
    pub fn compile(&self, prompt: &str, schema: &str) -> String {
        match catch_unwind(AssertUnwindSafe(|| self.translate(prompt, schema))) {
            Ok(Ok(sql)) => sql,
            Ok(Err(err)) => {
                warn!(%err, "SQL generation failed");
                err.to_string()
            }
            Err(panic) => {
                let err = CompileError::Internal(describe_panic(panic));
                warn!(%err, "SQL generation panicked");
                err.to_string()
            }
        }
    }

    /// Same computation as [`compile`](Self::compile) with the failure cause
    /// preserved as a tagged error.
    pub fn translate(&self, prompt: &str, schema: &str) -> Result<String> {
        let prompt = prompt.to_lowercase();
        debug!(prompt = %prompt, "processing prompt");

        let catalog = Catalog::parse(schema);

        let intent = self
            .extractors
            .iter()
            .find_map(|extractor| extractor.extract(&prompt))
            .ok_or(CompileError::NoFilter)?;
        debug!(?intent, "extracted filter intent");

        let main_table = resolve_main_table(&catalog, &prompt)?;
        debug!(main_table = %main_table.name, "resolved main table");

        // The join target must exist even when the main table already is
        // `users` or a relationship could otherwise be found.
        if !catalog.contains(FILTER_TABLE) {
            return Err(CompileError::NoUsersTable);
        }

        let relationship = self
            .resolver
            .resolve(&catalog, &main_table.name, FILTER_TABLE)
            .ok_or(CompileError::NoRelationship)?;

        let sql = render_select(main_table, &relationship, &intent);
        info!(sql = %sql, "generated SQL");
        Ok(sql)
    }
}

/// First table, in catalog order, whose lower-cased name occurs in the
/// prompt; falls back to a table literally named `customers`.
fn resolve_main_table<'a>(catalog: &'a Catalog, prompt: &str) -> Result<&'a Table> {
    catalog
        .tables()
        .find(|table| prompt.contains(&table.name.to_lowercase()))
        .or_else(|| catalog.get(FALLBACK_TABLE))
        .ok_or(CompileError::NoMainTable)
}

/// Emit the SELECT text. Key columns and foreign-key-typed columns are both
/// excluded from the projection; an empty projection yields an empty column
/// list, which matches the historical output format rather than valid SQL.
fn render_select(table: &Table, rel: &Relationship, intent: &QueryIntent) -> String {
    let columns = table
        .columns
        .iter()
        .filter(|col| !col.is_key && !col.is_foreign_key())
        .map(|col| format!("t1.{}", col.name))
        .collect::<Vec<_>>()
        .join(", ");

    // The filter value is interpolated inline, not bound as a parameter;
    // callers pin this output format.
    format!(
        "SELECT {columns}\nFROM {main} t1\nJOIN {filter} t2 ON t1.{src} = t2.{tgt}\nWHERE t2.{col} = '{val}'",
        main = table.name,
        filter = FILTER_TABLE,
        src = rel.source_column,
        tgt = rel.target_column,
        col = intent.filter_column,
        val = intent.filter_value,
    )
}

fn describe_panic(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown internal fault".to_string()
    }
}
