//! Natural-language to SQL translation over a user-supplied schema.
//!
//! The pipeline has three parts: [`schema`] parses the line-oriented schema
//! notation into a catalog, [`relationship`] infers a foreign-key join edge
//! between two catalog tables, and [`compiler`] extracts query intent from
//! the prompt and emits the final SELECT statement (or an `Error: ` string).

pub mod compiler;
pub mod error;
pub mod intent;
pub mod relationship;
pub mod schema;
