//! Query-intent extraction from natural-language prompts.
//!
//! Each supported sentence pattern is one [`IntentExtractor`]; the compiler
//! walks its extractor chain and takes the first hit. Only the
//! username-equality pattern exists today, but new patterns slot in as
//! further implementations without touching the compiler's control flow.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Extracted query intent: an equality filter on a column of the joined
/// filter table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryIntent {
    pub filter_column: String,
    pub filter_value: String,
}

/// One recognized sentence pattern. Prompts arrive already lower-cased.
pub trait IntentExtractor: Send + Sync {
    fn extract(&self, prompt: &str) -> Option<QueryIntent>;
}

lazy_static! {
    static ref USERNAME_EQ: Regex =
        Regex::new(r"username\s*[=']?\s*'([^']*)'").expect("static regex");
}

/// Matches the first `username = 'value'` occurrence; the `=` may be omitted
/// or replaced by a stray quote.
pub struct UsernameEquality;

impl IntentExtractor for UsernameEquality {
    fn extract(&self, prompt: &str) -> Option<QueryIntent> {
        let caps = USERNAME_EQ.captures(prompt)?;
        Some(QueryIntent {
            filter_column: "username".to_string(),
            filter_value: caps[1].to_string(),
        })
    }
}

/// The extractor chain for all currently supported sentence patterns.
pub fn default_extractors() -> Vec<Box<dyn IntentExtractor>> {
    vec![Box::new(UsernameEquality)]
}
