//! Wfdispatch Resolver
//!
//! Maps an ambiguous selector (numeric id, file path or display name) onto
//! exactly one workflow definition, or lets the operator pick one when no
//! selector was given.
//!
//! Matching runs the ordered rule table in [`MATCH_RULES`]: id, then path,
//! then case-insensitive name. The first rule with any hit wins and the first
//! catalog entry it hits is returned.

mod error;
mod resolver;
mod rules;

pub use error::ResolveError;
pub use resolver::{Resolver, StandardResolver};
pub use rules::{MATCH_RULES, MatchRule, find_match};
