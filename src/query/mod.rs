//! Path queries over JSON records: pattern compiler, evaluator, join, and
//! the rule groups built on top of them.

pub mod evaluate;
pub mod group;
pub mod join;
pub mod pattern;
pub mod rules;

pub use evaluate::{evaluate, Bindings, NullPolicy, SearchResult};
pub use group::{extract, Condition, Entry, PatternGroup, Purpose, Validation};
pub use join::{consolidate, Tuple};
pub use pattern::{PathPattern, PatternError, Segment};
pub use rules::{RuleSet, RuleSpec, PRONUNCIATION_RULES, ROMANIZATION_RULES};
