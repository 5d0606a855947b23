//! Core domain logic for the ActivityWatch category report.
//!
//! This crate contains the fundamental types and logic for:
//! - Category rules: the ordered table sent to the query service
//! - Classified events: activity intervals tagged with a category path
//! - Rollup: cumulative hours at every level of the category hierarchy
//! - Report window: the previous calendar day in a fixed timezone

pub mod event;
mod rollup;
pub mod rules;
pub mod window;

pub use event::{CategoryPath, ClassifiedEvent, PATH_DELIMITER};
pub use rollup::{DurationReport, aggregate, aggregate_parallel};
pub use rules::{CategoryRule, CategoryRuleSet, RuleError};
pub use window::{DEFAULT_TIMEZONE, ReportWindow};
