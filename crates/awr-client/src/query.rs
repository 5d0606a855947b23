//! Query script and request payload for the `/api/0/query/` endpoint.

use awr_core::{CategoryRuleSet, ReportWindow, RuleError};
use serde::{Deserialize, Serialize};

/// Request body accepted by the query endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Script statements, each terminated by `;`.
    pub query: Vec<String>,
    /// One `<start>/<end>` period per result group requested.
    pub timeperiods: Vec<String>,
}

impl QueryRequest {
    /// Builds the categorize-and-merge request for a single window.
    pub fn new(rules: &CategoryRuleSet, window: &ReportWindow) -> Result<Self, RuleError> {
        Ok(Self {
            query: build_query(rules)?,
            timeperiods: vec![window.to_timeperiod()],
        })
    }
}

/// Builds the query script.
///
/// The script intersects window events with not-afk periods, classifies them
/// with `rules`, and merges events sharing the same category.
pub fn build_query(rules: &CategoryRuleSet) -> Result<Vec<String>, RuleError> {
    let classes = rules.to_query_literal()?;
    Ok(vec![
        "window_events = query_bucket(find_bucket('aw-watcher-window_'));".to_string(),
        "not_afk_events = query_bucket(find_bucket('aw-watcher-afk_'));".to_string(),
        r#"not_afk_events = filter_keyvals(not_afk_events, "status", ["not-afk"]);"#.to_string(),
        "events = filter_period_intersect(window_events, not_afk_events);".to_string(),
        format!("classes = {classes};"),
        "events = categorize(events, classes);".to_string(),
        r#"events = merge_events_by_keys(events, ["$category"]);"#.to_string(),
        "RETURN = events;".to_string(),
    ])
}
