//! Report command: hours per category for the previous day.
//!
//! This module implements `awr report` with human-readable and JSON output.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use awr_client::Client;
use awr_core::{CategoryRuleSet, DurationReport, ReportWindow, aggregate};
use chrono::Utc;
use serde::Serialize;

use crate::Config;

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub window: ReportWindow,
    pub durations: DurationReport,
}

/// Fetches yesterday's events and rolls them up by category.
pub fn generate_report_data(config: &Config, rules: &CategoryRuleSet) -> Result<ReportData> {
    let tz = config.tz()?;
    let window = ReportWindow::previous_day(Utc::now(), tz);
    tracing::info!(window = %window.to_timeperiod(), "querying ActivityWatch");

    let client = Client::new(config.server_url.as_str(), config.timeout())
        .context("failed to create ActivityWatch client")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let events = runtime
        .block_on(client.query_events(rules, &window))
        .with_context(|| format!("failed to query {}", client.endpoint()))?;

    let durations = aggregate(&events);
    Ok(ReportData { window, durations })
}

// ========== Output Formatting ==========

/// Formats the report as one `<category>: <hours> hours` line per entry, sorted by category.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();
    for (category, hours) in data.durations.iter() {
        writeln!(output, "{category}: {hours:.1} hours").unwrap();
    }
    output
}

/// JSON output structure.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    window: String,
    timezone: &'static str,
    total_hours: f64,
    entries: Vec<JsonEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonEntry<'a> {
    category: &'a str,
    depth: usize,
    hours: f64,
}

/// Formats the report as JSON.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    let report = JsonReport {
        window: data.window.to_timeperiod(),
        timezone: data.window.timezone().name(),
        total_hours: data.durations.total_hours(),
        entries: data
            .durations
            .iter()
            .map(|(category, hours)| JsonEntry {
                category,
                depth: category.split(awr_core::PATH_DELIMITER).count(),
                hours,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Command Entry Point ==========

/// Runs the report command.
pub fn run<W: Write>(writer: &mut W, config: &Config, json: bool) -> Result<()> {
    let rules = CategoryRuleSet::default_rules();
    let data = generate_report_data(config, &rules)?;

    if data.durations.is_empty() {
        tracing::info!("no categorized activity in window");
    }

    if json {
        writeln!(writer, "{}", format_report_json(&data)?)?;
    } else {
        write!(writer, "{}", format_report(&data))?;
    }
    Ok(())
}
