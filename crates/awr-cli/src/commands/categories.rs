//! Categories command: show the rule table sent with every query.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use awr_core::CategoryRuleSet;

/// Formats one rule per line: category, pattern, and an `i` flag for case-insensitive rules.
pub fn format_categories(rules: &CategoryRuleSet) -> String {
    let width = rules
        .rules()
        .iter()
        .map(|rule| rule.path.key().chars().count())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for rule in rules.rules() {
        let flags = if rule.ignore_case { "i" } else { "" };
        writeln!(
            output,
            "{:<width$}  /{}/{flags}",
            rule.path.key(),
            rule.pattern
        )
        .unwrap();
    }
    output
}

pub fn run<W: Write>(writer: &mut W, json: bool) -> Result<()> {
    let rules = CategoryRuleSet::default_rules();
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&rules)?)?;
    } else {
        write!(writer, "{}", format_categories(&rules))?;
    }
    Ok(())
}
