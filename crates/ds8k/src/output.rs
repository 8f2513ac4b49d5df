//! Output formatting: table, JSON, YAML, plain.
//!
//! Table output shows a status line and the facts as rows. Structured
//! formats emit the full `{changed, failed, msg, items, facts}` report;
//! plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use ds8k_core::{Outcome, Report};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render an outcome in the format selected by `--output`.
///
/// `status` adds a `changed` / `ok` line above the table; info queries
/// never change anything and leave it off.
pub fn render_outcome<T, R>(
    global: &GlobalOpts,
    outcome: &Outcome<T>,
    status: bool,
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match global.output_format() {
        OutputFormat::Table => {
            let mut out = String::new();
            if status {
                out.push_str(&status_line(outcome.changed, global));
            }
            if !outcome.facts.is_empty() {
                if !out.is_empty() {
                    out.push('\n');
                }
                let rows: Vec<R> = outcome.facts.iter().map(to_row).collect();
                out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
            }
            Ok(out)
        }
        OutputFormat::Plain => Ok(outcome
            .facts
            .iter()
            .map(id_fn)
            .collect::<Vec<_>>()
            .join("\n")),
        format => {
            let report = Report::from_outcome(outcome)?;
            render_structured(&format, &report)
        }
    }
}

/// Structured report for a failed operation; `None` for table and plain,
/// which leave failures to the diagnostic on stderr.
pub fn render_failure(global: &GlobalOpts, report: &Report) -> Option<String> {
    match global.output_format() {
        OutputFormat::Table | OutputFormat::Plain => None,
        format => render_structured(&format, report).ok(),
    }
}

pub fn render_structured<T: Serialize + ?Sized>(
    format: &OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(|e| e.to_string()),
        _ => serde_json::to_string_pretty(data).map_err(|e| e.to_string()),
    };
    rendered.map_err(CliError::Render)
}

fn status_line(changed: bool, global: &GlobalOpts) -> String {
    let color = should_color(&global.color);
    let text = match (changed, global.check) {
        (true, true) => "would change",
        (true, false) => "changed",
        (false, _) => "ok",
    };
    match (color, changed) {
        (false, _) => text.to_owned(),
        (true, true) => text.yellow().bold().to_string(),
        (true, false) => text.green().to_string(),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Display helper for optional table cells.
pub fn cell(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}
