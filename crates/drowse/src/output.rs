//! Output rendering for the `drowse` CLI.
//!
//! Every command produces either one value (a status snapshot, a sensor
//! sample, a light state) or one list (the command roster). The
//! functions here turn those into text in the format selected by
//! `--output`.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color ────────────────────────────────────────────────────────────

/// Whether color escapes should be emitted for this invocation.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// An on/off/unknown state word, colored when enabled.
pub fn paint_state(state: Option<bool>, color: bool) -> String {
    match (state, color) {
        (Some(true), true) => "on".green().to_string(),
        (Some(true), false) => "on".into(),
        (Some(false), _) => "off".into(),
        (None, true) => "unknown".dimmed().to_string(),
        (None, false) => "unknown".into(),
    }
}

// ── Renderers ────────────────────────────────────────────────────────

/// Render one value in the chosen format.
///
/// `detail` builds the human-readable block for table mode and `brief`
/// the one-line scripting form for plain mode; the structured formats
/// serialize `value` itself, so neither closure touches JSON or YAML.
pub fn render_single<T: Serialize>(
    format: &OutputFormat,
    value: &T,
    detail: impl Fn(&T) -> String,
    brief: impl Fn(&T) -> String,
) -> String {
    match format {
        OutputFormat::Table => detail(value),
        OutputFormat::Plain => brief(value),
        structured => render_serialized(structured, value),
    }
}

/// Render a slice of items in the chosen format.
///
/// Table mode derives columns from `R: Tabled`; plain mode emits one
/// `brief` line per item; the structured formats serialize the slice.
pub fn render_list<T, R>(
    format: &OutputFormat,
    items: &[T],
    to_row: impl Fn(&T) -> R,
    brief: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = items.iter().map(to_row).collect();
            Table::new(&rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Plain => items.iter().map(brief).collect::<Vec<_>>().join("\n"),
        structured => render_serialized(structured, items),
    }
}

fn render_serialized<T: Serialize + ?Sized>(format: &OutputFormat, value: &T) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).expect("serialization should not fail")
        }
        OutputFormat::JsonCompact => {
            serde_json::to_string(value).expect("serialization should not fail")
        }
        OutputFormat::Yaml => serde_yaml::to_string(value).expect("serialization should not fail"),
        // Table and plain are handled by the callers above.
        OutputFormat::Table | OutputFormat::Plain => String::new(),
    }
}

/// Write rendered output to stdout unless quiet mode suppressed it.
pub fn print_output(rendered: &str, quiet: bool) {
    if quiet || rendered.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{rendered}");
}
