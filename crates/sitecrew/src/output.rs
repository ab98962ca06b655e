//! Output formatting: table, JSON, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! JSON wraps the data in the uniform API envelope, plain emits one
//! identifier per line.

use std::io::{self, IsTerminal, Write};

use tabled::{Table, Tabled, settings::Style};

use sitecrew_core::{ApiResponse, CoreError};

use crate::cli::OutputFormat;

/// Determine whether color output should be enabled.
pub fn should_color() -> bool {
    io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err()
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: envelope-wrapped serde serialization
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_envelope(data, false),
        OutputFormat::JsonCompact => render_envelope(data, true),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_envelope(data, false),
        OutputFormat::JsonCompact => render_envelope(data, true),
        OutputFormat::Plain => id_fn(data),
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

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Envelope-wrapped JSON: `{success, data, error, timestamp}`.
fn render_envelope<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let value = serde_json::to_value(data).unwrap_or(serde_json::Value::Null);
    serialize_envelope(&ApiResponse::ok(value), compact)
}

/// Failure envelope for a domain error, same shape as the success path.
pub fn render_failure(err: &CoreError, compact: bool) -> String {
    serialize_envelope(&ApiResponse::<serde_json::Value>::failure(err), compact)
}

fn serialize_envelope(envelope: &ApiResponse<serde_json::Value>, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(envelope)
    } else {
        serde_json::to_string_pretty(envelope)
    };
    rendered.unwrap_or_else(|e| format!("{{\"success\":false,\"error\":\"{e}\"}}"))
}
