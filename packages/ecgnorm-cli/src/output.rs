use ecgnorm::BatchReport;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Print one line on stdout. Empty lines are still terminated.
pub fn print_line(text: &str) -> Result<(), String> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", text).map_err(|e| format!("Failed to write to stdout: {}", e))
}

/// Pretty-printed JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    print_line(&to_json(value)?)
}

/// Save a batch report as pretty JSON, replacing any existing file.
pub fn write_report(report: &BatchReport, path: &Path) -> Result<(), String> {
    let mut json = to_json(report)?;
    json.push('\n');
    std::fs::write(path, json)
        .map_err(|e| format!("Failed to write report '{}': {}", path.display(), e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {}", e))
}
