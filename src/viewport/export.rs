//! CSV export of measurement points.
//!
//! Rows are `index,date,anxiety,uuid`. Nothing is quoted or escaped: indices,
//! ISO instants and numbers never contain a comma, and identifiers are
//! server-issued UUIDs.

use chrono::SecondsFormat;
use strum::AsRefStr;

use super::measurement::MeasurementPoint;

/// Header row of the export file
pub const CSV_HEADER: &str = "index,date,anxiety,uuid";

/// Which points an export covers
#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr)]
pub enum ExportScope {
    /// The whole canonical sequence
    #[strum(serialize = "all")]
    All,
    /// The current window after decimation
    #[strum(serialize = "visible")]
    Visible,
}

/// Format a number the way the dashboard displays it: integers without a
/// trailing `.0`, no negative zero
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// Serialize points to CSV text (no trailing newline)
pub fn to_csv<'a, I>(points: I) -> String
where
    I: IntoIterator<Item = &'a MeasurementPoint>,
{
    let mut lines = vec![CSV_HEADER.to_string()];
    lines.extend(points.into_iter().map(|p| {
        format!(
            "{},{},{},{}",
            p.index,
            p.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            format_number(p.anxiety),
            p.source_id
        )
    }));
    lines.join("\n")
}

/// Suggested file name for an export of `display_name`'s data
pub fn export_file_name(display_name: &str) -> String {
    let name = display_name.trim();
    if name.is_empty() {
        "anxiety_user.csv".to_string()
    } else {
        format!("anxiety_{}.csv", name)
    }
}
