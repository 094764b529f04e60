use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Suggested download name, e.g. `report_2024-06-01.txt`.
pub fn default_report_filename(date: NaiveDate) -> String {
    format!("report_{}.txt", date.format("%Y-%m-%d"))
}

/// Writes the report verbatim, byte for byte.
fn write_report(path: &Path, report: &str) -> std::io::Result<()> {
    fs::write(path, report)
}

/// Prompts for a save location and writes the report. Returns the chosen
/// path, or None if the user cancelled the dialog.
pub fn save_report_dialog(report: &str) -> Result<Option<PathBuf>, std::io::Error> {
    let suggested = default_report_filename(chrono::Local::now().date_naive());
    let picked = rfd::FileDialog::new()
        .set_file_name(&suggested)
        .add_filter("Text", &["txt"])
        .save_file();

    match picked {
        Some(path) => {
            write_report(&path, report)?;
            Ok(Some(path))
        }
        None => Ok(None),
    }
}
