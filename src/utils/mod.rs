mod file_size;
mod report_file;

pub use file_size::format_size;
pub use report_file::{default_report_filename, save_report_dialog};
