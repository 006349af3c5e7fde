//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of run results,
//! and the live display used while a run is in progress.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::{print_csv, read_csv, write_csv, CSV_HEADER};
pub use json_format::{print_json, to_json};
pub use plain::{
    format_result_line, print_error, print_info, print_plain, print_run_header, print_success,
    print_warning, LiveDisplay,
};

use crate::cli::OutputFormat;
use crate::error::ReportResult;
use crate::report::RunReport;

/// Format and print a finished run according to the specified format.
pub fn print_results(report: &RunReport, format: OutputFormat) -> ReportResult<()> {
    match format {
        OutputFormat::Plain => Ok(plain::print_plain(report)?),
        OutputFormat::Json => json_format::print_json(report),
        OutputFormat::Csv => csv_format::print_csv(&report.results),
    }
}
