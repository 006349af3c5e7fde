//! JSON output formatting.

use crate::error::ReportResult;
use crate::report::RunReport;

/// Render a report as pretty JSON.
pub fn to_json(report: &RunReport) -> ReportResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Print a report in JSON format.
pub fn print_json(report: &RunReport) -> ReportResult<()> {
    println!("{}", to_json(report)?);
    Ok(())
}
