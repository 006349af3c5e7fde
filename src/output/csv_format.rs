//! CSV export of collision results.
//!
//! Columns: URL, Domain, IP, Port, Title, StatusCode, ContentLength. The
//! header row is always written, even for an empty result set.

use crate::error::ReportResult;
use crate::scanner::CollisionResult;
use std::io;

/// Export column names, in order.
pub const CSV_HEADER: [&str; 7] = [
    "URL",
    "Domain",
    "IP",
    "Port",
    "Title",
    "StatusCode",
    "ContentLength",
];

/// Write results as CSV.
pub fn write_csv<W: io::Write>(writer: W, results: &[CollisionResult]) -> ReportResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(CSV_HEADER)?;
    for result in results {
        wtr.serialize(result)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Parse results back from a CSV export.
pub fn read_csv<R: io::Read>(reader: R) -> ReportResult<Vec<CollisionResult>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut results = Vec::new();

    for record in rdr.deserialize() {
        results.push(record?);
    }

    Ok(results)
}

/// Print results in CSV format.
pub fn print_csv(results: &[CollisionResult]) -> ReportResult<()> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), results)
}
