//! Minimal CSV readers for the two tabular inputs.
//!
//! Only simple comma-separated rows are supported: no embedded commas or
//! multi-line cells. Cells may be wrapped in double quotes.

use chrono::NaiveDate;

use crate::error::{IngestError, Result};
use crate::survival::{Deal, PipelineRecord};

const RECORD_HEADER: &str = "duration,event";
const DEAL_HEADER: &str = "ProductId,SQLDate,WonDate";

/// Parse `duration,event` rows into records.
///
/// Event flags are validated per record, so an unrecognized flag surfaces
/// as an invalid record naming its index among the data rows.
pub fn parse_records(content: &str) -> Result<Vec<PipelineRecord>> {
    let mut rows = rows(content);
    let (_, header) = rows.next().ok_or_else(|| missing_header(RECORD_HEADER))?;
    let header: Vec<String> = header.iter().map(|h| h.to_ascii_lowercase()).collect();
    if header.len() != 2
        || header[0] != "duration"
        || !matches!(header[1].as_str(), "event" | "event_observed" | "observed")
    {
        return Err(missing_header(RECORD_HEADER).into());
    }

    let mut records = Vec::new();
    for (index, (line, cells)) in rows.enumerate() {
        expect_columns(line, &cells, 2)?;
        let duration = parse_number(line, &cells[0])?;
        records.push(PipelineRecord::from_flag(index, duration, &cells[1])?);
    }
    Ok(records)
}

/// Parse `ProductId,SQLDate,WonDate` rows into deals.
///
/// An empty `WonDate` means the deal is still open.
pub fn parse_deals(content: &str) -> Result<Vec<Deal>> {
    let mut rows = rows(content);
    let (_, header) = rows.next().ok_or_else(|| missing_header(DEAL_HEADER))?;
    let expected: Vec<String> = DEAL_HEADER
        .split(',')
        .map(|h| h.to_ascii_lowercase())
        .collect();
    let header: Vec<String> = header.iter().map(|h| h.to_ascii_lowercase()).collect();
    if header != expected {
        return Err(missing_header(DEAL_HEADER).into());
    }

    let mut deals = Vec::new();
    for (line, cells) in rows {
        expect_columns(line, &cells, 3)?;
        let opened_on = parse_date(line, &cells[1])?;
        let won_on = if cells[2].is_empty() {
            None
        } else {
            Some(parse_date(line, &cells[2])?)
        };
        deals.push(Deal::new(cells[0].clone(), opened_on, won_on));
    }
    Ok(deals)
}

/// Parse `M/D/YYYY` or `YYYY-MM-DD`.
pub fn parse_date(line: usize, value: &str) -> Result<NaiveDate, IngestError> {
    NaiveDate::parse_from_str(value, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|_| IngestError::InvalidDate {
            line,
            value: value.to_string(),
        })
}

/// Non-blank lines with their 1-based line numbers, split into trimmed cells.
fn rows(content: &str) -> impl Iterator<Item = (usize, Vec<String>)> + '_ {
    content
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| (i + 1, l.split(',').map(clean_cell).collect()))
}

fn clean_cell(cell: &str) -> String {
    let cell = cell.trim();
    cell.strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(cell)
        .trim()
        .to_string()
}

fn expect_columns(line: usize, cells: &[String], expected: usize) -> Result<(), IngestError> {
    if cells.len() != expected {
        return Err(IngestError::ColumnCount {
            line,
            expected,
            found: cells.len(),
        });
    }
    Ok(())
}

fn parse_number(line: usize, value: &str) -> Result<f64, IngestError> {
    value.parse::<f64>().map_err(|_| IngestError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}

fn missing_header(expected: &str) -> IngestError {
    IngestError::MissingHeader {
        expected: expected.to_string(),
    }
}
