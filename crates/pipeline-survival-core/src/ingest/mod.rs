//! Input readers.
//!
//! Parsers work on in-memory strings; the `read_*` helpers add file access
//! and attach the path to IO errors.

mod csv;

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{IngestError, Result};
use crate::survival::{Deal, PipelineRecord};

pub use csv::{parse_date, parse_deals, parse_records};

/// Historical won-deal values keyed by product name.
pub type DealValues = BTreeMap<String, Vec<f64>>;

/// Read a file to a string, keeping the path on failure.
pub fn read_to_string(path: &Path) -> Result<String, IngestError> {
    std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a `duration,event` CSV file.
pub fn read_records(path: &Path) -> Result<Vec<PipelineRecord>> {
    parse_records(&read_to_string(path)?)
}

/// Read a `ProductId,SQLDate,WonDate` CSV file.
pub fn read_deals(path: &Path) -> Result<Vec<Deal>> {
    parse_deals(&read_to_string(path)?)
}

/// Parse a JSON object mapping product name to a list of deal values.
pub fn parse_deal_values(content: &str) -> Result<DealValues, IngestError> {
    Ok(serde_json::from_str(content)?)
}

/// Read a deal values JSON file.
pub fn read_deal_values(path: &Path) -> Result<DealValues, IngestError> {
    parse_deal_values(&read_to_string(path)?)
}

/// Values for one product, or every product pooled when `product` is `None`.
pub fn select_product(
    values: &DealValues,
    product: Option<&str>,
) -> Result<Vec<f64>, IngestError> {
    match product {
        Some(name) => values
            .get(name)
            .cloned()
            .ok_or_else(|| IngestError::UnknownProduct {
                product: name.to_string(),
                available: values.keys().cloned().collect::<Vec<_>>().join(", "),
            }),
        None => Ok(values.values().flatten().copied().collect()),
    }
}
