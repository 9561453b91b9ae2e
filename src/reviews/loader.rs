//! CSV loading for review datasets.
//!
//! Expects the header `Title,Date,Rating,Review`. Columns may appear in any
//! order; extra columns are ignored.

use super::Review;
use crate::error::{CrustError, Result};
use std::io::Read;
use std::path::Path;
use tracing::{debug, instrument};

const REQUIRED_COLUMNS: [&str; 4] = ["Title", "Date", "Rating", "Review"];

/// Load all reviews from a CSV file.
#[instrument]
pub fn load_reviews(path: &Path) -> Result<Vec<Review>> {
    let file = std::fs::File::open(path).map_err(|e| {
        CrustError::InvalidInput(format!("Cannot open reviews file {}: {}", path.display(), e))
    })?;
    read_reviews(file)
}

/// Read reviews from any CSV source.
pub fn read_reviews<R: Read>(reader: R) -> Result<Vec<Review>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?;
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(CrustError::InvalidInput(format!(
            "Reviews file is missing column(s): {}",
            missing.join(", ")
        )));
    }

    let mut reviews = Vec::new();
    for (row, record) in csv_reader.deserialize::<Review>().enumerate() {
        let review = record.map_err(|e| {
            CrustError::InvalidInput(format!("Malformed review on data row {}: {}", row + 1, e))
        })?;
        reviews.push(review);
    }

    debug!("Read {} reviews", reviews.len());
    Ok(reviews)
}
