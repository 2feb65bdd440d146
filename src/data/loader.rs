//! Record source loading and per-record validation.
//!
//! The source is a JSON array of objects. Numeric fields may arrive as
//! JSON numbers or numeric strings; `ocean_proximity` must be one of the
//! four known labels. A record with any missing, unparseable or
//! non-finite field is dropped whole, with no default substitution. An
//! unreachable source or malformed JSON is fatal to the run.

use crate::data::records::{HouseRecord, OceanProximity};
use crate::error::ValuationError;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;

/// The cleaned record set produced from one source document.
///
/// Ordering matches the source. Dropped records are counted but never
/// surfaced as errors, since partial or garbage source data is expected.
#[derive(Clone, Debug)]
pub struct HousingRecords {
    records: Vec<HouseRecord>,
    skipped: usize,
}

impl HousingRecords {
    /// Loads and cleans records from a JSON file.
    ///
    /// # Errors
    /// [`ValuationError::DataSource`] if the file cannot be read or is
    /// not a well-formed JSON array.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ValuationError> {
        let text = std::fs::read_to_string(&path).map_err(|e| {
            ValuationError::DataSource(format!(
                "cannot read record source {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::parse(&text)
    }

    /// Loads and cleans records from any reader, for callers that fetch
    /// the document themselves.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ValuationError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| ValuationError::DataSource(format!("cannot read record source: {}", e)))?;
        Self::parse(&text)
    }

    /// Cleans records from an in-memory JSON document.
    pub fn parse(json: &str) -> Result<Self, ValuationError> {
        let root: Value = serde_json::from_str(json)
            .map_err(|e| ValuationError::DataSource(format!("malformed record source: {}", e)))?;
        let rows = root.as_array().ok_or_else(|| {
            ValuationError::DataSource("record source must be a JSON array".to_string())
        })?;

        let mut records = Vec::with_capacity(rows.len());
        let mut skipped = 0;
        for row in rows {
            match parse_record(row) {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }

        Ok(Self { records, skipped })
    }

    /// The validated records, in source order.
    pub fn records(&self) -> &[HouseRecord] {
        &self.records
    }

    /// Consumes the set, yielding the validated records.
    pub fn into_records(self) -> Vec<HouseRecord> {
        self.records
    }

    /// Number of validated records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of source rows dropped during validation.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

fn parse_record(value: &Value) -> Option<HouseRecord> {
    let obj = value.as_object()?;
    let proximity = OceanProximity::from_label(obj.get("ocean_proximity")?.as_str()?)?;

    Some(HouseRecord {
        longitude: numeric_field(obj, "longitude")?,
        latitude: numeric_field(obj, "latitude")?,
        housing_median_age: numeric_field(obj, "housing_median_age")?,
        total_rooms: numeric_field(obj, "total_rooms")?,
        total_bedrooms: numeric_field(obj, "total_bedrooms")?,
        population: numeric_field(obj, "population")?,
        households: numeric_field(obj, "households")?,
        median_income: numeric_field(obj, "median_income")?,
        median_house_value: numeric_field(obj, "median_house_value")?,
        proximity,
    })
}

/// Accepts a JSON number or a numeric string; rejects anything else and
/// anything that does not parse to a finite value.
fn numeric_field(obj: &Map<String, Value>, name: &str) -> Option<f64> {
    let parsed = match obj.get(name)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}
