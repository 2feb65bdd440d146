//! Record-to-feature-vector encoding.
//!
//! Encoding is a pure function of the record. The order below is fixed
//! for the lifetime of any model trained against it; the single-sample
//! prediction path must supply its raw values in the identical order.

use crate::data::records::HouseRecord;

/// Number of features in an encoded vector.
pub const FEATURE_COUNT: usize = 9;

/// The fixed feature order. The target (`median_house_value`) is never
/// part of the vector.
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "longitude",
    "latitude",
    "housing_median_age",
    "total_rooms",
    "total_bedrooms",
    "population",
    "households",
    "median_income",
    "proximity_code",
];

/// Encodes one record into `(features, target)`.
pub fn encode(record: &HouseRecord) -> ([f64; FEATURE_COUNT], f64) {
    (
        [
            record.longitude,
            record.latitude,
            record.housing_median_age,
            record.total_rooms,
            record.total_bedrooms,
            record.population,
            record.households,
            record.median_income,
            record.proximity.code(),
        ],
        record.median_house_value,
    )
}

/// Encodes a batch into the row-major `(features, targets)` form the
/// dataset layer consumes.
pub fn encode_batch(records: &[HouseRecord]) -> (Vec<Vec<f32>>, Vec<f32>) {
    let mut features = Vec::with_capacity(records.len());
    let mut targets = Vec::with_capacity(records.len());
    for record in records {
        let (vector, target) = encode(record);
        features.push(vector.iter().map(|&v| v as f32).collect());
        targets.push(target as f32);
    }
    (features, targets)
}
