//! Validated housing records and the proximity category.

use serde::{Deserialize, Serialize};

/// Distance-to-coast category of a property.
///
/// The category carries a stable integer projection used when the record
/// is encoded into a feature vector; the meaning (the variant) is kept
/// separate from the numeric code so the mapping can be validated and
/// extended without touching call sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OceanProximity {
    NearBay,
    CloseToOcean,
    NearOcean,
    Inland,
}

impl OceanProximity {
    /// All categories, in projection-definition order.
    pub const ALL: [OceanProximity; 4] = [
        OceanProximity::NearBay,
        OceanProximity::CloseToOcean,
        OceanProximity::NearOcean,
        OceanProximity::Inland,
    ];

    /// Parses the source label. Any label outside the fixed table is
    /// rejected, which invalidates the whole record.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "NEAR BAY" => Some(OceanProximity::NearBay),
            "<1H OCEAN" => Some(OceanProximity::CloseToOcean),
            "NEAR OCEAN" => Some(OceanProximity::NearOcean),
            "INLAND" => Some(OceanProximity::Inland),
            _ => None,
        }
    }

    /// The source label for this category.
    pub fn label(self) -> &'static str {
        match self {
            OceanProximity::NearBay => "NEAR BAY",
            OceanProximity::CloseToOcean => "<1H OCEAN",
            OceanProximity::NearOcean => "NEAR OCEAN",
            OceanProximity::Inland => "INLAND",
        }
    }

    /// Stable integer projection used in feature vectors.
    pub fn code(self) -> f64 {
        match self {
            OceanProximity::NearBay => 1.0,
            OceanProximity::CloseToOcean => -1.0,
            OceanProximity::NearOcean => 0.0,
            OceanProximity::Inland => 2.0,
        }
    }
}

/// One validated housing record.
///
/// Every numeric field is finite; construction happens only in the loader
/// after validation, so a `HouseRecord` can always be encoded. The
/// `median_house_value` field is the prediction target and is kept out of
/// the feature vector by the encoder.
#[derive(Clone, Debug, PartialEq)]
pub struct HouseRecord {
    pub longitude: f64,
    pub latitude: f64,
    pub housing_median_age: f64,
    pub total_rooms: f64,
    pub total_bedrooms: f64,
    pub population: f64,
    pub households: f64,
    pub median_income: f64,
    pub median_house_value: f64,
    pub proximity: OceanProximity,
}
