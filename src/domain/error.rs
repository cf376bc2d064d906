use thiserror::Error;

/// Data-quality failures found while resolving an item.
///
/// Each variant names the entity (item class, trader or zone) and the field
/// that carried the bad value. Values are never clamped into shape.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{entity}: annotation `{value}` in `{field}` is not one of 0, 1, 2, 3")]
    InvalidAnnotation {
        entity: String,
        field: &'static str,
        value: String,
    },
    #[error("{entity}: minPriceThreshold ({min}) exceeds maxPriceThreshold ({max})")]
    InvertedPriceThresholds { entity: String, min: i64, max: i64 },
    #[error("{entity}: `{field}` is negative ({value})")]
    NegativeStock {
        entity: String,
        field: String,
        value: i64,
    },
    #[error("{entity}: `{field}` is {value}, expected -1 or a percent of at least 0")]
    InvalidPercent {
        entity: String,
        field: &'static str,
        value: String,
    },
    #[error("category `{entity}` carries no item")]
    EmptyCategory { entity: String },
}

impl ValidationError {
    /// Entity (class name, trader name, zone or category) the error refers to.
    pub fn entity(&self) -> &str {
        match self {
            Self::InvalidAnnotation { entity, .. }
            | Self::InvertedPriceThresholds { entity, .. }
            | Self::NegativeStock { entity, .. }
            | Self::InvalidPercent { entity, .. }
            | Self::EmptyCategory { entity } => entity,
        }
    }

    /// Offending field name.
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidAnnotation { field, .. } => field,
            Self::InvertedPriceThresholds { .. } => "minPriceThreshold",
            Self::NegativeStock { field, .. } => field,
            Self::InvalidPercent { field, .. } => field,
            Self::EmptyCategory { .. } => "items",
        }
    }
}

/// Raw annotation integer outside `{0, 1, 2, 3}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("annotation {0} is not one of 0, 1, 2, 3")]
pub struct UnknownAnnotation(pub i64);
