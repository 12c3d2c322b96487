//! Destination model for catalog entries and trip targets

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Broad destination category driving activity suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DestinationCategory {
    Beach,
    Mountain,
    City,
    Cultural,
    #[default]
    Generic,
}

impl DestinationCategory {
    /// Parse a free-form category label, unknown labels map to `Generic`
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "beach" => Self::Beach,
            "mountain" => Self::Mountain,
            "city" => Self::City,
            "cultural" => Self::Cultural,
            _ => Self::Generic,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Beach => "beach",
            Self::Mountain => "mountain",
            Self::City => "city",
            Self::Cultural => "cultural",
            Self::Generic => "generic",
        }
    }
}

/// A known destination from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    /// Country name or code, empty values are normalized to `None`
    pub country: Option<String>,
    #[serde(default)]
    pub category: DestinationCategory,
    pub description: Option<String>,
}

impl Destination {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate,
            country: None,
            category: DestinationCategory::Generic,
            description: None,
        }
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        let country = country.into();
        self.country = (!country.trim().is_empty()).then_some(country);
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: DestinationCategory) -> Self {
        self.category = category;
        self
    }

    /// True when both destinations name the same non-empty country
    #[must_use]
    pub fn shares_country_with(&self, country: Option<&str>) -> bool {
        match (self.country.as_deref(), country) {
            (Some(own), Some(other)) => !own.is_empty() && own == other,
            _ => false,
        }
    }
}
