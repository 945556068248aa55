use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for published listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub String);

impl ListingId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether the property is offered for sale or for rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    #[serde(alias = "venta")]
    Sale,
    #[serde(alias = "arriendo", alias = "alquiler")]
    Rent,
}

impl OperationType {
    /// Label used in outbound messages.
    pub const fn label(self) -> &'static str {
        match self {
            OperationType::Sale => "Venta",
            OperationType::Rent => "Arriendo",
        }
    }
}

impl FromStr for OperationType {
    type Err = UnknownLabel;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "sale" | "venta" => Ok(Self::Sale),
            "rent" | "arriendo" | "alquiler" => Ok(Self::Rent),
            _ => Err(UnknownLabel(raw.to_string())),
        }
    }
}

/// Canonical property kind. The admin console and the search form use
/// different vocabularies for the same concept, so both are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[serde(alias = "casa")]
    House,
    #[serde(alias = "apartamento", alias = "departamento")]
    Apartment,
    #[serde(alias = "comercial", alias = "local", alias = "oficina")]
    Commercial,
    #[serde(alias = "terreno")]
    Land,
}

impl PropertyType {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyType::House => "Casa",
            PropertyType::Apartment => "Departamento",
            PropertyType::Commercial => "Comercial",
            PropertyType::Land => "Terreno",
        }
    }
}

impl FromStr for PropertyType {
    type Err = UnknownLabel;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "house" | "casa" => Ok(Self::House),
            "apartment" | "apartamento" | "departamento" => Ok(Self::Apartment),
            "commercial" | "comercial" | "local" | "oficina" => Ok(Self::Commercial),
            "land" | "terreno" => Ok(Self::Land),
            _ => Err(UnknownLabel(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized label '{0}'")]
pub struct UnknownLabel(pub String);

/// A published real-estate property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub operation_type: OperationType,
    pub property_type: PropertyType,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    /// Surface in square meters.
    pub area: f64,
    pub location: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Form submission for a new listing, before an id and timestamp are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub operation_type: OperationType,
    pub property_type: PropertyType,
    pub price: f64,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    pub area: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub features: Vec<String>,
}

impl ListingDraft {
    pub fn validate(
        self,
        id: ListingId,
        created_at: DateTime<Utc>,
    ) -> Result<Listing, ListingValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ListingValidationError::EmptyTitle);
        }
        if !self.price.is_finite() {
            return Err(ListingValidationError::NonFiniteNumber { field: "price" });
        }
        if !self.area.is_finite() {
            return Err(ListingValidationError::NonFiniteNumber { field: "area" });
        }
        if self.price < 0.0 {
            return Err(ListingValidationError::NegativePrice(self.price));
        }
        if self.area <= 0.0 {
            return Err(ListingValidationError::NonPositiveArea(self.area));
        }

        Ok(Listing {
            id,
            title,
            description: self.description.trim().to_string(),
            operation_type: self.operation_type,
            property_type: self.property_type,
            price: self.price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area: self.area,
            location: self.location.trim().to_string(),
            features: normalize_features(self.features),
            created_at,
        })
    }
}

/// Trims entries and drops blanks and exact duplicates, keeping first-seen order.
pub(crate) fn normalize_features<I>(features: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut normalized: Vec<String> = Vec::new();
    for feature in features {
        let feature = feature.trim();
        if feature.is_empty() || normalized.iter().any(|seen| seen == feature) {
            continue;
        }
        normalized.push(feature.to_string());
    }
    normalized
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListingValidationError {
    #[error("listing title must not be empty")]
    EmptyTitle,
    #[error("listing price must not be negative (got {0})")]
    NegativePrice(f64),
    #[error("listing area must be greater than zero (got {0})")]
    NonPositiveArea(f64),
    #[error("listing {field} must be a finite number")]
    NonFiniteNumber { field: &'static str },
}
