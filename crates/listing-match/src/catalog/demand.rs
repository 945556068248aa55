use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::listing::{normalize_features, OperationType};

/// Identifier wrapper for registered demand profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemandProfileId(pub String);

impl DemandProfileId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for DemandProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operation a visitor is interested in; unlike listings it may cover both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandOperation {
    #[serde(alias = "venta")]
    Sale,
    #[serde(alias = "arriendo", alias = "alquiler")]
    Rent,
    #[serde(alias = "ambos")]
    Both,
}

impl DemandOperation {
    pub fn accepts(self, operation: OperationType) -> bool {
        match self {
            DemandOperation::Both => true,
            DemandOperation::Sale => operation == OperationType::Sale,
            DemandOperation::Rent => operation == OperationType::Rent,
        }
    }
}

/// A registered search intent. Bound pairs are taken literally: an inverted
/// range is legal and simply matches nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandProfile {
    pub id: DemandProfileId,
    pub name: String,
    pub contact_handle: String,
    pub operation_type: DemandOperation,
    #[serde(default)]
    pub location_preference: Option<String>,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default)]
    pub rooms_min: Option<u32>,
    #[serde(default)]
    pub rooms_max: Option<u32>,
    #[serde(default)]
    pub bathrooms_min: Option<u32>,
    #[serde(default)]
    pub bathrooms_max: Option<u32>,
    #[serde(default)]
    pub area_min: Option<f64>,
    #[serde(default)]
    pub area_max: Option<f64>,
    #[serde(default)]
    pub desired_features: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Registration form payload. `desired_features` arrives as the raw
/// comma-separated text typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemandProfileDraft {
    pub name: String,
    pub contact_handle: String,
    pub operation_type: Option<DemandOperation>,
    #[serde(default)]
    pub location_preference: Option<String>,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default)]
    pub rooms_min: Option<u32>,
    #[serde(default)]
    pub rooms_max: Option<u32>,
    #[serde(default)]
    pub bathrooms_min: Option<u32>,
    #[serde(default)]
    pub bathrooms_max: Option<u32>,
    #[serde(default)]
    pub area_min: Option<f64>,
    #[serde(default)]
    pub area_max: Option<f64>,
    #[serde(default)]
    pub desired_features: Option<String>,
}

impl DemandProfileDraft {
    pub fn validate(
        self,
        id: DemandProfileId,
        created_at: DateTime<Utc>,
    ) -> Result<DemandProfile, DemandValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DemandValidationError::EmptyName);
        }
        let contact_handle = self.contact_handle.trim().to_string();
        if contact_handle.is_empty() {
            return Err(DemandValidationError::MissingContact);
        }

        let desired_features = self
            .desired_features
            .map(|raw| normalize_features(raw.split(',').map(str::to_string)))
            .unwrap_or_default();

        Ok(DemandProfile {
            id,
            name,
            contact_handle,
            operation_type: self.operation_type.unwrap_or(DemandOperation::Both),
            location_preference: non_blank(self.location_preference),
            budget_min: finite(self.budget_min),
            budget_max: finite(self.budget_max),
            rooms_min: self.rooms_min,
            rooms_max: self.rooms_max,
            bathrooms_min: self.bathrooms_min,
            bathrooms_max: self.bathrooms_max,
            area_min: finite(self.area_min),
            area_max: finite(self.area_max),
            desired_features,
            created_at,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|number| number.is_finite())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DemandValidationError {
    #[error("demand profile name must not be empty")]
    EmptyName,
    #[error("demand profile requires a contact handle")]
    MissingContact,
}
