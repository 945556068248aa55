use serde::{Deserialize, Serialize};

use crate::catalog::listing::{OperationType, PropertyType};

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    AreaAsc,
    AreaDesc,
}

impl SortKey {
    /// Unknown keys resolve to `None` so callers can fall back to the default.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            "price-asc" => Some(Self::PriceAsc),
            "price-desc" => Some(Self::PriceDesc),
            "area-asc" => Some(Self::AreaAsc),
            "area-desc" => Some(Self::AreaDesc),
            _ => None,
        }
    }
}

/// Inclusive numeric range; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: T) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    /// Absent values pass: the bound only constrains what is known.
    pub fn admits(&self, value: Option<T>) -> bool {
        value.map_or(true, |value| self.contains(value))
    }
}

/// One search request. `None`, blank strings and empty lists mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub query: String,
    pub operation_type: Option<OperationType>,
    pub property_type: Option<PropertyType>,
    pub location: String,
    pub price: Bounds<f64>,
    pub bedrooms: Bounds<u32>,
    pub bathrooms: Bounds<u32>,
    pub area: Bounds<f64>,
    pub features: Vec<String>,
    pub sort: SortKey,
}

/// Raw, string-typed criteria as they arrive from a query string or form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub query: Option<String>,
    pub operation_type: Option<String>,
    pub property_type: Option<String>,
    pub location: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub bedrooms_min: Option<String>,
    pub bedrooms_max: Option<String>,
    pub bathrooms_min: Option<String>,
    pub bathrooms_max: Option<String>,
    pub area_min: Option<String>,
    pub area_max: Option<String>,
    /// Comma-separated feature list.
    pub features: Option<String>,
    pub sort: Option<String>,
}

impl From<SearchParams> for FilterCriteria {
    fn from(params: SearchParams) -> Self {
        let features = params
            .features
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|feature| !feature.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            query: params.query.unwrap_or_default().trim().to_string(),
            operation_type: parse_label(params.operation_type.as_deref()),
            property_type: parse_label(params.property_type.as_deref()),
            location: params.location.unwrap_or_default().trim().to_string(),
            price: Bounds::new(
                parse_amount(params.price_min.as_deref()),
                parse_amount(params.price_max.as_deref()),
            ),
            bedrooms: Bounds::new(
                parse_count(params.bedrooms_min.as_deref()),
                parse_count(params.bedrooms_max.as_deref()),
            ),
            bathrooms: Bounds::new(
                parse_count(params.bathrooms_min.as_deref()),
                parse_count(params.bathrooms_max.as_deref()),
            ),
            area: Bounds::new(
                parse_amount(params.area_min.as_deref()),
                parse_amount(params.area_max.as_deref()),
            ),
            features,
            sort: params
                .sort
                .as_deref()
                .and_then(SortKey::parse)
                .unwrap_or_default(),
        }
    }
}

/// `"all"`, blanks and unknown labels impose no constraint.
fn parse_label<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    let raw = raw?.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
        return None;
    }
    raw.parse().ok()
}

fn parse_amount(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_count(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    if let Ok(count) = raw.parse::<u32>() {
        return Some(count);
    }
    // "2.0" from numeric inputs; anything fractional or negative is dropped.
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0 && value.fract() == 0.0)
        .and_then(|value| u32::try_from(value as u64).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_bounds_become_unconstrained() {
        let criteria = FilterCriteria::from(SearchParams {
            price_min: Some("abc".to_string()),
            price_max: Some("NaN".to_string()),
            bedrooms_min: Some("-1".to_string()),
            bedrooms_max: Some("2.5".to_string()),
            area_min: Some(" 40 ".to_string()),
            ..SearchParams::default()
        });

        assert!(criteria.price.is_unbounded());
        assert!(criteria.bedrooms.is_unbounded());
        assert_eq!(criteria.area, Bounds::new(Some(40.0), None));
    }

    #[test]
    fn all_and_unknown_labels_impose_no_constraint() {
        let criteria = FilterCriteria::from(SearchParams {
            operation_type: Some("all".to_string()),
            property_type: Some("castillo".to_string()),
            sort: Some("random".to_string()),
            ..SearchParams::default()
        });

        assert_eq!(criteria.operation_type, None);
        assert_eq!(criteria.property_type, None);
        assert_eq!(criteria.sort, SortKey::Newest);
    }

    #[test]
    fn parses_labels_features_and_sort() {
        let criteria = FilterCriteria::from(SearchParams {
            query: Some("  vista al mar ".to_string()),
            operation_type: Some("rent".to_string()),
            property_type: Some("apartamento".to_string()),
            bathrooms_min: Some("2.0".to_string()),
            features: Some("piscina, ,jardín".to_string()),
            sort: Some("price_desc".to_string()),
            ..SearchParams::default()
        });

        assert_eq!(criteria.query, "vista al mar");
        assert_eq!(criteria.operation_type, Some(OperationType::Rent));
        assert_eq!(criteria.property_type, Some(PropertyType::Apartment));
        assert_eq!(criteria.bathrooms.min, Some(2));
        assert_eq!(criteria.features, vec!["piscina", "jardín"]);
        assert_eq!(criteria.sort, SortKey::PriceDesc);
    }

    #[test]
    fn inverted_bounds_contain_nothing() {
        let bounds = Bounds::new(Some(10.0), Some(5.0));
        assert!(!bounds.contains(7.0));
        assert!(!bounds.contains(10.0));
        assert!(bounds.admits(None));
    }
}
