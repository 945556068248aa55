use std::cmp::Ordering;

use super::criteria::{FilterCriteria, SortKey};
use crate::catalog::listing::Listing;

/// Case-insensitive substring test shared by the search and matching paths.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Filters `listings` by every active criterion and returns them in the
/// requested order. Ties keep their input order.
pub fn filter_and_sort(listings: &[Listing], criteria: &FilterCriteria) -> Vec<Listing> {
    let filter = ListingFilter::new(criteria);
    let mut selected: Vec<Listing> = listings
        .iter()
        .filter(|listing| filter.accepts(listing))
        .cloned()
        .collect();
    sort_listings(&mut selected, criteria.sort);
    selected
}

/// Stable sort; `sort_by` never reorders equal elements.
pub fn sort_listings(listings: &mut [Listing], key: SortKey) {
    listings.sort_by(|a, b| compare(a, b, key));
}

fn compare(a: &Listing, b: &Listing, key: SortKey) -> Ordering {
    match key {
        SortKey::Newest => b.created_at.cmp(&a.created_at),
        SortKey::Oldest => a.created_at.cmp(&b.created_at),
        SortKey::PriceAsc => a.price.total_cmp(&b.price),
        SortKey::PriceDesc => b.price.total_cmp(&a.price),
        SortKey::AreaAsc => a.area.total_cmp(&b.area),
        SortKey::AreaDesc => b.area.total_cmp(&a.area),
    }
}

/// Criteria with text terms lowercased once up front.
struct ListingFilter<'a> {
    criteria: &'a FilterCriteria,
    query: Option<String>,
    location: Option<String>,
    features: Vec<String>,
}

impl<'a> ListingFilter<'a> {
    fn new(criteria: &'a FilterCriteria) -> Self {
        let lowered = |text: &str| {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_lowercase())
        };

        Self {
            criteria,
            query: lowered(criteria.query.as_str()),
            location: lowered(criteria.location.as_str()),
            features: criteria
                .features
                .iter()
                .filter_map(|feature| lowered(feature.as_str()))
                .collect(),
        }
    }

    fn accepts(&self, listing: &Listing) -> bool {
        let criteria = self.criteria;

        if let Some(query) = &self.query {
            let hit = [&listing.title, &listing.description, &listing.location]
                .into_iter()
                .any(|field| field.to_lowercase().contains(query.as_str()));
            if !hit {
                return false;
            }
        }

        if let Some(operation) = criteria.operation_type {
            if listing.operation_type != operation {
                return false;
            }
        }
        if let Some(kind) = criteria.property_type {
            if listing.property_type != kind {
                return false;
            }
        }

        if let Some(location) = &self.location {
            if !listing.location.to_lowercase().contains(location.as_str()) {
                return false;
            }
        }

        criteria.price.contains(listing.price)
            && criteria.bedrooms.admits(listing.bedrooms)
            && criteria.bathrooms.admits(listing.bathrooms)
            && criteria.area.contains(listing.area)
            && self.has_features(listing)
    }

    fn has_features(&self, listing: &Listing) -> bool {
        if self.features.is_empty() {
            return true;
        }
        let available: Vec<String> = listing
            .features
            .iter()
            .map(|feature| feature.to_lowercase())
            .collect();
        self.features.iter().all(|wanted| {
            available
                .iter()
                .any(|feature| feature.contains(wanted.as_str()))
        })
    }
}
