use super::super::demand::DemandProfile;
use super::super::listing::Listing;
use super::super::search::{contains_ignore_case, Bounds};
use super::policy::MatchPolicy;
use super::MatchCheck;

/// Runs every active check and collects the ones the listing fails.
pub(crate) fn failed_checks(
    listing: &Listing,
    profile: &DemandProfile,
    policy: &MatchPolicy,
) -> Vec<MatchCheck> {
    let mut failed = Vec::new();

    if !profile.operation_type.accepts(listing.operation_type) {
        failed.push(MatchCheck::Operation);
    }

    if !Bounds::new(profile.budget_min, profile.budget_max).contains(listing.price) {
        failed.push(MatchCheck::Budget);
    }

    if !Bounds::new(profile.rooms_min, profile.rooms_max).admits(listing.bedrooms) {
        failed.push(MatchCheck::Rooms);
    }

    if let Some(preference) = profile.location_preference.as_deref() {
        let preference = preference.trim();
        if !preference.is_empty() && !contains_ignore_case(&listing.location, preference) {
            failed.push(MatchCheck::Location);
        }
    }

    if policy.check_bathrooms
        && !Bounds::new(profile.bathrooms_min, profile.bathrooms_max).admits(listing.bathrooms)
    {
        failed.push(MatchCheck::Bathrooms);
    }

    if policy.check_area && !Bounds::new(profile.area_min, profile.area_max).contains(listing.area)
    {
        failed.push(MatchCheck::Area);
    }

    failed
}
