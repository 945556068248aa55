use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::demand::{
    DemandProfile, DemandProfileDraft, DemandProfileId, DemandValidationError,
};
use super::listing::{Listing, ListingDraft, ListingId, ListingValidationError};
use super::matching::{evaluate_profile, MatchPolicy};
use super::notifications::{NotificationEmitter, NotificationId, NotificationRecord};
use super::search::{filter_and_sort, FilterCriteria};
use super::store::{DemandProfileStore, ListingStore, NotificationStore, RepositoryError};

/// Service composing the stores with the search pipeline, the demand
/// matcher and the notification emitter.
pub struct CatalogService<L, D, N> {
    listings: Arc<L>,
    profiles: Arc<D>,
    notifications: Arc<N>,
    emitter: NotificationEmitter,
    policy: MatchPolicy,
}

/// Result of publishing a listing.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedListing {
    pub listing: Listing,
    pub notifications_queued: usize,
}

/// Tally of one creation-time match pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchPassReport {
    pub evaluated: usize,
    pub matched: usize,
    pub created: usize,
    pub duplicates: usize,
    pub failed: usize,
}

impl<L, D, N> CatalogService<L, D, N>
where
    L: ListingStore + 'static,
    D: DemandProfileStore + 'static,
    N: NotificationStore + 'static,
{
    pub fn new(
        listings: Arc<L>,
        profiles: Arc<D>,
        notifications: Arc<N>,
        emitter: NotificationEmitter,
        policy: MatchPolicy,
    ) -> Self {
        Self {
            listings,
            profiles,
            notifications,
            emitter,
            policy,
        }
    }

    pub fn emitter(&self) -> &NotificationEmitter {
        &self.emitter
    }

    /// Validate and store a new listing, then run the match pass once.
    /// Notification failures are logged and never undo the listing write.
    pub fn publish_listing(&self, draft: ListingDraft) -> Result<PublishedListing, CatalogError> {
        let listing = draft.validate(ListingId::generate(), Utc::now())?;
        let listing = self.listings.create(listing)?;
        info!(listing_id = %listing.id, title = %listing.title, "listing published");

        let report = self.run_match_pass(&listing);
        Ok(PublishedListing {
            listing,
            notifications_queued: report.created,
        })
    }

    /// Match every registered profile against `listing` and queue one
    /// notification per compatible profile. Safe to re-run with the value
    /// returned by `publish_listing`: pairs that were already queued are
    /// counted as duplicates.
    pub fn run_match_pass(&self, listing: &Listing) -> MatchPassReport {
        let mut report = MatchPassReport::default();

        let profiles = match self.profiles.list() {
            Ok(profiles) => profiles,
            Err(err) => {
                warn!(listing_id = %listing.id, error = %err, "demand profiles unavailable, skipping match pass");
                return report;
            }
        };

        let mut matched: Vec<&DemandProfile> = Vec::new();
        for profile in &profiles {
            report.evaluated += 1;
            let verdict = evaluate_profile(listing, profile, &self.policy);
            if verdict.is_match() {
                matched.push(profile);
            } else {
                debug!(
                    listing_id = %listing.id,
                    demand_profile_id = %profile.id,
                    failed = ?verdict.failed,
                    "demand profile rejected"
                );
            }
        }
        report.matched = matched.len();

        for record in self.emitter.emit(listing, &matched, Utc::now()) {
            let demand_profile_id = record.demand_profile_id.clone();
            match self.notifications.upsert_if_absent(record) {
                Ok(true) => report.created += 1,
                Ok(false) => report.duplicates += 1,
                Err(err) => {
                    report.failed += 1;
                    warn!(
                        listing_id = %listing.id,
                        demand_profile_id = %demand_profile_id,
                        error = %err,
                        "failed to queue notification"
                    );
                }
            }
        }

        info!(
            listing_id = %listing.id,
            evaluated = report.evaluated,
            matched = report.matched,
            created = report.created,
            duplicates = report.duplicates,
            failed = report.failed,
            "match pass finished"
        );
        report
    }

    /// Validate and persist an edit, keeping the id and creation time.
    /// Edits never trigger matching.
    pub fn update_listing(
        &self,
        id: &ListingId,
        draft: ListingDraft,
    ) -> Result<Listing, CatalogError> {
        let existing = self.listing(id)?;
        let listing = draft.validate(existing.id, existing.created_at)?;
        let listing = self.listings.update(listing)?;
        info!(listing_id = %listing.id, "listing updated");
        Ok(listing)
    }

    pub fn remove_listing(&self, id: &ListingId) -> Result<(), CatalogError> {
        Ok(self.listings.delete(id)?)
    }

    pub fn listing(&self, id: &ListingId) -> Result<Listing, CatalogError> {
        let listing = self.listings.get(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(listing)
    }

    pub fn search(&self, criteria: &FilterCriteria) -> Result<Vec<Listing>, CatalogError> {
        let snapshot = self.listings.list()?;
        Ok(filter_and_sort(&snapshot, criteria))
    }

    pub fn register_demand(
        &self,
        draft: DemandProfileDraft,
    ) -> Result<DemandProfile, CatalogError> {
        let profile = draft.validate(DemandProfileId::generate(), Utc::now())?;
        let profile = self.profiles.create(profile)?;
        info!(demand_profile_id = %profile.id, "demand profile registered");
        Ok(profile)
    }

    /// Validate and persist an edit, keeping the id and creation time.
    pub fn update_demand(
        &self,
        id: &DemandProfileId,
        draft: DemandProfileDraft,
    ) -> Result<DemandProfile, CatalogError> {
        let existing = self
            .profiles
            .list()?
            .into_iter()
            .find(|profile| &profile.id == id)
            .ok_or(RepositoryError::NotFound)?;
        let profile = draft.validate(existing.id, existing.created_at)?;
        Ok(self.profiles.update(profile)?)
    }

    pub fn remove_demand(&self, id: &DemandProfileId) -> Result<(), CatalogError> {
        Ok(self.profiles.delete(id)?)
    }

    pub fn demand_profiles(&self) -> Result<Vec<DemandProfile>, CatalogError> {
        Ok(self.profiles.list()?)
    }

    pub fn pending_notifications(&self) -> Result<Vec<NotificationRecord>, CatalogError> {
        Ok(self.notifications.list_pending()?)
    }

    /// The client opened the outbound link; drop the pending record.
    pub fn mark_sent(&self, id: &NotificationId) -> Result<(), CatalogError> {
        Ok(self.notifications.delete(id)?)
    }

    pub fn mark_many_sent(&self, ids: &[NotificationId]) -> Result<usize, CatalogError> {
        Ok(self.notifications.delete_many(ids)?)
    }
}

/// Error raised by the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    InvalidListing(#[from] ListingValidationError),
    #[error(transparent)]
    InvalidDemand(#[from] DemandValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
