use super::demand::{DemandProfile, DemandProfileId};
use super::listing::{Listing, ListingId};
use super::notifications::{NotificationId, NotificationRecord};

/// Persistence for published listings.
pub trait ListingStore: Send + Sync {
    fn create(&self, listing: Listing) -> Result<Listing, RepositoryError>;
    fn get(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError>;
    fn list(&self) -> Result<Vec<Listing>, RepositoryError>;
    fn update(&self, listing: Listing) -> Result<Listing, RepositoryError>;
    fn delete(&self, id: &ListingId) -> Result<(), RepositoryError>;
}

/// Persistence for registered demand profiles.
pub trait DemandProfileStore: Send + Sync {
    fn create(&self, profile: DemandProfile) -> Result<DemandProfile, RepositoryError>;
    fn list(&self) -> Result<Vec<DemandProfile>, RepositoryError>;
    fn update(&self, profile: DemandProfile) -> Result<DemandProfile, RepositoryError>;
    fn delete(&self, id: &DemandProfileId) -> Result<(), RepositoryError>;
}

/// Pending notifications. Implementations must keep at most one record per
/// `(listing_id, demand_profile_id)` pair, checked and inserted atomically.
pub trait NotificationStore: Send + Sync {
    /// Returns `false` when a record for the same pair already exists.
    fn upsert_if_absent(&self, record: NotificationRecord) -> Result<bool, RepositoryError>;
    fn list_pending(&self) -> Result<Vec<NotificationRecord>, RepositoryError>;
    fn delete(&self, id: &NotificationId) -> Result<(), RepositoryError>;
    /// Returns how many of `ids` were removed; unknown ids are ignored.
    fn delete_many(&self, ids: &[NotificationId]) -> Result<usize, RepositoryError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
