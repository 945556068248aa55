//! Real-estate catalog core: listing search, demand matching and the
//! notifications queued when a new listing fits a registered demand.

pub mod demand;
pub mod listing;
pub mod matching;
pub mod notifications;
pub mod router;
pub mod search;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use demand::{
    DemandOperation, DemandProfile, DemandProfileDraft, DemandProfileId, DemandValidationError,
};
pub use listing::{
    Listing, ListingDraft, ListingId, ListingValidationError, OperationType, PropertyType,
};
pub use matching::{evaluate_profile, match_demand, MatchCheck, MatchPolicy, MatchVerdict};
pub use notifications::{
    MessagingChannel, NotificationEmitter, NotificationId, NotificationRecord, PriceFormatter,
    WhatsAppChannel,
};
pub use router::catalog_router;
pub use search::{filter_and_sort, Bounds, FilterCriteria, SearchParams, SortKey};
pub use service::{CatalogError, CatalogService, MatchPassReport, PublishedListing};
pub use store::{DemandProfileStore, ListingStore, NotificationStore, RepositoryError};
