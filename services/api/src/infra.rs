use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use listing_match::catalog::{
    CatalogService, DemandProfile, DemandProfileId, DemandProfileStore, Listing, ListingId,
    ListingStore, NotificationEmitter, NotificationId, NotificationRecord, NotificationStore,
    RepositoryError,
};
use listing_match::config::CatalogConfig;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type InMemoryCatalogService = CatalogService<
    InMemoryListingStore,
    InMemoryDemandProfileStore,
    InMemoryNotificationStore,
>;

pub(crate) fn in_memory_service(config: &CatalogConfig) -> InMemoryCatalogService {
    CatalogService::new(
        Arc::new(InMemoryListingStore::default()),
        Arc::new(InMemoryDemandProfileStore::default()),
        Arc::new(InMemoryNotificationStore::default()),
        NotificationEmitter::from_config(config),
        config.match_policy,
    )
}

/// Listings kept in insertion order so unsorted reads are stable.
#[derive(Default, Clone)]
pub(crate) struct InMemoryListingStore {
    records: Arc<Mutex<Vec<Listing>>>,
}

impl ListingStore for InMemoryListingStore {
    fn create(&self, listing: Listing) -> Result<Listing, RepositoryError> {
        let mut guard = self.records.lock().expect("listing store mutex poisoned");
        if guard.iter().any(|existing| existing.id == listing.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(listing.clone());
        Ok(listing)
    }

    fn get(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        let guard = self.records.lock().expect("listing store mutex poisoned");
        Ok(guard.iter().find(|listing| &listing.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<Listing>, RepositoryError> {
        let guard = self.records.lock().expect("listing store mutex poisoned");
        Ok(guard.clone())
    }

    fn update(&self, listing: Listing) -> Result<Listing, RepositoryError> {
        let mut guard = self.records.lock().expect("listing store mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == listing.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = listing.clone();
        Ok(listing)
    }

    fn delete(&self, id: &ListingId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("listing store mutex poisoned");
        let before = guard.len();
        guard.retain(|listing| &listing.id != id);
        if guard.len() == before {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDemandProfileStore {
    records: Arc<Mutex<Vec<DemandProfile>>>,
}

impl DemandProfileStore for InMemoryDemandProfileStore {
    fn create(&self, profile: DemandProfile) -> Result<DemandProfile, RepositoryError> {
        let mut guard = self.records.lock().expect("demand store mutex poisoned");
        if guard.iter().any(|existing| existing.id == profile.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(profile.clone());
        Ok(profile)
    }

    fn list(&self) -> Result<Vec<DemandProfile>, RepositoryError> {
        let guard = self.records.lock().expect("demand store mutex poisoned");
        Ok(guard.clone())
    }

    fn update(&self, profile: DemandProfile) -> Result<DemandProfile, RepositoryError> {
        let mut guard = self.records.lock().expect("demand store mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == profile.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = profile.clone();
        Ok(profile)
    }

    fn delete(&self, id: &DemandProfileId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("demand store mutex poisoned");
        let before = guard.len();
        guard.retain(|profile| &profile.id != id);
        if guard.len() == before {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }
}

/// The pair index and the records live behind one lock so the
/// check-and-insert in `upsert_if_absent` is atomic.
#[derive(Default)]
struct NotificationTable {
    by_pair: HashMap<(ListingId, DemandProfileId), NotificationId>,
    records: Vec<NotificationRecord>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationStore {
    table: Arc<Mutex<NotificationTable>>,
}

impl NotificationStore for InMemoryNotificationStore {
    fn upsert_if_absent(&self, record: NotificationRecord) -> Result<bool, RepositoryError> {
        let mut guard = self.table.lock().expect("notification store mutex poisoned");
        let key = (record.listing_id.clone(), record.demand_profile_id.clone());
        if guard.by_pair.contains_key(&key) {
            return Ok(false);
        }
        guard.by_pair.insert(key, record.id.clone());
        guard.records.push(record);
        Ok(true)
    }

    fn list_pending(&self) -> Result<Vec<NotificationRecord>, RepositoryError> {
        let guard = self.table.lock().expect("notification store mutex poisoned");
        Ok(guard.records.clone())
    }

    fn delete(&self, id: &NotificationId) -> Result<(), RepositoryError> {
        match self.delete_many(std::slice::from_ref(id))? {
            0 => Err(RepositoryError::NotFound),
            _ => Ok(()),
        }
    }

    fn delete_many(&self, ids: &[NotificationId]) -> Result<usize, RepositoryError> {
        let mut guard = self.table.lock().expect("notification store mutex poisoned");
        let before = guard.records.len();
        guard.records.retain(|record| !ids.contains(&record.id));
        guard.by_pair.retain(|_, id| !ids.contains(id));
        Ok(before - guard.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(listing: &str, profile: &str) -> NotificationRecord {
        let listing_id = ListingId(listing.to_string());
        let demand_profile_id = DemandProfileId(profile.to_string());
        NotificationRecord {
            id: NotificationId::for_pair(&listing_id, &demand_profile_id),
            listing_id,
            demand_profile_id,
            rendered_message: "Hola".to_string(),
            outbound_url: "https://wa.me/1?text=Hola".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn upsert_keeps_first_record_per_pair() {
        let store = InMemoryNotificationStore::default();
        assert!(store.upsert_if_absent(record("l-1", "d-1")).expect("insert"));
        assert!(!store.upsert_if_absent(record("l-1", "d-1")).expect("dedup"));
        assert!(store.upsert_if_absent(record("l-1", "d-2")).expect("insert"));
        assert_eq!(store.list_pending().expect("pending").len(), 2);
    }

    #[test]
    fn deleted_pairs_can_be_queued_again() {
        let store = InMemoryNotificationStore::default();
        let first = record("l-1", "d-1");
        store.upsert_if_absent(first.clone()).expect("insert");
        store.delete(&first.id).expect("delete");

        assert!(matches!(
            store.delete(&first.id),
            Err(RepositoryError::NotFound)
        ));
        assert!(store.upsert_if_absent(first).expect("requeue"));
    }
}
