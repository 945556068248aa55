use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::catalog::demand::{DemandOperation, DemandProfile, DemandProfileDraft, DemandProfileId};
use crate::catalog::listing::{Listing, ListingDraft, ListingId, OperationType, PropertyType};
use crate::catalog::matching::MatchPolicy;
use crate::catalog::notifications::{
    NotificationEmitter, NotificationId, NotificationRecord, PriceFormatter, WhatsAppChannel,
};
use crate::catalog::service::CatalogService;
use crate::catalog::store::{
    DemandProfileStore, ListingStore, NotificationStore, RepositoryError,
};
use crate::catalog::router::catalog_router;

pub(super) type MemoryService = CatalogService<MemoryListings, MemoryProfiles, MemoryNotifications>;

pub(super) fn listing_draft() -> ListingDraft {
    ListingDraft {
        title: "Departamento en Las Condes".to_string(),
        description: "Dos dormitorios, cerca del metro".to_string(),
        operation_type: OperationType::Sale,
        property_type: PropertyType::Apartment,
        price: 150_000_000.0,
        bedrooms: Some(2),
        bathrooms: Some(2),
        area: 78.0,
        location: "Av. Apoquindo 4500, Las Condes, Santiago".to_string(),
        features: vec!["Piscina".to_string(), "Estacionamiento".to_string()],
    }
}

pub(super) fn matching_demand() -> DemandProfileDraft {
    DemandProfileDraft {
        name: "Camila".to_string(),
        contact_handle: "+56 9 1111 2222".to_string(),
        operation_type: Some(DemandOperation::Both),
        location_preference: Some("Condes".to_string()),
        budget_min: Some(100_000_000.0),
        budget_max: Some(200_000_000.0),
        rooms_min: Some(1),
        rooms_max: Some(3),
        ..DemandProfileDraft::default()
    }
}

pub(super) fn rent_only_demand() -> DemandProfileDraft {
    DemandProfileDraft {
        name: "Tomás".to_string(),
        contact_handle: "+56 9 3333 4444".to_string(),
        operation_type: Some(DemandOperation::Rent),
        ..DemandProfileDraft::default()
    }
}

pub(super) fn emitter() -> NotificationEmitter {
    NotificationEmitter::new(
        "https://propiedades.example.cl",
        PriceFormatter::default(),
        Arc::new(WhatsAppChannel::default()),
    )
}

pub(super) fn build_service() -> (
    MemoryService,
    Arc<MemoryListings>,
    Arc<MemoryProfiles>,
    Arc<MemoryNotifications>,
) {
    let listings = Arc::new(MemoryListings::default());
    let profiles = Arc::new(MemoryProfiles::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = CatalogService::new(
        listings.clone(),
        profiles.clone(),
        notifications.clone(),
        emitter(),
        MatchPolicy::default(),
    );
    (service, listings, profiles, notifications)
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    catalog_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryListings {
    pub(super) records: Arc<Mutex<Vec<Listing>>>,
}

impl ListingStore for MemoryListings {
    fn create(&self, listing: Listing) -> Result<Listing, RepositoryError> {
        let mut guard = self.records.lock().expect("listing mutex poisoned");
        if guard.iter().any(|existing| existing.id == listing.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(listing.clone());
        Ok(listing)
    }

    fn get(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        let guard = self.records.lock().expect("listing mutex poisoned");
        Ok(guard.iter().find(|listing| &listing.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<Listing>, RepositoryError> {
        Ok(self.records.lock().expect("listing mutex poisoned").clone())
    }

    fn update(&self, listing: Listing) -> Result<Listing, RepositoryError> {
        let mut guard = self.records.lock().expect("listing mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == listing.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = listing.clone();
        Ok(listing)
    }

    fn delete(&self, id: &ListingId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("listing mutex poisoned");
        let before = guard.len();
        guard.retain(|listing| &listing.id != id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfiles {
    pub(super) records: Arc<Mutex<Vec<DemandProfile>>>,
}

impl DemandProfileStore for MemoryProfiles {
    fn create(&self, profile: DemandProfile) -> Result<DemandProfile, RepositoryError> {
        self.records
            .lock()
            .expect("profile mutex poisoned")
            .push(profile.clone());
        Ok(profile)
    }

    fn list(&self) -> Result<Vec<DemandProfile>, RepositoryError> {
        Ok(self.records.lock().expect("profile mutex poisoned").clone())
    }

    fn update(&self, profile: DemandProfile) -> Result<DemandProfile, RepositoryError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == profile.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = profile.clone();
        Ok(profile)
    }

    fn delete(&self, id: &DemandProfileId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        guard.retain(|profile| &profile.id != id);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    pub(super) records: Arc<Mutex<BTreeMap<(ListingId, DemandProfileId), NotificationRecord>>>,
}

impl MemoryNotifications {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("notification mutex poisoned").len()
    }
}

impl NotificationStore for MemoryNotifications {
    fn upsert_if_absent(&self, record: NotificationRecord) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("notification mutex poisoned");
        let key = (record.listing_id.clone(), record.demand_profile_id.clone());
        if guard.contains_key(&key) {
            return Ok(false);
        }
        guard.insert(key, record);
        Ok(true)
    }

    fn list_pending(&self) -> Result<Vec<NotificationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("notification mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete(&self, id: &NotificationId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("notification mutex poisoned");
        let before = guard.len();
        guard.retain(|_, record| &record.id != id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn delete_many(&self, ids: &[NotificationId]) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("notification mutex poisoned");
        let before = guard.len();
        guard.retain(|_, record| !ids.contains(&record.id));
        Ok(before - guard.len())
    }
}

pub(super) struct UnavailableProfiles;

impl DemandProfileStore for UnavailableProfiles {
    fn create(&self, _profile: DemandProfile) -> Result<DemandProfile, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<DemandProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _profile: DemandProfile) -> Result<DemandProfile, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &DemandProfileId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct UnavailableNotifications;

impl NotificationStore for UnavailableNotifications {
    fn upsert_if_absent(&self, _record: NotificationRecord) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("queue offline".to_string()))
    }

    fn list_pending(&self) -> Result<Vec<NotificationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("queue offline".to_string()))
    }

    fn delete(&self, _id: &NotificationId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("queue offline".to_string()))
    }

    fn delete_many(&self, _ids: &[NotificationId]) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("queue offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
