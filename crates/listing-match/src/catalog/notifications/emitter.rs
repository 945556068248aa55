use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::format::PriceFormatter;
use super::messaging::{MessagingChannel, WhatsAppChannel};
use crate::catalog::demand::{DemandProfile, DemandProfileId};
use crate::catalog::listing::{Listing, ListingId};
use crate::config::CatalogConfig;

/// Identifier for a pending notification. Derived from the
/// `(listing, profile)` pair so re-emitting the same match yields the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub String);

impl NotificationId {
    pub fn for_pair(listing_id: &ListingId, demand_profile_id: &DemandProfileId) -> Self {
        let key = format!("{}\u{1f}{}", listing_id.0, demand_profile_id.0);
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).to_string())
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pending "tell this profile about this listing" artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub listing_id: ListingId,
    pub demand_profile_id: DemandProfileId,
    pub rendered_message: String,
    pub outbound_url: String,
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    pub fn pair(&self) -> (&ListingId, &DemandProfileId) {
        (&self.listing_id, &self.demand_profile_id)
    }
}

/// Builds notification records for matched profiles. Holds no mutable
/// state, so emitting the same match twice produces identical records.
#[derive(Clone)]
pub struct NotificationEmitter {
    public_base_url: String,
    prices: PriceFormatter,
    channel: Arc<dyn MessagingChannel>,
}

impl fmt::Debug for NotificationEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationEmitter")
            .field("public_base_url", &self.public_base_url)
            .field("prices", &self.prices)
            .finish_non_exhaustive()
    }
}

impl NotificationEmitter {
    pub fn new(
        public_base_url: impl Into<String>,
        prices: PriceFormatter,
        channel: Arc<dyn MessagingChannel>,
    ) -> Self {
        let public_base_url: String = public_base_url.into();
        Self {
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            prices,
            channel,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(
            config.public_base_url.clone(),
            PriceFormatter::new(config.currency_symbol.clone()),
            Arc::new(WhatsAppChannel::new(config.messaging_base_url.clone())),
        )
    }

    pub fn listing_url(&self, listing: &Listing) -> String {
        format!("{}/listing/{}", self.public_base_url, listing.id)
    }

    pub fn render_message(&self, listing: &Listing, profile: &DemandProfile) -> String {
        let mut message = String::new();
        let _ = writeln!(
            message,
            "¡Hola {}! Tenemos una propiedad que coincide con tu búsqueda:",
            profile.name
        );
        let _ = writeln!(message);
        let _ = writeln!(message, "*{}*", listing.title);
        let _ = writeln!(
            message,
            "{}: {}",
            listing.operation_type.label(),
            self.prices.format(listing.price)
        );

        let mut figures = Vec::new();
        if let Some(bedrooms) = listing.bedrooms {
            figures.push(format!("{bedrooms} dormitorios"));
        }
        if let Some(bathrooms) = listing.bathrooms {
            figures.push(format!("{bathrooms} baños"));
        }
        figures.push(format!("{} m²", format_area(listing.area)));
        let _ = writeln!(message, "{}", figures.join(" · "));

        if !listing.description.is_empty() {
            let _ = writeln!(message);
            let _ = writeln!(message, "{}", listing.description);
        }

        let _ = writeln!(message);
        let _ = write!(message, "Ver más: {}", self.listing_url(listing));
        message
    }

    pub fn outbound_url(&self, profile: &DemandProfile, message: &str) -> String {
        self.channel
            .conversation_url(&profile.contact_handle, message)
    }

    pub fn build(
        &self,
        listing: &Listing,
        profile: &DemandProfile,
        now: DateTime<Utc>,
    ) -> NotificationRecord {
        let rendered_message = self.render_message(listing, profile);
        let outbound_url = self.outbound_url(profile, &rendered_message);
        NotificationRecord {
            id: NotificationId::for_pair(&listing.id, &profile.id),
            listing_id: listing.id.clone(),
            demand_profile_id: profile.id.clone(),
            rendered_message,
            outbound_url,
            created_at: now,
        }
    }

    /// One record per matched profile; repeated profiles collapse to one.
    pub fn emit(
        &self,
        listing: &Listing,
        matched: &[&DemandProfile],
        now: DateTime<Utc>,
    ) -> Vec<NotificationRecord> {
        let mut records: Vec<NotificationRecord> = Vec::with_capacity(matched.len());
        for profile in matched {
            if records
                .iter()
                .any(|record| record.demand_profile_id == profile.id)
            {
                continue;
            }
            records.push(self.build(listing, profile, now));
        }
        records
    }
}

fn format_area(area: f64) -> String {
    if area.fract() == 0.0 {
        format!("{area:.0}")
    } else {
        format!("{area:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::demand::DemandOperation;
    use crate::catalog::listing::{OperationType, PropertyType};
    use chrono::TimeZone;

    struct EchoChannel;

    impl MessagingChannel for EchoChannel {
        fn conversation_url(&self, contact_handle: &str, message: &str) -> String {
            format!("echo://{contact_handle}/{}", message.len())
        }
    }

    fn listing() -> Listing {
        Listing {
            id: ListingId("lst-42".to_string()),
            title: "Casa con jardín".to_string(),
            description: "Remodelada el 2023".to_string(),
            operation_type: OperationType::Sale,
            property_type: PropertyType::House,
            price: 150_000_000.0,
            bedrooms: Some(3),
            bathrooms: None,
            area: 120.5,
            location: "La Reina".to_string(),
            features: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap(),
        }
    }

    fn profile(id: &str) -> DemandProfile {
        DemandProfile {
            id: DemandProfileId(id.to_string()),
            name: "Ana".to_string(),
            contact_handle: "+56 9 8765 4321".to_string(),
            operation_type: DemandOperation::Sale,
            location_preference: None,
            budget_min: None,
            budget_max: None,
            rooms_min: None,
            rooms_max: None,
            bathrooms_min: None,
            bathrooms_max: None,
            area_min: None,
            area_max: None,
            desired_features: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn emitter() -> NotificationEmitter {
        NotificationEmitter::new(
            "https://propiedades.example.cl/",
            PriceFormatter::default(),
            Arc::new(WhatsAppChannel::default()),
        )
    }

    #[test]
    fn message_includes_listing_figures_and_deep_link() {
        let message = emitter().render_message(&listing(), &profile("p-1"));
        assert!(message.starts_with("¡Hola Ana!"));
        assert!(message.contains("*Casa con jardín*"));
        assert!(message.contains("Venta: $150.000.000"));
        assert!(message.contains("3 dormitorios · 120.5 m²"));
        assert!(!message.contains("baños"));
        assert!(message.contains("Remodelada el 2023"));
        assert!(message.ends_with("Ver más: https://propiedades.example.cl/listing/lst-42"));
    }

    #[test]
    fn outbound_url_uses_the_channel() {
        let emitter = NotificationEmitter::new(
            "https://example.cl",
            PriceFormatter::default(),
            Arc::new(EchoChannel),
        );
        let record = emitter.build(&listing(), &profile("p-1"), Utc::now());
        assert_eq!(
            record.outbound_url,
            format!("echo://+56 9 8765 4321/{}", record.rendered_message.len())
        );
    }

    #[test]
    fn emission_is_deterministic_per_pair() {
        let now = Utc.with_ymd_and_hms(2024, 4, 2, 0, 0, 0).unwrap();
        let first = profile("p-1");
        let second = profile("p-2");

        let once = emitter().emit(&listing(), &[&first, &second, &first], now);
        let again = emitter().emit(&listing(), &[&first, &second], now);

        assert_eq!(once.len(), 2);
        assert_eq!(once, again);
        assert_ne!(once[0].id, once[1].id);
        assert_eq!(
            once[0].id,
            NotificationId::for_pair(&ListingId("lst-42".to_string()), &first.id)
        );
    }
}
