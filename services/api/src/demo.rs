use crate::infra::in_memory_service;
use clap::Args;
use listing_match::catalog::{
    filter_and_sort, DemandOperation, DemandProfileDraft, FilterCriteria, Listing, ListingDraft,
    OperationType, PropertyType, SearchParams,
};
use listing_match::config::CatalogConfig;
use listing_match::error::AppError;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Public site root used in listing deep links
    #[arg(long)]
    pub(crate) public_base_url: Option<String>,
    /// Print the full outbound link for each queued notification
    #[arg(long)]
    pub(crate) show_links: bool,
}

/// Criteria are passed through as raw text and parsed leniently, so a
/// malformed bound simply drops out of the search.
#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// JSON file holding an array of listings
    #[arg(long)]
    pub(crate) listings: PathBuf,
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// sale, rent or all
    #[arg(long)]
    pub(crate) operation_type: Option<String>,
    /// house, apartment, commercial, land or all
    #[arg(long)]
    pub(crate) property_type: Option<String>,
    #[arg(long)]
    pub(crate) location: Option<String>,
    #[arg(long)]
    pub(crate) price_min: Option<String>,
    #[arg(long)]
    pub(crate) price_max: Option<String>,
    #[arg(long)]
    pub(crate) bedrooms_min: Option<String>,
    #[arg(long)]
    pub(crate) bedrooms_max: Option<String>,
    #[arg(long)]
    pub(crate) bathrooms_min: Option<String>,
    #[arg(long)]
    pub(crate) bathrooms_max: Option<String>,
    #[arg(long)]
    pub(crate) area_min: Option<String>,
    #[arg(long)]
    pub(crate) area_max: Option<String>,
    /// Comma-separated features that must all be present
    #[arg(long)]
    pub(crate) features: Option<String>,
    /// newest, oldest, price-asc, price-desc, area-asc or area-desc
    #[arg(long)]
    pub(crate) sort: Option<String>,
}

impl SearchArgs {
    fn params(&self) -> SearchParams {
        SearchParams {
            query: self.query.clone(),
            operation_type: self.operation_type.clone(),
            property_type: self.property_type.clone(),
            location: self.location.clone(),
            price_min: self.price_min.clone(),
            price_max: self.price_max.clone(),
            bedrooms_min: self.bedrooms_min.clone(),
            bedrooms_max: self.bedrooms_max.clone(),
            bathrooms_min: self.bathrooms_min.clone(),
            bathrooms_max: self.bathrooms_max.clone(),
            area_min: self.area_min.clone(),
            area_max: self.area_max.clone(),
            features: self.features.clone(),
            sort: self.sort.clone(),
        }
    }
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let raw = fs::read_to_string(&args.listings)?;
    let listings: Vec<Listing> = serde_json::from_str(&raw)?;
    let criteria = FilterCriteria::from(args.params());

    let results = filter_and_sort(&listings, &criteria);
    println!("{}", serde_json::to_string_pretty(&results)?);
    eprintln!("{} of {} listings matched", results.len(), listings.len());
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let mut config = CatalogConfig::default();
    if let Some(base_url) = args.public_base_url {
        config.public_base_url = base_url.trim_end_matches('/').to_string();
    }
    let service = in_memory_service(&config);

    println!("Listing match demo");
    for draft in sample_demands() {
        let profile = service.register_demand(draft)?;
        println!(
            "- Registered demand {} ({:?}, budget {:?}..{:?}, location {:?})",
            profile.name,
            profile.operation_type,
            profile.budget_min,
            profile.budget_max,
            profile.location_preference
        );
    }

    println!("\nPublishing listings");
    let mut published_listings = Vec::new();
    for draft in sample_listings() {
        let published = service.publish_listing(draft)?;
        println!(
            "- {} [{}] -> {} notification(s) queued",
            published.listing.title,
            published.listing.operation_type.label(),
            published.notifications_queued
        );
        published_listings.push(published.listing);
    }

    let criteria = FilterCriteria::from(SearchParams {
        operation_type: Some("sale".to_string()),
        features: Some("piscina".to_string()),
        sort: Some("price-asc".to_string()),
        ..SearchParams::default()
    });
    println!("\nSearch: for sale, with pool, cheapest first");
    for listing in service.search(&criteria)? {
        println!(
            "- {} | {} | {} m²",
            listing.title,
            service.emitter().listing_url(&listing),
            listing.area
        );
    }

    let pending = service.pending_notifications()?;
    println!("\nPending notifications ({})", pending.len());
    for record in &pending {
        let first_line = record.rendered_message.lines().next().unwrap_or_default();
        println!(
            "- listing {} -> profile {}: {}",
            record.listing_id, record.demand_profile_id, first_line
        );
        if args.show_links {
            println!("  {}", record.outbound_url);
        }
    }

    let retried = pending.first().and_then(|first| {
        published_listings
            .iter()
            .find(|listing| listing.id == first.listing_id)
    });
    if let Some(listing) = retried {
        let retry = service.run_match_pass(listing);
        println!(
            "\nRetried match pass for '{}': {} matched, {} new, {} already queued",
            listing.title, retry.matched, retry.created, retry.duplicates
        );
    }

    let ids: Vec<_> = pending.iter().map(|record| record.id.clone()).collect();
    let removed = service.mark_many_sent(&ids)?;
    println!("Marked {removed} notification(s) as sent");

    Ok(())
}

fn sample_listings() -> Vec<ListingDraft> {
    vec![
        ListingDraft {
            title: "Departamento 2D2B en Las Condes".to_string(),
            description: "Piso alto, orientación norte, a pasos del metro.".to_string(),
            operation_type: OperationType::Sale,
            property_type: PropertyType::Apartment,
            price: 150_000_000.0,
            bedrooms: Some(2),
            bathrooms: Some(2),
            area: 78.0,
            location: "Av. Apoquindo 4500, Las Condes, Santiago".to_string(),
            features: vec!["Piscina".to_string(), "Gimnasio".to_string()],
        },
        ListingDraft {
            title: "Casa con jardín en La Reina".to_string(),
            description: "Casa familiar con quincho y jardín amplio.".to_string(),
            operation_type: OperationType::Sale,
            property_type: PropertyType::House,
            price: 310_000_000.0,
            bedrooms: Some(4),
            bathrooms: Some(3),
            area: 240.0,
            location: "La Reina, Santiago".to_string(),
            features: vec![
                "Piscina climatizada".to_string(),
                "Jardín amplio".to_string(),
                "Quincho".to_string(),
            ],
        },
        ListingDraft {
            title: "Oficina en Providencia".to_string(),
            description: "Planta libre, dos estacionamientos.".to_string(),
            operation_type: OperationType::Rent,
            property_type: PropertyType::Commercial,
            price: 900_000.0,
            bedrooms: None,
            bathrooms: Some(1),
            area: 65.0,
            location: "Providencia, Santiago".to_string(),
            features: vec!["Estacionamiento".to_string()],
        },
    ]
}

fn sample_demands() -> Vec<DemandProfileDraft> {
    vec![
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
        },
        DemandProfileDraft {
            name: "Tomás".to_string(),
            contact_handle: "+56 9 3333 4444".to_string(),
            operation_type: Some(DemandOperation::Rent),
            budget_max: Some(1_000_000.0),
            desired_features: Some("estacionamiento".to_string()),
            ..DemandProfileDraft::default()
        },
        DemandProfileDraft {
            name: "Ana".to_string(),
            contact_handle: "+56 9 5555 6666".to_string(),
            operation_type: Some(DemandOperation::Sale),
            budget_max: Some(120_000_000.0),
            ..DemandProfileDraft::default()
        },
    ]
}
