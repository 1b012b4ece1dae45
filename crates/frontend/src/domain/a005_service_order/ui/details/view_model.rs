use super::super::feedbacks::{decode_feedbacks, FeedbackEntry};
use crate::domain::a005_service_order::api;
use crate::shared::api_utils::{fetch_all, fetch_one};
use contracts::domain::a002_material::Material;
use contracts::domain::a003_location::Location;
use contracts::domain::a005_service_order::{OrderImage, ServiceOrder};
use contracts::system::auth::SessionCapabilities;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Everything the close dialog needs, captured when it opens
#[derive(Clone, Debug)]
pub struct CloseContext {
    pub order: ServiceOrder,
    pub capabilities: SessionCapabilities,
    pub materials: Vec<(String, String, String)>,
    pub locations: Vec<(String, String)>,
    pub default_location: Option<String>,
}

#[derive(Clone, Copy)]
pub struct OrderDetailsViewModel {
    pub id: StoredValue<String>,
    pub order: RwSignal<Option<ServiceOrder>>,
    pub images: RwSignal<Vec<OrderImage>>,
    pub feedbacks: RwSignal<Vec<FeedbackEntry>>,
    pub materials: RwSignal<Vec<Material>>,
    pub locations: RwSignal<Vec<Location>>,
    pub error: RwSignal<Option<String>>,
    pub loading: RwSignal<bool>,
}

impl OrderDetailsViewModel {
    pub fn new(id: String) -> Self {
        Self {
            id: StoredValue::new(id),
            order: RwSignal::new(None),
            images: RwSignal::new(Vec::new()),
            feedbacks: RwSignal::new(Vec::new()),
            materials: RwSignal::new(Vec::new()),
            locations: RwSignal::new(Vec::new()),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
        }
    }

    pub fn load(&self) {
        let this = *self;
        let id = self.id.get_value();
        this.loading.set(true);
        this.error.set(None);
        spawn_local(async move {
            match fetch_one::<ServiceOrder>(&id).await {
                Ok(order) => this.order.set(Some(order)),
                Err(e) => {
                    this.error.set(Some(e.message));
                    this.loading.set(false);
                    return;
                }
            }
            match api::list_images(&id).await {
                Ok(images) => this.images.set(images),
                Err(e) => this.error.set(Some(e.message)),
            }
            match api::list_feedbacks(&id).await {
                Ok(feedbacks) => this.feedbacks.set(decode_feedbacks(feedbacks)),
                Err(e) => this.error.set(Some(e.message)),
            }
            this.loading.set(false);
        });
    }

    /// Catalogues for the close dialog, loaded lazily
    pub fn load_catalogues(&self) {
        let this = *self;
        spawn_local(async move {
            match fetch_all::<Material>().await {
                Ok(v) => this.materials.set(v.into_iter().filter(|m| m.is_active).collect()),
                Err(e) => log::warn!("materials unavailable: {}", e),
            }
            match fetch_all::<Location>().await {
                Ok(v) => this.locations.set(v),
                Err(e) => log::warn!("locations unavailable: {}", e),
            }
        });
    }

    pub fn close_context(&self, capabilities: SessionCapabilities) -> Option<CloseContext> {
        let order = self.order.get_untracked()?;
        let locations = self.locations.get_untracked();
        let default_location = order
            .crew_id
            .as_deref()
            .and_then(|crew| Location::find_for_crew(&locations, crew))
            .map(|l| l.id.clone());
        Some(CloseContext {
            order,
            capabilities,
            materials: self.materials.with_untracked(|m| {
                m.iter()
                    .map(|m| (m.id.clone(), m.name.clone(), m.unit.clone()))
                    .collect()
            }),
            locations: locations
                .iter()
                .filter(|l| l.is_active)
                .map(|l| (l.id.clone(), l.name.clone()))
                .collect(),
            default_location,
        })
    }
}
