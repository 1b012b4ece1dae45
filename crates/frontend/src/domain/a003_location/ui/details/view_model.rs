use contracts::domain::a001_crew::Crew;
use contracts::domain::a003_location::{Location, LocationDto, StockLine};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::api_utils::{fetch_all, fetch_one, save_one};

/// How a save attempt ended, for the view to react on
#[derive(Clone, Debug, PartialEq)]
pub enum SaveOutcome {
    Saved,
    /// The backend refused a second location with the same identity (409)
    Duplicate(String),
    Failed(String),
}

#[derive(Clone, Copy)]
pub struct LocationDetailsViewModel {
    pub form: RwSignal<LocationDto>,
    pub stock: RwSignal<Vec<StockLine>>,
    /// (crew id, crew name) for the crew picker
    pub crews: RwSignal<Vec<(String, String)>>,
    pub error: RwSignal<Option<String>>,
    pub saving: RwSignal<bool>,
}

impl LocationDetailsViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(LocationDto {
                is_active: true,
                ..Default::default()
            }),
            stock: RwSignal::new(Vec::new()),
            crews: RwSignal::new(Vec::new()),
            error: RwSignal::new(None),
            saving: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    pub fn load_if_needed(&self, id: Option<String>) {
        let this = *self;
        spawn_local(async move {
            match fetch_all::<Crew>().await {
                Ok(crews) => this.crews.set(
                    crews
                        .into_iter()
                        .map(|c| (c.id, c.name))
                        .collect(),
                ),
                Err(e) => log::warn!("crew list unavailable: {}", e),
            }
        });

        let Some(id) = id else { return };
        spawn_local(async move {
            match fetch_one::<Location>(&id).await {
                Ok(location) => {
                    this.stock.set(location.stock.clone());
                    this.form.set(LocationDto::from(location));
                }
                Err(e) => this.error.set(Some(e.message)),
            }
        });
    }

    pub fn save_command(&self, on_done: Callback<SaveOutcome>) {
        let mut dto = self.form.get_untracked();
        dto.name = dto.name.trim().to_string();
        if dto.location_type != contracts::domain::a003_location::LocationType::Crew {
            dto.crew_id = None;
        }
        if let Err(msg) = dto.validate() {
            self.error.set(Some(msg));
            return;
        }

        let this = *self;
        this.saving.set(true);
        this.error.set(None);
        spawn_local(async move {
            let outcome = match save_one::<Location, _>(dto.id.as_deref(), &dto).await {
                Ok(_) => SaveOutcome::Saved,
                Err(e) if e.is_conflict() => SaveOutcome::Duplicate(e.message),
                Err(e) => {
                    this.error.set(Some(e.message.clone()));
                    SaveOutcome::Failed(e.message)
                }
            };
            this.saving.set(false);
            on_done.run(outcome);
        });
    }
}

impl Default for LocationDetailsViewModel {
    fn default() -> Self {
        Self::new()
    }
}
