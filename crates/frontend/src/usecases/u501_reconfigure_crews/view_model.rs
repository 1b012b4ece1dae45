use super::api;
use crate::shared::api_utils::fetch_all;
use contracts::domain::a001_crew::{Crew, TechnicianRef};
use contracts::domain::a003_location::{Location, StockLine};
use contracts::usecases::u501_reconfigure_crews::{
    MaterialMovementPreview, ReconfigureResult, ReconfigureWizard, WizardStep,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashMap;

/// Crews that can be reconfigured, by name
pub fn active_crews(mut crews: Vec<Crew>) -> Vec<Crew> {
    crews.retain(|c| c.is_active);
    crews.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    crews
}

pub fn technician_label(refs: &[TechnicianRef], id: &str) -> String {
    refs.iter()
        .find(|r| r.id == id)
        .map(|r| r.name.clone())
        .unwrap_or_else(|| id.to_string())
}

pub fn result_message(result: &ReconfigureResult) -> String {
    result
        .message
        .clone()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            format!(
                "{} crew(s) created, {} deactivated, {} movement(s) recorded",
                result.created_crew_ids.len(),
                result.deactivated_crew_ids.len(),
                result.movements_created
            )
        })
}

#[derive(Clone, Copy)]
pub struct ReconfigureViewModel {
    pub wizard: RwSignal<ReconfigureWizard>,
    pub crews: RwSignal<Vec<Crew>>,
    pub locations: RwSignal<Vec<Location>>,
    /// Crew stock snapshots, keyed by crew id
    pub inventories: RwSignal<HashMap<String, Vec<StockLine>>>,
    pub result: RwSignal<Option<ReconfigureResult>>,
    pub error: RwSignal<Option<String>>,
    pub preview_error: RwSignal<Option<String>>,
    pub busy: RwSignal<bool>,
}

impl ReconfigureViewModel {
    pub fn new() -> Self {
        Self {
            wizard: RwSignal::new(ReconfigureWizard::new()),
            crews: RwSignal::new(Vec::new()),
            locations: RwSignal::new(Vec::new()),
            inventories: RwSignal::new(HashMap::new()),
            result: RwSignal::new(None),
            error: RwSignal::new(None),
            preview_error: RwSignal::new(None),
            busy: RwSignal::new(false),
        }
    }

    pub fn load(&self) {
        let this = *self;
        spawn_local(async move {
            match fetch_all::<Crew>().await {
                Ok(v) => this.crews.set(active_crews(v)),
                Err(e) => this.error.set(Some(e.message)),
            }
            match fetch_all::<Location>().await {
                Ok(v) => this.locations.set(v),
                Err(e) => log::warn!("locations not loaded: {}", e),
            }
        });
    }

    /// Apply `f` to the wizard and notify once
    pub fn mutate<R>(&self, f: impl FnOnce(&mut ReconfigureWizard) -> R) -> R {
        let mut wizard = self.wizard.get_untracked();
        let r = f(&mut wizard);
        self.wizard.set(wizard);
        r
    }

    pub fn toggle_crew(&self, crew_id: &str) {
        let Some(crew) = self.crews.with_untracked(|c| c.iter().find(|c| c.id == crew_id).cloned()) else {
            return;
        };
        self.mutate(|w| w.toggle_old_crew(&crew));
    }

    /// Technicians of the selected crews, for the pickers of step 2
    pub fn technicians(&self) -> Vec<TechnicianRef> {
        self.wizard.with(|w| Crew::technician_refs(w.old_crews()))
    }

    pub fn local_preview(&self) -> Vec<MaterialMovementPreview> {
        self.wizard
            .with(|w| self.inventories.with(|i| w.local_preview(i)))
    }

    pub fn next(&self) {
        match self.mutate(|w| w.next()) {
            Ok(step) => {
                self.error.set(None);
                if step == WizardStep::ReviewAndConfirm {
                    self.fetch_preview();
                }
            }
            Err(e) => self.error.set(Some(e.to_string())),
        }
    }

    pub fn back(&self) {
        self.error.set(None);
        self.preview_error.set(None);
        self.mutate(|w| w.back());
    }

    /// Load missing crew stock, then ask the backend what it would do
    pub fn fetch_preview(&self) {
        let this = *self;
        let request = self.wizard.with_untracked(|w| w.build_request());
        let missing: Vec<Crew> = self.wizard.with_untracked(|w| {
            self.inventories.with_untracked(|i| {
                w.old_crews()
                    .iter()
                    .filter(|c| !i.contains_key(&c.id))
                    .cloned()
                    .collect()
            })
        });
        let locations = self.locations.get_untracked();

        self.busy.set(true);
        self.preview_error.set(None);
        spawn_local(async move {
            if !missing.is_empty() {
                let loaded = api::load_crew_inventories(&missing, &locations).await;
                this.inventories.update(|i| i.extend(loaded));
            }
            match api::preview(&request).await {
                Ok(preview) => {
                    let current = this.wizard.with_untracked(|w| {
                        w.step() == WizardStep::ReviewAndConfirm && w.build_request() == request
                    });
                    if current {
                        this.mutate(|w| w.set_preview(preview));
                    } else {
                        log::debug!("dropping preview for an outdated request");
                    }
                }
                Err(e) => this.preview_error.set(Some(e.message)),
            }
            this.busy.set(false);
        });
    }

    pub fn confirm(&self) {
        let request = match self.wizard.with_untracked(|w| w.confirm_request()) {
            Ok(r) => r,
            Err(e) => {
                self.error.set(Some(e.to_string()));
                return;
            }
        };
        let this = *self;
        self.busy.set(true);
        self.error.set(None);
        spawn_local(async move {
            match api::confirm(&request).await {
                Ok(result) => {
                    log::info!("crews reconfigured: {}", result_message(&result));
                    this.result.set(Some(result));
                    this.mutate(|w| w.reset());
                    this.inventories.set(HashMap::new());
                    this.load();
                }
                Err(e) => this.error.set(Some(e.message)),
            }
            this.busy.set(false);
        });
    }

    /// Discard everything entered so far
    pub fn reset(&self) {
        self.mutate(|w| w.reset());
        self.result.set(None);
        self.error.set(None);
        self.preview_error.set(None);
    }
}

impl Default for ReconfigureViewModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crew(id: &str, name: &str, active: bool) -> Crew {
        Crew {
            id: id.into(),
            name: name.into(),
            description: None,
            is_active: active,
            leader_technician_id: None,
            members: vec![],
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_active_crews_sorted_by_name() {
        let crews = active_crews(vec![
            crew("1", "south", true),
            crew("2", "Archive", false),
            crew("3", "North", true),
        ]);
        let names: Vec<&str> = crews.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["North", "south"]);
    }

    #[test]
    fn test_technician_label_falls_back_to_id() {
        let refs = vec![TechnicianRef { id: "t1".into(), name: "Luis".into() }];
        assert_eq!(technician_label(&refs, "t1"), "Luis");
        assert_eq!(technician_label(&refs, "t9"), "t9");
    }

    #[test]
    fn test_result_message() {
        let mut result = ReconfigureResult {
            created_crew_ids: vec!["n1".into(), "n2".into()],
            deactivated_crew_ids: vec!["a".into()],
            movements_created: 3,
            message: None,
        };
        assert_eq!(
            result_message(&result),
            "2 crew(s) created, 1 deactivated, 3 movement(s) recorded"
        );
        result.message = Some("Done".into());
        assert_eq!(result_message(&result), "Done");
    }
}
