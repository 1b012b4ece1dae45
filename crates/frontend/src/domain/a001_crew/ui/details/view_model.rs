use contracts::domain::a001_crew::{Crew, CrewDto, TechnicianRef};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::api_utils::{fetch_all, fetch_one, save_one};

#[derive(Clone, Copy)]
pub struct CrewDetailsViewModel {
    pub form: RwSignal<CrewDto>,
    /// Persisted crew, for the members panel
    pub crew: RwSignal<Option<Crew>>,
    /// Technicians known from every crew, for the pickers
    pub technicians: RwSignal<Vec<TechnicianRef>>,
    pub error: RwSignal<Option<String>>,
    pub saving: RwSignal<bool>,
}

impl CrewDetailsViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(CrewDto::new()),
            crew: RwSignal::new(None),
            technicians: RwSignal::new(Vec::new()),
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
                Ok(crews) => this.technicians.set(Crew::technician_refs(&crews)),
                Err(e) => log::warn!("technician list unavailable: {}", e),
            }
        });

        if let Some(id) = id {
            self.reload(id);
        }
    }

    pub fn reload(&self, id: String) {
        let this = *self;
        spawn_local(async move {
            match fetch_one::<Crew>(&id).await {
                Ok(crew) => {
                    this.form.set(CrewDto::from(&crew));
                    this.crew.set(Some(crew));
                }
                Err(e) => this.error.set(Some(e.message)),
            }
        });
    }

    pub fn toggle_member(&self, technician_id: &str, checked: bool) {
        self.form.update(|f| {
            f.member_ids.retain(|m| m != technician_id);
            if checked {
                f.member_ids.push(technician_id.to_string());
            }
        });
    }

    /// Add a technician that no crew knows yet
    pub fn add_technician(&self, technician_id: String) {
        let id = technician_id.trim().to_string();
        if id.is_empty() {
            return;
        }
        self.technicians.update(|t| {
            if !t.iter().any(|r| r.id == id) {
                t.push(TechnicianRef {
                    id: id.clone(),
                    name: id.clone(),
                });
            }
        });
        self.toggle_member(&id, true);
    }

    pub fn save_command(&self, on_saved: Callback<()>) {
        let dto = self.form.get_untracked().normalized();
        if let Err(msg) = dto.validate() {
            self.error.set(Some(msg));
            return;
        }

        let this = *self;
        this.saving.set(true);
        this.error.set(None);
        spawn_local(async move {
            match save_one::<Crew, _>(dto.id.as_deref(), &dto).await {
                Ok(_) => on_saved.run(()),
                Err(e) => this.error.set(Some(e.message)),
            }
            this.saving.set(false);
        });
    }
}

impl Default for CrewDetailsViewModel {
    fn default() -> Self {
        Self::new()
    }
}
