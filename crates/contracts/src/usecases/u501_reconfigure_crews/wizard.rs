//! Step-by-step state of the reconfiguration wizard.
//!
//! The view layer keeps one `ReconfigureWizard` in a signal and renders from
//! it; every rule about moving between steps lives here.

use super::conflicts::detect_conflicts;
use super::model::{CrewKey, LeaderConflict, LeaderResolution, MaterialMovementPreview, NewCrewConfig};
use super::request::{ReconfigurePreview, ReconfigureRequest};
use super::routing::{aggregate_movements, unassigned_technicians};
use crate::domain::a001_crew::Crew;
use crate::domain::a003_location::StockLine;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    SelectOldCrews = 1,
    DefineNewCrews = 2,
    ResolveLeaders = 3,
    ReviewAndConfirm = 4,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::SelectOldCrews,
        WizardStep::DefineNewCrews,
        WizardStep::ResolveLeaders,
        WizardStep::ReviewAndConfirm,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::SelectOldCrews => "Select crews",
            WizardStep::DefineNewCrews => "Define new crews",
            WizardStep::ResolveLeaders => "Resolve leaders",
            WizardStep::ReviewAndConfirm => "Review and confirm",
        }
    }

    fn following(self) -> Option<WizardStep> {
        match self {
            WizardStep::SelectOldCrews => Some(WizardStep::DefineNewCrews),
            WizardStep::DefineNewCrews => Some(WizardStep::ResolveLeaders),
            WizardStep::ResolveLeaders => Some(WizardStep::ReviewAndConfirm),
            WizardStep::ReviewAndConfirm => None,
        }
    }

    fn preceding(self) -> Option<WizardStep> {
        match self {
            WizardStep::SelectOldCrews => None,
            WizardStep::DefineNewCrews => Some(WizardStep::SelectOldCrews),
            WizardStep::ResolveLeaders => Some(WizardStep::DefineNewCrews),
            WizardStep::ReviewAndConfirm => Some(WizardStep::ResolveLeaders),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("Select at least one crew to reconfigure")]
    NoOldCrews,
    #[error("Define at least one new crew")]
    NoNewCrews,
    #[error("Crew \"{0}\" needs a leader and at least one technician")]
    IncompleteCrew(String),
    #[error("Technicians without a new crew: {}", .0.join(", "))]
    Unassigned(Vec<String>),
    #[error("{0} leader conflict(s) still need a decision")]
    UnresolvedConflicts(usize),
    #[error("No leader conflict for crew {0}")]
    UnknownConflict(CrewKey),
    #[error("Technician {0} is not a candidate for this crew")]
    NotACandidate(String),
    #[error("Load the preview before confirming")]
    NoPreview,
    #[error("The preview contains no material movements")]
    EmptyPreview,
    #[error("Already at the last step")]
    AtLastStep,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconfigureWizard {
    step: WizardStep,
    old_crews: Vec<Crew>,
    new_crews: Vec<NewCrewConfig>,
    resolutions: Vec<LeaderResolution>,
    preview: Option<ReconfigurePreview>,
    next_key: usize,
}

impl Default for ReconfigureWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconfigureWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::SelectOldCrews,
            old_crews: Vec::new(),
            new_crews: Vec::new(),
            resolutions: Vec::new(),
            preview: None,
            next_key: 0,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn old_crews(&self) -> &[Crew] {
        &self.old_crews
    }

    pub fn new_crews(&self) -> &[NewCrewConfig] {
        &self.new_crews
    }

    pub fn resolutions(&self) -> &[LeaderResolution] {
        &self.resolutions
    }

    pub fn preview(&self) -> Option<&ReconfigurePreview> {
        self.preview.as_ref()
    }

    pub fn is_selected(&self, crew_id: &str) -> bool {
        self.old_crews.iter().any(|c| c.id == crew_id)
    }

    // ------------------------------------------------------------------
    // Step 1
    // ------------------------------------------------------------------

    /// Select or unselect a crew for dissolution. Returns whether it is
    /// selected afterwards.
    pub fn toggle_old_crew(&mut self, crew: &Crew) -> bool {
        self.preview = None;
        if let Some(pos) = self.old_crews.iter().position(|c| c.id == crew.id) {
            self.old_crews.remove(pos);
            false
        } else {
            self.old_crews.push(crew.clone());
            true
        }
    }

    // ------------------------------------------------------------------
    // Step 2
    // ------------------------------------------------------------------

    pub fn add_new_crew(&mut self) -> CrewKey {
        let key = self.allocate_key();
        self.new_crews.push(NewCrewConfig::new(key.clone()));
        self.preview = None;
        key
    }

    /// Apply `edit` to the proposed crew with `key`. Returns false when there
    /// is no such crew.
    pub fn update_new_crew(&mut self, key: &CrewKey, edit: impl FnOnce(&mut NewCrewConfig)) -> bool {
        let Some(crew) = self.new_crews.iter_mut().find(|c| &c.key == key) else {
            return false;
        };
        edit(crew);
        crew.key = key.clone();
        self.preview = None;
        true
    }

    pub fn remove_new_crew(&mut self, key: &CrewKey) {
        self.new_crews.retain(|c| &c.key != key);
        self.resolutions.retain(|r| &r.key != key);
        self.preview = None;
    }

    /// Replace the proposed crews with editable copies of the selected ones
    pub fn seed_from_old_crews(&mut self) {
        let mut seeded = Vec::with_capacity(self.old_crews.len());
        for i in 0..self.old_crews.len() {
            let key = self.allocate_key();
            let old = &self.old_crews[i];
            seeded.push(NewCrewConfig {
                name: old.name.clone(),
                description: old.description.clone(),
                leader_technician_id: old.leader().unwrap_or_default().to_string(),
                technician_ids: old.technician_ids(),
                ..NewCrewConfig::new(key)
            });
        }
        self.new_crews = seeded;
        self.resolutions.clear();
        self.preview = None;
    }

    /// Old technicians not yet placed in a proposed crew
    pub fn unassigned(&self) -> Vec<String> {
        unassigned_technicians(&self.old_crews, &self.new_crews)
    }

    // ------------------------------------------------------------------
    // Step 3
    // ------------------------------------------------------------------

    pub fn conflicts(&self) -> Vec<LeaderConflict> {
        detect_conflicts(&self.new_crews, &self.old_crews)
    }

    pub fn pending_conflicts(&self) -> Vec<LeaderConflict> {
        self.conflicts()
            .into_iter()
            .filter(|c| self.resolution_for(&c.key).is_none())
            .collect()
    }

    pub fn resolution_for(&self, key: &CrewKey) -> Option<&LeaderResolution> {
        self.resolutions.iter().find(|r| &r.key == key)
    }

    /// Settle the conflict of crew `key` in favour of `leader_id`, replacing an
    /// earlier decision.
    pub fn resolve_conflict(&mut self, key: &CrewKey, leader_id: &str) -> Result<(), WizardError> {
        let conflict = self
            .conflicts()
            .into_iter()
            .find(|c| &c.key == key)
            .ok_or_else(|| WizardError::UnknownConflict(key.clone()))?;
        if !conflict.leaders.iter().any(|l| l == leader_id) {
            return Err(WizardError::NotACandidate(leader_id.to_string()));
        }
        let resolution = LeaderResolution::choose(&conflict, leader_id);
        match self.resolutions.iter_mut().find(|r| &r.key == key) {
            Some(existing) => *existing = resolution,
            None => self.resolutions.push(resolution),
        }
        self.preview = None;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Step 4
    // ------------------------------------------------------------------

    /// Movements computed locally from the crews' stock, shown while the
    /// backend preview loads
    pub fn local_preview(
        &self,
        inventories: &HashMap<String, Vec<StockLine>>,
    ) -> Vec<MaterialMovementPreview> {
        aggregate_movements(&self.old_crews, &self.new_crews, inventories, &self.resolutions)
    }

    pub fn set_preview(&mut self, preview: ReconfigurePreview) {
        self.preview = Some(preview);
    }

    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::ReviewAndConfirm && self.preview.as_ref().is_some_and(|p| p.has_movements())
    }

    /// Request for the preview endpoint: old crew ids, normalized proposed
    /// crews and the leader decisions.
    pub fn build_request(&self) -> ReconfigureRequest {
        ReconfigureRequest {
            old_crew_ids: self.old_crews.iter().map(|c| c.id.clone()).collect(),
            new_crews: self.new_crews.iter().map(NewCrewConfig::normalized).collect(),
            leader_resolutions: self.resolutions.clone(),
        }
    }

    /// Request for the confirm endpoint, only once a non-empty preview is loaded
    pub fn confirm_request(&self) -> Result<ReconfigureRequest, WizardError> {
        match &self.preview {
            None => Err(WizardError::NoPreview),
            Some(p) if !p.has_movements() => Err(WizardError::EmptyPreview),
            Some(_) if self.step != WizardStep::ReviewAndConfirm => Err(WizardError::NoPreview),
            Some(_) => Ok(self.build_request()),
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Check whether the current step may be left forward
    pub fn check_current(&self) -> Result<(), WizardError> {
        match self.step {
            WizardStep::SelectOldCrews => {
                if self.old_crews.is_empty() {
                    return Err(WizardError::NoOldCrews);
                }
            }
            WizardStep::DefineNewCrews => {
                if self.new_crews.is_empty() {
                    return Err(WizardError::NoNewCrews);
                }
                if let Some(crew) = self.new_crews.iter().find(|c| !c.is_complete()) {
                    let name = if crew.name.trim().is_empty() {
                        crew.key.to_string()
                    } else {
                        crew.name.trim().to_string()
                    };
                    return Err(WizardError::IncompleteCrew(name));
                }
                let missing = self.unassigned();
                if !missing.is_empty() {
                    return Err(WizardError::Unassigned(missing));
                }
            }
            WizardStep::ResolveLeaders => {
                let pending = self.pending_conflicts().len();
                if pending > 0 {
                    return Err(WizardError::UnresolvedConflicts(pending));
                }
            }
            WizardStep::ReviewAndConfirm => return Err(WizardError::AtLastStep),
        }
        Ok(())
    }

    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        self.check_current()?;
        let Some(next) = self.step.following() else {
            return Err(WizardError::AtLastStep);
        };
        if self.step == WizardStep::DefineNewCrews {
            self.prune_resolutions();
        }
        if next == WizardStep::ReviewAndConfirm {
            self.preview = None;
        }
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> WizardStep {
        if let Some(prev) = self.step.preceding() {
            self.step = prev;
        }
        self.step
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn allocate_key(&mut self) -> CrewKey {
        let key = CrewKey::Provisional(self.next_key);
        self.next_key += 1;
        key
    }

    /// Drop decisions that no longer match a current conflict and refresh the
    /// conflicting lists of the rest
    fn prune_resolutions(&mut self) {
        let conflicts = self.conflicts();
        self.resolutions = self
            .resolutions
            .iter()
            .filter_map(|r| {
                let conflict = conflicts.iter().find(|c| c.key == r.key)?;
                conflict
                    .leaders
                    .contains(&r.selected_leader_id)
                    .then(|| LeaderResolution::choose(conflict, r.selected_leader_id.clone()))
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u501_reconfigure_crews::conflicts::tests::old;
    use crate::usecases::u501_reconfigure_crews::model::Destination;

    fn movement(material: &str) -> MaterialMovementPreview {
        MaterialMovementPreview {
            material_id: material.into(),
            material_name: material.into(),
            from_crew_id: "A".into(),
            from_crew_name: "Crew A".into(),
            destination: Destination::Warehouse,
            destination_name: "Warehouse".into(),
            quantity: 1.0,
            unit: "pc".into(),
        }
    }

    fn set_crew(w: &mut ReconfigureWizard, key: &CrewKey, name: &str, leader: &str, ids: &[&str]) {
        assert!(w.update_new_crew(key, |c| {
            c.name = name.into();
            c.leader_technician_id = leader.into();
            c.technician_ids = ids.iter().map(|t| (*t).into()).collect();
        }));
    }

    /// Wizard at step 2 with the two example crews selected
    fn at_define_step() -> ReconfigureWizard {
        let mut w = ReconfigureWizard::new();
        w.toggle_old_crew(&old("A", "t1", &["t1", "t2"]));
        w.toggle_old_crew(&old("B", "t3", &["t3", "t4"]));
        assert_eq!(w.next(), Ok(WizardStep::DefineNewCrews));
        w
    }

    #[test]
    fn test_step_one_requires_selection() {
        let mut w = ReconfigureWizard::new();
        assert_eq!(w.next(), Err(WizardError::NoOldCrews));

        let crew = old("A", "t1", &["t1"]);
        assert!(w.toggle_old_crew(&crew));
        assert!(!w.toggle_old_crew(&crew));
        assert_eq!(w.next(), Err(WizardError::NoOldCrews));
        assert_eq!(w.step(), WizardStep::SelectOldCrews);
    }

    #[test]
    fn test_step_two_guards() {
        let mut w = at_define_step();
        assert_eq!(w.next(), Err(WizardError::NoNewCrews));

        let n1 = w.add_new_crew();
        assert_eq!(n1, CrewKey::Provisional(0));
        assert_eq!(w.next(), Err(WizardError::IncompleteCrew("temp-0".into())));

        set_crew(&mut w, &n1, "N1", "t1", &["t1", "t3"]);
        assert_eq!(
            w.next(),
            Err(WizardError::Unassigned(vec!["t2".into(), "t4".into()]))
        );

        let n2 = w.add_new_crew();
        set_crew(&mut w, &n2, "N2", "t4", &["t4", "t2"]);
        assert_eq!(w.next(), Ok(WizardStep::ResolveLeaders));
    }

    #[test]
    fn test_conflicts_must_be_resolved() {
        let mut w = at_define_step();
        let n1 = w.add_new_crew();
        set_crew(&mut w, &n1, "N1", "t1", &["t1", "t3"]);
        let n2 = w.add_new_crew();
        set_crew(&mut w, &n2, "N2", "t4", &["t4", "t2"]);
        w.next().unwrap();

        assert_eq!(w.pending_conflicts().len(), 1);
        assert_eq!(w.next(), Err(WizardError::UnresolvedConflicts(1)));
        assert_eq!(
            w.resolve_conflict(&n1, "t9"),
            Err(WizardError::NotACandidate("t9".into()))
        );
        assert_eq!(
            w.resolve_conflict(&n2, "t4"),
            Err(WizardError::UnknownConflict(n2.clone()))
        );

        w.resolve_conflict(&n1, "t3").unwrap();
        assert!(w.pending_conflicts().is_empty());
        assert_eq!(w.next(), Ok(WizardStep::ReviewAndConfirm));

        let request = w.build_request();
        assert_eq!(request.old_crew_ids, vec!["A", "B"]);
        assert_eq!(request.leader_resolutions[0].selected_leader_id, "t3");
        assert_eq!(request.leader_resolutions[0].conflicting_leaders, vec!["t1"]);
    }

    #[test]
    fn test_submit_needs_non_empty_preview() {
        let mut w = ReconfigureWizard::new();
        w.toggle_old_crew(&old("A", "t1", &["t1", "t2"]));
        w.seed_from_old_crews();
        w.next().unwrap();
        w.next().unwrap();
        w.next().unwrap();
        assert_eq!(w.step(), WizardStep::ReviewAndConfirm);
        assert!(!w.can_submit());
        assert_eq!(w.confirm_request(), Err(WizardError::NoPreview));

        w.set_preview(ReconfigurePreview::default());
        assert!(!w.can_submit());
        assert_eq!(w.confirm_request(), Err(WizardError::EmptyPreview));

        w.set_preview(ReconfigurePreview {
            material_movements: vec![movement("cable")],
            ..Default::default()
        });
        assert!(w.can_submit());
        assert!(w.confirm_request().is_ok());
        assert_eq!(w.next(), Err(WizardError::AtLastStep));
    }

    #[test]
    fn test_back_is_unguarded_and_reset_discards() {
        let mut w = at_define_step();
        assert_eq!(w.back(), WizardStep::SelectOldCrews);
        assert_eq!(w.back(), WizardStep::SelectOldCrews);

        w.add_new_crew();
        w.reset();
        assert_eq!(w, ReconfigureWizard::new());
    }

    #[test]
    fn test_stale_resolutions_are_pruned() {
        let mut w = at_define_step();
        let n1 = w.add_new_crew();
        set_crew(&mut w, &n1, "N1", "t1", &["t1", "t3"]);
        let n2 = w.add_new_crew();
        set_crew(&mut w, &n2, "N2", "t4", &["t4", "t2"]);
        w.next().unwrap();
        w.resolve_conflict(&n1, "t3").unwrap();

        // Move t3 out of N1: the conflict disappears
        w.back();
        set_crew(&mut w, &n1, "N1", "t1", &["t1"]);
        set_crew(&mut w, &n2, "N2", "t4", &["t4", "t2", "t3"]);
        w.next().unwrap();
        assert!(w.resolutions().is_empty());
    }

    #[test]
    fn test_removing_crew_drops_its_resolution() {
        let mut w = at_define_step();
        let n1 = w.add_new_crew();
        set_crew(&mut w, &n1, "N1", "t1", &["t1", "t3"]);
        w.resolve_conflict(&n1, "t1").unwrap();
        assert!(w.resolution_for(&n1).is_some());
        w.remove_new_crew(&n1);
        assert!(w.resolutions().is_empty());
        assert!(w.new_crews().is_empty());
        // Keys are never reused
        assert_eq!(w.add_new_crew(), CrewKey::Provisional(1));
    }

    #[test]
    fn test_local_preview_routes_stock() {
        let mut w = at_define_step();
        let n1 = w.add_new_crew();
        set_crew(&mut w, &n1, "N1", "t1", &["t1", "t2", "t3", "t4"]);
        let inventories = HashMap::from([
            (
                "A".to_string(),
                vec![StockLine {
                    material_id: "cable".into(),
                    material_name: "Cable".into(),
                    quantity: 4.0,
                    unit: "m".into(),
                }],
            ),
            (
                "B".to_string(),
                vec![StockLine {
                    material_id: "cable".into(),
                    material_name: "Cable".into(),
                    quantity: 6.0,
                    unit: "m".into(),
                }],
            ),
        ]);
        let lines = w.local_preview(&inventories);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 10.0);
        assert_eq!(lines[0].destination, Destination::Crew(n1));
    }
}
