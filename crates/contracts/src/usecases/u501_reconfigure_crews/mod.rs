//! Crew reconfiguration: dissolve a set of crews into a new set, re-homing
//! their technicians and the material the old crews held.
//!
//! Everything here is pure and synchronous; the backend's preview/confirm
//! endpoints remain the authority for the actual operation.

pub mod conflicts;
pub mod model;
pub mod request;
pub mod routing;
pub mod wizard;

pub use conflicts::detect_conflicts;
pub use model::{
    CrewKey, Destination, LeaderConflict, LeaderResolution, MaterialMovementPreview, NewCrewConfig,
};
pub use request::{CrewSummary, ReconfigurePreview, ReconfigureRequest, ReconfigureResult};
pub use routing::{
    aggregate_movements, all_assigned, destination_name, route_material, unassigned_technicians,
};
pub use wizard::{ReconfigureWizard, WizardError, WizardStep};

use crate::usecases::common::UseCaseMetadata;

pub struct ReconfigureCrews;

impl UseCaseMetadata for ReconfigureCrews {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "reconfigure_crews"
    }

    fn display_name() -> &'static str {
        "Reconfigure crews"
    }

    fn description() -> &'static str {
        "Split, merge or reshuffle crews and move their material to the new teams"
    }
}
