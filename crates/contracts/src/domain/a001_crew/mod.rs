pub mod aggregate;

pub use aggregate::{AddCrewMemberDto, Crew, CrewDto, CrewMember, CrewRole, TechnicianRef};
