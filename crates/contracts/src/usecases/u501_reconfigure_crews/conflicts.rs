//! Leader conflict detection among proposed crews.

use super::model::{LeaderConflict, NewCrewConfig};
use crate::domain::a001_crew::Crew;

/// Find every proposed crew whose leadership is ambiguous.
///
/// For each crew `a` with a leader, every other crew `b` with a leader is
/// checked:
/// * `b`'s leader is among `a`'s technicians,
/// * `a`'s leader is among `b`'s technicians,
/// * both declare the same leader.
///
/// Independently, a technician of `a` who leads another proposed crew or one
/// of the `old_crews` being dissolved becomes a candidate as well. This flags
/// a former leader who was put into `a` as a plain member, and may flag
/// demotions that were intended.
///
/// Crews without a leader neither receive nor cause conflicts. Output follows
/// the input order.
pub fn detect_conflicts(new_crews: &[NewCrewConfig], old_crews: &[Crew]) -> Vec<LeaderConflict> {
    let mut conflicts = Vec::new();

    for (i, a) in new_crews.iter().enumerate() {
        let Some(a_leader) = a.leader() else {
            continue;
        };
        let mut candidates: Vec<&str> = Vec::new();

        for (j, b) in new_crews.iter().enumerate() {
            if i == j {
                continue;
            }
            let Some(b_leader) = b.leader() else {
                continue;
            };
            if a.has_member(b_leader) {
                push_unique(&mut candidates, b_leader);
            }
            if b.has_member(a_leader) || a_leader == b_leader {
                push_unique(&mut candidates, a_leader);
            }
        }

        for member in &a.technician_ids {
            let member = member.trim();
            if member.is_empty() || member == a_leader {
                continue;
            }
            let leads_new = new_crews
                .iter()
                .enumerate()
                .any(|(j, c)| j != i && c.leader() == Some(member));
            let leads_old = old_crews.iter().any(|c| c.leader() == Some(member));
            if leads_new || leads_old {
                push_unique(&mut candidates, member);
            }
        }

        if candidates.is_empty() {
            continue;
        }
        let mut leaders = vec![a_leader];
        for c in candidates {
            push_unique(&mut leaders, c);
        }
        conflicts.push(LeaderConflict {
            key: a.key.clone(),
            name: a.name.clone(),
            leaders: leaders.into_iter().map(str::to_string).collect(),
        });
    }

    conflicts
}

fn push_unique<'a>(ids: &mut Vec<&'a str>, id: &'a str) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::a001_crew::{CrewMember, CrewRole};
    use crate::usecases::u501_reconfigure_crews::model::CrewKey;

    pub(crate) fn old(id: &str, leader: &str, members: &[&str]) -> Crew {
        Crew {
            id: id.into(),
            name: format!("Crew {}", id),
            description: None,
            is_active: true,
            leader_technician_id: Some(leader.into()),
            members: members
                .iter()
                .map(|m| CrewMember {
                    technician_id: (*m).into(),
                    technician_name: None,
                    role: Some(if *m == leader {
                        CrewRole::Leader
                    } else {
                        CrewRole::Member
                    }),
                })
                .collect(),
            created_at: None,
            updated_at: None,
        }
    }

    pub(crate) fn new(n: usize, name: &str, leader: &str, technicians: &[&str]) -> NewCrewConfig {
        NewCrewConfig {
            name: name.into(),
            leader_technician_id: leader.into(),
            technician_ids: technicians.iter().map(|t| (*t).into()).collect(),
            ..NewCrewConfig::new(CrewKey::Provisional(n))
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(detect_conflicts(&[], &[]).is_empty());
    }

    #[test]
    fn test_disjoint_crews_have_no_conflicts() {
        let crews = vec![
            new(0, "N1", "t1", &["t1", "t2"]),
            new(1, "N2", "t3", &["t3", "t4"]),
            new(2, "N3", "t5", &["t5"]),
        ];
        assert!(detect_conflicts(&crews, &[]).is_empty());
    }

    #[test]
    fn test_other_leader_among_members() {
        let crews = vec![
            new(0, "A", "t1", &["t1", "x"]),
            new(1, "B", "x", &["t5"]),
        ];
        let conflicts = detect_conflicts(&crews, &[]);
        assert_eq!(conflicts.len(), 2);
        let a = conflicts
            .iter()
            .find(|c| c.key == CrewKey::Provisional(0))
            .unwrap();
        assert_eq!(a.leaders, vec!["t1", "x"]);

        // B's leader sits in A, so B is flagged, but only with its own leader
        let b = conflicts
            .iter()
            .find(|c| c.key == CrewKey::Provisional(1))
            .unwrap();
        assert_eq!(b.leaders, vec!["x"]);
    }

    #[test]
    fn test_shared_leader_flags_both() {
        let crews = vec![
            new(0, "A", "t1", &["t2"]),
            new(1, "B", "t1", &["t3"]),
        ];
        let conflicts = detect_conflicts(&crews, &[]);
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].name, "A");
        assert_eq!(conflicts[0].leaders, vec!["t1"]);
        assert_eq!(conflicts[1].name, "B");
    }

    #[test]
    fn test_crews_without_leader_are_skipped() {
        let crews = vec![
            new(0, "A", "", &["t1", "t2"]),
            new(1, "B", "t1", &["t3"]),
        ];
        let conflicts = detect_conflicts(&crews, &[]);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_reconfiguration_example() {
        let old_crews = vec![old("A", "t1", &["t1", "t2"]), old("B", "t3", &["t3", "t4"])];
        let new_crews = vec![
            new(0, "N1", "t1", &["t1", "t3"]),
            new(1, "N2", "t4", &["t4", "t2"]),
        ];
        let conflicts = detect_conflicts(&new_crews, &old_crews);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].key, CrewKey::Provisional(0));
        assert_eq!(conflicts[0].leaders, vec!["t1", "t3"]);
    }

    #[test]
    fn test_keeping_old_leader_in_place_is_not_a_conflict() {
        let old_crews = vec![old("A", "t1", &["t1", "t2"])];
        let new_crews = vec![new(0, "N1", "t1", &["t1", "t2"])];
        assert!(detect_conflicts(&new_crews, &old_crews).is_empty());
    }
}
