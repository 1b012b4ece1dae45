//! Technician coverage and material routing for a reconfiguration.

use super::model::{CrewKey, Destination, LeaderResolution, MaterialMovementPreview, NewCrewConfig};
use crate::domain::a001_crew::Crew;
use crate::domain::a003_location::StockLine;
use std::collections::{HashMap, HashSet};

/// Technicians of `old_crews` that appear in none of `new_crews`, in the
/// order they were found.
pub fn unassigned_technicians(old_crews: &[Crew], new_crews: &[NewCrewConfig]) -> Vec<String> {
    let assigned: HashSet<&str> = new_crews
        .iter()
        .flat_map(|c| c.all_technicians())
        .collect();

    let mut missing: Vec<String> = Vec::new();
    for crew in old_crews {
        for id in crew.technician_ids() {
            if !assigned.contains(id.as_str()) && !missing.contains(&id) {
                missing.push(id);
            }
        }
    }
    missing
}

/// True when every technician of the old crews is placed somewhere in the
/// new ones.
pub fn all_assigned(old_crews: &[Crew], new_crews: &[NewCrewConfig]) -> bool {
    unassigned_technicians(old_crews, new_crews).is_empty()
}

/// Leader a proposed crew will actually have: the resolved one if the user
/// settled a conflict for it, the declared one otherwise.
pub(crate) fn final_leader<'a>(
    crew: &'a NewCrewConfig,
    resolutions: &'a [LeaderResolution],
) -> Option<&'a str> {
    resolutions
        .iter()
        .find(|r| r.key == crew.key)
        .map(|r| r.selected_leader_id.as_str())
        .filter(|l| !l.trim().is_empty())
        .or_else(|| crew.leader())
}

/// Decide where the material held by `old_crew` goes.
///
/// Material follows the old crew's leader, first match wins:
/// 1. no leader: warehouse;
/// 2. the leader lost a resolved conflict: the crew led by the chosen leader;
/// 3. a proposed crew led by them;
/// 4. a proposed crew they are a member of;
/// 5. otherwise the warehouse.
pub fn route_material(
    old_crew: &Crew,
    new_crews: &[NewCrewConfig],
    resolutions: &[LeaderResolution],
) -> Destination {
    let Some(leader) = old_crew.leader() else {
        return Destination::Warehouse;
    };

    for resolution in resolutions
        .iter()
        .filter(|r| r.conflicting_leaders.iter().any(|l| l == leader))
    {
        if let Some(crew) = new_crews
            .iter()
            .find(|c| final_leader(c, resolutions) == Some(resolution.selected_leader_id.as_str()))
        {
            return Destination::Crew(crew.key.clone());
        }
    }

    if let Some(crew) = new_crews.iter().find(|c| c.leader() == Some(leader)) {
        return Destination::Crew(crew.key.clone());
    }

    if let Some(crew) = new_crews.iter().find(|c| c.has_member(leader)) {
        return Destination::Crew(crew.key.clone());
    }

    Destination::Warehouse
}

/// Fold the old crews' inventories into one preview line per material and
/// destination.
///
/// `inventories` maps an old crew id to its stock; crews without a snapshot
/// are skipped, as are lines with nothing to move. The source of a summed
/// line is the first crew that contributed to it.
pub fn aggregate_movements(
    old_crews: &[Crew],
    new_crews: &[NewCrewConfig],
    inventories: &HashMap<String, Vec<StockLine>>,
    resolutions: &[LeaderResolution],
) -> Vec<MaterialMovementPreview> {
    let mut lines: Vec<MaterialMovementPreview> = Vec::new();
    let mut index: HashMap<(String, Destination), usize> = HashMap::new();

    for crew in old_crews {
        let Some(stock) = inventories.get(&crew.id) else {
            continue;
        };
        let destination = route_material(crew, new_crews, resolutions);
        let destination_name = destination_name(&destination, new_crews);

        for item in stock {
            if item.quantity.is_nan() || item.quantity <= 0.0 {
                continue;
            }
            let key = (item.material_id.clone(), destination.clone());
            match index.get(&key) {
                Some(&pos) => lines[pos].quantity += item.quantity,
                None => {
                    index.insert(key, lines.len());
                    lines.push(MaterialMovementPreview {
                        material_id: item.material_id.clone(),
                        material_name: item.material_name.clone(),
                        from_crew_id: crew.id.clone(),
                        from_crew_name: crew.name.clone(),
                        destination: destination.clone(),
                        destination_name: destination_name.clone(),
                        quantity: item.quantity,
                        unit: item.unit.clone(),
                    });
                }
            }
        }
    }

    lines
}

pub fn destination_name(destination: &Destination, new_crews: &[NewCrewConfig]) -> String {
    match destination {
        Destination::Warehouse => "Warehouse".to_string(),
        Destination::Crew(key) => crew_name(key, new_crews),
    }
}

fn crew_name(key: &CrewKey, new_crews: &[NewCrewConfig]) -> String {
    new_crews
        .iter()
        .find(|c| &c.key == key)
        .map(|c| c.name.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u501_reconfigure_crews::conflicts::tests::{new, old};

    fn stock(material: &str, quantity: f64) -> StockLine {
        StockLine {
            material_id: material.into(),
            material_name: material.to_uppercase(),
            quantity,
            unit: "m".into(),
        }
    }

    fn resolution(n: usize, selected: &str, conflicting: &[&str]) -> LeaderResolution {
        LeaderResolution {
            key: CrewKey::Provisional(n),
            selected_leader_id: selected.into(),
            conflicting_leaders: conflicting.iter().map(|c| (*c).into()).collect(),
        }
    }

    #[test]
    fn test_repartition_without_omission_is_complete() {
        let old_crews = vec![old("A", "t1", &["t1", "t2"]), old("B", "t3", &["t3", "t4"])];
        let new_crews = vec![
            new(0, "N1", "t1", &["t1", "t3"]),
            new(1, "N2", "t4", &["t4", "t2"]),
        ];
        assert!(all_assigned(&old_crews, &new_crews));
        assert!(unassigned_technicians(&old_crews, &new_crews).is_empty());
    }

    #[test]
    fn test_dropped_technician_is_reported() {
        let old_crews = vec![old("A", "t1", &["t1", "t2", "t5"])];
        let new_crews = vec![new(0, "N1", "t1", &["t2"])];
        assert!(!all_assigned(&old_crews, &new_crews));
        assert_eq!(unassigned_technicians(&old_crews, &new_crews), vec!["t5"]);
    }

    #[test]
    fn test_padded_member_counts_as_assigned() {
        let old_crews = vec![old("A", "t1", &["t1", "t2"])];
        let new_crews = vec![new(0, "N1", "t1", &[" t2 "])];
        assert!(unassigned_technicians(&old_crews, &new_crews).is_empty());
    }

    #[test]
    fn test_old_leader_counts_even_outside_members() {
        let old_crews = vec![old("A", "t9", &["t2"])];
        let new_crews = vec![new(0, "N1", "t2", &["t2"])];
        assert_eq!(unassigned_technicians(&old_crews, &new_crews), vec!["t9"]);
    }

    #[test]
    fn test_no_leader_routes_to_warehouse() {
        let mut crew = old("A", "", &["t1"]);
        let new_crews = vec![new(0, "N1", "t1", &["t1"])];
        let resolutions = vec![resolution(0, "t1", &[""])];
        assert_eq!(route_material(&crew, &new_crews, &resolutions), Destination::Warehouse);

        crew.leader_technician_id = None;
        assert_eq!(route_material(&crew, &new_crews, &[]), Destination::Warehouse);
        assert_eq!(Destination::Warehouse.to_string(), "WAREHOUSE");
    }

    #[test]
    fn test_resolution_takes_precedence() {
        let crew = old("B", "t3", &["t3", "t4"]);
        // t3 still leads N2, but lost the vote in N1 to t1
        let new_crews = vec![
            new(0, "N1", "t1", &["t1", "t3"]),
            new(1, "N2", "t3", &["t3", "t4"]),
        ];
        let resolutions = vec![resolution(0, "t1", &["t3"])];
        assert_eq!(
            route_material(&crew, &new_crews, &resolutions),
            Destination::Crew(CrewKey::Provisional(0))
        );
        assert_eq!(
            route_material(&crew, &new_crews, &[]),
            Destination::Crew(CrewKey::Provisional(1))
        );
    }

    #[test]
    fn test_resolution_matches_final_leader() {
        let crew = old("A", "t1", &["t1", "t2"]);
        let new_crews = vec![new(0, "N1", "t1", &["t1", "t3"])];
        let resolutions = vec![resolution(0, "t3", &["t1"])];
        assert_eq!(
            route_material(&crew, &new_crews, &resolutions),
            Destination::Crew(CrewKey::Provisional(0))
        );
    }

    #[test]
    fn test_declared_leader_wins_over_shared_resolution() {
        let crew = old("B", "t3", &["t3", "t4"]);
        // both crews end up led by t3, B follows the crew t3 declared
        let new_crews = vec![
            new(0, "N1", "t1", &["t1", "t3"]),
            new(1, "N2", "t3", &["t3", "t4"]),
        ];
        let resolutions = vec![resolution(0, "t3", &["t1"]), resolution(1, "t3", &[])];
        assert_eq!(
            route_material(&crew, &new_crews, &resolutions),
            Destination::Crew(CrewKey::Provisional(1))
        );
    }

    #[test]
    fn test_leader_then_member_then_warehouse() {
        let crew = old("A", "t1", &["t1"]);
        let led = vec![new(0, "N1", "t5", &["t1"]), new(1, "N2", "t1", &["t6"])];
        assert_eq!(
            route_material(&crew, &led, &[]),
            Destination::Crew(CrewKey::Provisional(1))
        );

        let member = vec![new(0, "N1", "t5", &["t1"])];
        assert_eq!(
            route_material(&crew, &member, &[]),
            Destination::Crew(CrewKey::Provisional(0))
        );

        let gone = vec![new(0, "N1", "t5", &["t6"])];
        assert_eq!(route_material(&crew, &gone, &[]), Destination::Warehouse);
    }

    #[test]
    fn test_same_material_same_destination_is_summed() {
        let old_crews = vec![old("A", "t1", &["t1"]), old("B", "t2", &["t2"])];
        let new_crews = vec![new(0, "Merged", "t1", &["t1", "t2"])];
        let inventories = HashMap::from([
            ("A".to_string(), vec![stock("cable", 10.0), stock("pipe", 2.0)]),
            ("B".to_string(), vec![stock("cable", 5.5)]),
        ]);

        let lines = aggregate_movements(&old_crews, &new_crews, &inventories, &[]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].material_id, "cable");
        assert_eq!(lines[0].quantity, 15.5);
        assert_eq!(lines[0].from_crew_id, "A");
        assert_eq!(lines[0].destination_name, "Merged");
        assert_eq!(lines[1].material_id, "pipe");
    }

    #[test]
    fn test_different_destinations_stay_separate() {
        let old_crews = vec![
            old("A", "t1", &["t1"]),
            old("B", "t2", &["t2"]),
            old("C", "t9", &["t9"]),
        ];
        let new_crews = vec![new(0, "N1", "t1", &["t1"]), new(1, "N2", "t2", &["t2", "t9"])];
        let inventories = HashMap::from([
            ("A".to_string(), vec![stock("cable", 1.0)]),
            ("B".to_string(), vec![stock("cable", 2.0), stock("tape", 0.0)]),
        ]);

        let lines = aggregate_movements(&old_crews, &new_crews, &inventories, &[]);
        let summary: Vec<(String, f64)> = lines
            .iter()
            .map(|l| (l.destination.to_string(), l.quantity))
            .collect();
        assert_eq!(
            summary,
            vec![("temp-0".to_string(), 1.0), ("temp-1".to_string(), 2.0)]
        );
    }
}
