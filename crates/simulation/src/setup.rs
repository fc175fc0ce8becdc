//! Construction of a simulation record from a catalog and population.

use rand::Rng;
use std::time::SystemTime;
use townsim_allocation::{
    total_capacity, AllocationEngine, AllocationError, Assignment, LocationCatalog,
};
use townsim_core::SimulationRecord;
use townsim_types::{Bot, SimulationId};
use tracing::{debug, info};

/// Select `location_count` locations and allocate the whole population.
///
/// Fails before allocation runs when the population exceeds the chosen
/// locations' combined maximum capacity.
pub fn allocate_population<R: Rng + ?Sized>(
    catalog: &LocationCatalog,
    population: &[Bot],
    location_count: usize,
    rng: &mut R,
) -> Result<Assignment, AllocationError> {
    let selected = catalog.select_locations(location_count, rng)?;

    let capacity = total_capacity(&selected);
    if population.len() > capacity.max {
        return Err(AllocationError::InsufficientCapacity {
            bots: population.len(),
            min: capacity.min,
            max: capacity.max,
        });
    }
    debug!(bots = population.len(), capacity = %capacity, "Capacity covers population");

    AllocationEngine::new(selected)?.allocate(population, rng)
}

/// Select locations, allocate the population, and build a `created` record.
pub fn create_simulation<R: Rng + ?Sized>(
    catalog: &LocationCatalog,
    population: &[Bot],
    location_count: usize,
    round_count: u32,
    emergency_message: &str,
    rng: &mut R,
    now: SystemTime,
) -> Result<SimulationRecord, AllocationError> {
    let id = SimulationId::generate(now, rng);
    let assignment = allocate_population(catalog, population, location_count, rng)?;

    info!(
        simulation = %id,
        locations = assignment.len(),
        bots = assignment.total_bots(),
        "Allocated simulation"
    );

    Ok(SimulationRecord::new(
        id,
        emergency_message,
        round_count,
        assignment.into_rosters(),
        now,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;
    use townsim_allocation::presets;
    use townsim_core::{LifecycleEvent, SimulationStatus};
    use townsim_types::{CapacityRange, Location, LocationKind};

    #[test]
    fn test_coastal_town_four_locations() {
        let catalog = presets::coastal_town_catalog();
        let population = presets::coastal_town_population();

        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            // Any four coastal venues hold at least 34 residents.
            let record = create_simulation(
                &catalog,
                &population,
                4,
                3,
                "Hurricane approaching",
                &mut rng,
                SystemTime::UNIX_EPOCH,
            )
            .unwrap();

            assert_eq!(record.status(), SimulationStatus::Created);
            assert_eq!(record.locations().len(), 4);
            assert_eq!(record.stats().total_bots, 30);
            assert!(record.id().as_str().starts_with("sim_0_"));

            let mut names = HashSet::new();
            for state in record.locations() {
                assert!(state.bots.len() <= state.location.capacity.max);
                for bot in &state.bots {
                    assert!(names.insert(bot.name.clone()), "duplicate {}", bot.name);
                }
            }
            assert_eq!(names.len(), 30);
        }
    }

    #[test]
    fn test_capacity_checked_before_allocation() {
        let catalog = LocationCatalog::new(
            ["A", "B", "C", "D"]
                .iter()
                .map(|n| Location::new(*n, LocationKind::Public, CapacityRange::new(1, 5)))
                .collect(),
        )
        .unwrap();
        let population = presets::coastal_town_population();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let err = create_simulation(
            &catalog,
            &population,
            4,
            1,
            "Flood",
            &mut rng,
            SystemTime::UNIX_EPOCH,
        )
        .unwrap_err();

        assert_eq!(
            err,
            AllocationError::InsufficientCapacity {
                bots: 30,
                min: 4,
                max: 20
            }
        );
    }

    #[test]
    fn test_allocate_population_is_reproducible() {
        let catalog = presets::coastal_town_catalog();
        let population = presets::coastal_town_population();
        let rosters = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            allocate_population(&catalog, &population, 5, &mut rng)
                .unwrap()
                .rosters()
                .map(|r| (r.location.name.clone(), r.bots.len()))
                .collect::<Vec<_>>()
        };

        let first = rosters(17);
        assert_eq!(first.len(), 5);
        assert_eq!(first.iter().map(|(_, n)| n).sum::<usize>(), 30);
        assert_eq!(first, rosters(17));
    }

    #[test]
    fn test_catalog_too_small() {
        let catalog = presets::coastal_town_catalog();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = create_simulation(
            &catalog,
            &[],
            7,
            1,
            "Flood",
            &mut rng,
            SystemTime::UNIX_EPOCH,
        )
        .unwrap_err();
        assert!(matches!(err, AllocationError::InsufficientCatalog { .. }));
    }

    #[test]
    fn test_record_queues_created_event() {
        let catalog = presets::coastal_town_catalog();
        let population = presets::coastal_town_population();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let mut record = create_simulation(
            &catalog,
            &population,
            6,
            2,
            "Storm surge",
            &mut rng,
            SystemTime::UNIX_EPOCH,
        )
        .unwrap();

        assert_eq!(record.emergency_message(), "Storm surge");
        assert_eq!(
            record.drain_events(),
            vec![LifecycleEvent::Created {
                locations: 6,
                bots: 30
            }]
        );
    }
}
