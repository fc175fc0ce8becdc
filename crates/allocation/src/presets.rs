//! Built-in coastal town: six venues and thirty residents.

use crate::catalog::LocationCatalog;
use townsim_types::{Bot, CapacityRange, Location, LocationKind};

pub const DOCKSIDE_DINER: &str = "The Dockside Diner";
pub const PARK_AND_PIER: &str = "Oceanfront Park & Pier";
pub const COMMUNITY_CHURCH: &str = "Coastal Community Church";
pub const HARBOR_MARINA: &str = "Harbor Marina";
pub const GENERAL_STORE: &str = "Main Street General Store";
pub const LIBRARY: &str = "Beachside Library";

const DEFAULT_WEIGHT: f64 = 0.25;
const HOMETOWN: &str = "You live in a small town on the North Carolina coast.";
const RESPONSE_STYLE: &str = "Keep responses concise (2-4 sentences), at most 2000 characters.";

/// The six coastal-town venues (total capacity 34-60).
pub fn coastal_town_locations() -> Vec<Location> {
    vec![
        Location::new(DOCKSIDE_DINER, LocationKind::Commercial, CapacityRange::new(6, 10))
            .with_description(
                "Breakfast and lunch spot by the marina where locals meet over coffee",
            )
            .with_glyph("☕"),
        Location::new(PARK_AND_PIER, LocationKind::Public, CapacityRange::new(8, 14))
            .with_description("Central green with pier access, busy with families and dog walkers")
            .with_glyph("🌊"),
        Location::new(COMMUNITY_CHURCH, LocationKind::Community, CapacityRange::new(5, 9))
            .with_description("Historic church doubling as the town's event hall")
            .with_glyph("⛪"),
        Location::new(HARBOR_MARINA, LocationKind::Commercial, CapacityRange::new(4, 8))
            .with_description("Boat slips, charters and a marine supply shop")
            .with_glyph("⚓"),
        Location::new(GENERAL_STORE, LocationKind::Commercial, CapacityRange::new(7, 12))
            .with_description("Groceries, hardware and essentials; everyone passes through")
            .with_glyph("🏪"),
        Location::new(LIBRARY, LocationKind::Public, CapacityRange::new(4, 7))
            .with_description("Quiet library with meeting rooms, favored by students and retirees")
            .with_glyph("📚"),
    ]
}

/// Catalog over [`coastal_town_locations`].
pub fn coastal_town_catalog() -> LocationCatalog {
    LocationCatalog::from_distinct(coastal_town_locations())
}

/// Resident spec: (name, glyph, role, [first, second, third] affinities, trait).
type ResidentSpec = (&'static str, &'static str, &'static str, [&'static str; 3], &'static str);

const RESIDENTS: [ResidentSpec; 30] = [
    ("Eleanor", "👵", "elderly_disabled", [LIBRARY, COMMUNITY_CHURCH, GENERAL_STORE],
        "You are elderly and use a wheelchair because of serious medical needs; getting anywhere is hard."),
    ("Harold", "👴", "elderly", [COMMUNITY_CHURCH, LIBRARY, DOCKSIDE_DINER],
        "You are elderly, move slowly, and speak from a long life's experience."),
    ("Martha", "👵", "elderly", [GENERAL_STORE, COMMUNITY_CHURCH, DOCKSIDE_DINER],
        "You are elderly and everyday tasks take you more effort than most people."),
    ("David", "😟", "family_caregiver", [COMMUNITY_CHURCH, LIBRARY, GENERAL_STORE],
        "A relative of yours is on life support at the local hospital and you want to stay near them."),
    ("Patricia", "🏥", "medical_dependent", [GENERAL_STORE, COMMUNITY_CHURCH, LIBRARY],
        "You have a medical condition and depend on the care team at the local hospital."),
    ("Robert", "🚶", "limited_mobility", [LIBRARY, GENERAL_STORE, COMMUNITY_CHURCH],
        "You walk with a walker and attend weekly physical therapy at the hospital."),
    ("Travis", "🎒", "homeless", [COMMUNITY_CHURCH, PARK_AND_PIER, GENERAL_STORE],
        "You are homeless, exposed to the weather, and have almost no money for transport."),
    ("Linda", "🚌", "outskirts_resident", [GENERAL_STORE, PARK_AND_PIER, DOCKSIDE_DINER],
        "You live on the edge of town and rely on the bus to get anywhere."),
    ("Maya", "📚", "student", [LIBRARY, GENERAL_STORE, DOCKSIDE_DINER],
        "You are a student without a car who depends on public transport."),
    ("Carlos", "🇲🇽", "spanish_speaker", [COMMUNITY_CHURCH, GENERAL_STORE, PARK_AND_PIER],
        "Spanish is your first language and official English notices are hard for you to follow."),
    ("Wei", "🇨🇳", "mandarin_speaker", [LIBRARY, GENERAL_STORE, PARK_AND_PIER],
        "Mandarin is your first language and you feel cut off from local news."),
    ("Maria", "🇲🇽", "spanish_speaker", [COMMUNITY_CHURCH, GENERAL_STORE, DOCKSIDE_DINER],
        "Spanish is your first language and you lean on neighbours to translate."),
    ("James", "🏡", "established_resident", [DOCKSIDE_DINER, GENERAL_STORE, COMMUNITY_CHURCH],
        "You have lived here for decades and have a car, savings and family nearby."),
    ("Barbara", "🏡", "established_resident", [DOCKSIDE_DINER, COMMUNITY_CHURCH, GENERAL_STORE],
        "You have lived here for decades and know everyone in town."),
    ("Richard", "🏡", "established_resident", [HARBOR_MARINA, DOCKSIDE_DINER, GENERAL_STORE],
        "You are a long-time resident who keeps a boat at the marina."),
    ("Susan", "🏡", "established_resident", [GENERAL_STORE, COMMUNITY_CHURCH, DOCKSIDE_DINER],
        "You are a long-time resident with the means to leave if you decide to."),
    ("Michael", "👨‍👩‍👧‍👦", "parent", [PARK_AND_PIER, GENERAL_STORE, DOCKSIDE_DINER],
        "You are a long-time resident raising young children."),
    ("Jennifer", "👨‍👩‍👧‍👦", "parent", [PARK_AND_PIER, GENERAL_STORE, COMMUNITY_CHURCH],
        "You are a parent of young kids and their safety comes first."),
    ("Thomas", "👨‍👩‍👧‍👦", "parent", [PARK_AND_PIER, DOCKSIDE_DINER, GENERAL_STORE],
        "You are a parent juggling work, school pickups and storm preparations."),
    ("Dorothy", "🏡", "established_resident", [COMMUNITY_CHURCH, DOCKSIDE_DINER, GENERAL_STORE],
        "You are a long-time resident active in the church community."),
    ("William", "🏡", "established_resident", [HARBOR_MARINA, DOCKSIDE_DINER, GENERAL_STORE],
        "You are a retired fisherman who has weathered many storms."),
    ("Carol", "🏡", "established_resident", [GENERAL_STORE, DOCKSIDE_DINER, COMMUNITY_CHURCH],
        "You are a long-time resident who helps organise neighbours."),
    ("George", "🏡", "established_resident", [DOCKSIDE_DINER, HARBOR_MARINA, GENERAL_STORE],
        "You are a long-time resident with opinions about how the town handles storms."),
    ("Nancy", "🏡", "established_resident", [COMMUNITY_CHURCH, GENERAL_STORE, DOCKSIDE_DINER],
        "You are a long-time resident who checks in on elderly neighbours."),
    ("Jake", "🎸", "young_resident", [DOCKSIDE_DINER, PARK_AND_PIER, GENERAL_STORE],
        "You are young and have never been through a serious hurricane."),
    ("Ashley", "🎸", "young_resident", [PARK_AND_PIER, DOCKSIDE_DINER, GENERAL_STORE],
        "You are young, recently moved here, and unsure how seriously to take warnings."),
    ("Brandon", "🎸", "young_resident", [DOCKSIDE_DINER, PARK_AND_PIER, HARBOR_MARINA],
        "You are young and tend to learn about emergencies from social media."),
    ("Frank", "😤", "storm_skeptic", [DOCKSIDE_DINER, HARBOR_MARINA, GENERAL_STORE],
        "You have ridden out many hurricanes and say so loudly; you rarely see a reason to evacuate."),
    ("Dale", "🚫", "conspiracy_theorist", [HARBOR_MARINA, DOCKSIDE_DINER, GENERAL_STORE],
        "You distrust the government and believe official storm warnings serve hidden motives."),
    ("Gary", "🏠", "protective_homeowner", [GENERAL_STORE, HARBOR_MARINA, DOCKSIDE_DINER],
        "You own your home and fear looting if you leave it unattended."),
];

/// The thirty coastal-town residents, in allocation order.
pub fn coastal_town_population() -> Vec<Bot> {
    RESIDENTS
        .iter()
        .map(|(name, glyph, role, [first, second, third], description)| {
            Bot::new(*name, DEFAULT_WEIGHT)
                .with_glyph(*glyph)
                .with_role(*role)
                .with_affinity(*first, 0.7)
                .with_affinity(*second, 0.5)
                .with_affinity(*third, 0.4)
                .with_persona(format!(
                    "You are {}. {} {} {}",
                    name, HOMETOWN, description, RESPONSE_STYLE
                ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::total_capacity;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_shape() {
        let catalog = coastal_town_catalog();
        assert_eq!(catalog.len(), 6);
        assert_eq!(total_capacity(catalog.locations()).max, 60);
    }

    #[test]
    fn test_population_names_unique_and_affinities_known() {
        let catalog = coastal_town_catalog();
        let residents = coastal_town_population();
        assert_eq!(residents.len(), 30);

        let names: HashSet<&str> = residents.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names.len(), 30);

        for bot in &residents {
            assert_eq!(bot.affinities.len(), 3, "{}", bot.name);
            for location in bot.affinities.keys() {
                assert!(catalog.get(location).is_some(), "{} -> {}", bot.name, location);
            }
            assert!(bot.persona.starts_with(&format!("You are {}.", bot.name)));
        }
    }
}
