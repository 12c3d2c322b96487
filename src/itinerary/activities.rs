//! Fixed activity suggestions per destination category

use crate::models::DestinationCategory;

use super::DaySlot;

struct CategoryActivities {
    morning: &'static [&'static str],
    afternoon: &'static [&'static str],
}

const BEACH: CategoryActivities = CategoryActivities {
    morning: &[
        "Sunrise swim",
        "Snorkeling tour",
        "Beach yoga",
        "Kayaking along the coast",
        "Seafood market visit",
    ],
    afternoon: &[
        "Sunbathing and relaxation",
        "Island hopping",
        "Sunset cocktails",
        "Beachfront seafood dinner",
        "Night market stroll",
    ],
};

const MOUNTAIN: CategoryActivities = CategoryActivities {
    morning: &[
        "Sunrise hike",
        "Summit trek",
        "Village homestay visit",
        "Waterfall trail",
        "Terraced fields walk",
    ],
    afternoon: &[
        "Cable car ride",
        "Local cuisine tasting",
        "Hot spring soak",
        "Stargazing",
        "Campfire evening",
    ],
};

const CITY: CategoryActivities = CategoryActivities {
    morning: &[
        "Walking tour of the old town",
        "Museum visit",
        "Local breakfast spot",
        "Street art tour",
        "Market shopping",
    ],
    afternoon: &[
        "Coffee shop hopping",
        "Rooftop bar",
        "Food street tour",
        "Evening river cruise",
        "Live music venue",
    ],
};

const CULTURAL: CategoryActivities = CategoryActivities {
    morning: &[
        "Temple visit",
        "Historical site tour",
        "Traditional craft workshop",
        "Heritage museum",
        "Calligraphy class",
    ],
    afternoon: &[
        "Cooking class",
        "Water puppet show",
        "Traditional music performance",
        "Tea ceremony",
        "Lantern-lit old town walk",
    ],
};

const GENERIC: CategoryActivities = CategoryActivities {
    morning: &[
        "Sightseeing",
        "Local market visit",
        "Guided tour",
        "Photography walk",
        "Breakfast at a local cafe",
    ],
    afternoon: &[
        "Local cuisine",
        "Shopping",
        "Relaxation",
        "Evening stroll",
        "Dinner at a recommended restaurant",
    ],
};

fn table(category: DestinationCategory) -> &'static CategoryActivities {
    match category {
        DestinationCategory::Beach => &BEACH,
        DestinationCategory::Mountain => &MOUNTAIN,
        DestinationCategory::City => &CITY,
        DestinationCategory::Cultural => &CULTURAL,
        DestinationCategory::Generic => &GENERIC,
    }
}

/// Activities per slot
pub const ACTIVITIES_PER_SLOT: usize = 3;

/// `ACTIVITIES_PER_SLOT` activities for a slot, rotated by day so
/// consecutive days differ
#[must_use]
pub fn for_slot(category: DestinationCategory, slot: DaySlot, day: u32) -> Vec<String> {
    let activities = match slot {
        DaySlot::Morning => table(category).morning,
        DaySlot::AfternoonEvening => table(category).afternoon,
    };
    let offset = day.saturating_sub(1) as usize;
    (0..ACTIVITIES_PER_SLOT)
        .map(|i| activities[(offset + i) % activities.len()].to_string())
        .collect()
}

/// Headline activities for a single visit to a destination
#[must_use]
pub fn highlights(category: DestinationCategory) -> Vec<String> {
    let activities = table(category);
    vec![
        activities.morning[0].to_string(),
        activities.afternoon[0].to_string(),
    ]
}
