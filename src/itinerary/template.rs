//! Template itinerary builder
//!
//! Every day gets a morning and an afternoon/evening route between points
//! scattered around the destination. Routes are chained so each one starts
//! where the previous ended; the path leaves from the destination and the
//! last leg returns to it.

use rand::RngExt;

use crate::geo::Coordinate;
use crate::models::RouteDraft;

use super::{DaySlot, ItineraryDay, ItineraryRequest, PlannedRoute, activities};

/// Maximum offset of a waypoint from the destination on each axis
pub const JITTER_DEGREES: f64 = 0.05;

const SLOTS: [DaySlot; 2] = [DaySlot::Morning, DaySlot::AfternoonEvening];

fn jitter<R: RngExt + ?Sized>(center: Coordinate, rng: &mut R) -> Coordinate {
    let latitude = center.latitude + rng.random_range(-JITTER_DEGREES..=JITTER_DEGREES);
    let longitude = center.longitude + rng.random_range(-JITTER_DEGREES..=JITTER_DEGREES);
    Coordinate::new(latitude.clamp(-90.0, 90.0), longitude)
}

pub fn build<R: RngExt + ?Sized>(request: &ItineraryRequest, rng: &mut R) -> Vec<ItineraryDay> {
    let destination = &request.destination;
    let center = destination.coordinate;
    let mut cursor = center;
    let mut days = Vec::with_capacity(request.days as usize);

    for day in 1..=request.days {
        let mut routes = Vec::with_capacity(SLOTS.len());

        for slot in SLOTS {
            let closes_loop = day == request.days && slot == DaySlot::AfternoonEvening;
            let end = if closes_loop {
                center
            } else {
                jitter(center, rng)
            };

            routes.push(PlannedRoute {
                slot,
                route: RouteDraft {
                    title: format!("Day {day}: {} in {}", slot.label(), destination.name),
                    description: describe(slot, &destination.name, closes_loop),
                    start: cursor,
                    end,
                    activities: activities::for_slot(destination.category, slot, day),
                },
            });
            cursor = end;
        }

        days.push(ItineraryDay {
            day,
            date: request.date_of(day),
            routes,
        });
    }

    days
}

fn describe(slot: DaySlot, name: &str, closes_loop: bool) -> String {
    match (slot, closes_loop) {
        (_, true) => format!("Wrap up the trip and head back to central {name}"),
        (DaySlot::Morning, false) => format!("Start the day exploring {name}"),
        (DaySlot::AfternoonEvening, false) => format!("Spend the afternoon and evening around {name}"),
    }
}
