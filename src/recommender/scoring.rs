//! Weighted additive scoring of candidate routes
//!
//! A candidate earns up to 100 points:
//! - proximity to the trip destination (40)
//! - popularity across the candidate pool (30)
//! - completeness of its activity list (20)
//! - matching destination or country of its source trip (10)

use serde::{Deserialize, Serialize};

use crate::geo::distance_km;
use crate::models::{Candidate, CurrentTrip};

pub const PROXIMITY_WEIGHT: f64 = 40.0;
pub const POPULARITY_WEIGHT: f64 = 30.0;
pub const COMPLETENESS_WEIGHT: f64 = 20.0;
pub const REGION_WEIGHT: f64 = 10.0;

/// Distance at which the proximity score reaches zero
pub const PROXIMITY_RANGE_KM: f64 = 100.0;
/// Below this distance the proximity earns a reason
pub const NEARBY_REASON_KM: f64 = 50.0;
/// Per-axis tolerance for two starts to count as the same place
pub const SAME_START_DEGREES: f64 = 0.01;
pub const POINTS_PER_POPULAR_MATCH: f64 = 5.0;
pub const POINTS_PER_ACTIVITY: f64 = 4.0;

pub const DEFAULT_REASON: &str = "General recommendation";

/// Per-criterion points of one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub proximity: f64,
    pub popularity: f64,
    pub completeness: f64,
    pub region: f64,
    pub reasons: Vec<String>,
}

impl ScoreBreakdown {
    /// Sum of all criteria, rounded to one decimal
    #[must_use]
    pub fn total(&self) -> f64 {
        round_to_tenth(self.proximity + self.popularity + self.completeness + self.region)
    }
}

#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `max(0, 40 * (1 - d / 100))`, NaN distances score zero
#[must_use]
pub fn proximity_score(distance_km: f64) -> f64 {
    (PROXIMITY_WEIGHT * (1.0 - distance_km / PROXIMITY_RANGE_KM)).max(0.0)
}

#[must_use]
pub fn popularity_score(matches: usize) -> f64 {
    (matches as f64 * POINTS_PER_POPULAR_MATCH).min(POPULARITY_WEIGHT)
}

#[must_use]
pub fn completeness_score(activities: usize) -> f64 {
    (activities as f64 * POINTS_PER_ACTIVITY).min(COMPLETENESS_WEIGHT)
}

/// Pool members sharing the candidate's title (case-insensitive) or starting
/// at the same place. The candidate itself is counted, and each member counts
/// once even when both signals match.
#[must_use]
pub fn popularity_count(candidate: &Candidate, pool: &[Candidate]) -> usize {
    let title = candidate.route.title.to_lowercase();
    pool.iter()
        .filter(|other| {
            let same_title = other.route.title.to_lowercase() == title;
            let same_start = other
                .route
                .start
                .is_within_degrees(&candidate.route.start, SAME_START_DEGREES);
            same_title || same_start
        })
        .count()
}

/// The source trip targets the same destination, or the same non-empty country
#[must_use]
pub fn region_matches(current: &CurrentTrip, candidate: &Candidate) -> bool {
    let same_destination = candidate
        .source
        .destination_id
        .as_deref()
        .is_some_and(|id| id == current.destination.id);
    same_destination
        || current
            .destination
            .shares_country_with(candidate.source.country.as_deref())
}

/// Score a candidate against the trip being planned
#[must_use]
pub fn score_candidate(
    current: &CurrentTrip,
    candidate: &Candidate,
    pool: &[Candidate],
) -> ScoreBreakdown {
    let mut reasons = Vec::new();

    let distance = distance_km(current.destination.coordinate, candidate.route.midpoint());
    let proximity = proximity_score(distance);
    if distance < NEARBY_REASON_KM {
        reasons.push(format!(
            "Close to {} ({distance:.1} km away)",
            current.destination.name
        ));
    }

    let matches = popularity_count(candidate, pool);
    let popularity = popularity_score(matches);
    if matches > 1 {
        reasons.push(format!("Popular with other travellers ({matches} similar routes)"));
    }

    let activity_count = candidate.route.activities.len();
    let completeness = completeness_score(activity_count);
    if activity_count > 2 {
        reasons.push(format!("Well planned with {activity_count} activities"));
    }

    let region = if region_matches(current, candidate) {
        reasons.push(format!("Also planned for {}", region_label(current, candidate)));
        REGION_WEIGHT
    } else {
        0.0
    };

    if reasons.is_empty() {
        reasons.push(DEFAULT_REASON.to_string());
    }

    ScoreBreakdown {
        proximity,
        popularity,
        completeness,
        region,
        reasons,
    }
}

fn region_label(current: &CurrentTrip, candidate: &Candidate) -> String {
    let same_destination =
        candidate.source.destination_id.as_deref() == Some(current.destination.id.as_str());
    if same_destination {
        current.destination.name.clone()
    } else {
        current
            .destination
            .country
            .clone()
            .unwrap_or_else(|| current.destination.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::models::{Destination, Route, SourceTrip};
    use rstest::rstest;

    const HANOI: Coordinate = Coordinate::new(21.0285, 105.8542);

    fn current_trip() -> CurrentTrip {
        CurrentTrip {
            id: "current".to_string(),
            destination: Destination::new("hanoi", "Hanoi", HANOI).with_country("Vietnam"),
            routes: vec![],
        }
    }

    fn candidate(title: &str, start: Coordinate, end: Coordinate, activities: usize) -> Candidate {
        Candidate {
            route: Route {
                id: None,
                trip_id: "peer".to_string(),
                title: title.to_string(),
                description: String::new(),
                start,
                end,
                activities: (0..activities).map(|i| format!("Activity {i}")).collect(),
            },
            source: SourceTrip {
                id: "peer".to_string(),
                title: "Peer trip".to_string(),
                destination_id: None,
                destination_name: None,
                country: None,
            },
        }
    }

    #[rstest]
    #[case(0.0, 40.0)]
    #[case(50.0, 20.0)]
    #[case(100.0, 0.0)]
    #[case(250.0, 0.0)]
    #[case(f64::NAN, 0.0)]
    fn test_proximity_score(#[case] distance: f64, #[case] expected: f64) {
        assert_eq!(proximity_score(distance), expected);
    }

    #[rstest]
    #[case(0, 0.0)]
    #[case(1, 5.0)]
    #[case(2, 10.0)]
    #[case(6, 30.0)]
    #[case(11, 30.0)]
    fn test_popularity_score(#[case] matches: usize, #[case] expected: f64) {
        assert_eq!(popularity_score(matches), expected);
    }

    #[rstest]
    #[case(0, 0.0)]
    #[case(3, 12.0)]
    #[case(5, 20.0)]
    #[case(9, 20.0)]
    fn test_completeness_score(#[case] activities: usize, #[case] expected: f64) {
        assert_eq!(completeness_score(activities), expected);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(39.925), 39.9);
        assert_eq!(round_to_tenth(12.36), 12.4);
        assert_eq!(round_to_tenth(100.0), 100.0);
    }

    #[test]
    fn test_proximity_near_hanoi() {
        let point = Coordinate::new(21.0300, 105.8550);
        let c = candidate("Walk", point, point, 0);
        let breakdown = score_candidate(&current_trip(), &c, std::slice::from_ref(&c));
        assert!((breakdown.proximity - 39.9).abs() < 0.05);
        assert!(breakdown.reasons[0].starts_with("Close to Hanoi"));
    }

    #[test]
    fn test_far_candidate_has_zero_proximity() {
        let far = Coordinate::new(16.4637, 107.5909); // Hue
        let c = candidate("Imperial City", far, far, 0);
        let breakdown = score_candidate(&current_trip(), &c, std::slice::from_ref(&c));
        assert_eq!(breakdown.proximity, 0.0);
        assert_eq!(breakdown.popularity, 5.0);
        assert_eq!(breakdown.reasons, vec![DEFAULT_REASON.to_string()]);
        assert_eq!(breakdown.total(), 5.0);
    }

    #[test]
    fn test_identical_titles_are_popular() {
        let a = candidate(
            "Visit Old Quarter",
            Coordinate::new(10.0, 100.0),
            Coordinate::new(10.0, 100.0),
            0,
        );
        let b = candidate(
            "visit old quarter",
            Coordinate::new(30.0, 120.0),
            Coordinate::new(30.0, 120.0),
            0,
        );
        let pool = vec![a.clone(), b.clone()];

        assert_eq!(popularity_count(&a, &pool), 2);
        assert_eq!(score_candidate(&current_trip(), &a, &pool).popularity, 10.0);
        assert_eq!(score_candidate(&current_trip(), &b, &pool).popularity, 10.0);
    }

    #[test]
    fn test_nearby_start_counts_once_with_title() {
        let start = Coordinate::new(21.0, 105.0);
        let a = candidate("Lake loop", start, start, 0);
        let same_both = candidate("Lake loop", Coordinate::new(21.005, 105.005), start, 0);
        let same_start = candidate("Other", Coordinate::new(20.995, 104.995), start, 0);
        let unrelated = candidate("Other", Coordinate::new(21.02, 105.0), start, 0);
        let pool = vec![a.clone(), same_both, same_start, unrelated];

        assert_eq!(popularity_count(&a, &pool), 3);
    }

    #[test]
    fn test_empty_titles_match_each_other() {
        let a = candidate("", Coordinate::new(10.0, 100.0), Coordinate::new(10.0, 100.0), 0);
        let b = candidate("", Coordinate::new(30.0, 120.0), Coordinate::new(30.0, 120.0), 0);
        let pool = vec![a.clone(), b];
        assert_eq!(popularity_count(&a, &pool), 2);
        assert_eq!(score_candidate(&current_trip(), &a, &pool).popularity, 10.0);
    }

    #[test]
    fn test_titles_are_not_trimmed() {
        let a = candidate(
            "Visit Old Quarter",
            Coordinate::new(10.0, 100.0),
            Coordinate::new(10.0, 100.0),
            0,
        );
        let b = candidate(
            "Visit Old Quarter ",
            Coordinate::new(30.0, 120.0),
            Coordinate::new(30.0, 120.0),
            0,
        );
        assert_eq!(popularity_count(&a, &[a.clone(), b]), 1);
    }

    #[test]
    fn test_complete_candidate() {
        let far = Coordinate::new(0.0, 0.0);
        let c = candidate("Full day", far, far, 5);
        let breakdown = score_candidate(&current_trip(), &c, std::slice::from_ref(&c));
        assert_eq!(breakdown.completeness, 20.0);
        assert!(breakdown.reasons.iter().any(|r| r.contains("5 activities")));
    }

    #[test]
    fn test_region_match_by_destination_and_country() {
        let far = Coordinate::new(0.0, 0.0);
        let mut same_destination = candidate("A", far, far, 0);
        same_destination.source.destination_id = Some("hanoi".to_string());
        assert!(region_matches(&current_trip(), &same_destination));

        let mut same_country = candidate("B", far, far, 0);
        same_country.source.country = Some("Vietnam".to_string());
        assert!(region_matches(&current_trip(), &same_country));
        let breakdown =
            score_candidate(&current_trip(), &same_country, std::slice::from_ref(&same_country));
        assert_eq!(breakdown.region, 10.0);
        assert!(breakdown.reasons.iter().any(|r| r == "Also planned for Vietnam"));

        let mut other_case = candidate("D", far, far, 0);
        other_case.source.country = Some("VIETNAM".to_string());
        assert!(!region_matches(&current_trip(), &other_case));

        let mut empty_country = candidate("C", far, far, 0);
        empty_country.source.country = Some(String::new());
        assert!(!region_matches(&current_trip(), &empty_country));
    }

    #[test]
    fn test_maximum_score_is_one_hundred() {
        let c = {
            let mut c = candidate("Old Quarter", HANOI, HANOI, 8);
            c.source.destination_id = Some("hanoi".to_string());
            c
        };
        let pool: Vec<Candidate> = (0..8).map(|_| c.clone()).collect();
        let breakdown = score_candidate(&current_trip(), &c, &pool);
        assert_eq!(breakdown.total(), 100.0);
        assert_eq!(breakdown.reasons.len(), 4);
    }
}
