use crate::core::distance::{distance, DistanceUnit};
use crate::models::{DimensionScore, LocationCriteria, LocationPoints, Property, SpaceCriteria};

/// Coarse building categories and the keywords that place a label in them
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("office", &["office", "professional", "medical", "executive", "coworking"]),
    ("retail", &["retail", "store", "shop", "restaurant", "showroom", "storefront"]),
    (
        "industrial",
        &["industrial", "warehouse", "manufacturing", "distribution", "flex", "logistics"],
    ),
    ("land", &["land", "lot", "acre", "vacant", "development"]),
];

/// Points per category shared by property and preferences
const CATEGORY_POINTS: f64 = 25.0;

/// Score when building types match at no level
const TYPE_FALLBACK_SCORE: f64 = 25.0;

/// Location score (0-100), an additive ledger rather than a weighted average
///
/// 1. State constraint not met: 0, nothing else considered
/// 2. State constraint met: +40
/// 3. City constraint: +30 on a substring match either way, -20 otherwise
/// 4. Center and radius: `+30 * (1 - d/r)` inside the radius, -10 outside
///
/// Criteria with no state, city or search area, or a property whose data
/// cannot answer any of them, score neutral 50.
pub fn score_location(
    property: &Property,
    criteria: &LocationCriteria,
    points: &LocationPoints,
) -> DimensionScore {
    let mut notes = zip_notes(property, criteria);

    if criteria.is_empty() {
        notes.insert(0, "no location requirement".to_string());
        return DimensionScore::new(50.0, notes);
    }

    let mut score = 0.0;
    let mut informed = false;

    if let Some(state) = &criteria.state {
        if property.state.is_empty() {
            notes.push(format!("state unknown, {} required", state));
        } else if !property.state.eq_ignore_ascii_case(state) {
            // Cross-state matches are never acceptable
            return DimensionScore::new(
                0.0,
                vec![format!("state {} does not match required {}", property.state, state)],
            );
        } else {
            score += points.state_match;
            informed = true;
            notes.push(format!("in required state {}", state));
        }
    }

    if let Some(city) = &criteria.city {
        if property.city.is_empty() {
            notes.push(format!("city unknown, {} requested", city));
        } else {
            let property_city = property.city.to_lowercase();
            let wanted = city.to_lowercase();
            informed = true;
            if property_city.contains(&wanted) || wanted.contains(&property_city) {
                score += points.city_match;
                notes.push(format!("city {} matches {}", property.city, city));
            } else {
                score -= points.city_mismatch_penalty;
                notes.push(format!("city {} is not {}", property.city, city));
            }
        }
    }

    if let Some((center, radius_km)) = criteria.search_area() {
        match property.coordinates {
            Some(coords) => {
                let distance_km = distance(center, coords, DistanceUnit::Km);
                informed = true;
                if distance_km <= radius_km {
                    score += points.radius_bonus * (1.0 - distance_km / radius_km);
                    notes.push(format!(
                        "{:.1} km from search center, within {:.1} km radius",
                        distance_km, radius_km
                    ));
                } else {
                    score -= points.outside_radius_penalty;
                    notes.push(format!(
                        "{:.1} km from search center, outside {:.1} km radius",
                        distance_km, radius_km
                    ));
                }
            }
            None => notes.push("no coordinates, search radius not applied".to_string()),
        }
    }

    if !informed {
        return DimensionScore::new(50.0, notes);
    }

    DimensionScore::new(score, notes)
}

fn zip_notes(property: &Property, criteria: &LocationCriteria) -> Vec<String> {
    if criteria.zip_codes.is_empty() || property.zip_code.is_empty() {
        return Vec::new();
    }
    if criteria.zip_codes.iter().any(|z| *z == property.zip_code) {
        vec![format!("zip code {} is a requested zip code", property.zip_code)]
    } else {
        vec![format!("zip code {} is not a requested zip code", property.zip_code)]
    }
}

/// Size score (0-100)
///
/// - Preferred size: 100 within `tolerance` of the property midpoint, then a
///   linear decay reaching 0 at a relative gap of 100%
/// - Min and max: share of the required range covered by the property range,
///   so a single-size listing covers none of a non-empty range; a single
///   required size scores 100 when the property range contains it, else 0
/// - Only one bound: 100 when the property can satisfy it, else the ratio
/// - No size requirement or unknown property size: neutral 50
pub fn score_size(property: &Property, space: &SpaceCriteria, tolerance: f64) -> DimensionScore {
    if space.preferred_square_feet.is_none()
        && space.min_square_feet.is_none()
        && space.max_square_feet.is_none()
    {
        return DimensionScore::neutral("no size requirement");
    }

    let Some((property_min, property_max)) = property.size_range() else {
        return DimensionScore::neutral("property size unknown");
    };
    let (pmin, pmax) = (property_min as f64, property_max as f64);

    if let Some(preferred) = space.preferred_square_feet {
        let preferred = preferred as f64;
        let midpoint = (pmin + pmax) / 2.0;
        let gap = (midpoint - preferred).abs() / preferred;

        let score = if gap <= tolerance {
            100.0
        } else {
            let span = (1.0 - tolerance).max(f64::EPSILON);
            100.0 * (1.0 - (gap - tolerance) / span)
        };

        return DimensionScore::new(
            score,
            vec![format!(
                "{:.0} sq ft is {:.0}% from preferred {:.0} sq ft",
                midpoint,
                gap * 100.0,
                preferred
            )],
        );
    }

    match (space.min_square_feet, space.max_square_feet) {
        (Some(required_min), Some(required_max)) => {
            let (cmin, cmax) = (required_min as f64, required_max as f64);
            let score = if required_min == required_max {
                contains(pmin, pmax, cmin)
            } else {
                let overlap = (pmax.min(cmax) - pmin.max(cmin)).max(0.0);
                100.0 * overlap / (cmax - cmin)
            };
            let note = if pmax >= cmin && pmin <= cmax {
                format!(
                    "{} sq ft covers {:.0}% of required {}-{} sq ft",
                    describe_range(property_min, property_max),
                    score,
                    required_min,
                    required_max
                )
            } else {
                format!(
                    "{} sq ft does not overlap required {}-{} sq ft",
                    describe_range(property_min, property_max),
                    required_min,
                    required_max
                )
            };
            DimensionScore::new(score, vec![note])
        }
        (Some(required_min), None) => {
            let score = if property_max >= required_min {
                100.0
            } else {
                100.0 * pmax / required_min as f64
            };
            DimensionScore::new(
                score,
                vec![format!(
                    "{} sq ft against minimum {} sq ft",
                    describe_range(property_min, property_max),
                    required_min
                )],
            )
        }
        (None, Some(required_max)) => {
            let score = if property_min <= required_max {
                100.0
            } else {
                100.0 * required_max as f64 / pmin
            };
            DimensionScore::new(
                score,
                vec![format!(
                    "{} sq ft against maximum {} sq ft",
                    describe_range(property_min, property_max),
                    required_max
                )],
            )
        }
        (None, None) => DimensionScore::neutral("no size requirement"),
    }
}

#[inline]
fn contains(low: f64, high: f64, value: f64) -> f64 {
    if low <= value && value <= high {
        100.0
    } else {
        0.0
    }
}

fn describe_range(min: u32, max: u32) -> String {
    if min == max {
        min.to_string()
    } else {
        format!("{}-{}", min, max)
    }
}

/// Building-type score (0-100)
///
/// Direct matches (case-insensitive substring either way) score the share of
/// preferences matched. Failing that, every coarse category shared by the
/// property and the preferences adds 25. No match at any level scores 25.
pub fn score_building_type(property: &Property, preferences: &[String]) -> DimensionScore {
    if preferences.is_empty() {
        return DimensionScore::neutral("no building type preference");
    }

    let matched: Vec<&String> = preferences
        .iter()
        .filter(|pref| property.building_types.iter().any(|t| labels_overlap(t, pref)))
        .collect();

    if !matched.is_empty() {
        let score = 100.0 * matched.len() as f64 / preferences.len() as f64;
        let names: Vec<&str> = matched.iter().map(|m| m.as_str()).collect();
        return DimensionScore::new(score, vec![format!("building type matches {}", names.join(", "))]);
    }

    let property_categories = categories(&property.building_types);
    let wanted_categories = categories(preferences);
    let shared: Vec<&str> = property_categories
        .into_iter()
        .filter(|c| wanted_categories.contains(c))
        .collect();

    if !shared.is_empty() {
        let score = (CATEGORY_POINTS * shared.len() as f64).min(100.0);
        return DimensionScore::new(
            score,
            vec![format!("same building category: {}", shared.join(", "))],
        );
    }

    let note = if property.building_types.is_empty() {
        "building type unknown".to_string()
    } else {
        format!(
            "building type {} not among preferred {}",
            property.building_types.join(", "),
            preferences.join(", ")
        )
    };
    DimensionScore::new(TYPE_FALLBACK_SCORE, vec![note])
}

fn labels_overlap(a: &str, b: &str) -> bool {
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

/// Coarse categories named by any of the labels, in table order
fn categories(labels: &[String]) -> Vec<&'static str> {
    let lowered: Vec<String> = labels.iter().map(|l| l.to_lowercase()).collect();
    CATEGORY_KEYWORDS
        .iter()
        .filter(|(_, keywords)| {
            lowered
                .iter()
                .any(|label| keywords.iter().any(|k| label.contains(k)))
        })
        .map(|(category, _)| *category)
        .collect()
}

/// Financial score (0-100)
///
/// Under budget: `70 + 30 * (budget - rate) / budget`, capped at 100.
/// Over budget: `50 - 50 * (rate - budget) / budget`, floored at 0.
/// Missing rate or budget: neutral 50.
pub fn score_financial(rate_per_sqft: Option<f64>, max_rate_per_sqft: Option<f64>) -> DimensionScore {
    let (rate, budget) = match (rate_per_sqft, max_rate_per_sqft) {
        (Some(rate), Some(budget)) if budget > 0.0 => (rate, budget),
        (None, Some(_)) => return DimensionScore::neutral("rate unknown"),
        _ => return DimensionScore::neutral("no budget limit"),
    };

    if rate <= budget {
        let savings = (budget - rate) / budget;
        DimensionScore::new(
            (70.0 + 30.0 * savings).min(100.0),
            vec![format!(
                "${:.2}/sq ft is {:.0}% under budget ${:.2}",
                rate,
                savings * 100.0,
                budget
            )],
        )
    } else {
        let overage = (rate - budget) / budget;
        DimensionScore::new(
            (50.0 - 50.0 * overage).max(0.0),
            vec![format!(
                "${:.2}/sq ft is {:.0}% over budget ${:.2}",
                rate,
                overage * 100.0,
                budget
            )],
        )
    }
}

/// Compliance score (0-100)
///
/// Considers the required flags, or every flag the property carries when
/// none are required. Score is the share of known flags that pass; a flag
/// the property does not report is unknown, not failing.
pub fn score_compliance(property: &Property, required: &[String]) -> DimensionScore {
    let considered: Vec<(&str, Option<bool>)> = if required.is_empty() {
        property
            .compliance
            .iter()
            .map(|(flag, passed)| (flag.as_str(), Some(*passed)))
            .collect()
    } else {
        required
            .iter()
            .map(|flag| (flag.as_str(), property.compliance.get(flag).copied()))
            .collect()
    };

    let known: Vec<(&str, bool)> = considered
        .iter()
        .filter_map(|(flag, passed)| (*passed).map(|p| (*flag, p)))
        .collect();

    if known.is_empty() {
        return DimensionScore::neutral("no compliance data");
    }

    let passing = known.iter().filter(|(_, passed)| *passed).count();
    let score = 100.0 * passing as f64 / known.len() as f64;

    let mut notes = vec![format!("{} of {} compliance checks pass", passing, known.len())];
    let failed: Vec<&str> = known.iter().filter(|(_, p)| !*p).map(|(f, _)| *f).collect();
    if !failed.is_empty() {
        notes.push(format!("failing: {}", failed.join(", ")));
    }
    let unknown: Vec<&str> = considered
        .iter()
        .filter(|(_, passed)| passed.is_none())
        .map(|(flag, _)| *flag)
        .collect();
    if !unknown.is_empty() {
        notes.push(format!("not reported: {}", unknown.join(", ")));
    }

    DimensionScore::new(score, notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;

    fn office_in_new_york() -> Property {
        let mut property = Property::new("p1");
        property.city = "New York".to_string();
        property.state = "NY".to_string();
        property.zip_code = "10001".to_string();
        property.building_types = vec!["Office".to_string()];
        property.square_footage_min = Some(5000);
        property.square_footage_max = Some(8000);
        property.rate_per_sqft = Some(40.0);
        property.coordinates = Some(Coordinates::new(40.7506, -73.9972));
        property
    }

    fn location(state: Option<&str>, city: Option<&str>) -> LocationCriteria {
        LocationCriteria {
            state: state.map(str::to_string),
            city: city.map(str::to_string),
            ..LocationCriteria::default()
        }
    }

    #[test]
    fn test_state_mismatch_is_absolute() {
        let property = office_in_new_york();
        let mut criteria = location(Some("CA"), Some("New York"));
        criteria.center = property.coordinates;
        criteria.radius_km = Some(10.0);

        let result = score_location(&property, &criteria, &LocationPoints::default());
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_state_and_city_match() {
        let property = office_in_new_york();
        let criteria = location(Some("ny"), Some("new york"));

        let result = score_location(&property, &criteria, &LocationPoints::default());
        assert_eq!(result.score, 70.0);
    }

    #[test]
    fn test_city_substring_match_either_direction() {
        let mut property = office_in_new_york();
        property.city = "New York City".to_string();
        let criteria = location(None, Some("New York"));

        let result = score_location(&property, &criteria, &LocationPoints::default());
        assert_eq!(result.score, 30.0);
    }

    #[test]
    fn test_city_mismatch_penalty_clamps_at_zero() {
        let mut property = office_in_new_york();
        property.city = "Buffalo".to_string();
        let criteria = location(None, Some("New York"));

        let result = score_location(&property, &criteria, &LocationPoints::default());
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_radius_bonus_decays_with_distance() {
        let property = office_in_new_york();
        let mut at_center = location(Some("NY"), None);
        at_center.center = property.coordinates;
        at_center.radius_km = Some(20.0);

        let result = score_location(&property, &at_center, &LocationPoints::default());
        assert_eq!(result.score, 70.0);

        let mut farther = at_center.clone();
        farther.center = Some(Coordinates::new(40.6782, -73.9442));
        let result = score_location(&property, &farther, &LocationPoints::default());
        assert!(result.score > 40.0 && result.score < 70.0, "got {}", result.score);
    }

    #[test]
    fn test_property_on_radius_edge_is_inside() {
        let property = office_in_new_york();
        let center = Coordinates::new(40.6782, -73.9442);
        let edge = distance(center, property.coordinates.unwrap(), DistanceUnit::Km);

        let mut criteria = location(Some("NY"), None);
        criteria.center = Some(center);
        criteria.radius_km = Some(edge);

        let result = score_location(&property, &criteria, &LocationPoints::default());
        assert_eq!(result.score, 40.0, "edge earns a zero bonus, not the outside penalty");
        assert!(result.notes.iter().any(|n| n.contains("within")));
    }

    #[test]
    fn test_outside_radius_penalty() {
        let property = office_in_new_york();
        let mut criteria = location(Some("NY"), None);
        criteria.center = Some(Coordinates::new(42.6526, -73.7562)); // Albany
        criteria.radius_km = Some(50.0);

        let result = score_location(&property, &criteria, &LocationPoints::default());
        assert_eq!(result.score, 30.0);
    }

    #[test]
    fn test_location_neutral_without_constraints() {
        let property = office_in_new_york();
        let result = score_location(&property, &LocationCriteria::default(), &LocationPoints::default());
        assert_eq!(result.score, 50.0);
    }

    #[test]
    fn test_location_neutral_when_property_cannot_answer() {
        let property = Property::new("bare");
        let mut criteria = location(Some("NY"), Some("New York"));
        criteria.center = Some(Coordinates::new(40.7, -74.0));
        criteria.radius_km = Some(10.0);

        let result = score_location(&property, &criteria, &LocationPoints::default());
        assert_eq!(result.score, 50.0);
    }

    #[test]
    fn test_zip_codes_only_add_notes() {
        let property = office_in_new_york();
        let mut criteria = location(Some("NY"), None);
        criteria.zip_codes = vec!["10001".to_string()];

        let result = score_location(&property, &criteria, &LocationPoints::default());
        assert_eq!(result.score, 40.0);
        assert!(result.notes.iter().any(|n| n.contains("10001")));
    }

    fn space(min: Option<u32>, max: Option<u32>, preferred: Option<u32>) -> SpaceCriteria {
        SpaceCriteria {
            min_square_feet: min,
            max_square_feet: max,
            preferred_square_feet: preferred,
        }
    }

    #[test]
    fn test_size_identical_range_scores_100() {
        let property = office_in_new_york();
        let result = score_size(&property, &space(Some(5000), Some(8000), None), 0.2);
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_size_no_overlap_scores_zero() {
        let mut property = office_in_new_york();
        property.square_footage_min = Some(1000);
        property.square_footage_max = Some(2000);

        let result = score_size(&property, &space(Some(5000), Some(8000), None), 0.2);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_size_partial_overlap() {
        let mut property = office_in_new_york();
        property.square_footage_min = Some(6500);
        property.square_footage_max = Some(12000);

        let result = score_size(&property, &space(Some(5000), Some(8000), None), 0.2);
        assert!((result.score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_size_coverage_continuous_for_narrow_listings() {
        let required = space(Some(5000), Some(8000), None);
        let sized = |min: u32, max: u32| {
            let mut property = office_in_new_york();
            property.square_footage_min = Some(min);
            property.square_footage_max = Some(max);
            score_size(&property, &required, 0.2)
        };

        let single = sized(6000, 6000);
        let one_wider = sized(6000, 6001);
        assert_eq!(single.score, 0.0);
        assert!((one_wider.score - 100.0 / 3000.0).abs() < 1e-9, "got {}", one_wider.score);
        assert!(single.notes[0].contains("covers 0%"), "got {:?}", single.notes);

        assert!((sized(5500, 6500).score - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(sized(4000, 9000).score, 100.0);
    }

    #[test]
    fn test_single_required_size() {
        let property = office_in_new_york();
        assert_eq!(score_size(&property, &space(Some(6000), Some(6000), None), 0.2).score, 100.0);
        assert_eq!(score_size(&property, &space(Some(9000), Some(9000), None), 0.2).score, 0.0);
    }

    #[test]
    fn test_preferred_size_tolerance_and_decay() {
        let property = office_in_new_york(); // midpoint 6500

        let within = score_size(&property, &space(None, None, Some(6000)), 0.2);
        assert_eq!(within.score, 100.0);

        // gap 0.625, decays to 100 * (1 - 0.425 / 0.8)
        let decayed = score_size(&property, &space(None, None, Some(4000)), 0.2);
        assert!((decayed.score - 46.875).abs() < 1e-9, "got {}", decayed.score);

        let far = score_size(&property, &space(None, None, Some(1000)), 0.2);
        assert_eq!(far.score, 0.0);
    }

    #[test]
    fn test_size_single_bound() {
        let property = office_in_new_york();

        assert_eq!(score_size(&property, &space(Some(7000), None, None), 0.2).score, 100.0);
        assert_eq!(score_size(&property, &space(Some(16000), None, None), 0.2).score, 50.0);
        assert_eq!(score_size(&property, &space(None, Some(2500), None), 0.2).score, 50.0);
    }

    #[test]
    fn test_size_neutral_cases() {
        let property = office_in_new_york();
        assert_eq!(score_size(&property, &SpaceCriteria::default(), 0.2).score, 50.0);

        let bare = Property::new("bare");
        assert_eq!(score_size(&bare, &space(Some(5000), Some(8000), None), 0.2).score, 50.0);
    }

    #[test]
    fn test_building_type_direct_match() {
        let property = office_in_new_york();
        let prefs = vec!["Office".to_string(), "Retail".to_string()];

        let result = score_building_type(&property, &prefs);
        assert_eq!(result.score, 50.0);

        let result = score_building_type(&property, &["office".to_string()]);
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_building_type_category_fallback() {
        let mut property = office_in_new_york();
        property.building_types = vec!["Warehouse".to_string()];

        let result = score_building_type(&property, &["Distribution Center".to_string()]);
        assert_eq!(result.score, 25.0);

        property.building_types = vec!["Medical".to_string(), "Showroom".to_string()];
        let result = score_building_type(
            &property,
            &["Executive Suites".to_string(), "Storefront".to_string()],
        );
        assert_eq!(result.score, 50.0);
    }

    #[test]
    fn test_building_type_no_match_defaults_to_25() {
        let mut property = office_in_new_york();
        property.building_types = vec!["Hospitality".to_string()];

        let result = score_building_type(&property, &["Industrial".to_string()]);
        assert_eq!(result.score, 25.0);

        assert_eq!(score_building_type(&property, &[]).score, 50.0);
    }

    #[test]
    fn test_financial_scores() {
        assert_eq!(score_financial(Some(40.0), Some(50.0)).score, 76.0);
        assert_eq!(score_financial(Some(50.0), Some(50.0)).score, 70.0);
        assert_eq!(score_financial(Some(60.0), Some(50.0)).score, 40.0);
        assert_eq!(score_financial(Some(200.0), Some(50.0)).score, 0.0);
        assert_eq!(score_financial(None, Some(50.0)).score, 50.0);
        assert_eq!(score_financial(Some(40.0), None).score, 50.0);
    }

    #[test]
    fn test_compliance_scores() {
        let mut property = office_in_new_york();
        assert_eq!(score_compliance(&property, &[]).score, 50.0);

        property.compliance.insert("ada".to_string(), true);
        property.compliance.insert("fire_code".to_string(), false);
        assert_eq!(score_compliance(&property, &[]).score, 50.0);

        let required = vec!["ada".to_string(), "flood_zone".to_string()];
        let result = score_compliance(&property, &required);
        assert_eq!(result.score, 100.0);
        assert!(result.notes.iter().any(|n| n.contains("flood_zone")));
    }
}
