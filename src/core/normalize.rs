//! Coercion of raw listing and criteria fields into the canonical forms the
//! scorers compare.
//!
//! Nothing here fails: values that cannot be interpreted become "unknown"
//! (empty strings, `None`), which the scorers treat as neutral.

use crate::models::{MatchingCriteria, Property};

/// US state and territory names with their postal codes
const STATE_CODES: &[(&str, &str)] = &[
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("district of columbia", "DC"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
];

/// Labels that carry no building-type information
const PLACEHOLDER_TYPES: &[&str] = &["unknown", "n/a", "none"];

/// Trim and collapse inner whitespace
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical 2-letter state code; full state names are mapped to their code
pub fn normalize_state(state: &str) -> String {
    let cleaned = normalize_text(state);
    if cleaned.len() == 2 && cleaned.chars().all(|c| c.is_ascii_alphabetic()) {
        return cleaned.to_ascii_uppercase();
    }

    let lowered = cleaned.to_lowercase();
    STATE_CODES
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, code)| code.to_string())
        .unwrap_or_else(|| cleaned.to_uppercase())
}

/// Parse listing size text such as "1,000-45,000" or "5000 SF" into bounds
///
/// A single value is returned as both bounds. "N/A" and unparsable text give
/// `(None, None)`.
pub fn parse_square_footage(text: &str) -> (Option<u32>, Option<u32>) {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("n/a") {
        return (None, None);
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    match cleaned.split_once('-') {
        Some((low, high)) => (leading_integer(low), leading_integer(high)),
        None => {
            let value = leading_integer(&cleaned);
            (value, value)
        }
    }
}

fn leading_integer(text: &str) -> Option<u32> {
    let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Extract the first decimal number from rate text such as "$25.50/SF/YR"
pub fn parse_rate(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    if cleaned.trim().is_empty() || cleaned.trim().eq_ignore_ascii_case("n/a") {
        return None;
    }

    let start = cleaned.find(|c: char| c.is_ascii_digit())?;
    let mut seen_dot = false;
    let number: String = cleaned[start..]
        .chars()
        .take_while(|c| {
            if *c == '.' && !seen_dot {
                seen_dot = true;
                true
            } else {
                c.is_ascii_digit()
            }
        })
        .collect();

    number.trim_end_matches('.').parse().ok()
}

/// Split a building-type label on `, ; / |` into title-cased labels
pub fn parse_building_types(text: &str) -> Vec<String> {
    let mut types = Vec::new();
    for part in text.split(&[',', ';', '/', '|'][..]) {
        let label = title_case(&normalize_text(part));
        if label.is_empty() || PLACEHOLDER_TYPES.contains(&label.to_lowercase().as_str()) {
            continue;
        }
        if !types.iter().any(|t: &String| t.eq_ignore_ascii_case(&label)) {
            types.push(label);
        }
    }
    types
}

/// Clean a list of building-type labels, splitting any compound labels
pub fn clean_building_types(labels: &[String]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for label in labels {
        for parsed in parse_building_types(label) {
            if !types.iter().any(|t| t.eq_ignore_ascii_case(&parsed)) {
                types.push(parsed);
            }
        }
    }
    types
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Latitude in [-90, 90] and longitude in [-180, 180]
pub fn validate_coordinates(lat: f64, lng: f64) -> bool {
    lat.is_finite() && lng.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn ordered(min: Option<u32>, max: Option<u32>) -> (Option<u32>, Option<u32>) {
    match (min, max) {
        (Some(a), Some(b)) if a > b => (Some(b), Some(a)),
        other => other,
    }
}

/// Canonical copy of a property
pub fn normalize_property(property: &Property) -> Property {
    let mut normalized = property.clone();

    normalized.id = property.id.trim().to_string();
    normalized.address = normalize_text(&property.address);
    normalized.city = normalize_text(&property.city);
    normalized.state = normalize_state(&property.state);
    normalized.zip_code = normalize_text(&property.zip_code);
    normalized.building_types = clean_building_types(&property.building_types);

    let (mut min, mut max) = (property.square_footage_min, property.square_footage_max);
    if min.is_none() && max.is_none() {
        if let Some(text) = &property.square_footage {
            (min, max) = parse_square_footage(text);
        }
    }
    let (min, max) = match (min, max) {
        (Some(v), None) | (None, Some(v)) => (Some(v), Some(v)),
        bounds => ordered(bounds.0, bounds.1),
    };
    normalized.square_footage_min = min;
    normalized.square_footage_max = max;

    normalized.rate_per_sqft = positive(property.rate_per_sqft)
        .or_else(|| positive(property.rate_text.as_deref().and_then(parse_rate)));

    normalized.coordinates = property
        .coordinates
        .filter(|c| validate_coordinates(c.lat, c.lng));

    normalized.compliance = property
        .compliance
        .iter()
        .map(|(flag, passed)| (normalize_flag(flag), *passed))
        .filter(|(flag, _)| !flag.is_empty())
        .collect();

    normalized
}

/// Canonical copy of the matching criteria
pub fn normalize_criteria(criteria: &MatchingCriteria) -> MatchingCriteria {
    let mut normalized = criteria.clone();

    let location = &mut normalized.location;
    location.state = criteria
        .location
        .state
        .as_deref()
        .map(normalize_state)
        .filter(|s| !s.is_empty());
    location.city = criteria
        .location
        .city
        .as_deref()
        .map(normalize_text)
        .filter(|c| !c.is_empty());
    location.zip_codes = criteria
        .location
        .zip_codes
        .iter()
        .map(|z| normalize_text(z))
        .filter(|z| !z.is_empty())
        .collect();
    location.center = criteria
        .location
        .center
        .filter(|c| validate_coordinates(c.lat, c.lng));
    location.radius_km = positive(criteria.location.radius_km);

    let space = &mut normalized.space;
    (space.min_square_feet, space.max_square_feet) =
        ordered(criteria.space.min_square_feet, criteria.space.max_square_feet);
    space.preferred_square_feet = criteria.space.preferred_square_feet.filter(|p| *p > 0);

    normalized.building_type_preferences = clean_building_types(&criteria.building_type_preferences);
    normalized.max_rate_per_sqft = positive(criteria.max_rate_per_sqft);

    let mut required: Vec<String> = Vec::new();
    for flag in criteria.required_compliance.iter().map(|f| normalize_flag(f)) {
        if !flag.is_empty() && !required.contains(&flag) {
            required.push(flag);
        }
    }
    normalized.required_compliance = required;

    normalized
}

/// Compliance flag names compare case-insensitively
pub fn normalize_flag(flag: &str) -> String {
    normalize_text(flag).to_lowercase()
}
