use crate::models::{MatchingCriteria, Property};

/// Required compliance flags the property explicitly fails
///
/// A required flag the property does not report is not a deal-breaker; only
/// an explicit `false` is.
#[inline]
pub fn compliance_deal_breakers(property: &Property, criteria: &MatchingCriteria) -> Vec<String> {
    criteria
        .required_compliance
        .iter()
        .filter(|flag| property.compliance.get(*flag) == Some(&false))
        .map(|flag| format!("Required compliance check failed: {}", flag))
        .collect()
}

/// Check an overall score against the minimum relevance score
#[inline]
pub fn meets_minimum_score(overall_score: u8, min_score: u8) -> bool {
    overall_score >= min_score
}

/// Minimum score for a run: explicit value, then the criteria's own
/// threshold, then the mode default
#[inline]
pub fn resolve_min_score(explicit: Option<u8>, criteria: &MatchingCriteria, default: u8) -> u8 {
    explicit
        .or(criteria.minimum_relevance_score)
        .unwrap_or(default)
        .min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property_with_flags(flags: &[(&str, bool)]) -> Property {
        let mut property = Property::new("p1");
        for (flag, passed) in flags {
            property.compliance.insert(flag.to_string(), *passed);
        }
        property
    }

    fn criteria_requiring(flags: &[&str]) -> MatchingCriteria {
        MatchingCriteria {
            required_compliance: flags.iter().map(|f| f.to_string()).collect(),
            ..MatchingCriteria::default()
        }
    }

    #[test]
    fn test_failed_required_flag_is_deal_breaker() {
        let property = property_with_flags(&[("ada", true), ("fire_code", false)]);
        let criteria = criteria_requiring(&["ada", "fire_code"]);

        let reasons = compliance_deal_breakers(&property, &criteria);
        assert_eq!(reasons, vec!["Required compliance check failed: fire_code"]);
    }

    #[test]
    fn test_missing_required_flag_is_not_deal_breaker() {
        let property = property_with_flags(&[("ada", true)]);
        let criteria = criteria_requiring(&["ada", "flood_zone"]);

        assert!(compliance_deal_breakers(&property, &criteria).is_empty());
    }

    #[test]
    fn test_unrequired_failures_are_ignored() {
        let property = property_with_flags(&[("parking", false)]);
        let criteria = criteria_requiring(&[]);

        assert!(compliance_deal_breakers(&property, &criteria).is_empty());
    }

    #[test]
    fn test_minimum_score_inclusive() {
        assert!(meets_minimum_score(70, 70));
        assert!(!meets_minimum_score(69, 70));
    }

    #[test]
    fn test_resolve_min_score_precedence() {
        let mut criteria = MatchingCriteria::default();
        assert_eq!(resolve_min_score(None, &criteria, 30), 30);

        criteria.minimum_relevance_score = Some(55);
        assert_eq!(resolve_min_score(None, &criteria, 30), 55);
        assert_eq!(resolve_min_score(Some(10), &criteria, 30), 10);
    }
}
