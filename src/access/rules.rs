//! # Implied Access Rules
//!
//! When a segment carries no explicit `<mode>=*` tag, access is inferred
//! from other tags. Each mode has two ordered rule lists: tags that imply
//! the mode is allowed, and tags that imply it is not.
//!
//! The tables are built once and shared for the life of the process.

use std::sync::OnceLock;

use super::expr::Expr;
use super::mode::TravelMode;

/// Values that deny access when used on `access` or `<mode>` keys.
pub const DENY_VALUES: [&str; 3] = ["no", "private", "discouraged"];

/// Smoothness grades that a wheelchair can be expected to handle.
const WHEELCHAIR_SMOOTHNESS: [&str; 4] = ["excellent", "very_good", "good", "intermediate"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    pub implied_yes: Vec<Expr>,
    pub implied_no: Vec<Expr>,
}

#[derive(Debug)]
struct RuleBook {
    atv: RuleTable,
    bicycle: RuleTable,
    foot: RuleTable,
    horse: RuleTable,
    wheelchair: RuleTable,
    empty: RuleTable,
}

static RULES: OnceLock<RuleBook> = OnceLock::new();

/// Returns the rule table for `mode`. Modes without conventions get an
/// empty table.
pub fn rules_for(mode: TravelMode) -> &'static RuleTable {
    let book = RULES.get_or_init(build_rule_book);
    match mode {
        TravelMode::Atv => &book.atv,
        TravelMode::Bicycle => &book.bicycle,
        TravelMode::Foot => &book.foot,
        TravelMode::Horse => &book.horse,
        TravelMode::Wheelchair => &book.wheelchair,
        TravelMode::Canoe | TravelMode::Snowmobile | TravelMode::Unknown => &book.empty,
    }
}

fn highways(values: &[&str]) -> Vec<Expr> {
    values.iter().map(|v| Expr::eq("highway", v)).collect()
}

fn denied(key: &str) -> Vec<Expr> {
    DENY_VALUES.iter().map(|v| Expr::eq(key, v)).collect()
}

fn build_rule_book() -> RuleBook {
    let atv = RuleTable {
        implied_yes: highways(&["track"]),
        implied_no: vec![Expr::Any(
            highways(&["footway", "steps"])
                .into_iter()
                .chain(denied("vehicle"))
                .chain(denied("motor_vehicle"))
                .collect(),
        )],
    };

    let bicycle = RuleTable {
        implied_yes: highways(&["path", "cycleway", "bridleway", "track"]),
        implied_no: vec![Expr::Any(
            std::iter::once(Expr::All(vec![
                Expr::eq("highway", "steps"),
                Expr::ne("ramp:bicycle", "yes"),
            ]))
            .chain(denied("vehicle"))
            .collect(),
        )],
    };

    let foot = RuleTable {
        implied_yes: highways(&["path", "footway", "steps", "bridleway", "track"]),
        implied_no: vec![],
    };

    let horse = RuleTable {
        implied_yes: highways(&["bridleway", "track"]),
        implied_no: highways(&["steps"]),
    };

    let mut rough_surface = vec![Expr::has("smoothness")];
    rough_surface.extend(WHEELCHAIR_SMOOTHNESS.iter().map(|v| Expr::ne("smoothness", v)));

    let wheelchair = RuleTable {
        implied_yes: WHEELCHAIR_SMOOTHNESS
            .iter()
            .map(|v| Expr::eq("smoothness", v))
            .collect(),
        implied_no: vec![Expr::Any(vec![
            Expr::eq("highway", "steps"),
            Expr::All(vec![Expr::has("sac_scale"), Expr::ne("sac_scale", "hiking")]),
            Expr::All(rough_surface),
        ])],
    };

    RuleBook {
        atv,
        bicycle,
        foot,
        horse,
        wheelchair,
        empty: RuleTable::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::expr::tags;

    fn any_match(rules: &[Expr], pairs: &[(&str, &str)]) -> bool {
        let t = tags(pairs);
        rules.iter().any(|r| r.matches(&t))
    }

    #[test]
    fn test_foot_has_no_implied_no_rules() {
        assert!(rules_for(TravelMode::Foot).implied_no.is_empty());
        assert!(any_match(&rules_for(TravelMode::Foot).implied_yes, &[("highway", "steps")]));
    }

    #[test]
    fn test_bicycle_steps_with_ramp_not_implied_no() {
        let no = &rules_for(TravelMode::Bicycle).implied_no;
        assert!(any_match(no, &[("highway", "steps")]));
        assert!(!any_match(no, &[("highway", "steps"), ("ramp:bicycle", "yes")]));
        assert!(any_match(no, &[("highway", "path"), ("vehicle", "private")]));
    }

    #[test]
    fn test_atv_motor_vehicle_restrictions() {
        let no = &rules_for(TravelMode::Atv).implied_no;
        assert!(any_match(no, &[("motor_vehicle", "discouraged")]));
        assert!(!any_match(no, &[("highway", "track")]));
    }

    #[test]
    fn test_wheelchair_rough_surface_and_sac_scale() {
        let no = &rules_for(TravelMode::Wheelchair).implied_no;
        assert!(any_match(no, &[("smoothness", "bad")]));
        assert!(!any_match(no, &[("smoothness", "good")]));
        assert!(any_match(no, &[("sac_scale", "mountain_hiking")]));
        assert!(!any_match(no, &[("sac_scale", "hiking")]));
    }

    #[test]
    fn test_modes_without_conventions_are_empty() {
        for mode in [TravelMode::Canoe, TravelMode::Snowmobile, TravelMode::Unknown] {
            assert_eq!(rules_for(mode), &RuleTable::default());
        }
    }
}
