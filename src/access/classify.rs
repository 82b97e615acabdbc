//! # Access Classification
//!
//! Compiles a travel mode's tagging conventions into six predicates, one
//! per rendering category. For any tag set exactly one of them holds.
//!
//! ```text
//!                 informal != yes        informal == yes
//!  allowed        AllowedFormal          AllowedInformal
//!  disallowed     DisallowedFormal       DisallowedInformal
//!  unspecified    UnspecifiedFormal      UnspecifiedInformal
//! ```
//!
//! Unspecified is decided first: a segment that matches it is never
//! allowed or disallowed.

use std::fmt;

use super::expr::{Expr, TagSet};
use super::mode::TravelMode;
use super::rules::{DENY_VALUES, rules_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    AllowedFormal,
    DisallowedFormal,
    UnspecifiedFormal,
    AllowedInformal,
    DisallowedInformal,
    UnspecifiedInformal,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::AllowedFormal,
        Category::DisallowedFormal,
        Category::UnspecifiedFormal,
        Category::AllowedInformal,
        Category::DisallowedInformal,
        Category::UnspecifiedInformal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::AllowedFormal => "allowed",
            Category::DisallowedFormal => "disallowed",
            Category::UnspecifiedFormal => "unspecified",
            Category::AllowedInformal => "allowed (informal)",
            Category::DisallowedInformal => "disallowed (informal)",
            Category::UnspecifiedInformal => "unspecified (informal)",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The six category predicates for one travel mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPredicates {
    pub mode: TravelMode,
    pub allowed_formal: Expr,
    pub disallowed_formal: Expr,
    pub unspecified_formal: Expr,
    pub allowed_informal: Expr,
    pub disallowed_informal: Expr,
    pub unspecified_informal: Expr,
}

impl CategoryPredicates {
    pub fn get(&self, category: Category) -> &Expr {
        match category {
            Category::AllowedFormal => &self.allowed_formal,
            Category::DisallowedFormal => &self.disallowed_formal,
            Category::UnspecifiedFormal => &self.unspecified_formal,
            Category::AllowedInformal => &self.allowed_informal,
            Category::DisallowedInformal => &self.disallowed_informal,
            Category::UnspecifiedInformal => &self.unspecified_informal,
        }
    }

    /// All categories whose predicate holds for `tags`. Always exactly one.
    pub fn matching(&self, tags: &TagSet) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.get(*c).matches(tags))
            .collect()
    }

    /// The category a segment with `tags` is rendered in.
    pub fn categorize(&self, tags: &TagSet) -> Category {
        let matching = self.matching(tags);
        debug_assert_eq!(matching.len(), 1, "categories overlap or leave a gap: {matching:?}");
        matching[0]
    }
}

/// Values of the mode key itself that deny access. `limited` wheelchair
/// access is not full access.
fn mode_deny_values(mode: TravelMode) -> Vec<&'static str> {
    let mut values = DENY_VALUES.to_vec();
    if mode == TravelMode::Wheelchair {
        values.push("limited");
    }
    values
}

fn unspecified_expr(mode: TravelMode) -> Expr {
    let Some(key) = mode.key() else {
        return Expr::All(vec![]);
    };
    let rules = rules_for(mode);

    let mut no_explicit_access = vec![Expr::lacks(key)];
    no_explicit_access.push(Expr::none_of("access", &DENY_VALUES));
    no_explicit_access.push(Expr::None(
        rules
            .implied_yes
            .iter()
            .chain(rules.implied_no.iter())
            .cloned()
            .collect(),
    ));

    Expr::Any(vec![Expr::All(no_explicit_access), Expr::eq(key, "unknown")])
}

fn allowed_expr(mode: TravelMode) -> Expr {
    let Some(key) = mode.key() else {
        return Expr::Any(vec![]);
    };
    let rules = rules_for(mode);

    let general = Expr::All(vec![Expr::lacks(key), Expr::none_of("access", &DENY_VALUES)]);
    let explicit = Expr::All(vec![Expr::has(key), Expr::none_of(key, &mode_deny_values(mode))]);
    let mut clauses = vec![Expr::Any(vec![general, explicit])];

    if !rules.implied_no.is_empty() {
        clauses.push(Expr::Any(vec![
            Expr::has(key),
            Expr::None(rules.implied_no.clone()),
        ]));
    }

    Expr::All(clauses)
}

/// Builds the category predicates for `mode`.
pub fn classify(mode: TravelMode) -> CategoryPredicates {
    let unspecified = unspecified_expr(mode);
    let allowed = allowed_expr(mode);
    let formal = Expr::ne("informal", "yes");
    let informal = Expr::eq("informal", "yes");

    let allowed_in = |split: &Expr| {
        Expr::All(vec![allowed.clone(), unspecified.clone().not(), split.clone()])
    };
    let disallowed_in = |split: &Expr| {
        Expr::All(vec![allowed.clone().not(), unspecified.clone().not(), split.clone()])
    };
    let unspecified_in = |split: &Expr| Expr::All(vec![unspecified.clone(), split.clone()]);

    CategoryPredicates {
        mode,
        allowed_formal: allowed_in(&formal),
        disallowed_formal: disallowed_in(&formal),
        unspecified_formal: unspecified_in(&formal),
        allowed_informal: allowed_in(&informal),
        disallowed_informal: disallowed_in(&informal),
        unspecified_informal: unspecified_in(&informal),
    }
}
