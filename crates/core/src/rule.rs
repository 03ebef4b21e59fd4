//! Selector rules and their validation.
//!
//! A [`RuleSurface`] is the loosely-typed form a caller sends (a CSS query
//! plus optional `all`, `order` and `strip` flags). Validation turns it into
//! a [`Rule`] whose [`Cardinality`] is fixed once and never re-checked.
//!
//! # Example
//!
//! ```rust
//! use harvest_core::{Cardinality, Rule, RuleSurface};
//!
//! let rule = Rule::from_surface("items", &RuleSurface::new(".item").with_all(true)).unwrap();
//! assert_eq!(rule.cardinality(), Cardinality::All);
//!
//! let contradictory = RuleSurface::new(".item").with_all(true).with_order(2);
//! assert!(Rule::from_surface("items", &contradictory).is_err());
//! ```

use std::collections::BTreeMap;

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::{HarvestError, Result};

/// Named rule surfaces as they arrive from a caller, keyed by field name.
pub type RuleSurfaces = BTreeMap<String, RuleSurface>;

/// Caller-facing description of a single field.
///
/// `all` and `order` are mutually exclusive; `strip` defaults to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSurface {
    /// CSS selector expression.
    pub query: String,
    /// Take every match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<bool>,
    /// Take the match at this zero-based position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    /// Trim surrounding whitespace from extracted text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip: Option<bool>,
}

impl RuleSurface {
    /// Creates a surface that takes the first match of `query`.
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), all: None, order: None, strip: None }
    }

    /// Sets the `all` flag.
    pub fn with_all(mut self, all: bool) -> Self {
        self.all = Some(all);
        self
    }

    /// Sets the `order` index.
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Sets the `strip` flag.
    pub fn with_strip(mut self, strip: bool) -> Self {
        self.strip = Some(strip);
        self
    }
}

/// Which of the matched elements a rule extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// The first match in document order.
    First,
    /// Every match, in document order.
    All,
    /// The match at a zero-based position.
    Nth(usize),
}

impl Cardinality {
    /// Resolves the two optional surface flags into a single variant.
    ///
    /// `field` is only used for error reporting.
    pub fn resolve(field: &str, all: Option<bool>, order: Option<i64>) -> Result<Self> {
        match (all, order) {
            (Some(_), Some(_)) => Err(HarvestError::InvalidRule {
                field: field.to_string(),
                reason: "choose one of `all` or `order`".to_string(),
            }),
            (_, Some(index)) => usize::try_from(index).map(Cardinality::Nth).map_err(|_| {
                HarvestError::InvalidRule {
                    field: field.to_string(),
                    reason: format!("`order` must be zero or positive, got {}", index),
                }
            }),
            (Some(true), None) => Ok(Cardinality::All),
            (Some(false), None) | (None, None) => Ok(Cardinality::First),
        }
    }
}

/// A validated extraction rule for one field.
///
/// The selector is compiled during validation, so an invalid selector is
/// reported before any page is fetched.
#[derive(Debug, Clone)]
pub struct Rule {
    query: String,
    selector: Selector,
    cardinality: Cardinality,
    trim: bool,
}

impl Rule {
    /// Builds a rule from explicit parts.
    pub fn new(field: &str, query: &str, cardinality: Cardinality, trim: bool) -> Result<Self> {
        if query.trim().is_empty() {
            return Err(HarvestError::InvalidRule {
                field: field.to_string(),
                reason: "selector must not be empty".to_string(),
            });
        }

        let selector = Selector::parse(query).map_err(|e| HarvestError::InvalidSelector {
            field: field.to_string(),
            selector: query.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { query: query.to_string(), selector, cardinality, trim })
    }

    /// Validates a caller-supplied surface.
    pub fn from_surface(field: &str, surface: &RuleSurface) -> Result<Self> {
        let cardinality = Cardinality::resolve(field, surface.all, surface.order)?;
        Self::new(field, &surface.query, cardinality, surface.strip.unwrap_or(true))
    }

    /// The selector as written by the caller.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The compiled selector.
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn trim(&self) -> bool {
        self.trim
    }
}

/// A set of validated rules keyed by field name.
///
/// Iteration is ordered by field name, which keeps extraction output and
/// error reporting deterministic.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: BTreeMap<String, Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every surface, failing on the first invalid rule.
    pub fn from_surfaces(surfaces: &RuleSurfaces) -> Result<Self> {
        let mut rules = BTreeMap::new();
        for (field, surface) in surfaces {
            rules.insert(field.clone(), Rule::from_surface(field, surface)?);
        }
        Ok(Self { rules })
    }

    /// Adds or replaces the rule for `field`.
    pub fn insert(&mut self, field: impl Into<String>, rule: Rule) -> Option<Rule> {
        self.rules.insert(field.into(), rule)
    }

    pub fn get(&self, field: &str) -> Option<&Rule> {
        self.rules.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(field, rule)| (field.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
