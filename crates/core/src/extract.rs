//! The extraction engine.
//!
//! [`evaluate`] applies every rule of a [`RuleSet`] to a [`Document`] and
//! records one outcome per field. Fields never influence each other: a field
//! whose `order` index is out of range still lets every other field be
//! computed. [`Extraction::into_data`] then fails the whole extraction if any
//! field failed.
//!
//! # Example
//!
//! ```rust
//! use harvest_core::{Document, FieldValue, RuleSet, RuleSurface, RuleSurfaces, extract_fields};
//!
//! let doc = Document::parse(r#"<h1>Hello</h1><li class="item">a</li><li class="item">b</li>"#);
//!
//! let mut surfaces = RuleSurfaces::new();
//! surfaces.insert("title".into(), RuleSurface::new("h1"));
//! surfaces.insert("items".into(), RuleSurface::new(".item").with_all(true));
//! surfaces.insert("missing".into(), RuleSurface::new(".missing"));
//! let rules = RuleSet::from_surfaces(&surfaces).unwrap();
//!
//! let data = extract_fields(&doc, &rules).unwrap();
//! assert_eq!(data["title"], FieldValue::Text("Hello".into()));
//! assert_eq!(data["items"], FieldValue::List(vec!["a".into(), "b".into()]));
//! assert_eq!(data["missing"], FieldValue::Null);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::parse::Document;
use crate::rule::{Cardinality, Rule, RuleSet};
use crate::{HarvestError, Result};

/// Extracted value of a single field.
///
/// Serializes to JSON `null`, a string, or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// The selector matched nothing.
    Null,
    /// Text of a single match.
    Text(String),
    /// Text of every match, in document order.
    List(Vec<String>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

/// Successfully extracted fields, keyed by field name.
pub type ExtractedData = BTreeMap<String, FieldValue>;

/// Per-field outcomes of one evaluation.
#[derive(Debug, Default)]
pub struct Extraction {
    fields: BTreeMap<String, Result<FieldValue>>,
}

impl Extraction {
    /// Outcome for `field`, if the rule set contained it.
    pub fn get(&self, field: &str) -> Option<&Result<FieldValue>> {
        self.fields.get(field)
    }

    /// Every field outcome, ordered by field name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Result<FieldValue>)> {
        self.fields.iter().map(|(field, outcome)| (field.as_str(), outcome))
    }

    /// Errors of the fields that failed, ordered by field name.
    pub fn errors(&self) -> impl Iterator<Item = &HarvestError> {
        self.fields.values().filter_map(|outcome| outcome.as_ref().err())
    }

    /// True when no field failed.
    pub fn is_complete(&self) -> bool {
        self.fields.values().all(|outcome| outcome.is_ok())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Collapses the outcomes into plain data.
    ///
    /// Fails with the first field error in field-name order.
    pub fn into_data(self) -> Result<ExtractedData> {
        self.fields
            .into_iter()
            .map(|(field, outcome)| outcome.map(|value| (field, value)))
            .collect()
    }
}

/// Applies one rule to a document.
///
/// A selector with no match yields [`FieldValue::Null`] whatever the
/// cardinality. An `Nth` index past the last match is
/// [`HarvestError::IndexOutOfRange`].
pub fn evaluate_rule(doc: &Document, field: &str, rule: &Rule) -> Result<FieldValue> {
    if !doc.matches(rule.selector()) {
        return Ok(FieldValue::Null);
    }

    let matches = doc.query_all(rule.selector());
    let trim = rule.trim();

    match rule.cardinality() {
        Cardinality::All => Ok(FieldValue::List(matches.iter().map(|el| el.text(trim)).collect())),
        Cardinality::Nth(index) => matches
            .get(index)
            .map(|el| FieldValue::Text(el.text(trim)))
            .ok_or_else(|| HarvestError::IndexOutOfRange {
                field: field.to_string(),
                index,
                matched: matches.len(),
            }),
        // non-empty: the no-match case returned above
        Cardinality::First => Ok(FieldValue::Text(matches[0].text(trim))),
    }
}

/// Applies every rule of `rules` to `doc`.
pub fn evaluate(doc: &Document, rules: &RuleSet) -> Extraction {
    let fields = rules
        .iter()
        .map(|(field, rule)| (field.to_string(), evaluate_rule(doc, field, rule)))
        .collect();

    Extraction { fields }
}

/// Evaluates `rules` and fails if any field failed.
pub fn extract_fields(doc: &Document, rules: &RuleSet) -> Result<ExtractedData> {
    evaluate(doc, rules).into_data()
}
