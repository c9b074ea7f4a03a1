// src/filter.rs
// Egyenlőség-filter pont-útvonalakon - illeszkedő dokumentumok kiválasztása

use serde_json::Value;

use crate::document::documents;
use crate::error::{DocQueryError, Result};
use crate::options::{FilterOptions, MatchMode};
use crate::path::FieldPath;

/// Elvárt érték egy útvonalon
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    /// Az útvonalon ezzel mélyen egyenlő érték áll
    Equals(Value),
    /// Az útvonal nem létezik
    Missing,
}

impl Expected {
    fn matches(&self, value: Option<&Value>) -> bool {
        match self {
            Expected::Equals(target) => value == Some(target),
            Expected::Missing => value.is_none(),
        }
    }
}

/// A [`Filter::test`] eredménye: single módban bool,
/// collection módban az illeszkedő dokumentumok
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome<'v> {
    Single(bool),
    Collection(Vec<&'v Value>),
}

impl<'v> FilterOutcome<'v> {
    pub fn is_match(&self) -> bool {
        match self {
            FilterOutcome::Single(matched) => *matched,
            FilterOutcome::Collection(docs) => !docs.is_empty(),
        }
    }

    pub fn into_documents(self) -> Vec<&'v Value> {
        match self {
            FilterOutcome::Single(_) => Vec::new(),
            FilterOutcome::Collection(docs) => docs,
        }
    }
}

/// Filter - útvonal → elvárt érték feltételek, mindnek teljesülnie kell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(FieldPath, Expected)>,
}

impl Filter {
    /// Üres filter: minden dokumentum illeszkedik
    pub fn new() -> Self {
        Filter { conditions: Vec::new() }
    }

    /// Filter parsing JSON-ből
    pub fn from_json(json: &Value) -> Result<Self> {
        match json {
            Value::Object(map) => Ok(Filter {
                conditions: map
                    .iter()
                    .map(|(path, expected)| {
                        (FieldPath::parse(path), Expected::Equals(expected.clone()))
                    })
                    .collect(),
            }),
            Value::Null => Ok(Filter::new()),
            other => Err(DocQueryError::InvalidFilter(format!(
                "filter must be an object, got {}",
                crate::document::type_name(other)
            ))),
        }
    }

    pub fn equals(mut self, path: &str, value: Value) -> Self {
        self.conditions.push((FieldPath::parse(path), Expected::Equals(value)));
        self
    }

    pub fn missing(mut self, path: &str) -> Self {
        self.conditions.push((FieldPath::parse(path), Expected::Missing));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[(FieldPath, Expected)] {
        &self.conditions
    }

    /// Dokumentum illeszkedik-e a filterre
    pub fn test_one(&self, doc: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(path, expected)| expected.matches(path.resolve(doc)))
    }

    /// Kollekció illeszkedő dokumentumai, bemeneti sorrendben.
    /// Egy önálló dokumentum egyelemű kollekcióként számít.
    pub fn test_collection<'v>(&self, input: &'v Value) -> Vec<&'v Value> {
        documents(input)
            .into_iter()
            .filter(|doc| {
                let matched = self.test_one(doc);
                log::trace!("filter {:?} -> {}", doc, matched);
                matched
            })
            .collect()
    }

    pub fn test<'v>(&self, input: &'v Value, options: FilterOptions) -> FilterOutcome<'v> {
        match options.mode {
            MatchMode::Single => FilterOutcome::Single(self.test_one(input)),
            MatchMode::Collection => FilterOutcome::Collection(self.test_collection(input)),
        }
    }
}
