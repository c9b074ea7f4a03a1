// src/options.rs
// Filter / update / query options

use serde::{Deserialize, Serialize};

/// How [`crate::Filter::test`] interprets its input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Test one document, answer with a boolean.
    Single,
    /// Test every document of a collection, answer with the matches.
    #[default]
    Collection,
}

/// What to do with `$inc`, `$pop`, `$push`, `$pull` and `$pullAll`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservedOperatorPolicy {
    /// Accept the operator and leave the document alone.
    #[default]
    Ignore,
    /// Fail the whole update with `NotImplemented`.
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    pub mode: MatchMode,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single() -> Self {
        FilterOptions { mode: MatchMode::Single }
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateOptions {
    pub reserved_operators: ReservedOperatorPolicy,
}

impl UpdateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reserved_operators(mut self, policy: ReservedOperatorPolicy) -> Self {
        self.reserved_operators = policy;
        self
    }
}

/// Options for [`crate::Query::execute`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    pub update: UpdateOptions,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_update(mut self, update: UpdateOptions) -> Self {
        self.update = update;
        self
    }

    pub fn with_reserved_operators(mut self, policy: ReservedOperatorPolicy) -> Self {
        self.update.reserved_operators = policy;
        self
    }
}
