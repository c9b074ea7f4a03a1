// src/query.rs
// Query orchestrator: filter a document set, then update every match

use serde_json::Value;

use crate::document::{documents, documents_mut};
use crate::error::Result;
use crate::filter::Filter;
use crate::options::QueryOptions;
use crate::update::UpdateSpec;

/// Outcome of [`Query::execute`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Documents that passed the filter
    pub matched_count: u64,
    /// Matched documents the update actually changed
    pub modified_count: u64,
    /// Positions of the modified documents within the target, in input order
    pub modified: Vec<usize>,
}

impl QueryResult {
    /// The modified documents, read back from the target the query ran on.
    pub fn documents<'v>(&self, target: &'v Value) -> Vec<&'v Value> {
        let docs = documents(target);
        self.modified
            .iter()
            .filter_map(|&position| docs.get(position).copied())
            .collect()
    }
}

/// Query - filter + update, executed against a document or a collection
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filter: Filter,
    pub update: UpdateSpec,
    pub options: QueryOptions,
}

impl Query {
    pub fn new(filter: Filter, update: UpdateSpec) -> Self {
        Query {
            filter,
            update,
            options: QueryOptions::default(),
        }
    }

    /// Parse filter and update specifications from JSON
    pub fn from_json(filter_json: &Value, update_json: &Value) -> Result<Self> {
        Ok(Query::new(
            Filter::from_json(filter_json)?,
            UpdateSpec::from_json(update_json)?,
        ))
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Update every document of `target` that matches the filter.
    ///
    /// An array target is a collection of documents, anything else is a
    /// single document. The call is all-or-nothing: if updating any matched
    /// document fails, `target` is left untouched and the error is returned.
    pub fn execute(&self, target: &mut Value) -> Result<QueryResult> {
        let mut result = QueryResult::default();

        // First pass: update copies of every match
        let mut staged: Vec<(usize, Value)> = Vec::new();
        for (position, doc) in documents(target).into_iter().enumerate() {
            if !self.filter.test_one(doc) {
                continue;
            }
            result.matched_count += 1;

            if let Some(updated) = self.update.apply_to_copy(doc, &self.options.update)? {
                staged.push((position, updated));
            }
        }

        // Second pass: commit
        let mut slots = documents_mut(target);
        for (position, updated) in staged {
            *slots[position] = updated;
            result.modified.push(position);
        }
        result.modified_count = result.modified.len() as u64;

        log::debug!(
            "query matched {} document(s), modified {}",
            result.matched_count,
            result.modified_count
        );

        Ok(result)
    }
}

/// Filter `target`, apply `update` to every match and return the modified
/// documents.
pub fn query(target: &mut Value, filter: &Value, update: &Value) -> Result<Vec<Value>> {
    let result = Query::from_json(filter, update)?.execute(target)?;
    Ok(result
        .documents(target)
        .into_iter()
        .cloned()
        .collect())
}
