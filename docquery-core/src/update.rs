// src/update.rs
// Update operators ($set, $unset, $rename) applied all-or-nothing

use serde_json::Value;

use crate::document::type_name;
use crate::error::{DocQueryError, Result};
use crate::options::{ReservedOperatorPolicy, UpdateOptions};
use crate::path::FieldPath;

/// Operator names that are accepted but carry no behaviour yet.
pub const RESERVED_OPERATORS: [&str; 5] = ["$inc", "$pop", "$push", "$pull", "$pullAll"];

/// One update operator with its per-path operands
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOperator {
    /// `$set`: path → new value
    Set(Vec<(FieldPath, Value)>),
    /// `$unset`: paths to remove, operand values are ignored
    Unset(Vec<FieldPath>),
    /// `$rename`: path → new key name in the same parent
    Rename(Vec<(FieldPath, String)>),
    /// One of [`RESERVED_OPERATORS`]
    Reserved { name: String, operand: Value },
}

impl UpdateOperator {
    pub fn name(&self) -> &str {
        match self {
            UpdateOperator::Set(_) => "$set",
            UpdateOperator::Unset(_) => "$unset",
            UpdateOperator::Rename(_) => "$rename",
            UpdateOperator::Reserved { name, .. } => name,
        }
    }

    fn parse(op: &str, operand: &Value) -> Result<Self> {
        if RESERVED_OPERATORS.contains(&op) {
            return Ok(UpdateOperator::Reserved {
                name: op.to_string(),
                operand: operand.clone(),
            });
        }

        let Value::Object(fields) = operand else {
            return Err(DocQueryError::InvalidUpdate(format!(
                "{} requires an object, got {}",
                op,
                type_name(operand)
            )));
        };

        match op {
            "$set" => Ok(UpdateOperator::Set(
                fields
                    .iter()
                    .map(|(path, value)| (FieldPath::parse(path), value.clone()))
                    .collect(),
            )),
            "$unset" => Ok(UpdateOperator::Unset(
                fields.keys().map(|path| FieldPath::parse(path)).collect(),
            )),
            "$rename" => {
                let mut renames = Vec::with_capacity(fields.len());
                for (path, target) in fields {
                    let Value::String(new_name) = target else {
                        return Err(DocQueryError::InvalidUpdate(format!(
                            "$rename target for '{}' must be a string",
                            path
                        )));
                    };
                    renames.push((FieldPath::parse(path), new_name.clone()));
                }
                Ok(UpdateOperator::Rename(renames))
            }
            _ => Err(DocQueryError::InvalidUpdate(format!(
                "Unsupported update operator: {}",
                op
            ))),
        }
    }

    /// Apply to `doc` in place - returns whether the document was modified.
    /// May leave `doc` half-written on error.
    fn apply(&self, doc: &mut Value) -> Result<bool> {
        let mut was_modified = false;

        match self {
            UpdateOperator::Set(fields) => {
                for (path, value) in fields {
                    path.assign(doc, value.clone())?;
                    was_modified = true;
                }
            }
            UpdateOperator::Unset(paths) => {
                for path in paths {
                    was_modified |= path.remove(doc);
                }
            }
            UpdateOperator::Rename(renames) => {
                for (path, new_name) in renames {
                    was_modified |= path.rename(doc, new_name);
                }
            }
            UpdateOperator::Reserved { name, .. } => {
                log::warn!("update operator {} is not implemented, skipping", name);
            }
        }

        Ok(was_modified)
    }
}

/// Update specification: operator → (path → operand)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSpec {
    operators: Vec<UpdateOperator>,
}

impl UpdateSpec {
    pub fn new() -> Self {
        UpdateSpec { operators: Vec::new() }
    }

    /// Parse an update specification from JSON
    pub fn from_json(json: &Value) -> Result<Self> {
        match json {
            Value::Object(ops) => {
                let operators = ops
                    .iter()
                    .map(|(op, operand)| UpdateOperator::parse(op, operand))
                    .collect::<Result<Vec<_>>>()?;
                Ok(UpdateSpec { operators })
            }
            Value::Null => Ok(UpdateSpec::new()),
            other => Err(DocQueryError::InvalidUpdate(format!(
                "update must be an object, got {}",
                type_name(other)
            ))),
        }
    }

    pub fn with_operator(mut self, operator: UpdateOperator) -> Self {
        self.operators.push(operator);
        self
    }

    pub fn operators(&self) -> &[UpdateOperator] {
        &self.operators
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Apply every operator to `doc` as one unit.
    ///
    /// Either all operators succeed and `doc` holds the result, or `doc` is
    /// left exactly as it was and the first error is returned.
    /// Returns whether the document was modified.
    pub fn apply(&self, doc: &mut Value, options: &UpdateOptions) -> Result<bool> {
        match self.apply_to_copy(doc, options)? {
            Some(updated) => {
                *doc = updated;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Run the update against a snapshot of `doc`. Returns the updated copy,
    /// or `None` when nothing changed. `doc` itself is never touched.
    pub fn apply_to_copy(&self, doc: &Value, options: &UpdateOptions) -> Result<Option<Value>> {
        self.check_reserved(options)?;

        let mut working = doc.clone();
        let mut was_modified = false;

        for operator in &self.operators {
            match operator.apply(&mut working) {
                Ok(modified) => was_modified |= modified,
                Err(err) => {
                    log::debug!("{} failed, rolling back update: {}", operator.name(), err);
                    return Err(err);
                }
            }
        }

        Ok(was_modified.then_some(working))
    }

    fn check_reserved(&self, options: &UpdateOptions) -> Result<()> {
        if options.reserved_operators == ReservedOperatorPolicy::Ignore {
            return Ok(());
        }

        match self
            .operators
            .iter()
            .find(|op| matches!(op, UpdateOperator::Reserved { .. }))
        {
            Some(op) => Err(DocQueryError::NotImplemented(op.name().to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apply(doc: &mut Value, update: Value) -> Result<bool> {
        UpdateSpec::from_json(&update)?.apply(doc, &UpdateOptions::default())
    }

    #[test]
    fn test_parse_operators() {
        let spec = UpdateSpec::from_json(&json!({
            "$set": {"a": 1},
            "$unset": {"b": ""},
            "$rename": {"c": "d"},
        }))
        .unwrap();

        let names: Vec<_> = spec.operators().iter().map(UpdateOperator::name).collect();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"$set"));
        assert!(names.contains(&"$unset"));
        assert!(names.contains(&"$rename"));
    }

    #[test]
    fn test_parse_reserved_operators() {
        for op in RESERVED_OPERATORS {
            let spec = UpdateSpec::from_json(&json!({op: {"a": 1}})).unwrap();
            assert_eq!(spec.operators()[0].name(), op);
        }
    }

    #[test]
    fn test_parse_errors() {
        let err = UpdateSpec::from_json(&json!({"$set": 5})).unwrap_err();
        assert!(matches!(err, DocQueryError::InvalidUpdate(_)));

        let err = UpdateSpec::from_json(&json!({"$rename": {"a": 1}})).unwrap_err();
        assert!(matches!(err, DocQueryError::InvalidUpdate(_)));

        let err = UpdateSpec::from_json(&json!({"$currentDate": {"a": true}})).unwrap_err();
        assert!(err.to_string().contains("Unsupported update operator"));

        let err = UpdateSpec::from_json(&json!("nope")).unwrap_err();
        assert!(matches!(err, DocQueryError::InvalidUpdate(_)));

        assert!(UpdateSpec::from_json(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_set_reports_modified() {
        let mut doc = json!({"a": "b"});
        assert!(apply(&mut doc, json!({"$set": {"a": "c"}})).unwrap());
        assert_eq!(doc, json!({"a": "c"}));
    }

    #[test]
    fn test_empty_update_is_unmodified() {
        let mut doc = json!({"a": "b"});
        assert!(!apply(&mut doc, json!({})).unwrap());
        assert_eq!(doc, json!({"a": "b"}));
    }

    #[test]
    fn test_failed_set_rolls_back_sibling_set() {
        let mut doc = json!({"a": "b", "c": "d"});
        let err = apply(&mut doc, json!({"$set": {"a": "tobi", "c.d": "tobi"}})).unwrap_err();
        assert!(err.to_string().contains("only supports object not string"));
        assert_eq!(doc, json!({"a": "b", "c": "d"}));
    }

    #[test]
    fn test_failed_set_rolls_back_auto_vivified_parents() {
        let mut doc = json!({"a": {"b": []}});
        let err = apply(&mut doc, json!({"$set": {"x.y.z": 1, "a.b.c": 2}})).unwrap_err();
        assert!(err.is_structural());
        assert_eq!(doc, json!({"a": {"b": []}}));
    }

    #[test]
    fn test_failed_set_rolls_back_unset_and_rename() {
        let mut doc = json!({"a": "b", "c": "d"});
        apply(&mut doc, json!({"$unset": {"a": 1}, "$set": {"c.d": "tobi"}})).unwrap_err();
        assert_eq!(doc, json!({"a": "b", "c": "d"}));

        apply(&mut doc, json!({"$rename": {"a": "b"}, "$set": {"c.d": "tobi"}})).unwrap_err();
        assert_eq!(doc, json!({"a": "b", "c": "d"}));
    }

    #[test]
    fn test_unset_and_rename_modified_flag() {
        let mut doc = json!({"a": "b"});
        assert!(!apply(&mut doc, json!({"$unset": {"c": 1}})).unwrap());
        assert!(!apply(&mut doc, json!({"$rename": {"c": "d"}})).unwrap());
        assert!(apply(&mut doc, json!({"$rename": {"a": "z"}})).unwrap());
        assert_eq!(doc, json!({"z": "b"}));
        assert!(apply(&mut doc, json!({"$unset": {"z": ""}})).unwrap());
        assert_eq!(doc, json!({}));
    }

    #[test]
    fn test_reserved_operator_ignored_by_default() {
        let mut doc = json!({"n": 1});
        assert!(!apply(&mut doc, json!({"$inc": {"n": 1}})).unwrap());
        assert_eq!(doc, json!({"n": 1}));

        // other operators in the batch still apply
        assert!(apply(&mut doc, json!({"$push": {"l": 1}, "$set": {"m": 2}})).unwrap());
        assert_eq!(doc, json!({"n": 1, "m": 2}));
    }

    #[test]
    fn test_reserved_operator_rejected_by_policy() {
        let mut doc = json!({"n": 1});
        let spec = UpdateSpec::from_json(&json!({"$set": {"m": 2}, "$pop": {"l": 1}})).unwrap();
        let options = UpdateOptions::new().with_reserved_operators(ReservedOperatorPolicy::Reject);

        let err = spec.apply(&mut doc, &options).unwrap_err();
        assert_eq!(err, DocQueryError::NotImplemented("$pop".to_string()));
        assert_eq!(doc, json!({"n": 1}));
    }

    #[test]
    fn test_apply_to_copy_leaves_original() {
        let doc = json!({"a": 1});
        let spec = UpdateSpec::new().with_operator(UpdateOperator::Set(vec![(
            FieldPath::parse("b.c"),
            json!(2),
        )]));

        let updated = spec.apply_to_copy(&doc, &UpdateOptions::default()).unwrap();
        assert_eq!(updated, Some(json!({"a": 1, "b": {"c": 2}})));
        assert_eq!(doc, json!({"a": 1}));
    }
}
