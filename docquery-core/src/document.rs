// src/document.rs
// Dokumentum segédfüggvények (path resolver, filter, orchestrator)

use serde_json::Value;

/// Tömb-lyuk: egy törölt tömbelem helyére kerül, így a többi index nem csúszik el
pub const HOLE: Value = Value::Null;

/// Skalár típusnév hibaüzenetekhez
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Objektum vagy tömb - ezekbe lehet belépni, minden más skalár
pub fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Cél dokumentumhalmazként: a tömb dokumentumok kollekciója,
/// minden más egyetlen dokumentum
pub fn documents(target: &Value) -> Vec<&Value> {
    match target {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// A [`documents`] módosítható változata
pub fn documents_mut(target: &mut Value) -> Vec<&mut Value> {
    match target {
        Value::Array(items) => items.iter_mut().collect(),
        other => vec![other],
    }
}
