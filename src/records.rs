//! Decoding of profile and meal documents handed over by the store.
//!
//! A document lists its fields wrapped in a one-key object naming the value
//! kind (`{"stringValue": "70"}`, `{"integerValue": "1200"}`). Profiles and
//! meals only hold text, numbers, timestamps and nulls, so those are the kinds
//! unwrapped here. Plain JSON objects decode the same way. Decoding is lenient:
//! numbers may be strings, unknown keys are ignored and unreadable meals are
//! skipped rather than failing the batch.

use anyhow::{anyhow, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::models::{MealEntry, UserMetrics};

/// A profile or meal document as listed by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreDocument {
    /// Full resource path; the last segment is the document id
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(rename = "createTime")]
    pub create_time: Option<String>,
}

/// The scalar carried by one typed field. Integers stay as the string the
/// store sends; the numeric readers below accept numeric strings.
pub fn unwrap_field(val: &Value) -> Value {
    let wrapped = val
        .as_object()
        .filter(|obj| obj.len() == 1)
        .and_then(|obj| obj.iter().next());

    match wrapped {
        Some((kind, inner)) => match kind.as_str() {
            "stringValue" | "integerValue" | "doubleValue" | "timestampValue" => inner.clone(),
            "nullValue" => Value::Null,
            _ => val.clone(),
        },
        None => val.clone(),
    }
}

/// Plain JSON for a document: `_id`, the unwrapped fields, and `createdAt`
/// taken from the document's creation time when no such field is stored.
pub fn document_json(doc: &StoreDocument) -> Value {
    let mut obj: Map<String, Value> = doc
        .fields
        .iter()
        .map(|(key, val)| (key.clone(), unwrap_field(val)))
        .collect();

    if let Some(id) = doc.name.rsplit('/').next() {
        obj.insert("_id".to_string(), Value::from(id));
    }
    if let Some(created) = &doc.create_time {
        obj.entry("createdAt")
            .or_insert_with(|| Value::from(created.as_str()));
    }

    Value::Object(obj)
}

fn first_of<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k)).filter(|v| !v.is_null())
}

/// Text form of a scalar, as the form layer would have stored it.
fn as_text(val: &Value) -> Option<String> {
    match val {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_number(val: &Value) -> Option<f64> {
    val.as_f64()
        .or_else(|| val.as_str().and_then(|s| s.trim().parse().ok()))
        .filter(|n: &f64| n.is_finite())
}

/// Profile keys from the signup forms (French) or English equivalents.
pub fn metrics_from_json(val: &Value) -> UserMetrics {
    let Some(obj) = val.as_object() else {
        return UserMetrics::default();
    };
    let text = |keys: &[&str]| first_of(obj, keys).and_then(as_text);

    UserMetrics {
        weight: text(&["poids", "weight"]),
        height: text(&["taille", "height"]),
        age: text(&["age"]),
        sex: text(&["sexe", "genre", "sex"]),
        activity_level: text(&["niveauActivite", "activity_level", "activityLevel"]),
        goal: text(&["objectif", "goal"]),
    }
}

pub fn meal_from_json(val: &Value) -> Result<MealEntry> {
    let obj = val
        .as_object()
        .ok_or_else(|| anyhow!("meal record is not an object"))?;
    let num = |keys: &[&str]| first_of(obj, keys).and_then(as_number);

    let day_key = first_of(obj, &["date"])
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| anyhow!("meal record has no date"))?;

    Ok(MealEntry {
        name: first_of(obj, &["name"]).and_then(as_text),
        calories: num(&["calories"]),
        protein_grams: num(&["proteins", "protein"]),
        carb_grams: num(&["carbs"]),
        fat_grams: num(&["fats", "fat"]),
        day_key,
        created_at: first_of(obj, &["createdAt"]).and_then(parse_timestamp),
    })
}

/// RFC 3339 text or epoch milliseconds.
fn parse_timestamp(val: &Value) -> Option<DateTime<Utc>> {
    match val {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

/// Decode every meal that can be placed on a day; the rest are logged and skipped.
pub fn meals_from_json(values: &[Value]) -> Vec<MealEntry> {
    values
        .iter()
        .filter_map(|v| match meal_from_json(v) {
            Ok(meal) => Some(meal),
            Err(e) => {
                warn!(error = %e, "skipping meal record");
                None
            }
        })
        .collect()
}

pub fn meals_from_documents(docs: &[StoreDocument]) -> Vec<MealEntry> {
    let values: Vec<Value> = docs.iter().map(document_json).collect();
    meals_from_json(&values)
}

pub fn metrics_from_document(doc: &StoreDocument) -> UserMetrics {
    metrics_from_json(&document_json(doc))
}
