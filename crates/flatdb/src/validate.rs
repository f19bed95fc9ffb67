//! Per-collection payload validation.
//!
//! A [`Validator`] receives the full candidate payload (as a dynamic JSON value)
//! before every Write and after the merge step of every Update. Collections
//! without a registered validator accept anything.
//!
//! Validators must be pure: no side effects, no blocking, no shared mutable
//! state. They run while the collection lock is held (Update) or just before
//! it is taken (Write).
//!
//! Closures work out of the box:
//!
//! ```
//! use flatdb::validate::{ValidationError, Validator};
//! use serde_json::json;
//!
//! let positive_year = |payload: &serde_json::Value| match payload.get("year") {
//!     Some(y) if y.as_i64().is_some_and(|y| y > 0) => Ok(()),
//!     _ => Err(ValidationError::new("year must be a positive integer")),
//! };
//!
//! assert!(positive_year.validate(&json!({"year": 1969})).is_ok());
//! assert!(positive_year.validate(&json!({"year": -1})).is_err());
//! ```

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Descriptive failure returned by a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Strategy that accepts or rejects a candidate payload.
pub trait Validator: Send + Sync {
    fn validate(&self, payload: &Value) -> Result<(), ValidationError>;
}

impl<F> Validator for F
where
    F: Fn(&Value) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, payload: &Value) -> Result<(), ValidationError> {
        self(payload)
    }
}

/// Rejects payloads that are not objects or lack any of the listed fields.
///
/// A field holding `null` counts as missing.
#[derive(Debug, Clone)]
pub struct RequiredFields {
    fields: Vec<String>,
}

impl RequiredFields {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for RequiredFields {
    fn validate(&self, payload: &Value) -> Result<(), ValidationError> {
        let Some(object) = payload.as_object() else {
            return Err(ValidationError::new("payload must be a JSON object"));
        };
        for field in &self.fields {
            match object.get(field) {
                None | Some(Value::Null) => {
                    return Err(ValidationError::new(format!("missing field '{}'", field)))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Collection name -> validator mapping.
///
/// Registration may happen while the store is in use, so lookups go through a
/// read lock and hand out a cloned `Arc`; the validator itself runs unlocked.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: RwLock<HashMap<String, Arc<dyn Validator>>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `validator` for `collection`, replacing any previous one.
    pub fn insert(&self, collection: impl Into<String>, validator: Arc<dyn Validator>) {
        self.validators.write().insert(collection.into(), validator);
    }

    pub fn get(&self, collection: &str) -> Option<Arc<dyn Validator>> {
        self.validators.read().get(collection).cloned()
    }

    pub fn contains(&self, collection: &str) -> bool {
        self.validators.read().contains_key(collection)
    }

    /// Runs the collection's validator, if any. `Ok(())` when none is registered.
    pub fn check(&self, collection: &str, payload: &Value) -> Result<(), ValidationError> {
        match self.get(collection) {
            Some(validator) => validator.validate(payload),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.validators.read().keys().cloned().collect();
        names.sort();
        f.debug_struct("ValidatorRegistry")
            .field("collections", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_fields_accepts_complete_payload() {
        let v = RequiredFields::new(["name", "genre"]);
        assert!(v.validate(&json!({"name": "Yes", "genre": "Rock"})).is_ok());
    }

    #[test]
    fn required_fields_reports_first_missing() {
        let v = RequiredFields::new(["name", "genre"]);
        let err = v.validate(&json!({"name": "Yes"})).unwrap_err();
        assert_eq!(err.message(), "missing field 'genre'");
    }

    #[test]
    fn required_fields_treats_null_as_missing() {
        let v = RequiredFields::new(["name"]);
        assert!(v.validate(&json!({"name": null})).is_err());
    }

    #[test]
    fn required_fields_rejects_non_objects() {
        let v = RequiredFields::new(["name"]);
        assert!(v.validate(&json!(["name"])).is_err());
        assert!(v.validate(&json!("name")).is_err());
    }

    #[test]
    fn registry_without_validator_accepts_anything() {
        let registry = ValidatorRegistry::new();
        assert!(registry.check("bands", &json!(42)).is_ok());
        assert!(!registry.contains("bands"));
    }

    #[test]
    fn registry_is_scoped_per_collection() {
        let registry = ValidatorRegistry::new();
        registry.insert("bands", Arc::new(RequiredFields::new(["name"])));

        assert!(registry.check("bands", &json!({})).is_err());
        assert!(registry.check("albums", &json!({})).is_ok());
    }

    #[test]
    fn registry_replaces_existing_validator() {
        let registry = ValidatorRegistry::new();
        registry.insert("bands", Arc::new(RequiredFields::new(["name"])));
        registry.insert(
            "bands",
            Arc::new(|_: &Value| -> Result<(), ValidationError> { Ok(()) }),
        );

        assert!(registry.check("bands", &json!({})).is_ok());
    }
}
