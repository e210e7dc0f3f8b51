//! Request field validation.
//!
//! Validation never stops at the first problem: a [`Validator`] walks every
//! rule, collects a [`FieldViolation`] per failure, and folds them into a
//! single [`FieldErrors`] map so clients see every invalid field at once.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{DomainError, DomainResult};

/// Where in the request a value came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Location {
    Body,
    Query,
    Path,
}

impl Location {
    pub fn as_str(self) -> &'static str {
        match self {
            Location::Body => "body",
            Location::Query => "query",
            Location::Path => "path",
        }
    }
}

/// One failed rule.
///
/// `loc` is the full location of the offending value, outermost segment first
/// (e.g. `["body", "priority"]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub loc: Vec<String>,
    pub message: String,
}

impl FieldViolation {
    pub fn new(location: Location, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            loc: vec![location.as_str().to_string(), field.into()],
            message: message.into(),
        }
    }

    /// Client-facing field name: the location with its outermost segment dropped.
    ///
    /// A bare single-segment location is reported as-is; an empty one as `base`.
    pub fn field_path(&self) -> String {
        match self.loc.split_first() {
            Some((_, rest)) if !rest.is_empty() => rest.join("."),
            Some((only, _)) => only.clone(),
            None => "base".to_string(),
        }
    }
}

/// Field → messages map rendered in validation error payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<FieldViolation> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = FieldViolation>>(iter: I) -> Self {
        let mut errors = Self::new();
        for violation in iter {
            errors.push(violation.field_path(), violation.message);
        }
        errors
    }
}

/// Character-count bounds for string fields (inclusive).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct LengthBounds {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl LengthBounds {
    pub const fn any() -> Self {
        Self { min: None, max: None }
    }

    pub const fn at_least(min: usize) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }
}

/// Exclusive numeric bounds for integer fields.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct IntBounds {
    pub gt: Option<i64>,
    pub lt: Option<i64>,
}

impl IntBounds {
    pub const fn any() -> Self {
        Self { gt: None, lt: None }
    }

    pub const fn greater_than(gt: i64) -> Self {
        Self { gt: Some(gt), lt: None }
    }

    pub const fn exclusive(gt: i64, lt: i64) -> Self {
        Self {
            gt: Some(gt),
            lt: Some(lt),
        }
    }
}

fn characters(n: usize) -> &'static str {
    if n == 1 { "character" } else { "characters" }
}

/// Collects violations for a JSON object taken from one request location.
#[derive(Debug)]
pub struct Validator<'a> {
    location: Location,
    input: &'a Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl<'a> Validator<'a> {
    pub fn new(location: Location, input: &'a Map<String, Value>) -> Self {
        Self {
            location,
            input,
            violations: Vec::new(),
        }
    }

    /// Record a violation for a rule the built-in checks do not cover.
    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.violations
            .push(FieldViolation::new(self.location, field, message));
    }

    fn present(&mut self, field: &str, required: bool) -> Option<&'a Value> {
        let input: &'a Map<String, Value> = self.input;
        match input.get(field) {
            Some(Value::Null) | None => {
                if required {
                    self.reject(field, "Field required");
                }
                None
            }
            Some(value) => Some(value),
        }
    }

    pub fn string(&mut self, field: &str, required: bool, bounds: LengthBounds) -> Option<&'a str> {
        let value = self.present(field, required)?;
        let Some(s) = value.as_str() else {
            self.reject(field, "Input should be a valid string");
            return None;
        };

        let len = s.chars().count();
        if let Some(min) = bounds.min {
            if len < min {
                self.reject(
                    field,
                    format!("String should have at least {min} {}", characters(min)),
                );
                return None;
            }
        }
        if let Some(max) = bounds.max {
            if len > max {
                self.reject(
                    field,
                    format!("String should have at most {max} {}", characters(max)),
                );
                return None;
            }
        }
        Some(s)
    }

    pub fn integer(&mut self, field: &str, required: bool, bounds: IntBounds) -> Option<i64> {
        let value = self.present(field, required)?;
        let Some(n) = value.as_i64() else {
            self.reject(field, "Input should be a valid integer");
            return None;
        };

        if let Some(gt) = bounds.gt {
            if n <= gt {
                self.reject(field, format!("Input should be greater than {gt}"));
                return None;
            }
        }
        if let Some(lt) = bounds.lt {
            if n >= lt {
                self.reject(field, format!("Input should be less than {lt}"));
                return None;
            }
        }
        Some(n)
    }

    pub fn boolean(&mut self, field: &str, required: bool) -> Option<bool> {
        let value = self.present(field, required)?;
        match value.as_bool() {
            Some(b) => Some(b),
            None => {
                self.reject(field, "Input should be a valid boolean");
                None
            }
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// `Ok(())` when every rule passed, otherwise one aggregated `ValidationFailed`.
    pub fn finish(self) -> DomainResult<()> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(DomainError::ValidationFailed(
                self.violations.into_iter().collect(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn field_path_drops_outer_location() {
        let v = FieldViolation {
            loc: vec!["body".into(), "address".into(), "city".into()],
            message: "Field required".into(),
        };
        assert_eq!(v.field_path(), "address.city");
    }

    #[test]
    fn field_path_keeps_single_segment() {
        let v = FieldViolation {
            loc: vec!["title".into()],
            message: "Field required".into(),
        };
        assert_eq!(v.field_path(), "title");

        let empty = FieldViolation {
            loc: vec![],
            message: "bad".into(),
        };
        assert_eq!(empty.field_path(), "base");
    }

    #[test]
    fn messages_for_same_field_accumulate() {
        let errors: FieldErrors = vec![
            FieldViolation::new(Location::Body, "title", "too short"),
            FieldViolation::new(Location::Body, "title", "reserved word"),
        ]
        .into_iter()
        .collect();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("title").unwrap(), ["too short", "reserved word"]);
    }

    #[test]
    fn reports_every_invalid_field_at_once() {
        let body = object(json!({ "description": "ok body", "priority": 9, "complete": false }));
        let mut v = Validator::new(Location::Body, &body);
        v.string("title", true, LengthBounds::at_least(3));
        v.string("description", true, LengthBounds::between(3, 100));
        v.integer("priority", true, IntBounds::exclusive(0, 6));
        v.boolean("complete", true);

        let Err(DomainError::ValidationFailed(errors)) = v.finish() else {
            panic!("expected ValidationFailed");
        };
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["priority", "title"]);
        assert_eq!(errors.get("title").unwrap(), ["Field required"]);
        assert_eq!(errors.get("priority").unwrap(), ["Input should be less than 6"]);
    }

    #[test]
    fn type_mismatches_are_reported() {
        let body = object(json!({ "title": 5, "priority": "high", "complete": "yes" }));
        let mut v = Validator::new(Location::Body, &body);
        assert_eq!(v.string("title", true, LengthBounds::any()), None);
        assert_eq!(v.integer("priority", true, IntBounds::any()), None);
        assert_eq!(v.boolean("complete", true), None);
        assert_eq!(v.violations().len(), 3);
    }

    #[test]
    fn optional_fields_may_be_absent_or_null() {
        let body = object(json!({ "author": null }));
        let mut v = Validator::new(Location::Body, &body);
        assert_eq!(v.string("title", false, LengthBounds::at_least(1)), None);
        assert_eq!(v.string("author", false, LengthBounds::at_least(1)), None);
        assert!(v.finish().is_ok());
    }

    #[test]
    fn length_is_counted_in_characters() {
        let body = object(json!({ "title": "äöü" }));
        let mut v = Validator::new(Location::Body, &body);
        assert_eq!(v.string("title", true, LengthBounds::at_least(3)), Some("äöü"));
        assert!(v.finish().is_ok());
    }

    #[test]
    fn lower_bound_message_is_singular_for_one() {
        let body = object(json!({ "category": "" }));
        let mut v = Validator::new(Location::Body, &body);
        v.string("category", true, LengthBounds::at_least(1));
        assert_eq!(
            v.violations()[0].message,
            "String should have at least 1 character"
        );
    }
}
