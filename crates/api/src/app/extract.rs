//! Request extractors that reject through [`ApiError`] instead of axum's
//! plain-text rejections.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use shelfmate_core::{BookId, DomainError, DomainResult, IntBounds, Location, TodoId, Validator};

use crate::app::errors::ApiError;

/// A JSON body with a closed set of keys and field rules.
pub trait RequestSchema: DeserializeOwned + Send {
    /// Every key the body may carry.
    const FIELDS: &'static [&'static str];

    /// Check field rules on the raw object, reporting every violation at once.
    fn validate(input: &Map<String, Value>) -> DomainResult<()>;
}

/// JSON body extractor: unknown keys are rejected before field rules run.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: RequestSchema,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| DomainError::malformed(e.body_text()))?;
        Ok(Self(parse_body(&bytes)?))
    }
}

fn parse_body<T: RequestSchema>(bytes: &[u8]) -> DomainResult<T> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| DomainError::malformed(format!("Malformed JSON body: {e}")))?;
    let Value::Object(input) = value else {
        return Err(DomainError::malformed("Request body must be a JSON object"));
    };

    let unknown: Vec<&String> = input
        .keys()
        .filter(|k| !T::FIELDS.contains(&k.as_str()))
        .collect();
    if !unknown.is_empty() {
        return Err(DomainError::unpermitted(unknown));
    }

    T::validate(&input)?;
    serde_json::from_value(Value::Object(input)).map_err(|e| DomainError::malformed(e.to_string()))
}

/// Query-string extractor mapping rejections to `MalformedInput`.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| DomainError::malformed(e.body_text()))?;
        Ok(Self(value))
    }
}

/// Serial identifiers accepted as the single path parameter of a route.
pub trait RouteId: From<i64> + Send {
    /// Name reported in validation errors.
    const PARAM: &'static str;
}

impl RouteId for TodoId {
    const PARAM: &'static str = "todo_id";
}

impl RouteId for BookId {
    const PARAM: &'static str = "book_id";
}

/// Positive integer id taken from the path.
#[derive(Debug)]
pub struct IdPath<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for IdPath<T>
where
    S: Send + Sync,
    T: RouteId,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| DomainError::malformed(e.body_text()))?;
        Ok(Self(parse_id::<T>(&raw)?))
    }
}

fn parse_id<T: RouteId>(raw: &str) -> DomainResult<T> {
    let value = raw
        .parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(raw.to_owned()));
    let mut input = Map::new();
    input.insert(T::PARAM.to_owned(), value);

    let mut v = Validator::new(Location::Path, &input);
    let id = v.integer(T::PARAM, true, IntBounds::greater_than(0));
    v.finish()?;
    id.map(T::from)
        .ok_or_else(|| DomainError::malformed(format!("invalid {}", T::PARAM)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use shelfmate_core::LengthBounds;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        #[serde(default)]
        size: Option<i64>,
    }

    impl RequestSchema for Sample {
        const FIELDS: &'static [&'static str] = &["name", "size"];

        fn validate(input: &Map<String, Value>) -> DomainResult<()> {
            let mut v = Validator::new(Location::Body, input);
            v.string("name", true, LengthBounds::at_least(2));
            v.integer("size", false, IntBounds::exclusive(0, 10));
            v.finish()
        }
    }

    #[test]
    fn accepts_a_valid_body() {
        let parsed: Sample = parse_body(br#"{"name":"ok","size":3}"#).unwrap();
        assert_eq!(
            parsed,
            Sample {
                name: "ok".into(),
                size: Some(3)
            }
        );
    }

    #[test]
    fn broken_json_is_malformed() {
        let err = parse_body::<Sample>(b"{\"name\":").unwrap_err();
        assert!(matches!(err, DomainError::MalformedInput(_)));
    }

    #[test]
    fn non_object_body_is_malformed() {
        let err = parse_body::<Sample>(b"[1,2]").unwrap_err();
        assert_eq!(
            err,
            DomainError::malformed("Request body must be a JSON object")
        );
    }

    #[test]
    fn unknown_keys_are_listed() {
        let err = parse_body::<Sample>(br#"{"name":"ok","color":"red","admin":true}"#).unwrap_err();
        assert_eq!(err, DomainError::unpermitted(["admin", "color"]));
    }

    #[test]
    fn every_field_violation_is_reported() {
        let err = parse_body::<Sample>(br#"{"size":12}"#).unwrap_err();
        let DomainError::ValidationFailed(fields) = err else {
            panic!("expected validation failure, got {err:?}");
        };
        assert_eq!(fields.get("name"), Some(&["Field required".to_string()][..]));
        assert_eq!(
            fields.get("size"),
            Some(&["Input should be less than 10".to_string()][..])
        );
    }

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id::<TodoId>("7").unwrap(), TodoId::new(7));

        let err = parse_id::<TodoId>("0").unwrap_err();
        let DomainError::ValidationFailed(fields) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(
            fields.get("todo_id"),
            Some(&["Input should be greater than 0".to_string()][..])
        );

        let err = parse_id::<BookId>("abc").unwrap_err();
        let DomainError::ValidationFailed(fields) = err else {
            panic!("expected validation failure");
        };
        assert!(fields.get("book_id").is_some());
    }
}
