//! Handler results as an explicit tagged variant.
//!
//! A negotiated handler returns anything implementing [`IntoHandlerResult`].
//! The conversion decides, by type, whether the value is a finalized response
//! (passed through untouched) or a renderable mapping.

use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::NegotiationError;

/// What a negotiated handler produced.
#[derive(Debug)]
pub enum HandlerResult {
    /// A finalized response. Status, headers and body are kept as-is.
    Response(Response),
    /// Variables for the template, or the document for the JSON path.
    Mapping(Map<String, Value>),
}

impl HandlerResult {
    /// Builds a mapping result from any serializable value.
    ///
    /// Fails with [`NegotiationError::Serialization`] when serde rejects the
    /// value and [`NegotiationError::ContractViolation`] when it does not
    /// serialize to a JSON object.
    pub fn mapping<T: Serialize>(value: &T) -> Result<Self, NegotiationError> {
        serde_json::to_value(value)?.into_handler_result()
    }

    /// True for the pass-through variant.
    pub fn is_response(&self) -> bool {
        matches!(self, HandlerResult::Response(_))
    }
}

/// Conversion from a handler's return value into a [`HandlerResult`].
pub trait IntoHandlerResult {
    fn into_handler_result(self) -> Result<HandlerResult, NegotiationError>;
}

impl IntoHandlerResult for HandlerResult {
    fn into_handler_result(self) -> Result<HandlerResult, NegotiationError> {
        Ok(self)
    }
}

impl IntoHandlerResult for Response {
    fn into_handler_result(self) -> Result<HandlerResult, NegotiationError> {
        Ok(HandlerResult::Response(self))
    }
}

impl IntoHandlerResult for Map<String, Value> {
    fn into_handler_result(self) -> Result<HandlerResult, NegotiationError> {
        Ok(HandlerResult::Mapping(self))
    }
}

impl IntoHandlerResult for Value {
    fn into_handler_result(self) -> Result<HandlerResult, NegotiationError> {
        match self {
            Value::Object(map) => Ok(HandlerResult::Mapping(map)),
            other => Err(NegotiationError::ContractViolation(format!(
                "handler returned {}, expected a mapping or a response",
                kind_of(&other)
            ))),
        }
    }
}

/// Any `Result` whose error is itself a response: the error is finalized and
/// passes through, so handler failures keep their own status codes.
impl<T, E> IntoHandlerResult for Result<T, E>
where
    T: IntoHandlerResult,
    E: IntoResponse,
{
    fn into_handler_result(self) -> Result<HandlerResult, NegotiationError> {
        match self {
            Ok(value) => value.into_handler_result(),
            Err(err) => Ok(HandlerResult::Response(err.into_response())),
        }
    }
}

/// Wraps a serializable value (typically a `#[derive(Serialize)]` struct) so
/// it is negotiated as a mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mapping<T>(pub T);

impl<T: Serialize> IntoHandlerResult for Mapping<T> {
    fn into_handler_result(self) -> Result<HandlerResult, NegotiationError> {
        HandlerResult::mapping(&self.0)
    }
}

/// Wraps any `IntoResponse` value so it bypasses negotiation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Finalized<R>(pub R);

impl<R: IntoResponse> IntoHandlerResult for Finalized<R> {
    fn into_handler_result(self) -> Result<HandlerResult, NegotiationError> {
        Ok(HandlerResult::Response(self.0.into_response()))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
