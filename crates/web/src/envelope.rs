//! Uniform `{code, data|msg}` response body

use std::collections::BTreeMap;

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Serialize, Serializer, ser::SerializeMap};
use utoipa::ToSchema;

pub const CODE_SUCCESS: u8 = 0;
pub const CODE_FAILURE: u8 = 1;

/// Failure detail: a plain message or per-field validation messages
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ErrorMessage {
    Text(String),
    Fields(BTreeMap<String, Vec<String>>),
}

impl From<&str> for ErrorMessage {
    fn from(msg: &str) -> Self {
        Self::Text(msg.to_string())
    }
}

/// Response envelope.
///
/// `Success(Some(data))` renders `{"code":0,"data":...}`, `Success(None)`
/// renders `{"code":0}` and `Failure(msg)` renders `{"code":1,"msg":...}`.
/// The HTTP status is chosen by whoever builds the response.
#[derive(Debug)]
pub enum Envelope<T> {
    Success(Option<T>),
    Failure(ErrorMessage),
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self::Success(Some(data))
    }

    pub fn empty() -> Self {
        Self::Success(None)
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(None) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("code", &CODE_SUCCESS)?;
                map.end()
            }
            Self::Success(Some(data)) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("code", &CODE_SUCCESS)?;
                map.serialize_entry("data", data)?;
                map.end()
            }
            Self::Failure(msg) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("code", &CODE_FAILURE)?;
                map.serialize_entry("msg", msg)?;
                map.end()
            }
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
