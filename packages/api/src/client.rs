//! # API client
//!
//! [`ApiClient`] wraps a [`Transport`] with the backend's conventions:
//!
//! - a bearer token on every request once logged in,
//! - responses shaped `{ success, message, data }`,
//! - validation failures as HTTP 422 with `errors: { field: [messages] }`,
//! - an "unauthenticated" message anywhere meaning the session is gone.
//!
//! [`call`](ApiClient::call) turns all of that into `Ok(body)` or an
//! [`ApiError`]; the typed helpers then decode `data` into explicit types and
//! fail closed with [`ApiError::Decode`] when it is missing or malformed.
//! Endpoint methods live in the `endpoints` modules as further `impl` blocks.

use serde::de::DeserializeOwned;
use serde_json::Value;

use model::logout::{is_unauthenticated, LogoutLatch};
use model::pagination::{Page, PageRequest, PerPageParam};
use model::FieldErrors;

use crate::error::{ApiError, ApiResult, GENERIC_ERROR};
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Header carrying the registration session id on steps after the first.
pub const SESSION_HEADER: &str = "X-Session-Id";

#[derive(Clone, Debug)]
pub struct ApiClient<T> {
    transport: T,
    token: Option<String>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Send a request and interpret the backend's conventions.
    pub async fn call(&self, mut request: ApiRequest) -> ApiResult<Value> {
        request = request.header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        let method = request.method.as_str();
        let path = request.path.clone();
        tracing::debug!(method, path = %path, "api request");

        let response = self.transport.send(request).await?;
        let result = interpret(response);
        match &result {
            Ok(_) => tracing::debug!(method, path = %path, "api ok"),
            Err(e) if e.is_unauthenticated() => {
                tracing::warn!(method, path = %path, "session rejected by server")
            }
            Err(e) => tracing::warn!(method, path = %path, "api error: {e}"),
        }
        result
    }

    /// Call and decode the `data` member.
    pub async fn call_data<R: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<R> {
        let body = self.call(request).await?;
        decode_data(body)
    }

    /// GET a paginated list.
    pub async fn page<R: DeserializeOwned>(
        &self,
        path: &str,
        request: PageRequest,
        param: PerPageParam,
        extra: Vec<(String, String)>,
    ) -> ApiResult<Page<R>> {
        let body = self
            .call(ApiRequest::get(path).queries(request.query(param)).queries(extra))
            .await?;
        Ok(Page::from_value(&body)?)
    }
}

/// Decide whether `error` should force a logout, allowing only the first
/// report per login through.
pub fn should_logout(latch: &mut LogoutLatch, error: &ApiError) -> bool {
    error.is_unauthenticated() && latch.trip()
}

fn message_of(body: &Value) -> Option<String> {
    match body {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => ["message", "error"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(|v| v.as_str().map(str::to_string)),
        _ => None,
    }
    .filter(|m| !m.trim().is_empty())
}

fn field_errors_of(body: &Value) -> Option<FieldErrors> {
    let errors = body.get("errors")?.as_object()?;
    let mut out = FieldErrors::new();
    for (field, messages) in errors {
        let message = match messages {
            Value::Array(list) => list.iter().find_map(|m| m.as_str()).map(str::to_string),
            Value::String(s) => Some(s.clone()),
            _ => None,
        };
        if let Some(message) = message {
            out.add(field, message);
        }
    }
    (!out.is_empty()).then_some(out)
}

fn interpret(response: ApiResponse) -> ApiResult<Value> {
    let message = message_of(&response.body);

    if response.status == 401 || message.as_deref().is_some_and(is_unauthenticated) {
        return Err(ApiError::Unauthenticated(
            message.unwrap_or_else(|| "Unauthenticated.".to_string()),
        ));
    }
    if !response.is_success() {
        if response.status == 422 {
            if let Some(errors) = field_errors_of(&response.body) {
                return Err(ApiError::Validation(errors));
            }
        }
        return Err(ApiError::Server {
            status: response.status,
            message: message.unwrap_or_else(|| GENERIC_ERROR.to_string()),
        });
    }
    if response.body.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(ApiError::Rejected(
            message.unwrap_or_else(|| GENERIC_ERROR.to_string()),
        ));
    }
    Ok(response.body)
}

/// Decode `body.data`, failing closed when it is absent.
pub(crate) fn decode_data<R: DeserializeOwned>(mut body: Value) -> ApiResult<R> {
    let data = body
        .get_mut("data")
        .map(Value::take)
        .ok_or_else(|| ApiError::Decode("missing `data`".to_string()))?;
    Ok(serde_json::from_value(data)?)
}
