use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

/// Scripted in-memory transport for tests and offline demos.
///
/// Responses are queued per `(method, path)` and handed out in order; the last
/// queued response for a route is repeated once the queue drains. Unscripted
/// routes answer 404. Every request is recorded. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct MemoryTransport {
    routes: Arc<Mutex<HashMap<(Method, String), VecDeque<ApiResponse>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method path`.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(ApiResponse::new(status, body));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }
}

impl Transport for MemoryTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let key = (request.method, request.path.clone());
        self.requests.lock().unwrap().push(request);

        let mut routes = self.routes.lock().unwrap();
        let response = match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(response.unwrap_or_else(|| ApiResponse::new(404, json!({"message": "Not found"}))))
    }
}
