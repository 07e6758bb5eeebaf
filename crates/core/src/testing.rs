//! In-process test doubles
//!
//! [`ScriptedTransport`] replays queued responses per `(method, path)` and
//! records every request it receives. Each queued entry is served once; once
//! a route's queue is drained the last entry served repeats, so "always 401"
//! is one line.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use postbox_domain::{HttpMethod, PostboxError, Result};

use crate::http::{HttpRequest, HttpResponse, HttpTransport};

#[derive(Debug, Clone)]
enum Scripted {
    Respond(HttpResponse),
    Fail(PostboxError),
}

type RouteKey = (HttpMethod, String);

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<RouteKey, VecDeque<Scripted>>>,
    last_served: Mutex<HashMap<RouteKey, Scripted>>,
    log: Mutex<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep before answering, so concurrent callers overlap.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a response for `method path`; the query string is not part of the route.
    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: impl Into<String>) -> &Self {
        let response = HttpResponse { status, reason: reason_phrase(status), body: body.into() };
        self.push(method, path, Scripted::Respond(response))
    }

    /// Queue a transport-level failure.
    pub fn fail(&self, method: HttpMethod, path: &str, error: PostboxError) -> &Self {
        self.push(method, path, Scripted::Fail(error))
    }

    fn push(&self, method: HttpMethod, path: &str, entry: Scripted) -> &Self {
        self.routes.lock().entry((method, path.to_string())).or_default().push_back(entry);
        self
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.log.lock().clone()
    }

    /// Requests received for `method path`.
    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|request| request.method == method && route_path(&request.endpoint) == path)
            .count()
    }

    /// Total requests received.
    pub fn total(&self) -> usize {
        self.log.lock().len()
    }

    fn next(&self, key: &RouteKey) -> Option<Scripted> {
        let queued = self.routes.lock().get_mut(key).and_then(VecDeque::pop_front);
        let mut last_served = self.last_served.lock();
        match queued {
            Some(entry) => {
                last_served.insert(key.clone(), entry.clone());
                Some(entry)
            }
            None => last_served.get(key).cloned(),
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let key = (request.method, route_path(&request.endpoint).to_string());
        self.log.lock().push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.next(&key) {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(error)) => Err(error),
            None => Ok(HttpResponse {
                status: 404,
                reason: reason_phrase(404),
                body: format!("no scripted response for {} {}", key.0, key.1),
            }),
        }
    }
}

fn route_path(endpoint: &str) -> &str {
    endpoint.split('?').next().unwrap_or(endpoint).trim_start_matches('/')
}

fn reason_phrase(status: u16) -> Option<String> {
    let reason = match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => return None,
    };
    Some(reason.to_string())
}

/// JSON body of a successful auth exchange
pub fn auth_body(user_id: &str, jwt: &str, refresh_token: &str) -> String {
    serde_json::json!({
        "userId": user_id,
        "jwt": jwt,
        "refreshToken": refresh_token,
        "expires": "2030-01-01T00:00:00"
    })
    .to_string()
}

/// JSON body of a current-user profile
pub fn profile_body(user_id: &str, email: &str) -> String {
    serde_json::json!({
        "id": user_id,
        "email": email,
        "firstName": "Test",
        "lastName": "User"
    })
    .to_string()
}
