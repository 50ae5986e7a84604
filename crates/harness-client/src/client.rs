//! Resource Client
//!
//! Builds requests, routes them through the session when auth is required,
//! and normalizes responses: non-2xx becomes an error, 204 is empty,
//! everything else is parsed as JSON.

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};
use crate::session::SessionManager;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};

/// Options for a single call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
    /// Send through the session when one exists
    pub require_auth: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::Get,
            body: None,
            headers: Vec::new(),
            require_auth: true,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn delete() -> Self {
        Self {
            method: Method::Delete,
            ..Self::default()
        }
    }

    pub fn post<B: Serialize>(body: &B) -> ClientResult<Self> {
        Self::with_body(Method::Post, body)
    }

    pub fn put<B: Serialize>(body: &B) -> ClientResult<Self> {
        Self::with_body(Method::Put, body)
    }

    /// POST with no payload
    pub fn post_empty() -> Self {
        Self {
            method: Method::Post,
            ..Self::default()
        }
    }

    /// Skip the session even when one exists
    pub fn public(mut self) -> Self {
        self.require_auth = false;
        self
    }

    fn with_body<B: Serialize>(method: Method, body: &B) -> ClientResult<Self> {
        Ok(Self {
            method,
            body: Some(serde_json::to_value(body)?),
            ..Self::default()
        })
    }
}

/// Parsed response body
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    /// 204 No Content
    Empty,
    Json(Value),
}

impl ApiBody {
    /// Decode into `T`. An empty body decodes as `{}`.
    pub fn decode<T: DeserializeOwned>(self) -> ClientResult<T> {
        let value = match self {
            ApiBody::Empty => Value::Object(serde_json::Map::new()),
            ApiBody::Json(value) => value,
        };
        Ok(serde_json::from_value(value)?)
    }
}

pub struct ResourceClient {
    base_url: String,
    transport: Rc<dyn Transport>,
    session: Rc<SessionManager>,
}

impl ResourceClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Rc<dyn Transport>,
        session: Rc<SessionManager>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            session,
        }
    }

    pub fn session(&self) -> &Rc<SessionManager> {
        &self.session
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send and return the raw response, whatever its status. A 401 on an
    /// authenticated request tears the session down and aborts the caller.
    pub async fn send(&self, endpoint: &str, options: RequestOptions) -> ClientResult<HttpResponse> {
        let mut request = HttpRequest {
            method: options.method,
            url: self.url(endpoint),
            headers: options.headers,
            body: options.body.map(|body| body.to_string()),
        };

        let authenticated = options.require_auth && self.session.is_authenticated();
        if authenticated {
            self.session.decorate(&mut request)?;
        } else if request.body.is_some() && request.header("Content-Type").is_none() {
            request.set_header("Content-Type", "application/json");
        }

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("API call failed for {}: {}", endpoint, e);
                return Err(e);
            }
        };

        if authenticated && response.status == 401 {
            log::warn!("API call to {} rejected the session token", endpoint);
            self.session.expire();
            return Err(ClientError::Unauthorized);
        }

        Ok(response)
    }

    pub async fn call(&self, endpoint: &str, options: RequestOptions) -> ClientResult<ApiBody> {
        let response = self.send(endpoint, options).await?;

        if !response.is_success() {
            let err = ClientError::Http {
                status: response.status,
                message: error_message(&response),
            };
            log::error!("API call failed for {}: {}", endpoint, err);
            return Err(err);
        }

        if response.status == 204 {
            return Ok(ApiBody::Empty);
        }

        match serde_json::from_str(&response.body) {
            Ok(value) => Ok(ApiBody::Json(value)),
            Err(e) => {
                log::error!("API call failed for {}: unreadable body: {}", endpoint, e);
                Err(e.into())
            }
        }
    }

    /// `call` and decode the body into `T`
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ClientResult<T> {
        let body = self.call(endpoint, options).await?;
        body.decode().map_err(|e| {
            log::error!("API call failed for {}: {}", endpoint, e);
            e
        })
    }
}

/// Server-provided `error` field, falling back to the status line
pub fn error_message(response: &HttpResponse) -> String {
    server_error(&response.body)
        .unwrap_or_else(|| format!("HTTP {}: {}", response.status, response.reason))
}

/// `error` field of a JSON object body, if present
pub fn server_error(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::session::SessionState;
    use crate::storage::{MemoryStore, TOKEN_KEY, USER_KEY};
    use crate::test_support::ScriptedTransport;
    use serde_json::json;

    fn setup(logged_in: bool) -> (Rc<ScriptedTransport>, Rc<MemoryStore>, ResourceClient) {
        let transport = Rc::new(ScriptedTransport::new());
        let store = Rc::new(MemoryStore::new());
        let session = Rc::new(SessionManager::load(store.clone()).unwrap());
        if logged_in {
            session
                .set_auth(
                    "tok".into(),
                    User {
                        id: 1,
                        username: "admin".into(),
                        email: None,
                    },
                )
                .unwrap();
        }
        let client = ResourceClient::new("http://localhost:5000/", transport.clone(), session);
        (transport, store, client)
    }

    #[tokio::test]
    async fn authenticated_call_carries_bearer_token() {
        let (transport, _, client) = setup(true);
        transport.respond(Method::Get, "/api/projects", 200, json!([]));

        let body = client.call("/api/projects", RequestOptions::get()).await.unwrap();
        assert_eq!(body, ApiBody::Json(json!([])));

        let sent = transport.requests();
        assert_eq!(sent[0].url, "http://localhost:5000/api/projects");
        assert_eq!(sent[0].header("Authorization"), Some("Bearer tok"));
    }

    #[tokio::test]
    async fn anonymous_call_has_no_authorization() {
        let (transport, _, client) = setup(false);
        transport.respond(Method::Post, "/api/auth/login", 200, json!({"ok": true}));

        let options = RequestOptions::post(&json!({"username": "a"})).unwrap();
        client.call("/api/auth/login", options).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].header("Authorization"), None);
        assert_eq!(sent[0].header("Content-Type"), Some("application/json"));
    }

    #[tokio::test]
    async fn no_content_yields_empty() {
        let (transport, _, client) = setup(true);
        transport.respond_raw(Method::Delete, "/api/todos/3", 204, "");

        let body = client.call("/api/todos/3", RequestOptions::delete()).await.unwrap();
        assert_eq!(body, ApiBody::Empty);
    }

    #[tokio::test]
    async fn server_error_message_is_surfaced() {
        let (transport, _, client) = setup(true);
        transport.respond(Method::Post, "/api/todos", 400, json!({"error": "Text required"}));

        let err = client
            .call("/api/todos", RequestOptions::post(&json!({"text": ""})).unwrap())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ClientError::Http {
                status: 400,
                message: "Text required".into()
            }
        );
    }

    #[tokio::test]
    async fn falls_back_to_status_line() {
        let (transport, _, client) = setup(true);
        transport.respond_raw(Method::Get, "/api/projects", 500, "<html>oops</html>");

        let err = client.call("/api/projects", RequestOptions::get()).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    }

    #[tokio::test]
    async fn unauthorized_tears_down_session() {
        let (transport, store, client) = setup(true);
        transport.respond(Method::Get, "/api/projects", 401, json!({"error": "expired"}));

        let err = client.call("/api/projects", RequestOptions::get()).await.unwrap_err();
        assert_eq!(err, ClientError::Unauthorized);
        assert_eq!(client.session().state(), SessionState::Unauthenticated);
        assert!(!store.contains(TOKEN_KEY));
        assert!(!store.contains(USER_KEY));
    }

    #[tokio::test]
    async fn unauthorized_without_session_is_plain_http_error() {
        let (transport, _, client) = setup(false);
        transport.respond(Method::Get, "/api/projects", 401, json!({"error": "login first"}));

        let err = client.call("/api/projects", RequestOptions::get()).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "login first");
    }

    #[tokio::test]
    async fn network_failure_propagates() {
        let (transport, _, client) = setup(true);
        transport.fail(Method::Get, "/api/projects", "connection refused");

        let err = client.call("/api/projects", RequestOptions::get()).await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
        assert!(client.session().is_authenticated());
    }

    #[test]
    fn empty_body_decodes_as_object() {
        #[derive(serde::Deserialize)]
        struct Anything {
            #[serde(default)]
            removed: usize,
        }
        let decoded: Anything = ApiBody::Empty.decode().unwrap();
        assert_eq!(decoded.removed, 0);
    }
}
