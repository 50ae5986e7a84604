//! Scripted transport for client tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::Api;
use crate::client::ResourceClient;
use crate::error::{ClientError, ClientResult};
use crate::models::User;
use crate::session::SessionManager;
use crate::storage::MemoryStore;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};

type Route = (Method, String);

/// Answers each (method, path) from a FIFO of canned responses and records
/// every request. Unscripted routes answer 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: RefCell<HashMap<Route, VecDeque<ClientResult<HttpResponse>>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.push(method, path, Ok(HttpResponse::new(status, body.to_string())));
    }

    pub fn respond_raw(&self, method: Method, path: &str, status: u16, body: &str) {
        self.push(method, path, Ok(HttpResponse::new(status, body)));
    }

    pub fn fail(&self, method: Method, path: &str, message: &str) {
        self.push(method, path, Err(ClientError::Network(message.to_string())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    /// Paths hit with `method`, in order
    pub fn paths(&self, method: Method) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method)
            .map(|r| path_of(&r.url).to_string())
            .collect()
    }

    fn push(&self, method: Method, path: &str, response: ClientResult<HttpResponse>) {
        self.routes
            .borrow_mut()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let key = (request.method, path_of(&request.url).to_string());
        self.requests.borrow_mut().push(request);
        self.routes
            .borrow_mut()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(HttpResponse::new(404, r#"{"error":"Not found"}"#)))
    }
}

fn path_of(url: &str) -> &str {
    match url.split_once("://") {
        Some((_, rest)) => rest.find('/').map(|i| &rest[i..]).unwrap_or("/"),
        None => url,
    }
}

pub struct Fixture {
    pub transport: Rc<ScriptedTransport>,
    pub store: Rc<MemoryStore>,
    pub session: Rc<SessionManager>,
    pub api: Rc<Api>,
}

/// Logged-in API over a scripted transport
pub fn fixture() -> Fixture {
    let transport = Rc::new(ScriptedTransport::new());
    let store = Rc::new(MemoryStore::new());
    let session = Rc::new(SessionManager::load(store.clone()).expect("memory store"));
    session
        .set_auth(
            "test-token".into(),
            User {
                id: 1,
                username: "admin".into(),
                email: None,
            },
        )
        .expect("memory store");
    let client = Rc::new(ResourceClient::new("", transport.clone(), session.clone()));
    Fixture {
        transport,
        store,
        session,
        api: Rc::new(Api::new(client)),
    }
}
