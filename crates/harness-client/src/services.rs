//! Service Graph
//!
//! Everything the dashboard needs, built once at startup and handed to the
//! UI. Cloning shares the same instances.

use std::rc::Rc;

use crate::api::Api;
use crate::client::ResourceClient;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::notify::Notifier;
use crate::session::SessionManager;
use crate::storage::KeyValueStore;
use crate::todos::TodoList;
use crate::transport::Transport;
use crate::view::ViewController;

#[derive(Clone)]
pub struct Services {
    pub config: Rc<ClientConfig>,
    pub store: Rc<dyn KeyValueStore>,
    pub session: Rc<SessionManager>,
    pub client: Rc<ResourceClient>,
    pub api: Rc<Api>,
    pub todos: Rc<TodoList>,
    pub views: Rc<ViewController>,
    pub notifier: Rc<Notifier>,
}

impl Services {
    /// `base_url` is the already-resolved API origin
    pub fn new(
        config: ClientConfig,
        base_url: &str,
        transport: Rc<dyn Transport>,
        store: Rc<dyn KeyValueStore>,
    ) -> ClientResult<Self> {
        let session = Rc::new(SessionManager::load(store.clone())?);
        let client = Rc::new(ResourceClient::new(base_url, transport, session.clone()));
        let api = Rc::new(Api::new(client.clone()));
        let todos = Rc::new(TodoList::new(api.clone()));
        let views = Rc::new(ViewController::new(
            api.clone(),
            todos.clone(),
            config.recent_executions_limit,
        ));
        log::info!(
            "Services ready (api: {}, authenticated: {})",
            if base_url.is_empty() { "same origin" } else { base_url },
            session.is_authenticated()
        );
        Ok(Self {
            config: Rc::new(config),
            store,
            session,
            client,
            api,
            todos,
            views,
            notifier: Rc::new(Notifier::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, TOKEN_KEY, USER_KEY};
    use crate::test_support::ScriptedTransport;
    use crate::transport::Method;
    use serde_json::json;

    #[tokio::test]
    async fn stored_session_is_restored_and_shared() {
        let store = Rc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "abc").unwrap();
        store
            .set(USER_KEY, r#"{"id":1,"username":"admin"}"#)
            .unwrap();
        let transport = Rc::new(ScriptedTransport::new());
        transport.respond(Method::Get, "/api/todos", 401, json!({"error": "expired"}));

        let services =
            Services::new(ClientConfig::default(), "", transport.clone(), store.clone()).unwrap();
        assert!(services.session.is_authenticated());
        assert_eq!(
            transport.requests().len(),
            0,
            "construction performs no requests"
        );

        assert!(services.todos.reload().await.is_err());
        // the 401 went through the same session the views see
        assert!(!services.session.is_authenticated());
        assert!(!store.contains(TOKEN_KEY));
        let auth = transport.requests()[0].header("Authorization").map(str::to_string);
        assert_eq!(auth.as_deref(), Some("Bearer abc"));
    }
}
