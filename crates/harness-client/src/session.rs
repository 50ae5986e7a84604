//! Session Manager
//!
//! Two-state machine (Unauthenticated / Authenticated) persisted in durable
//! storage under fixed keys. Subscribers hear about every transition so the
//! UI can swap between the login screen and the main layout.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{ClientError, ClientResult};
use crate::models::User;
use crate::storage::{KeyValueStore, TOKEN_KEY, USER_KEY};
use crate::transport::HttpRequest;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated { token: String, user: Option<User> },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated { user, .. } => user.as_ref(),
            SessionState::Unauthenticated => None,
        }
    }
}

/// Why the session changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut,
    /// Server answered 401 to an authenticated request
    Expired,
}

type Listener = Rc<dyn Fn(SessionEvent, &SessionState)>;

pub struct SessionManager {
    store: Rc<dyn KeyValueStore>,
    state: RefCell<SessionState>,
    listeners: RefCell<Vec<Listener>>,
}

impl SessionManager {
    /// Restore whatever session the store holds. An unreadable user record
    /// keeps the token but drops the user.
    pub fn load(store: Rc<dyn KeyValueStore>) -> ClientResult<Self> {
        let state = match store.get(TOKEN_KEY)? {
            Some(token) if !token.is_empty() => {
                let user = match store.get(USER_KEY)? {
                    Some(raw) => serde_json::from_str::<Option<User>>(&raw).unwrap_or_else(|e| {
                        log::warn!("Discarding unreadable stored user: {}", e);
                        None
                    }),
                    None => None,
                };
                SessionState::Authenticated { token, user }
            }
            _ => SessionState::Unauthenticated,
        };

        Ok(Self {
            store,
            state: RefCell::new(state),
            listeners: RefCell::new(Vec::new()),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn token(&self) -> Option<String> {
        match &*self.state.borrow() {
            SessionState::Authenticated { token, .. } => Some(token.clone()),
            SessionState::Unauthenticated => None,
        }
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn subscribe(&self, listener: impl Fn(SessionEvent, &SessionState) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Login/register succeeded
    pub fn set_auth(&self, token: String, user: User) -> ClientResult<()> {
        let user_json = serde_json::to_string(&user)?;
        self.store.set(TOKEN_KEY, &token)?;
        self.store.set(USER_KEY, &user_json)?;
        log::info!("Signed in as {}", user.username);
        self.transition(
            SessionState::Authenticated {
                token,
                user: Some(user),
            },
            SessionEvent::LoggedIn,
        );
        Ok(())
    }

    pub fn logout(&self) -> ClientResult<()> {
        self.clear()?;
        log::info!("Signed out");
        self.transition(SessionState::Unauthenticated, SessionEvent::LoggedOut);
        Ok(())
    }

    /// Forced teardown after a 401. Storage errors are logged, never
    /// propagated: the in-memory session is dropped regardless.
    pub fn expire(&self) {
        if let Err(e) = self.clear() {
            log::error!("Failed to clear stored session: {}", e);
        }
        log::warn!("Session expired, returning to login");
        self.transition(SessionState::Unauthenticated, SessionEvent::Expired);
    }

    /// `Authorization` and `Content-Type` headers for the current token
    pub fn auth_headers(&self) -> ClientResult<Vec<(String, String)>> {
        let token = self.token().ok_or(ClientError::MissingToken)?;
        Ok(vec![
            ("Authorization".to_string(), format!("Bearer {}", token)),
            ("Content-Type".to_string(), "application/json".to_string()),
        ])
    }

    /// Add auth headers to a request. Headers already on the request win.
    pub fn decorate(&self, request: &mut HttpRequest) -> ClientResult<()> {
        let caller_headers = std::mem::replace(&mut request.headers, self.auth_headers()?);
        for (name, value) in caller_headers {
            request.set_header(&name, &value);
        }
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        Ok(())
    }

    fn transition(&self, next: SessionState, event: SessionEvent) {
        *self.state.borrow_mut() = next;
        // Listeners may call back into the manager; do not hold borrows.
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        let state = self.state();
        for listener in listeners {
            listener(event, &state);
        }
    }
}

/// Client-side checks run before a register request goes out
pub fn validate_registration(username: &str, password: &str) -> ClientResult<()> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ClientError::validation(format!(
            "Username must be at least {} characters long",
            MIN_USERNAME_LEN
        )));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
