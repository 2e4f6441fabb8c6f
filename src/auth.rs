use tokio::sync::watch;

use crate::models::models::Actor;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub actor: Option<Actor>,
    pub ready: bool,
}

/// Shared auth state handed to the controllers that need it.
///
/// Starts not ready with no actor. Whoever restores the session calls
/// [`AuthStore::resolve`] once it knows the answer, signed in or anonymous.
#[derive(Clone)]
pub struct AuthStore {
    tx: watch::Sender<AuthState>,
}

impl AuthStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::default());
        Self { tx }
    }

    pub fn resolve(&self, actor: Option<Actor>) {
        tracing::debug!(signed_in = actor.is_some(), "auth resolved");
        self.tx.send_replace(AuthState { actor, ready: true });
    }

    pub fn sign_out(&self) {
        self.tx.send_modify(|state| {
            state.actor = None;
            state.ready = true;
        });
    }

    pub fn actor(&self) -> Option<Actor> {
        self.tx.borrow().actor.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.tx.borrow().ready
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait until the store reports readiness. Returns `false` if the store was
/// dropped before that happened.
pub async fn wait_ready(rx: &mut watch::Receiver<AuthState>) -> bool {
    rx.wait_for(|state| state.ready).await.is_ok()
}
