//! Optimistic follow / wishlist toggles.
//!
//! A gesture flips the relationship locally, sends one request and then
//! either keeps the new state or restores the exact pre-gesture snapshot.
//! The snapshot is restored rather than the delta undone because other
//! users move the follower count underneath us and we never see it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::api::MarketplaceApi;
use crate::auth::AuthStore;
use crate::core::errors::ApiError;
use crate::core::helpers::{lock, new_request_id};
use crate::lifecycle::Mounted;
use crate::models::models::{FollowTarget, Product, RelationshipKind, RelationshipState};
use crate::notify::{Notice, Notifier};

pub const FOLLOW_LOGIN_REQUIRED: &str = "Please log in to follow users";
pub const WISHLIST_LOGIN_REQUIRED: &str = "Please log in to use your wishlist";
pub const SELF_FOLLOW: &str = "You cannot follow yourself";
pub const TOGGLE_FAILED: &str = "Something went wrong. Please try again.";

/// Collaborators a controller is wired to.
#[derive(Clone)]
pub struct Collaborators {
    pub api: Arc<dyn MarketplaceApi>,
    pub auth: AuthStore,
    pub notifier: Arc<dyn Notifier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Server accepted; the optimistic state stands.
    Committed,
    /// Server refused or was unreachable; the snapshot was restored.
    RolledBack,
    AuthRequired,
    SelfTarget,
    /// Another toggle on this control is still outstanding.
    Busy,
    /// The view went away; nothing was written or sent.
    Detached,
    /// The pending toggle belongs to another control and was ignored.
    Mismatched,
}

/// Releases the in-flight slot when dropped, whichever way the request ends.
struct FlightLock(Arc<AtomicBool>);

impl Drop for FlightLock {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A toggle that has been applied locally and awaits the server.
pub struct PendingToggle {
    snapshot: RelationshipState,
    requested: bool,
    token: String,
    request_id: Uuid,
    _lock: FlightLock,
}

impl PendingToggle {
    fn started_on(&self, in_flight: &Arc<AtomicBool>) -> bool {
        Arc::ptr_eq(&self._lock.0, in_flight)
    }

    pub fn snapshot(&self) -> RelationshipState {
        self.snapshot
    }

    /// Relationship state being asked for.
    pub fn requested(&self) -> bool {
        self.requested
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}

pub struct InteractionController {
    kind: RelationshipKind,
    target_id: String,
    deps: Collaborators,
    state: Mutex<RelationshipState>,
    in_flight: Arc<AtomicBool>,
    mounted: Mounted,
}

impl InteractionController {
    pub fn new(
        kind: RelationshipKind,
        target_id: impl Into<String>,
        initial: RelationshipState,
        deps: Collaborators,
    ) -> Self {
        Self {
            kind,
            target_id: target_id.into(),
            deps,
            state: Mutex::new(initial),
            in_flight: Arc::new(AtomicBool::new(false)),
            mounted: Mounted::new(),
        }
    }

    pub fn follow(target: &FollowTarget, deps: Collaborators) -> Self {
        Self::new(
            RelationshipKind::Follow,
            target.id.clone(),
            RelationshipState::from(target),
            deps,
        )
    }

    pub fn wishlist(product: &Product, deps: Collaborators) -> Self {
        Self::new(
            RelationshipKind::Wishlist,
            product.id.clone(),
            RelationshipState::from(product),
            deps,
        )
    }

    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn state(&self) -> RelationshipState {
        *lock(&self.state)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn mounted(&self) -> Mounted {
        self.mounted.clone()
    }

    pub fn unmount(&self) {
        self.mounted.unmount();
    }

    /// Run one full gesture: guards, optimistic flip, request, reconcile.
    pub async fn toggle(&self) -> ToggleOutcome {
        let pending = match self.begin() {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };
        let result = self.send(&pending).await;
        self.settle(pending, result)
    }

    /// Check the guards and apply the flip locally. Nothing is sent and
    /// nothing changes when a guard fails.
    pub fn begin(&self) -> Result<PendingToggle, ToggleOutcome> {
        if !self.mounted.is_mounted() {
            return Err(ToggleOutcome::Detached);
        }

        let actor = match self.deps.auth.actor() {
            Some(actor) => actor,
            None => {
                let msg = match self.kind {
                    RelationshipKind::Follow => FOLLOW_LOGIN_REQUIRED,
                    RelationshipKind::Wishlist => WISHLIST_LOGIN_REQUIRED,
                };
                self.deps.notifier.notify(Notice::info(msg));
                return Err(ToggleOutcome::AuthRequired);
            }
        };

        if self.kind == RelationshipKind::Follow && actor.id == self.target_id {
            self.deps.notifier.notify(Notice::info(SELF_FOLLOW));
            return Err(ToggleOutcome::SelfTarget);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(target_id = %self.target_id, "toggle already in flight");
            return Err(ToggleOutcome::Busy);
        }
        let flight = FlightLock(self.in_flight.clone());

        let mut state = lock(&self.state);
        let snapshot = *state;
        *state = snapshot.flipped();

        Ok(PendingToggle {
            snapshot,
            requested: state.active,
            token: actor.token,
            request_id: new_request_id(),
            _lock: flight,
        })
    }

    async fn send(&self, pending: &PendingToggle) -> Result<(), ApiError> {
        let api = &self.deps.api;
        let (token, id) = (&pending.token, pending.request_id);
        match self.kind {
            RelationshipKind::Follow => api.toggle_follow(token, &self.target_id, id).await,
            RelationshipKind::Wishlist => api.toggle_wishlist(token, &self.target_id, id).await,
        }
    }

    /// Reconcile with the server's answer and free the in-flight slot.
    /// Only accepts toggles started by this control's own `begin`.
    pub fn settle(&self, pending: PendingToggle, result: Result<(), ApiError>) -> ToggleOutcome {
        if !pending.started_on(&self.in_flight) {
            tracing::warn!(
                target_id = %self.target_id,
                request_id = %pending.request_id,
                "pending toggle from another control ignored"
            );
            return ToggleOutcome::Mismatched;
        }

        if !self.mounted.is_mounted() {
            tracing::debug!(
                target_id = %self.target_id,
                request_id = %pending.request_id,
                "response after unmount dropped"
            );
            return ToggleOutcome::Detached;
        }

        match result {
            Ok(()) => {
                tracing::debug!(
                    target_id = %self.target_id,
                    active = pending.requested,
                    "toggle committed"
                );
                ToggleOutcome::Committed
            }
            Err(err) => {
                tracing::warn!(
                    kind = ?self.kind,
                    target_id = %self.target_id,
                    request_id = %pending.request_id,
                    error = %err,
                    "toggle failed, rolling back"
                );
                *lock(&self.state) = pending.snapshot;
                self.deps.notifier.notify(Notice::error(TOGGLE_FAILED));
                ToggleOutcome::RolledBack
            }
        }
    }
}
