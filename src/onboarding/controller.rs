//! One-shot identity sync that runs while a freshly signed-in user waits on the
//! onboarding screen.
//!
//! The controller is driven by renders: every time the identity state changes
//! (or the host simply re-renders) [`OnboardingSync::render`] is called with the
//! current identity. The sync fires at most once per controller lifetime,
//! except that a failed attempt puts the controller back to `NotStarted`, so the
//! next render tries again.
//!
//! Attempts are not capped. A host that re-renders in a tight loop while the
//! backend keeps failing will keep calling the sync action; `attempts()` is
//! exposed so hosts can observe that.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::SyncUserRequest;
use crate::utils::AppError;

/// Where a successful sync sends the user.
pub const APP_HOME: &str = "/app";

/// Placeholder used when the identity carries neither given nor family name.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

const RETRY_WARN_THRESHOLD: u32 = 3;

#[async_trait]
pub trait SyncAction: Send + Sync {
    async fn sync_user(&self, request: &SyncUserRequest) -> Result<(), AppError>;
}

#[async_trait]
impl<T: SyncAction + ?Sized> SyncAction for Arc<T> {
    async fn sync_user(&self, request: &SyncUserRequest) -> Result<(), AppError> {
        (**self).sync_user(request).await
    }
}

pub trait Navigator {
    fn push(&mut self, path: &str);
    fn refresh(&mut self);
}

/// Profile attributes exposed by the identity provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub primary_email: Option<String>,
    pub image_url: Option<String>,
}

/// Identity provider state as seen by one render.
#[derive(Debug, Clone, Default)]
pub struct IdentityState {
    pub is_loaded: bool,
    pub user: Option<IdentityProfile>,
}

impl IdentityState {
    pub fn loading() -> Self {
        Self::default()
    }

    pub fn signed_in(profile: IdentityProfile) -> Self {
        Self {
            is_loaded: true,
            user: Some(profile),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    NotStarted,
    InFlight,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Nothing fired on this render
    Skipped,
    Synced,
    Failed,
}

/// Builds the sync payload: trimmed "first last", or the placeholder when both
/// are missing; email falls back to an empty string.
pub fn sync_payload(user_id: &str, profile: &IdentityProfile) -> SyncUserRequest {
    let full_name = format!(
        "{} {}",
        profile.first_name.as_deref().unwrap_or_default(),
        profile.last_name.as_deref().unwrap_or_default()
    );
    let name = match full_name.trim() {
        "" => DEFAULT_DISPLAY_NAME.to_string(),
        trimmed => trimmed.to_string(),
    };

    SyncUserRequest {
        id: user_id.to_string(),
        name,
        email: profile.primary_email.clone().unwrap_or_default(),
        image_url: profile.image_url.clone(),
    }
}

pub struct OnboardingSync<A, N> {
    user_id: String,
    action: A,
    navigator: N,
    state: SyncState,
    attempts: u32,
}

impl<A: SyncAction, N: Navigator> OnboardingSync<A, N> {
    pub fn new(user_id: impl Into<String>, action: A, navigator: N) -> Self {
        Self {
            user_id: user_id.into(),
            action,
            navigator,
            state: SyncState::NotStarted,
            attempts: 0,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// `NotStarted -> InFlight` when the identity is loaded and present.
    /// Returns the payload to send, or `None` if nothing should fire.
    pub fn begin(&mut self, identity: &IdentityState) -> Option<SyncUserRequest> {
        if !identity.is_loaded || self.state != SyncState::NotStarted {
            return None;
        }
        let profile = identity.user.as_ref()?;

        self.state = SyncState::InFlight;
        self.attempts += 1;
        Some(sync_payload(&self.user_id, profile))
    }

    /// Settles an in-flight attempt.
    pub fn finish(&mut self, result: Result<(), AppError>) -> RenderOutcome {
        if self.state != SyncState::InFlight {
            return RenderOutcome::Skipped;
        }

        match result {
            Ok(()) => {
                self.state = SyncState::Completed;
                self.navigator.push(APP_HOME);
                self.navigator.refresh();
                RenderOutcome::Synced
            }
            Err(e) => {
                log::error!("❌ Onboarding sync error for {}: {}", self.user_id, e);
                if self.attempts >= RETRY_WARN_THRESHOLD {
                    log::warn!(
                        "⚠️  Onboarding sync for {} has failed {} times, retrying on next render",
                        self.user_id,
                        self.attempts
                    );
                }
                self.state = SyncState::NotStarted;
                RenderOutcome::Failed
            }
        }
    }

    pub async fn render(&mut self, identity: &IdentityState) -> RenderOutcome {
        let Some(payload) = self.begin(identity) else {
            return RenderOutcome::Skipped;
        };

        let result = self.action.sync_user(&payload).await;
        self.finish(result)
    }
}

/// Navigator for hosts without a router: remembers where it was sent.
#[derive(Debug, Default)]
pub struct HeadlessNavigator {
    pub location: Option<String>,
    pub refreshes: u32,
}

impl Navigator for HeadlessNavigator {
    fn push(&mut self, path: &str) {
        log::info!("➡️  Navigating to {}", path);
        self.location = Some(path.to_string());
    }

    fn refresh(&mut self) {
        self.refreshes += 1;
    }
}
