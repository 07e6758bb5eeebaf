//! Session lifecycle
//!
//! [`SessionManager`] is the only owner of the current [`Session`] and the
//! only writer of the saved credential. It performs login, token renewal and
//! logout; it knows nothing about the authorization-retry protocol that
//! drives renewal from the request pipeline.
//!
//! Renewal is single-flight. Every installed or cleared session bumps a
//! generation counter; a caller that asks to renew after observing
//! generation `n` reuses the current session if the generation has already
//! moved past `n` while it waited on the renewal gate.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use postbox_domain::constants::{endpoints, FORGOT_PASSWORD_COMPLETE};
use postbox_domain::{
    AuthResponse, Login, PostboxError, ProfileFailurePolicy, RequestDescriptor, Result,
    SavedCredential, Session, UserRecord,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::credentials::CredentialStore;
use crate::http::{HttpResponse, HttpTransport};
use crate::pipeline::decoder::ResponseDecoder;
use crate::pipeline::request::build_request;

/// Access token paired with the session generation it came from
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    pub token: String,
    pub generation: u64,
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken").field("generation", &self.generation).finish_non_exhaustive()
    }
}

/// Result of a login that produced a session
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session: Session,
    /// Profile fetch failure, reported but not fatal under
    /// [`ProfileFailurePolicy::NonFatal`]
    pub profile_error: Option<PostboxError>,
}

#[derive(Debug, Default)]
struct SessionState {
    session: Option<Session>,
    profile: Option<UserRecord>,
    generation: u64,
}

impl SessionState {
    fn replace(&mut self, session: Option<Session>) {
        self.session = session;
        self.generation += 1;
    }
}

/// Owner of the current session and the saved credential
pub struct SessionManager {
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<dyn CredentialStore>,
    profile_policy: ProfileFailurePolicy,
    state: RwLock<SessionState>,
    renewal_gate: Mutex<()>,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn HttpTransport>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            transport,
            credentials,
            profile_policy: ProfileFailurePolicy::default(),
            state: RwLock::new(SessionState::default()),
            renewal_gate: Mutex::new(()),
        }
    }

    /// Choose what a failed profile fetch does to login
    #[must_use]
    pub fn with_profile_policy(mut self, policy: ProfileFailurePolicy) -> Self {
        self.profile_policy = policy;
        self
    }

    pub fn profile_policy(&self) -> ProfileFailurePolicy {
        self.profile_policy
    }

    pub async fn session(&self) -> Option<Session> {
        self.state.read().await.session.clone()
    }

    pub async fn user_id(&self) -> Option<String> {
        self.state.read().await.session.as_ref().map(|s| s.user_id.clone())
    }

    pub async fn expires(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.session.as_ref().map(|s| s.expires)
    }

    /// Cached current-user profile
    pub async fn profile(&self) -> Option<UserRecord> {
        self.state.read().await.profile.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.session.is_some()
    }

    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    /// Token to attach to the next dispatch, if a session is held
    pub async fn bearer(&self) -> Option<BearerToken> {
        let state = self.state.read().await;
        state
            .session
            .as_ref()
            .map(|s| BearerToken { token: s.access_token.clone(), generation: state.generation })
    }

    /// Authenticate with email and password.
    ///
    /// On success the session is replaced, the profile fetched and the
    /// credential saved with the new token pair. A failed profile fetch is
    /// handled per the configured [`ProfileFailurePolicy`].
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let body = Login::new(email, password);
        let descriptor = RequestDescriptor::post(endpoints::AUTH).with_json(&body)?.unauthenticated();

        let response = self.transport.execute(build_request(&descriptor, None)).await?;
        let session = Session::from(ResponseDecoder::decode::<AuthResponse>(&response)?);

        {
            let mut state = self.state.write().await;
            state.replace(Some(session.clone()));
            state.profile = None;
        }
        info!(user_id = %session.user_id, "session established");

        let profile_error = match self.fetch_profile(&session.access_token).await {
            Ok(profile) => {
                self.state.write().await.profile = Some(profile);
                None
            }
            Err(err) if self.profile_policy == ProfileFailurePolicy::Invalidate => {
                warn!(error = %err, "profile fetch failed; discarding new session");
                self.clear().await;
                return Err(err);
            }
            Err(err) => {
                warn!(error = %err, "profile fetch failed after login");
                Some(err)
            }
        };

        let saved =
            SavedCredential::new(email, password, &session.access_token, &session.refresh_token);
        if let Err(err) = self.credentials.save(&saved).await {
            warn!(error = %err, "failed to save credential");
        }

        Ok(LoginOutcome { session, profile_error })
    }

    /// Renew the current session.
    pub async fn renew(&self) -> Result<Session> {
        let observed = self.generation().await;
        self.renew_after(observed).await
    }

    /// Renew unless another caller already replaced the session that was
    /// current at `observed_generation`.
    #[instrument(skip(self))]
    pub async fn renew_after(&self, observed_generation: u64) -> Result<Session> {
        let _gate = self.renewal_gate.lock().await;

        {
            let state = self.state.read().await;
            if state.generation != observed_generation {
                if let Some(session) = &state.session {
                    debug!(generation = state.generation, "reusing session renewed by another caller");
                    return Ok(session.clone());
                }
            }
        }

        self.renew_serialized().await
    }

    /// Only called with the renewal gate held.
    async fn renew_serialized(&self) -> Result<Session> {
        let current = match self.session().await {
            Some(session) => session,
            None => {
                let saved = self.saved_credential().await.ok_or_else(PostboxError::no_credential)?;
                if saved.has_token_pair() {
                    let provisional = Session::provisional(
                        saved.last_access_token.as_str(),
                        saved.last_refresh_token.as_str(),
                    );
                    self.state.write().await.replace(Some(provisional.clone()));
                    debug!("seeded provisional session from saved tokens");
                    provisional
                } else if saved.has_password() {
                    return self.relogin(&saved).await;
                } else {
                    return Err(PostboxError::no_credential());
                }
            }
        };

        match self.exchange_refresh_token(&current).await {
            Ok(renewed) => {
                self.state.write().await.replace(Some(renewed.clone()));
                info!(user_id = %renewed.user_id, "session renewed");

                if let Err(err) =
                    self.credentials.save_tokens(&renewed.access_token, &renewed.refresh_token).await
                {
                    warn!(error = %err, "failed to save renewed tokens");
                }
                self.ensure_profile(&renewed).await;
                Ok(renewed)
            }
            Err(err) => {
                warn!(error = %err, "refresh token rejected");
                match self.saved_credential().await.filter(SavedCredential::has_password) {
                    Some(saved) => self.relogin(&saved).await,
                    None => {
                        // Nothing left to renew with
                        if err.is_remote() {
                            self.clear().await;
                        }
                        Err(err)
                    }
                }
            }
        }
    }

    /// Fall back to a fresh login with the saved password.
    async fn relogin(&self, saved: &SavedCredential) -> Result<Session> {
        debug!("falling back to login with saved credential");
        match self.login(&saved.email, &saved.password).await {
            Ok(outcome) => Ok(outcome.session),
            Err(err) => {
                if err.is_remote() {
                    warn!(error = %err, "saved credential rejected; clearing session");
                    self.clear().await;
                }
                Err(err)
            }
        }
    }

    async fn exchange_refresh_token(&self, current: &Session) -> Result<Session> {
        let endpoint = format!(
            "{}?refreshToken={}",
            endpoints::RENEW,
            urlencoding::encode(&current.refresh_token)
        );
        let descriptor = RequestDescriptor::get(endpoint);
        let response = self
            .transport
            .execute(build_request(&descriptor, Some(&current.access_token)))
            .await?;

        let mut renewed = Session::from(ResponseDecoder::decode::<AuthResponse>(&response)?);
        if renewed.user_id.is_empty() {
            renewed.user_id.clone_from(&current.user_id);
        }
        Ok(renewed)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<UserRecord> {
        let descriptor = RequestDescriptor::get(endpoints::CURRENT_USER);
        let response = self.transport.execute(build_request(&descriptor, Some(access_token))).await?;
        ResponseDecoder::decode(&response)
    }

    async fn ensure_profile(&self, session: &Session) {
        if self.state.read().await.profile.is_some() {
            return;
        }
        match self.fetch_profile(&session.access_token).await {
            Ok(profile) => self.state.write().await.profile = Some(profile),
            Err(err) => warn!(error = %err, "profile fetch failed after renewal"),
        }
    }

    async fn saved_credential(&self) -> Option<SavedCredential> {
        match self.credentials.load().await {
            Ok(saved) => saved,
            Err(err) => {
                warn!(error = %err, "failed to load saved credential");
                None
            }
        }
    }

    /// Cold-start helper: renew from the saved credential when no session is held.
    pub async fn restore(&self) -> Result<Option<Session>> {
        if let Some(session) = self.session().await {
            return Ok(Some(session));
        }
        self.renew().await.map(Some)
    }

    /// Drop the session and delete the saved credential. Idempotent.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        self.clear().await;
        self.credentials.delete().await?;
        info!("logged out");
        Ok(())
    }

    async fn clear(&self) {
        let mut state = self.state.write().await;
        state.replace(None);
        state.profile = None;
    }

    /// Request a password reset. Returns the completion message.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn forgot_password(&self, email: &str, password: &str) -> Result<String> {
        self.post_credentials(endpoints::FORGOT_PASSWORD, email, password).await?;
        Ok(FORGOT_PASSWORD_COMPLETE.to_string())
    }

    /// Register a new account. Returns the service's response body.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(&self, email: &str, password: &str) -> Result<String> {
        self.post_credentials(endpoints::REGISTER, email, password).await
    }

    async fn post_credentials(&self, endpoint: &str, email: &str, password: &str) -> Result<String> {
        let descriptor = RequestDescriptor::post(endpoint)
            .with_json(&Login::new(email, password))?
            .unauthenticated();
        let response: HttpResponse = self.transport.execute(build_request(&descriptor, None)).await?;
        ResponseDecoder::raw(&response)
    }
}
