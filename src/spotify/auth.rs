use std::{net::SocketAddr, sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, StatusCode, Url};
use tokio::sync::{Mutex, OnceCell, oneshot};

use crate::{
    Res,
    config::SpotifySettings,
    errors::{Error, ensure_success},
    info,
    management::{TokenCache, Validity},
    server::start_api_server,
    success,
    types::{AuthPhase, AuthSession, CallbackParams, TokenResponse, TokenState},
    utils, warning,
};

/// Drives the Authorization Code flow and owns the token cache.
///
/// Cloning is cheap; every clone shares the same token state, the same
/// pending session and the same callback listener.
///
/// # Authentication Flow
///
/// 1. **Session**: a fresh random `state` is issued and stored
/// 2. **Listener**: the loopback server is bound once and left running
/// 3. **Browser**: `/login` is opened, which redirects to Spotify
/// 4. **Callback**: `/callback` checks `state`, exchanges the code and
///    resolves the one-shot signal the flow is waiting on
/// 5. **Re-check**: the new token is probed before the flow succeeds
#[derive(Clone)]
pub struct SpotifyAuth {
    inner: Arc<AuthInner>,
}

struct AuthInner {
    http: Client,
    settings: SpotifySettings,
    tokens: Mutex<TokenCache>,
    pending: Mutex<Option<PendingSession>>,
    phase: Mutex<AuthPhase>,
    // serialises flows so only one session is live at a time
    flow: Mutex<()>,
    listener: OnceCell<SocketAddr>,
}

struct PendingSession {
    session: AuthSession,
    done: oneshot::Sender<Res<()>>,
}

/// Handle returned when a session starts; resolves once the callback has been handled.
pub struct PendingLogin {
    pub session: AuthSession,
    completion: oneshot::Receiver<Res<()>>,
}

impl PendingLogin {
    /// Waits for the callback outcome. `None` waits indefinitely.
    pub async fn wait(self, timeout: Option<Duration>) -> Res<()> {
        let outcome = match timeout {
            Some(limit) => tokio::time::timeout(limit, self.completion)
                .await
                .map_err(|_| {
                    Error::AuthenticationFailed(format!(
                        "no callback received within {}s",
                        limit.as_secs()
                    ))
                })?,
            None => self.completion.await,
        };

        outcome.map_err(|_| {
            Error::AuthenticationFailed("login was superseded or abandoned".to_string())
        })?
    }
}

impl SpotifyAuth {
    pub fn new(settings: SpotifySettings) -> Self {
        Self::with_token_state(settings, TokenState::default())
    }

    /// Starts from an already known token instead of an empty cache.
    pub fn with_token_state(settings: SpotifySettings, state: TokenState) -> Self {
        SpotifyAuth {
            inner: Arc::new(AuthInner {
                http: Client::new(),
                settings,
                tokens: Mutex::new(TokenCache::from_state(state)),
                pending: Mutex::new(None),
                phase: Mutex::new(AuthPhase::Idle),
                flow: Mutex::new(()),
                listener: OnceCell::new(),
            }),
        }
    }

    pub fn settings(&self) -> &SpotifySettings {
        &self.inner.settings
    }

    pub async fn phase(&self) -> AuthPhase {
        *self.inner.phase.lock().await
    }

    /// Address of the callback listener, once it has been bound.
    pub fn listening_addr(&self) -> Option<SocketAddr> {
        self.inner.listener.get().copied()
    }

    pub async fn token_state(&self) -> TokenState {
        self.inner.tokens.lock().await.state().clone()
    }

    /// Tiered validity check: expiry, then the verification window, then a live probe.
    pub async fn is_token_valid(&self) -> bool {
        let token = match self.inner.tokens.lock().await.check(Utc::now()) {
            Validity::Fresh => return true,
            Validity::Missing | Validity::Expired => return false,
            Validity::NeedsProbe(token) => token,
        };

        if !self.probe(&token).await {
            return false;
        }

        self.inner.tokens.lock().await.mark_verified(Utc::now());
        true
    }

    async fn probe(&self, token: &str) -> bool {
        let url = format!("{}/me", self.inner.settings.api_url.trim_end_matches('/'));
        match self.inner.http.get(&url).bearer_auth(token).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(_) => false,
        }
    }

    /// The cached token for an `Authorization: Bearer` header.
    pub async fn bearer(&self) -> Res<String> {
        self.inner.tokens.lock().await.bearer(Utc::now())
    }

    /// Makes sure a usable token is cached, running the login flow if it is not.
    ///
    /// Every Spotify call goes through this gate. Concurrent callers are
    /// serialised, so at most one login session is in flight and a token
    /// obtained by one caller is reused by the next.
    ///
    /// # Validity Check
    ///
    /// 1. **Expiry**: a missing or expired token always triggers a login
    /// 2. **Window**: a token verified within the last 600 seconds is accepted
    ///    offline and the window restarts
    /// 3. **Live check**: otherwise one `GET /me` decides; a 200 marks it verified
    ///
    /// # Login Flow
    ///
    /// When the check fails a new anti-forgery `state` is issued, the callback
    /// listener is bound (first time only) and `/login` is opened in the
    /// browser, or printed when `open_browser` is off. The call then waits for
    /// `/callback`, bounded by `auth_timeout` when one is configured, and
    /// re-checks the new token before returning.
    ///
    /// # Errors
    ///
    /// - [`Error::StateMismatch`] when the callback carries a foreign `state`
    /// - [`Error::AuthenticationFailed`] when the user denies access, the code
    ///   exchange fails, the wait times out, or the new token is rejected
    /// - [`Error::Io`] when the callback listener cannot be bound
    ///
    /// On error the pending session is discarded and the phase becomes
    /// [`AuthPhase::Failed`].
    ///
    /// # Example
    ///
    /// ```
    /// let auth = SpotifyAuth::new(settings.spotify);
    /// auth.ensure_access_token().await?;
    /// let token = auth.bearer().await?;
    /// ```
    pub async fn ensure_access_token(&self) -> Res<()> {
        let _flow = self.inner.flow.lock().await;
        if self.is_token_valid().await {
            return Ok(());
        }

        info!("Spotify authorization required");
        match self.authorize().await {
            Ok(()) => {
                self.set_phase(AuthPhase::Authenticated).await;
                success!("Spotify token is valid.");
                Ok(())
            }
            Err(e) => {
                self.inner.pending.lock().await.take();
                self.set_phase(AuthPhase::Failed).await;
                Err(e)
            }
        }
    }

    async fn authorize(&self) -> Res<()> {
        let pending = self.start_session().await;
        let addr = self.ensure_listener().await?;
        let login_url = format!("http://{}/login", addr);

        if !self.inner.settings.open_browser {
            info!("Open the following URL to log in to Spotify:\n{}", login_url);
        } else if webbrowser::open(&login_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                login_url
            );
        }

        self.set_phase(AuthPhase::AwaitingCallback).await;
        info!("Waiting for the Spotify login to complete...");
        pending.wait(self.inner.settings.auth_timeout).await?;

        if !self.is_token_valid().await {
            return Err(Error::AuthenticationFailed(
                "token was rejected after login".to_string(),
            ));
        }
        Ok(())
    }

    /// Binds the callback listener on first use and returns its address.
    pub async fn ensure_listener(&self) -> Res<SocketAddr> {
        let addr = self
            .inner
            .listener
            .get_or_try_init(|| start_api_server(self.clone()))
            .await?;
        Ok(*addr)
    }

    /// Issues a new anti-forgery state, replacing any session still in flight.
    pub async fn start_session(&self) -> PendingLogin {
        let session = AuthSession {
            state: utils::generate_state(),
            created_at: Utc::now(),
        };
        let (done, completion) = oneshot::channel();

        // dropping an older sender fails whoever still waits on it
        *self.inner.pending.lock().await = Some(PendingSession {
            session: session.clone(),
            done,
        });
        self.set_phase(AuthPhase::AwaitingUserLogin).await;

        PendingLogin {
            session,
            completion,
        }
    }

    pub fn authorize_url(&self, session: &AuthSession) -> Res<String> {
        let settings = &self.inner.settings;
        let mut url = Url::parse(&settings.auth_url).map_err(|e| {
            Error::Config(format!("invalid authorize url {}: {}", settings.auth_url, e))
        })?;

        url.query_pairs_mut()
            .append_pair("client_id", &settings.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &settings.redirect_uri)
            .append_pair("scope", &settings.scope)
            .append_pair("state", &session.state);

        Ok(url.to_string())
    }

    /// Authorize URL for the session currently in flight.
    pub async fn login_url(&self) -> Res<String> {
        let pending = self.inner.pending.lock().await;
        match pending.as_ref() {
            Some(p) => self.authorize_url(&p.session),
            None => Err(Error::AuthenticationFailed(
                "no login in progress".to_string(),
            )),
        }
    }

    /// Handles the provider redirect and resolves the pending session with the outcome.
    ///
    /// The session is consumed whatever the outcome, so a forged callback
    /// ends the flow instead of leaving it open for another attempt.
    pub async fn complete_login(&self, params: &CallbackParams) -> Res<()> {
        let Some(pending) = self.inner.pending.lock().await.take() else {
            return Err(Error::AuthenticationFailed(
                "no login in progress".to_string(),
            ));
        };

        let result = self.redeem(&pending.session, params).await;
        if result.is_err() {
            self.set_phase(AuthPhase::Failed).await;
        }

        let _ = pending.done.send(result.clone());
        result
    }

    async fn redeem(&self, session: &AuthSession, params: &CallbackParams) -> Res<()> {
        let returned = params.state.as_deref().unwrap_or_default();
        if !utils::constant_time_eq(returned, &session.state) {
            return Err(Error::StateMismatch);
        }

        if let Some(reason) = params.error.as_deref() {
            return Err(Error::AuthenticationFailed(format!(
                "authorization was denied: {}",
                reason
            )));
        }

        let code = params
            .code
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                Error::AuthenticationFailed("callback carried no authorization code".to_string())
            })?;

        let token = self.exchange_code(code).await?;
        self.inner
            .tokens
            .lock()
            .await
            .store(token.access_token, token.expires_in, Utc::now())
    }

    /// Server-to-server exchange of an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Res<TokenResponse> {
        let settings = &self.inner.settings;
        let response = self
            .inner
            .http
            .post(&settings.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", settings.redirect_uri.as_str()),
                ("client_id", settings.client_id.as_str()),
                ("client_secret", settings.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::AuthenticationFailed(format!("token exchange failed: {}", e)))?;

        let response = ensure_success(response, "token exchange")
            .await
            .map_err(|e| Error::AuthenticationFailed(e.to_string()))?;

        response.json::<TokenResponse>().await.map_err(|e| {
            Error::AuthenticationFailed(format!("unreadable token response: {}", e))
        })
    }

    async fn set_phase(&self, phase: AuthPhase) {
        *self.inner.phase.lock().await = phase;
    }
}
