use chrono::{DateTime, Duration, Utc};

use crate::{Res, errors::Error, types::TokenState};

/// Seconds during which a previous validity check is reused without a probe.
pub const VERIFY_WINDOW_SECS: i64 = 600;

/// Outcome of the offline part of the validity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    /// No token has been stored yet.
    Missing,
    Expired,
    /// Verified within the window; the window was restarted.
    Fresh,
    /// The window elapsed; the caller must probe with this token.
    NeedsProbe(String),
}

/// Holds the access token, its expiry and the last time it was verified.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    state: TokenState,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: TokenState) -> Self {
        TokenCache { state }
    }

    pub fn state(&self) -> &TokenState {
        &self.state
    }

    /// Runs the expiry check and the debounce window.
    ///
    /// A hit inside the window restarts it, so steady traffic never probes
    /// while the token has not expired.
    pub fn check(&mut self, now: DateTime<Utc>) -> Validity {
        let Some(token) = self.state.access_token.as_ref() else {
            return Validity::Missing;
        };
        if now >= self.state.expires_at {
            return Validity::Expired;
        }

        match self.state.last_verified_at {
            Some(verified) if now - verified <= Duration::seconds(VERIFY_WINDOW_SECS) => {
                self.state.last_verified_at = Some(now);
                Validity::Fresh
            }
            _ => Validity::NeedsProbe(token.clone()),
        }
    }

    pub fn mark_verified(&mut self, now: DateTime<Utc>) {
        self.state.last_verified_at = Some(now);
    }

    /// Stores a freshly exchanged token. It counts as unverified until probed.
    ///
    /// An `expires_in` that cannot be represented as an expiry instant is
    /// rejected and the previous state is kept.
    pub fn store(&mut self, access_token: String, expires_in: i64, now: DateTime<Utc>) -> Res<()> {
        let expires_at = Duration::try_seconds(expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                Error::AuthenticationFailed(format!("token lifetime out of range: {}", expires_in))
            })?;

        self.state = TokenState {
            access_token: Some(access_token),
            expires_at,
            last_verified_at: None,
        };
        Ok(())
    }

    /// The token to send as a bearer credential.
    pub fn bearer(&self, now: DateTime<Utc>) -> Res<String> {
        match self.state.access_token.as_ref() {
            Some(token) if now < self.state.expires_at => Ok(token.clone()),
            _ => Err(Error::TokenExpired),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with(expires_in: i64, verified_ago: Option<i64>, now: DateTime<Utc>) -> TokenCache {
        TokenCache::from_state(TokenState {
            access_token: Some("token".to_string()),
            expires_at: now + Duration::seconds(expires_in),
            last_verified_at: verified_ago.map(|ago| now - Duration::seconds(ago)),
        })
    }

    #[test]
    fn empty_cache_is_missing() {
        let mut cache = TokenCache::new();
        assert_eq!(cache.check(Utc::now()), Validity::Missing);
        assert_eq!(cache.bearer(Utc::now()), Err(Error::TokenExpired));
    }

    #[test]
    fn expired_token_is_rejected_even_if_recently_verified() {
        let now = Utc::now();
        let mut cache = cache_with(-1, Some(5), now);

        assert_eq!(cache.check(now), Validity::Expired);
        assert_eq!(cache.bearer(now), Err(Error::TokenExpired));
    }

    #[test]
    fn expiry_boundary_counts_as_expired() {
        let now = Utc::now();
        let mut cache = cache_with(0, Some(0), now);
        assert_eq!(cache.check(now), Validity::Expired);
    }

    #[test]
    fn check_inside_window_is_fresh_and_restarts_window() {
        let now = Utc::now();
        let mut cache = cache_with(3600, Some(VERIFY_WINDOW_SECS), now);

        assert_eq!(cache.check(now), Validity::Fresh);
        assert_eq!(cache.state().last_verified_at, Some(now));
    }

    #[test]
    fn check_after_window_needs_probe() {
        let now = Utc::now();
        let mut cache = cache_with(3600, Some(VERIFY_WINDOW_SECS + 1), now);

        assert_eq!(cache.check(now), Validity::NeedsProbe("token".to_string()));
        // untouched until the probe succeeds
        assert_eq!(
            cache.state().last_verified_at,
            Some(now - Duration::seconds(VERIFY_WINDOW_SECS + 1))
        );
    }

    #[test]
    fn never_verified_token_needs_probe() {
        let now = Utc::now();
        let mut cache = cache_with(3600, None, now);
        assert_eq!(cache.check(now), Validity::NeedsProbe("token".to_string()));
    }

    #[test]
    fn store_replaces_token_and_clears_verification() {
        let now = Utc::now();
        let mut cache = cache_with(3600, Some(1), now);

        cache.store("fresh".to_string(), 3600, now).unwrap();

        assert_eq!(cache.state().access_token.as_deref(), Some("fresh"));
        assert_eq!(cache.state().expires_at, now + Duration::seconds(3600));
        assert_eq!(cache.state().last_verified_at, None);
        assert_eq!(cache.bearer(now), Ok("fresh".to_string()));
    }

    #[test]
    fn store_rejects_out_of_range_lifetime() {
        let now = Utc::now();
        let mut cache = cache_with(3600, Some(1), now);

        for expires_in in [i64::MAX, i64::MIN] {
            assert!(matches!(
                cache.store("huge".to_string(), expires_in, now),
                Err(Error::AuthenticationFailed(_))
            ));
        }
        assert_eq!(cache.state().access_token.as_deref(), Some("token"));
    }
}
