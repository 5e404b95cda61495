//! Access/refresh token lifecycle for the pollution API.

/// Where the client currently stands with the upstream's auth scheme.
///
/// Recovery from a 401 walks these states explicitly instead of nesting
/// conditional retries: `Active` -> `Expired` -> (refresh or login) ->
/// `Active`, giving up to `LoggedOut`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// Never logged in, or a failed recovery cleared everything
    #[default]
    LoggedOut,

    /// Holding an access token the upstream has not rejected
    Active {
        access: String,
        refresh: Option<String>,
    },

    /// Access token rejected; a refresh token may still rescue us
    Expired { refresh: Option<String> },
}

impl Session {
    /// Current access token, if any.
    pub fn access_token(&self) -> Option<&str> {
        match self {
            Self::Active { access, .. } => Some(access),
            _ => None,
        }
    }

    /// Current refresh token, if any.
    pub fn refresh_token(&self) -> Option<&str> {
        match self {
            Self::Active { refresh, .. } | Self::Expired { refresh } => refresh.as_deref(),
            Self::LoggedOut => None,
        }
    }

    /// Install tokens from a successful login.
    pub fn log_in(&mut self, access: String, refresh: Option<String>) {
        *self = Self::Active { access, refresh };
    }

    /// Mark the access token rejected, keeping any refresh token.
    pub fn expire(&mut self) {
        let refresh = self.refresh_token().map(str::to_string);
        *self = Self::Expired { refresh };
    }

    /// Install a refreshed access token; the refresh token stays usable.
    pub fn refresh_succeeded(&mut self, access: String) {
        let refresh = self.refresh_token().map(str::to_string);
        *self = Self::Active { access, refresh };
    }

    /// Forget the refresh token after the upstream rejected it.
    pub fn drop_refresh(&mut self) {
        match self {
            Self::Active { refresh, .. } | Self::Expired { refresh } => *refresh = None,
            Self::LoggedOut => {}
        }
    }

    /// Clear everything.
    pub fn log_out(&mut self) {
        *self = Self::LoggedOut;
    }
}
