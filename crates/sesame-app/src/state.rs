//! Aggregate authentication state.

use sesame_core::User;

use crate::guard::Phase;

/// What screens and the route guard see of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub authenticated: bool,
    /// The signed-in user; always `None` when not authenticated.
    pub user: Option<User>,
    /// Either session read is in flight or has not produced a value yet.
    pub loading: bool,
    /// General error of the most recent failed login.
    pub error: Option<String>,
}

impl AuthState {
    /// State before anything has been read.
    pub fn initial() -> Self {
        Self {
            authenticated: false,
            user: None,
            loading: true,
            error: None,
        }
    }

    pub(crate) fn new(
        authenticated: bool,
        user: Option<User>,
        loading: bool,
        error: Option<String>,
    ) -> Self {
        Self {
            authenticated,
            user: if authenticated { user } else { None },
            loading,
            error,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Indeterminate
        } else if self.authenticated {
            Phase::Authenticated
        } else {
            Phase::Unauthenticated
        }
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sesame_core::AccessToken;

    fn user() -> User {
        User {
            id: "u1".into(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            token: AccessToken::new("t1"),
            refresh_token: None,
        }
    }

    #[test]
    fn initial_state_is_indeterminate() {
        let state = AuthState::initial();
        assert!(state.loading);
        assert_eq!(state.phase(), Phase::Indeterminate);
    }

    #[test]
    fn user_is_hidden_when_not_authenticated() {
        let state = AuthState::new(false, Some(user()), false, None);
        assert!(state.user.is_none());
        assert_eq!(state.phase(), Phase::Unauthenticated);
    }

    #[test]
    fn loading_wins_over_authentication() {
        let state = AuthState::new(true, Some(user()), true, None);
        assert_eq!(state.phase(), Phase::Indeterminate);
        assert_eq!(AuthState::new(true, Some(user()), false, None).phase(), Phase::Authenticated);
    }
}
