use crate::model::User;
use crate::service::{Auth, ServiceError};

use super::feedback::Feedback;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// Identity not yet resolved; render nothing but a spinner
    Resolving,
    /// No user; redirect to login
    SignedOut,
    SignedIn(User),
}

/// Resolves who is using the app before anything else renders
#[derive(Debug)]
pub struct SessionGate {
    state: Session,
}

impl Default for SessionGate {
    fn default() -> Self {
        SessionGate {
            state: Session::Resolving,
        }
    }
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Session {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            Session::SignedIn(user) => Some(user),
            _ => None,
        }
    }

    /// Gate for anything past login
    pub fn require_user(&self) -> Result<&User, ServiceError> {
        self.user().ok_or(ServiceError::Unauthenticated)
    }

    pub fn resolve(&mut self, auth: &dyn Auth, feedback: &mut Feedback) -> &Session {
        self.state = match auth.current_user() {
            Ok(Some(user)) => Session::SignedIn(user),
            Ok(None) => Session::SignedOut,
            Err(e) => {
                feedback.failure("resolve session", &e);
                Session::SignedOut
            }
        };
        &self.state
    }

    pub fn login(&mut self, auth: &dyn Auth, user: User, feedback: &mut Feedback) -> bool {
        match auth.login(user) {
            Ok(user) => {
                self.state = Session::SignedIn(user);
                true
            }
            Err(e) => {
                feedback.failure("log in", &e);
                false
            }
        }
    }

    pub fn logout(&mut self, auth: &dyn Auth, feedback: &mut Feedback) {
        match auth.logout() {
            Ok(()) => self.state = Session::SignedOut,
            Err(e) => feedback.failure("log out", &e),
        }
    }
}
