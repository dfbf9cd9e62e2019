use serde::{Deserialize, Serialize};

// ============================================================================
// Caller records supplied by the authentication subsystem
// ============================================================================

/// Login descriptor of an authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Google id the session logged in with
    pub id: String,
    pub is_admin: bool,
    pub is_instructor: bool,
    pub is_student: bool,
}

impl AuthenticatedUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_admin: false,
            is_instructor: false,
            is_student: false,
        }
    }
}

/// Account record resolved by the data-access layer for the acting identity.
/// `google_id` may be absent for accounts not yet linked to a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub google_id: Option<String>,
    pub name: String,
    pub email: String,
}

/// Student known to the system without a linked login account.
/// `course` may be empty when the enrolment is not known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub name: String,
    pub email: String,
    pub course: String,
}

// ============================================================================
// Caller identity
// ============================================================================

/// Who is behind the request being logged. Exactly one variant per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallerIdentity {
    /// No identity information at all
    Anonymous,
    /// Logged-in session, with the account record the action resolved for it
    /// (absent while the account is still being provisioned)
    Authenticated {
        user: AuthenticatedUser,
        account: Option<AccountRecord>,
    },
    /// Unregistered student acting through a direct access link. A login
    /// descriptor may still be present when a logged-in session follows such
    /// a link; the student record wins for role attribution.
    UnregisteredStudent {
        student: StudentRecord,
        login: Option<AuthenticatedUser>,
    },
}

impl CallerIdentity {
    /// Login descriptor of the request, whichever variant carries one
    pub fn login_user(&self) -> Option<&AuthenticatedUser> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { user, .. } => Some(user),
            Self::UnregisteredStudent { login, .. } => login.as_ref(),
        }
    }

    /// Convenience constructor for a plain authenticated caller
    pub fn authenticated(user: AuthenticatedUser) -> Self {
        Self::Authenticated {
            user,
            account: None,
        }
    }
}
