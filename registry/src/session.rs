use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use ayur_common::identity::{UserId, UserProfile, UserRole};

/// Shared demo credential accepted for every directory entry.
pub const DEMO_SECRET: &str = "demo123";

/// Errors from session operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthError {
    /// Deliberately generic: an unknown email and a wrong secret are
    /// indistinguishable, so valid emails cannot be probed.
    InvalidCredentials,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid email or password"),
        }
    }
}

impl std::error::Error for AuthError {}

/// The active identity, persisted for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn role(&self) -> UserRole {
        self.user.role
    }
}

/// Source of known identities. Injected so the demo directory can be
/// swapped for a real provider without touching session logic.
pub trait IdentityProvider {
    /// Return the matching profile, or `None` on any mismatch.
    fn authenticate(&self, email: &str, secret: &str) -> Option<UserProfile>;
}

/// Where the single active session lives. `load` returning `None` means
/// "no active session".
pub trait SessionStore {
    fn load(&self) -> Option<Session>;
    fn save(&mut self, session: &Session);
    fn clear(&mut self);
}

impl<T: SessionStore + ?Sized> SessionStore for Box<T> {
    fn load(&self) -> Option<Session> {
        (**self).load()
    }

    fn save(&mut self, session: &Session) {
        (**self).save(session)
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

/// Static demo directory: three users, one shared secret.
#[derive(Debug, Clone)]
pub struct DemoDirectory {
    users: Vec<UserProfile>,
    secret: String,
}

impl DemoDirectory {
    pub fn new(users: Vec<UserProfile>, secret: impl Into<String>) -> Self {
        Self {
            users,
            secret: secret.into(),
        }
    }

    /// The stock demo directory: one farmer, one distributor, one consumer.
    pub fn demo() -> Self {
        Self::new(demo_users(), DEMO_SECRET)
    }

    pub fn users(&self) -> &[UserProfile] {
        &self.users
    }
}

impl IdentityProvider for DemoDirectory {
    fn authenticate(&self, email: &str, secret: &str) -> Option<UserProfile> {
        if secret != self.secret {
            return None;
        }
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email.trim()))
            .cloned()
    }
}

/// Volatile store for tests and embedded use.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    session: Option<Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> Option<Session> {
        self.session.clone()
    }

    fn save(&mut self, session: &Session) {
        self.session = Some(session.clone());
    }

    fn clear(&mut self) {
        self.session = None;
    }
}

/// Gatekeeper for the single active session.
#[derive(Debug)]
pub struct SessionManager<P, S> {
    provider: P,
    store: S,
}

impl<P: IdentityProvider, S: SessionStore> SessionManager<P, S> {
    pub fn new(provider: P, store: S) -> Self {
        Self { provider, store }
    }

    /// Authenticate and persist the session. A new login replaces any
    /// previous session; there is never more than one.
    pub fn login(&mut self, email: &str, secret: &str) -> Result<Session, AuthError> {
        let user = self
            .provider
            .authenticate(email, secret)
            .ok_or(AuthError::InvalidCredentials)?;
        let session = Session {
            user,
            started_at: Utc::now(),
        };
        self.store.save(&session);
        tracing::info!(user = %session.user.name, role = %session.user.role, "login");
        Ok(session)
    }

    /// Clear the persisted session unconditionally.
    pub fn logout(&mut self) {
        if let Some(session) = self.store.load() {
            tracing::info!(user = %session.user.name, "logout");
        }
        self.store.clear();
    }

    pub fn current(&self) -> Option<Session> {
        self.store.load()
    }
}

/// The fixed demo identities.
pub fn demo_users() -> Vec<UserProfile> {
    vec![
        UserProfile {
            id: UserId("1".into()),
            name: "Raj Kumar".into(),
            email: "farmer@ayur.com".into(),
            role: UserRole::Farmer,
            phone: Some("+91 98765 43210".into()),
            verified: true,
            badges: vec![
                "Verified Farmer".into(),
                "Consistent Supplier".into(),
                "Organic Certified".into(),
            ],
        },
        UserProfile {
            id: UserId("2".into()),
            name: "Priya Sharma".into(),
            email: "distributor@ayur.com".into(),
            role: UserRole::Distributor,
            phone: Some("+91 87654 32109".into()),
            verified: true,
            badges: vec!["Certified Distributor".into(), "Quality Assured".into()],
        },
        UserProfile {
            id: UserId("3".into()),
            name: "Amit Singh".into(),
            email: "consumer@ayur.com".into(),
            role: UserRole::Consumer,
            phone: Some("+91 76543 21098".into()),
            verified: true,
            badges: vec![],
        },
    ]
}
