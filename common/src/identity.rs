use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque user identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Role a user can have on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    /// Harvest originator; registers batches.
    Farmer,
    /// Quality verifier and transporter; transitions and transfers batches.
    Distributor,
    /// End verifier; read-only access to the custody chain.
    Consumer,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UserRole::Farmer => "farmer",
            UserRole::Distributor => "distributor",
            UserRole::Consumer => "consumer",
        };
        write!(f, "{name}")
    }
}

/// A known platform user, as held by the identity directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub badges: Vec<String>,
}
