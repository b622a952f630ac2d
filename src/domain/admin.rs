use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub token: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Why a login attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    MissingFields,
    TooLong,
    UnknownUser,
    WrongPassword,
}

impl LoginFailure {
    /// Message shown on the login page.
    pub fn message(&self) -> &'static str {
        match self {
            LoginFailure::MissingFields => "Username dan password wajib diisi",
            LoginFailure::TooLong => "Username atau password terlalu panjang",
            LoginFailure::UnknownUser => "Username tidak ditemukan",
            LoginFailure::WrongPassword => "Password salah",
        }
    }
}
