use crate::domain::admin::LoginFailure;
use crate::infrastructure::security::password::verify_password;

/// Verifies admin credentials against the configured account.
pub struct AdminAuthUseCase {
    username: String,
    password_hash: String,
}

impl AdminAuthUseCase {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            username,
            password_hash,
        }
    }

    pub fn execute(&self, username: &str, password: &str) -> Result<String, LoginFailure> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(LoginFailure::MissingFields);
        }
        if username != self.username {
            return Err(LoginFailure::UnknownUser);
        }
        if !verify_password(password, &self.password_hash) {
            return Err(LoginFailure::WrongPassword);
        }
        Ok(self.username.clone())
    }
}
