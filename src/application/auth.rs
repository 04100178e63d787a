//! Session-based authentication gate for the admin surface.
//!
//! Credentials come from deployment configuration only. Sessions are
//! process-local: one editor, one machine, nothing worth persisting.

use std::time::Duration;

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("missing or expired session")]
    Unauthenticated,
}

#[derive(Debug, Clone)]
pub struct AdminSession {
    pub email: String,
    pub signed_in_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

pub struct AuthService {
    email: String,
    email_digest: Vec<u8>,
    password_digest: Vec<u8>,
    session_ttl: Duration,
    sessions: DashMap<String, AdminSession>,
}

impl AuthService {
    pub fn new(email: &str, password: &str, session_ttl: Duration) -> Self {
        Self {
            email: email.to_string(),
            email_digest: digest(email),
            password_digest: digest(password),
            session_ttl,
            sessions: DashMap::new(),
        }
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<IssuedSession, AuthError> {
        let email_ok = digest(email).ct_eq(&self.email_digest);
        let password_ok = digest(password).ct_eq(&self.password_digest);
        if (email_ok & password_ok).unwrap_u8() == 0 {
            return Err(AuthError::InvalidCredentials);
        }

        let now = OffsetDateTime::now_utc();
        let token = generate_token();
        let session = AdminSession {
            email: self.email.clone(),
            signed_in_at: now,
            expires_at: now + self.session_ttl,
        };
        self.sessions.insert(token.clone(), session.clone());

        Ok(IssuedSession {
            token,
            expires_at: session.expires_at,
        })
    }

    pub fn authenticate(&self, token: &str) -> Result<AdminSession, AuthError> {
        let session = self
            .sessions
            .get(token)
            .map(|entry| entry.value().clone())
            .ok_or(AuthError::Unauthenticated)?;

        if session.expires_at <= OffsetDateTime::now_utc() {
            self.sessions.remove(token);
            return Err(AuthError::Unauthenticated);
        }

        Ok(session)
    }

    pub fn sign_out(&self, token: &str) {
        self.sessions.remove(token);
    }
}

fn digest(value: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hasher.finalize().to_vec()
}

fn generate_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(
            "editor@example.com",
            "correct horse",
            Duration::from_secs(3600),
        )
    }

    #[test]
    fn sign_in_with_good_credentials_yields_a_live_session() {
        let auth = service();
        let issued = auth.sign_in("editor@example.com", "correct horse").expect("sign in");
        let session = auth.authenticate(&issued.token).expect("session");
        assert_eq!(session.email, "editor@example.com");
    }

    #[test]
    fn sign_in_rejects_wrong_password() {
        let auth = service();
        assert!(matches!(
            auth.sign_in("editor@example.com", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn sign_out_revokes_the_token() {
        let auth = service();
        let issued = auth.sign_in("editor@example.com", "correct horse").expect("sign in");
        auth.sign_out(&issued.token);
        assert!(matches!(
            auth.authenticate(&issued.token),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn expired_sessions_do_not_authenticate() {
        let auth = AuthService::new("editor@example.com", "pw", Duration::ZERO);
        let issued = auth.sign_in("editor@example.com", "pw").expect("sign in");
        assert!(matches!(
            auth.authenticate(&issued.token),
            Err(AuthError::Unauthenticated)
        ));
    }
}
