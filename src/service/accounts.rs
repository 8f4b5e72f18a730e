use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::validation;
use crate::auth::{TokenGenerator, hash_password, parse_token, verify_password};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Token, User};

const MAX_TOKEN_RETRIES: u32 = 3;

/// A user plus a freshly issued bearer token. The raw token is only ever
/// available here.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct AccountService {
    store: Arc<dyn Store>,
    tokens: TokenGenerator,
    token_ttl: Duration,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, token_ttl: Duration) -> Self {
        Self {
            store,
            tokens: TokenGenerator::new(),
            token_ttl,
        }
    }

    pub fn register(&self, email: &str, password: &str, name: &str) -> Result<Session> {
        let email = validation::normalize_email(email)?;
        validation::validate_password(password)?;
        let name = validation::normalize_display_name(name)?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            password_hash: hash_password(password)?,
            created_at: now,
            updated_at: now,
        };

        self.store.create_user(&user)?;
        tracing::info!(user_id = %user.id, "registered user");

        self.issue(user)
    }

    /// Unknown e-mail and wrong password are the same `Unauthorized`.
    pub fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim().to_lowercase();
        let user = self
            .store
            .get_user_by_email(&email)?
            .ok_or(Error::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(Error::Unauthorized);
        }

        tracing::debug!(user_id = %user.id, "user logged in");
        self.issue(user)
    }

    pub fn logout(&self, token: &Token) -> Result<()> {
        if !self.store.delete_token(&token.id)? {
            return Err(Error::Unauthorized);
        }
        tracing::debug!(user_id = %token.user_id, token_id = %token.id, "revoked token");
        Ok(())
    }

    pub fn me(&self, user_id: &str) -> Result<User> {
        self.store.get_user(user_id)?.ok_or(Error::NotFound("User"))
    }

    /// Resolves a raw bearer token to its stored record and owner.
    pub fn authenticate(&self, raw_token: &str) -> Result<(Token, User)> {
        let (lookup, _secret) = parse_token(raw_token)?;

        let token = self
            .store
            .get_token_by_lookup(&lookup)?
            .ok_or(Error::Unauthorized)?;

        if !self.tokens.verify(raw_token, &token.token_hash)? {
            return Err(Error::Unauthorized);
        }

        if token.expires_at.is_some_and(|expires_at| expires_at < Utc::now()) {
            return Err(Error::Unauthorized);
        }

        let user = self
            .store
            .get_user(&token.user_id)?
            .ok_or(Error::Unauthorized)?;

        if let Err(e) = self.store.update_token_last_used(&token.id) {
            tracing::warn!("Failed to update token last_used_at: {e}");
        }

        Ok((token, user))
    }

    fn issue(&self, user: User) -> Result<Session> {
        let expires_at = Utc::now()
            .checked_add_signed(self.token_ttl)
            .ok_or_else(|| Error::Config("token lifetime is out of range".to_string()))?;

        for _ in 0..MAX_TOKEN_RETRIES {
            let (raw_token, lookup, hash) = self.tokens.generate()?;
            let token = Token {
                id: Uuid::new_v4().to_string(),
                token_hash: hash,
                token_lookup: lookup,
                user_id: user.id.clone(),
                created_at: Utc::now(),
                expires_at: Some(expires_at),
                last_used_at: None,
            };

            match self.store.create_token(&token) {
                Ok(()) => {
                    return Ok(Session {
                        user,
                        token: raw_token,
                        expires_at,
                    });
                }
                Err(Error::TokenLookupCollision) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(Error::TokenLookupCollision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support;

    fn setup() -> (tempfile::TempDir, AccountService) {
        let (temp, store) = test_support::store();
        (temp, AccountService::new(store, Duration::hours(1)))
    }

    #[test]
    fn test_register_then_authenticate() {
        let (_temp, accounts) = setup();
        let session = accounts
            .register("Alice@Example.com", "password123", "Alice")
            .unwrap();

        assert_eq!(session.user.email, "alice@example.com");
        let (token, user) = accounts.authenticate(&session.token).unwrap();
        assert_eq!(user.id, session.user.id);
        assert_eq!(token.user_id, session.user.id);
    }

    #[test]
    fn test_duplicate_email_conflicts() {
        let (_temp, accounts) = setup();
        accounts.register("a@example.com", "password123", "A").unwrap();
        assert!(matches!(
            accounts.register("A@EXAMPLE.COM", "password123", "B"),
            Err(Error::Conflict(_))
        ));
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let (_temp, accounts) = setup();
        accounts.register("a@example.com", "password123", "A").unwrap();

        assert!(matches!(
            accounts.login("a@example.com", "wrong-password"),
            Err(Error::Unauthorized)
        ));
        assert!(matches!(
            accounts.login("nobody@example.com", "password123"),
            Err(Error::Unauthorized)
        ));
        assert!(accounts.login(" A@example.com", "password123").is_ok());
    }

    #[test]
    fn test_logout_revokes_token() {
        let (_temp, accounts) = setup();
        let session = accounts.register("a@example.com", "password123", "A").unwrap();
        let (token, _) = accounts.authenticate(&session.token).unwrap();

        accounts.logout(&token).unwrap();
        assert!(matches!(
            accounts.authenticate(&session.token),
            Err(Error::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let (_temp, store) = test_support::store();
        let accounts = AccountService::new(store, Duration::seconds(-1));
        let session = accounts.register("a@example.com", "password123", "A").unwrap();

        assert!(matches!(
            accounts.authenticate(&session.token),
            Err(Error::Unauthorized)
        ));
    }

    #[test]
    fn test_out_of_range_token_ttl_is_an_error() {
        let (_temp, store) = test_support::store();
        let accounts = AccountService::new(store, Duration::MAX);

        assert!(matches!(
            accounts.register("a@example.com", "password123", "A"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_malformed_token() {
        let (_temp, accounts) = setup();
        assert!(matches!(
            accounts.authenticate("not-a-token"),
            Err(Error::InvalidTokenFormat)
        ));
    }

    #[test]
    fn test_register_validates_input() {
        let (_temp, accounts) = setup();
        assert!(matches!(
            accounts.register("a@example.com", "short", "A"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            accounts.register("not-an-email", "password123", "A"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            accounts.register("a@example.com", "password123", "   "),
            Err(Error::Validation(_))
        ));
    }
}
