//! Credential verification and bearer-token issuance.
//!
//! [`IdentityService::authenticate`] turns a username/password pair into a
//! signed token; [`TokenService::validate`] turns a token back into a
//! [`Caller`]. Password hashes are argon2 PHC strings, and the comparison runs
//! on the blocking pool so a slow hash never stalls unrelated requests.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use evbook_sdk::objects::Role;
use evbook_sdk::token::{TokenClaims, TokenError, sign_token, verify_token};
use kanau::processor::Processor;
use lazy_static::lazy_static;

use crate::entities::users::{GetUserByUsername, UserRecord};

/// The authenticated identity attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i64,
    pub role: Role,
}

/// Errors produced while authenticating a user or validating a token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown username or wrong password. The two are never distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Missing, malformed, forged or expired token.
    #[error("unauthorized")]
    Unauthorized,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("token signing failed: {0}")]
    Signing(#[from] TokenError),
    #[error("credential store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Read access to stored credentials.
pub trait CredentialStore:
    Processor<GetUserByUsername, Output = Option<UserRecord>, Error = sqlx::Error>
{
}

impl<T> CredentialStore for T where
    T: Processor<GetUserByUsername, Output = Option<UserRecord>, Error = sqlx::Error>
{
}

/// A freshly issued token together with the identity it asserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub caller: Caller,
    pub expires_at: i64,
}

/// Issues and validates tokens with a fixed secret and lifetime.
#[derive(Clone)]
pub struct TokenService {
    secret: Box<[u8]>,
    ttl: i64,
}

impl TokenService {
    pub fn new(secret: Box<[u8]>, ttl: i64) -> Self {
        Self { secret, ttl }
    }

    pub fn issue(&self, caller: Caller, now: i64) -> Result<IssuedToken, AuthError> {
        let claims = TokenClaims::new(caller.user_id, caller.role, now, self.ttl);
        let token = sign_token(&claims, &self.secret)?;
        Ok(IssuedToken {
            token,
            caller,
            expires_at: claims.exp,
        })
    }

    /// Every failure collapses into [`AuthError::Unauthorized`].
    pub fn validate(&self, token: &str, now: i64) -> Result<Caller, AuthError> {
        let claims = verify_token(token, &self.secret, now).map_err(|e| {
            tracing::debug!(error = %e, "Bearer token rejected");
            AuthError::Unauthorized
        })?;
        Ok(Caller {
            user_id: claims.user_id,
            role: claims.role,
        })
    }
}

pub struct IdentityService<S> {
    store: S,
    tokens: TokenService,
}

impl<S: CredentialStore> IdentityService<S> {
    pub fn new(store: S, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Verify `username`/`password` and issue a token for the user.
    #[tracing::instrument(skip_all)]
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<IssuedToken, AuthError> {
        let user = self
            .store
            .process(GetUserByUsername {
                username: username.to_owned(),
            })
            .await?;

        let Some(user) = user else {
            // Spend the same hashing work as a real comparison.
            let _ = verify_dummy_blocking(password.to_owned()).await;
            tracing::debug!("Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password_blocking(password.to_owned(), user.password_hash.clone()).await? {
            tracing::debug!("Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let caller = Caller {
            user_id: user.id,
            role: user.role.into(),
        };
        let issued = self.tokens.issue(caller, now_unix())?;
        tracing::info!(user_id = caller.user_id, role = %caller.role, "User logged in");
        Ok(issued)
    }
}

lazy_static! {
    static ref DUMMY_HASH: Option<String> = hash_password("timing-equalizer").ok();
}

pub(crate) fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

/// Hash `plaintext` into an argon2 PHC string with a random salt.
pub fn hash_password(plaintext: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Compare `plaintext` with a stored PHC hash.
///
/// A mismatch is `Ok(false)`; an unparsable hash or any other argon2 failure
/// is [`AuthError::Hashing`].
pub fn verify_password(plaintext: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
    match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Hashing(e.to_string())),
    }
}

async fn verify_password_blocking(plaintext: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&plaintext, &hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
}

/// Compare against [`DUMMY_HASH`]. The first call also builds the hash, so
/// that work stays on the blocking pool too.
async fn verify_dummy_blocking(plaintext: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || match DUMMY_HASH.as_ref() {
        Some(dummy) => verify_password(&plaintext, dummy),
        None => Ok(false),
    })
    .await
    .map_err(|e| AuthError::Hashing(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserRole;
    use crate::testing::MemoryStore;

    fn tokens() -> TokenService {
        TokenService::new(b"identity-test-secret".to_vec().into_boxed_slice(), 3600)
    }

    fn service_with_user(role: UserRole) -> (IdentityService<MemoryStore>, i64) {
        let store = MemoryStore::new();
        let user = store.add_user("HR1", "password", "HR 1", role);
        (IdentityService::new(store, tokens()), user.id)
    }

    #[tokio::test]
    async fn test_authenticate_issues_token_with_stored_role() {
        let (service, user_id) = service_with_user(UserRole::Vendor);

        let issued = service.authenticate("HR1", "password").await.unwrap();
        assert_eq!(issued.caller.user_id, user_id);
        assert_eq!(issued.caller.role, Role::Vendor);

        let caller = tokens().validate(&issued.token, now_unix()).unwrap();
        assert_eq!(caller, issued.caller);
        assert!(issued.expires_at > now_unix());
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_are_indistinguishable() {
        let (service, _) = service_with_user(UserRole::Hr);

        let wrong_password = service.authenticate("HR1", "wrong").await.unwrap_err();
        let unknown_user = service.authenticate("nobody", "password").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_username_match_is_exact() {
        let (service, _) = service_with_user(UserRole::Hr);
        assert!(matches!(
            service.authenticate("hr1", "password").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_corrupt_hash_is_internal_error() {
        let store = MemoryStore::new();
        store.add_user_with_hash("broken", "not-a-phc-string", "Broken", UserRole::Hr);
        let service = IdentityService::new(store, tokens());

        assert!(matches!(
            service.authenticate("broken", "password").await,
            Err(AuthError::Hashing(_))
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_not_invalid_credentials() {
        let store = MemoryStore::new();
        store.fail_next_query();
        let service = IdentityService::new(store, tokens());

        assert!(matches!(
            service.authenticate("HR1", "password").await,
            Err(AuthError::Store(_))
        ));
    }

    #[test]
    fn test_validate_rejects_garbage_and_expired() {
        let tokens = tokens();
        assert!(matches!(
            tokens.validate("garbage", now_unix()),
            Err(AuthError::Unauthorized)
        ));

        let issued = tokens
            .issue(
                Caller {
                    user_id: 1,
                    role: Role::Hr,
                },
                1_000,
            )
            .unwrap();
        assert!(tokens.validate(&issued.token, 1_000 + 3599).is_ok());
        assert!(matches!(
            tokens.validate(&issued.token, 1_000 + 3600),
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_dummy_verification_never_matches() {
        assert!(!verify_dummy_blocking("password".to_string()).await.unwrap());
        assert!(DUMMY_HASH.is_some());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("password").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("password", &hash).unwrap());
        assert!(!verify_password("Password", &hash).unwrap());
    }
}
