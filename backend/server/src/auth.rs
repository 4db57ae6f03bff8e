//! # Authentication
//!
//! No passwords. A user asks for a link, clicks it, and gets a signed session cookie.
//!
//! ## Magic links
//! - 32 random bytes, URL-safe base64, emailed as `<frontend>/auth/verify?token=...`
//! - Only the SHA-256 hex digest is stored, keyed by itself
//! - Verifying takes the record out of the store atomically, so a link works once
//! - Expired after `MAGIC_LINK_EXPIRY_MINUTES`
//!
//! ## Sessions
//! - Cookie `access_token`, HttpOnly, lasts `SESSION_EXPIRY_DAYS`
//! - Value is `base64(claims) "." base64(HMAC-SHA256(secret, base64(claims)))`
//! - Claims carry the user id, email, role and a unix expiry
//! - The user is still looked up on every request, deleting the user ends the session
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    config::Config,
    database::{Database, Table},
    error::AppError,
    models::{MagicLinkToken, Role, User},
    utils::random_token,
};

pub const SESSION_COOKIE: &str = "access_token";

type HmacSha256 = Hmac<Sha256>;

pub fn generate_magic_token() -> (String, String) {
    let raw_token = random_token(32);
    let token_hash = hash_token(&raw_token);

    (raw_token, token_hash)
}

pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: i64,
}

impl Claims {
    pub fn new(user: &User, expiry: Duration) -> Self {
        Self {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: (Utc::now() + expiry).timestamp(),
        }
    }
}

fn mac(secret: &str) -> HmacSha256 {
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length")
}

pub fn encode_session(claims: &Claims, secret: &str) -> Result<String, AppError> {
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);

    let mut mac = mac(secret);
    mac.update(payload.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{payload}.{signature}"))
}

/// `None` for anything malformed, forged or expired.
pub fn decode_session(token: &str, secret: &str, now: DateTime<Utc>) -> Option<Claims> {
    let (payload, signature) = token.split_once('.')?;
    let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;

    let mut mac = mac(secret);
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature).ok()?;

    let claims: Claims = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).ok()?).ok()?;

    (claims.exp > now.timestamp()).then_some(claims)
}

/// `email` must already be sanitized.
pub async fn get_or_create_user(
    db: &Database,
    config: &Config,
    email: &str,
) -> Result<User, AppError> {
    if let Some(id) = db.lookup(Table::UserEmails, email).await? {
        if let Some(user) = db.fetch::<User>(id).await? {
            return Ok(user);
        }
    }

    let role = if email.eq_ignore_ascii_case(config.admin_email.trim()) {
        Role::Admin
    } else {
        Role::Viewer
    };

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        role,
        created_at: now,
        updated_at: now,
    };

    db.save(&user).await?;
    db.link(Table::UserEmails, email, user.id).await?;

    info!("Created {role:?} user {email}");

    Ok(user)
}

pub async fn create_magic_link_token(
    db: &Database,
    config: &Config,
    user: &User,
) -> Result<String, AppError> {
    let (raw_token, token_hash) = generate_magic_token();
    let now = Utc::now();

    db.save(&MagicLinkToken {
        user_id: user.id,
        token_hash,
        expires_at: now + Duration::minutes(config.magic_link_expiry_minutes),
        created_at: now,
    })
    .await?;

    Ok(raw_token)
}

pub async fn verify_magic_token(db: &Database, token: &str) -> Result<Option<User>, AppError> {
    let Some(magic_token) = db.take::<MagicLinkToken>(hash_token(token)).await? else {
        debug!("Unknown or already used magic link");
        return Ok(None);
    };

    if magic_token.expires_at <= Utc::now() {
        debug!("Expired magic link for user {}", magic_token.user_id);
        return Ok(None);
    }

    db.fetch::<User>(magic_token.user_id).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::database::MemoryStore;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn database() -> Database {
        Database::new(Arc::new(MemoryStore::default()))
    }

    #[test]
    fn test_hash_token() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );

        let (raw, hash) = generate_magic_token();
        assert_eq!(hash_token(&raw), hash);
    }

    #[test]
    fn test_session_roundtrip() {
        let claims = Claims::new(&user(Role::Admin), Duration::days(7));
        let token = encode_session(&claims, "secret").unwrap();

        assert_eq!(decode_session(&token, "secret", Utc::now()), Some(claims));
    }

    #[test]
    fn test_session_wrong_secret() {
        let claims = Claims::new(&user(Role::Viewer), Duration::days(7));
        let token = encode_session(&claims, "secret").unwrap();

        assert_eq!(decode_session(&token, "other", Utc::now()), None);
    }

    #[test]
    fn test_session_tampered_payload() {
        let claims = Claims::new(&user(Role::Viewer), Duration::days(7));
        let token = encode_session(&claims, "secret").unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        let forged = Claims {
            role: Role::Admin,
            ..claims
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());

        assert_eq!(
            decode_session(&format!("{forged_payload}.{signature}"), "secret", Utc::now()),
            None
        );
    }

    #[test]
    fn test_session_expired() {
        let claims = Claims::new(&user(Role::Viewer), Duration::days(7));
        let token = encode_session(&claims, "secret").unwrap();

        assert_eq!(
            decode_session(&token, "secret", Utc::now() + Duration::days(8)),
            None
        );
    }

    #[test]
    fn test_session_garbage() {
        assert_eq!(decode_session("", "secret", Utc::now()), None);
        assert_eq!(decode_session("no-dot", "secret", Utc::now()), None);
        assert_eq!(decode_session("a.b", "secret", Utc::now()), None);
    }

    #[tokio::test]
    async fn test_admin_role_from_config() {
        let db = database();
        let config = Config {
            admin_email: "Boss@Example.com".to_string(),
            ..Config::default()
        };

        let boss = get_or_create_user(&db, &config, "boss@example.com").await.unwrap();
        let other = get_or_create_user(&db, &config, "other@example.com").await.unwrap();

        assert_eq!(boss.role, Role::Admin);
        assert_eq!(other.role, Role::Viewer);
    }

    #[tokio::test]
    async fn test_existing_user_is_reused() {
        let db = database();
        let config = Config::default();

        let first = get_or_create_user(&db, &config, "a@example.com").await.unwrap();
        let second = get_or_create_user(&db, &config, "a@example.com").await.unwrap();

        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_magic_link_single_use() {
        let db = database();
        let config = Config::default();
        let user = get_or_create_user(&db, &config, "a@example.com").await.unwrap();

        let token = create_magic_link_token(&db, &config, &user).await.unwrap();

        let verified = verify_magic_token(&db, &token).await.unwrap().unwrap();
        assert_eq!(verified.id, user.id);
        assert!(verify_magic_token(&db, &token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_magic_link_expired() {
        let db = database();
        let config = Config {
            magic_link_expiry_minutes: -1,
            ..Config::default()
        };
        let user = get_or_create_user(&db, &config, "a@example.com").await.unwrap();

        let token = create_magic_link_token(&db, &config, &user).await.unwrap();

        assert!(verify_magic_token(&db, &token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_magic_link() {
        assert!(verify_magic_token(&database(), "nope").await.unwrap().is_none());
    }
}
