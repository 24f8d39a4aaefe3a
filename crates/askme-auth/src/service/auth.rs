//! JWT token service

use std::sync::LazyLock;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use moka::sync::Cache;
use rand::RngCore;

use crate::model::{IssuedToken, JwtPayload};

/// Cached token data containing the full payload
#[derive(Clone)]
struct CachedTokenData {
    claims: JwtPayload,
}

/// Decoded tokens, so hot tokens skip signature checks
static TOKEN_CACHE: LazyLock<Cache<String, CachedTokenData>> = LazyLock::new(|| {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(300))
        .support_invalidation_closures()
        .build()
});

/// Decode and validate JWT token with caching
pub fn decode_jwt_token_cached(
    token: &str,
    secret_key: &str,
) -> jsonwebtoken::errors::Result<jsonwebtoken::TokenData<JwtPayload>> {
    if let Some(cached) = TOKEN_CACHE.get(token) {
        let now = chrono::Utc::now().timestamp();
        if cached.claims.exp > now {
            return Ok(jsonwebtoken::TokenData {
                header: jsonwebtoken::Header::default(),
                claims: cached.claims,
            });
        }
        TOKEN_CACHE.invalidate(token);
    }

    let result = decode_jwt_token(token, secret_key)?;

    TOKEN_CACHE.insert(
        token.to_string(),
        CachedTokenData {
            claims: result.claims.clone(),
        },
    );

    Ok(result)
}

/// Decode and validate JWT token without caching
pub fn decode_jwt_token(
    token: &str,
    secret_key: &str,
) -> jsonwebtoken::errors::Result<jsonwebtoken::TokenData<JwtPayload>> {
    let decoding_key = DecodingKey::from_base64_secret(secret_key)?;
    decode::<JwtPayload>(token, &decoding_key, &Validation::new(Algorithm::HS256))
}

/// Drop a token from the cache, used on logout
pub fn invalidate_token(token: &str) {
    TOKEN_CACHE.invalidate(token);
}

/// Drop every cached token whose key was revoked
pub fn invalidate_token_keys(token_keys: &[String]) {
    if token_keys.is_empty() {
        return;
    }
    let keys: Vec<String> = token_keys.to_vec();
    if let Err(e) =
        TOKEN_CACHE.invalidate_entries_if(move |_, cached| keys.contains(&cached.claims.jti))
    {
        tracing::warn!("token cache invalidation failed: {}", e);
    }
}

/// Sign a token for `sub`, valid for `expire_seconds`
pub fn encode_jwt_token(
    sub: &str,
    secret_key: &str,
    expire_seconds: i64,
) -> jsonwebtoken::errors::Result<IssuedToken> {
    let expiry = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::seconds(expire_seconds))
        .unwrap_or_else(chrono::Utc::now);

    let payload = JwtPayload {
        sub: sub.to_string(),
        jti: uuid::Uuid::new_v4().simple().to_string(),
        exp: expiry.timestamp(),
    };

    let header = Header::new(Algorithm::HS256);

    let encoding_key = EncodingKey::from_base64_secret(secret_key)?;
    let token = encode(&header, &payload, &encoding_key)?;

    Ok(IssuedToken {
        token,
        token_key: payload.jti,
        expiry,
    })
}

/// Random base64 secret for deployments that did not configure one
pub fn generate_secret_key() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}
