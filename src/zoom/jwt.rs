use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use jwt::{Claims, RegisteredClaims, SignWithKey};
use sha2::Sha256;

/// Lifetime of the tokens attached to outgoing API calls. Each request
/// gets a fresh one, so this only has to outlive a single round trip.
const TOKEN_TTL_MINUTES: i64 = 5;

/// Sign a short-lived HS256 token for Zoom's JWT app auth: the API key is
/// the issuer, the API secret is the signing key.
pub fn sign(api_key: &str, api_secret: &str) -> Result<String, String> {
    let key = Hmac::<Sha256>::new_from_slice(api_secret.as_bytes())
        .map_err(|e| format!("Invalid API secret: {e}"))?;

    let now = Utc::now();
    let claims = Claims::new(RegisteredClaims {
        issuer: Some(api_key.to_string()),
        issued_at: Some(now.timestamp() as u64),
        expiration: Some((now + Duration::minutes(TOKEN_TTL_MINUTES)).timestamp() as u64),
        subject: None,
        audience: None,
        not_before: None,
        json_web_token_id: None,
    });

    claims
        .sign_with_key(&key)
        .map_err(|e| format!("Failed to sign token: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jwt::{Header, Token, VerifyWithKey};

    #[test]
    fn signed_token_verifies_with_secret() {
        let token = sign("my_api_key", "my_api_secret").expect("Failed to sign");

        let key = Hmac::<Sha256>::new_from_slice(b"my_api_secret").unwrap();
        let parsed: Token<Header, Claims, _> =
            token.verify_with_key(&key).expect("Failed to verify");

        let claims = parsed.claims();
        assert_eq!(claims.registered.issuer.as_deref(), Some("my_api_key"));
        let exp = claims.registered.expiration.expect("No expiration");
        assert!(exp > Utc::now().timestamp() as u64);
    }

    #[test]
    fn signed_token_rejects_wrong_secret() {
        let token = sign("my_api_key", "my_api_secret").expect("Failed to sign");

        let wrong_key = Hmac::<Sha256>::new_from_slice(b"other_secret").unwrap();
        let result: Result<Token<Header, Claims, _>, _> = token.verify_with_key(&wrong_key);
        assert!(result.is_err());
    }
}
