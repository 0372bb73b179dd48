use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use tracing::warn;

use dto::auth::LoginResponse;
use dto::role::Role;

/// Storage keys for the persisted session
pub const TOKEN_KEY: &str = "token";
pub const USER_ROLE_KEY: &str = "userRole";
pub const USER_ID_KEY: &str = "userId";

#[derive(Debug, Snafu)]
#[snafu(display("Unable to decode token: {source}"))]
pub struct TokenError {
    source: jsonwebtoken::errors::Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authority {
    pub authority: String,
}

/// Payload issued by the backend on login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Option<String>,

    #[serde(default)]
    pub role: Vec<Authority>,

    pub exp: Option<i64>,
    pub iat: Option<i64>,
}

impl Claims {
    /// First authority in the `role` claim, if it is a known role
    pub fn role(&self) -> Option<Role> {
        self.role
            .first()
            .and_then(|a| Role::try_from(a.authority.as_str()).ok())
    }

    /// Tokens without an `exp` claim are treated as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.exp {
            Some(exp) => now.timestamp() >= exp,
            None => true,
        }
    }
}

/// Reads the claims without verifying the signature.
///
/// The signing key lives in the backend. The payload is only used to decide
/// navigation, every call is still authorized by the backend.
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let header = decode_header(token).context(TokenSnafu)?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .context(TokenSnafu)?;
    Ok(data.claims)
}

/// Persisted session identity: bearer token, role and user id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(skip_serializing)]
    pub token: Option<String>,

    pub role: Option<Role>,
    pub user_id: Option<i64>,
}

impl Session {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the session right after a successful login.
    pub fn from_login(login: &LoginResponse) -> Self {
        let role = match decode_claims(&login.token) {
            Ok(claims) => {
                let role = claims.role();
                if role.is_none() {
                    warn!("No valid role found in token");
                }
                role
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        };

        Session {
            token: Some(login.token.clone()),
            role,
            user_id: Some(login.user_id),
        }
    }

    /// Rebuilds the session from its stored values. Values that fail to
    /// parse are treated as absent.
    pub fn from_stored(token: Option<&str>, role: Option<&str>, user_id: Option<&str>) -> Self {
        let token = token
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string());
        let role = role.and_then(|r| Role::try_from(r).ok());
        let user_id = user_id.and_then(|id| id.trim().parse::<i64>().ok());

        Session {
            token,
            role,
            user_id,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// A token is present and its `exp` is still in the future.
    pub fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        let Some(token) = self.token() else {
            return false;
        };
        match decode_claims(token) {
            Ok(claims) => !claims.is_expired(now),
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }

    pub fn username(&self) -> Option<String> {
        self.token()
            .and_then(|t| decode_claims(t).ok())
            .and_then(|c| c.sub)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    pub(crate) fn mint_token(role: &str, exp: i64) -> String {
        let claims = json!({
            "sub": "juanp",
            "role": [{ "authority": role }],
            "iat": exp - 3600,
            "exp": exp,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"backend-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_claims() {
        let exp = Utc::now().timestamp() + 600;
        let claims = decode_claims(&mint_token("ROLE_DOCTOR", exp)).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("juanp"));
        assert_eq!(claims.role(), Some(Role::Doctor));
        assert_eq!(claims.exp, Some(exp));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode_claims("not-a-token").is_err());
        assert!(decode_claims("a.b.c").is_err());
    }

    #[test]
    fn test_from_login() {
        let exp = Utc::now().timestamp() + 600;
        let login = LoginResponse {
            token: mint_token("ROLE_CLIENT", exp),
            user_id: 12,
        };
        let session = Session::from_login(&login);
        assert_eq!(session.role, Some(Role::Client));
        assert_eq!(session.user_id, Some(12));
        assert!(session.is_authenticated(Utc::now()));
        assert_eq!(session.username().as_deref(), Some("juanp"));
    }

    #[test]
    fn test_from_login_unknown_role() {
        let exp = Utc::now().timestamp() + 600;
        let login = LoginResponse {
            token: mint_token("ROLE_NETFLIX", exp),
            user_id: 12,
        };
        let session = Session::from_login(&login);
        assert!(session.role.is_none());
        assert!(session.is_authenticated(Utc::now()));
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let session = Session {
            token: Some(mint_token("ROLE_ADMIN", now.timestamp() + 60)),
            role: Some(Role::Admin),
            user_id: Some(1),
        };
        assert!(session.is_authenticated(now));
        assert!(!session.is_authenticated(now + Duration::seconds(60)));
        assert!(!session.is_authenticated(now + Duration::hours(2)));
    }

    #[test]
    fn test_missing_exp_is_expired() {
        let token = encode(
            &Header::default(),
            &json!({ "sub": "x", "role": [] }),
            &EncodingKey::from_secret(b"k"),
        )
        .unwrap();
        let claims = decode_claims(&token).unwrap();
        assert!(claims.is_expired(Utc::now()));
        assert!(claims.role().is_none());
    }

    #[test]
    fn test_from_stored() {
        let session = Session::from_stored(Some("abc"), Some("ROLE_DOCTOR"), Some("42"));
        assert_eq!(session.token(), Some("abc"));
        assert_eq!(session.role, Some(Role::Doctor));
        assert_eq!(session.user_id, Some(42));

        let session = Session::from_stored(Some(""), Some("ROLE_X"), Some("4x2"));
        assert!(session.token().is_none());
        assert!(session.role.is_none());
        assert!(session.user_id.is_none());
        assert!(!session.is_authenticated(Utc::now()));
    }
}
