use chrono::{DateTime, Utc};

use dto::role::Role;

use crate::session::Session;

pub const LOGIN_PATH: &str = "/login";

/// Outcome of a guarded navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,

    /// Not authenticated, send to login and come back afterwards
    Login { return_url: String },

    /// Authenticated with the wrong role
    Redirect(&'static str),
}

impl Access {
    /// Location the browser should be sent to, if any
    pub fn location(&self) -> Option<String> {
        match self {
            Access::Granted => None,
            Access::Login { return_url } => Some(format!(
                "{}?returnUrl={}",
                LOGIN_PATH,
                urlencoding::encode(return_url)
            )),
            Access::Redirect(path) => Some(path.to_string()),
        }
    }
}

/// Authentication-only guard
pub fn authenticate(session: &Session, path: &str, now: DateTime<Utc>) -> Access {
    if session.is_authenticated(now) {
        Access::Granted
    } else {
        Access::Login {
            return_url: path.to_string(),
        }
    }
}

/// Authentication plus role guard.
///
/// A user with a known but disallowed role lands on that role's home page,
/// an unknown role goes back to login.
pub fn authorize(session: &Session, allowed: &[Role], path: &str, now: DateTime<Utc>) -> Access {
    let access = authenticate(session, path, now);
    if access != Access::Granted {
        return access;
    }

    match session.role {
        Some(role) if allowed.contains(&role) => Access::Granted,
        Some(role) => Access::Redirect(role.home_path()),
        None => Access::Redirect(LOGIN_PATH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::mint_token;

    fn session(role: Option<Role>, exp_offset: i64) -> Session {
        let exp = Utc::now().timestamp() + exp_offset;
        Session {
            token: Some(mint_token("ROLE_CLIENT", exp)),
            role,
            user_id: Some(1),
        }
    }

    #[test]
    fn test_unauthenticated_goes_to_login() {
        let access = authorize(&Session::empty(), &[Role::Admin], "/admin/home", Utc::now());
        assert_eq!(
            access,
            Access::Login {
                return_url: "/admin/home".to_string()
            }
        );
        assert_eq!(
            access.location().as_deref(),
            Some("/login?returnUrl=%2Fadmin%2Fhome")
        );
    }

    #[test]
    fn test_expired_goes_to_login() {
        let access = authorize(
            &session(Some(Role::Client), -10),
            &[Role::Client],
            "/client/home",
            Utc::now(),
        );
        assert!(matches!(access, Access::Login { .. }));
    }

    #[test]
    fn test_role_allowed() {
        let access = authorize(
            &session(Some(Role::Client), 600),
            &[Role::Client],
            "/client/home",
            Utc::now(),
        );
        assert_eq!(access, Access::Granted);
    }

    #[test]
    fn test_wrong_role_goes_home() {
        let access = authorize(
            &session(Some(Role::Doctor), 600),
            &[Role::Admin],
            "/admin/home",
            Utc::now(),
        );
        assert_eq!(access, Access::Redirect("/doctor/home"));
    }

    #[test]
    fn test_unknown_role_goes_to_login() {
        let access = authorize(&session(None, 600), &[Role::Admin], "/admin/home", Utc::now());
        assert_eq!(access, Access::Redirect("/login"));
        assert_eq!(access.location().as_deref(), Some("/login"));
    }

    #[test]
    fn test_return_url_is_encoded() {
        let access = authenticate(&Session::empty(), "/client/history?status=ALL&pet=2", Utc::now());
        assert_eq!(
            access.location().as_deref(),
            Some("/login?returnUrl=%2Fclient%2Fhistory%3Fstatus%3DALL%26pet%3D2")
        );
    }
}
