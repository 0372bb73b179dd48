use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// Authorities issued by the backend in the `role` claim of the JWT.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_CLIENT")]
    Client,

    #[serde(rename = "ROLE_ADMIN")]
    Admin,

    #[serde(rename = "ROLE_DOCTOR")]
    Doctor,
}

#[derive(Debug, Snafu)]
#[snafu(display("Invalid role: {role}"))]
pub struct InvalidRoleError {
    role: String,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Client, Role::Admin, Role::Doctor];

    /// Landing page for each role
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Client => "/client/home",
            Role::Admin => "/admin/home",
            Role::Doctor => "/doctor/home",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "ROLE_CLIENT" => Ok(Role::Client),
            "ROLE_ADMIN" => Ok(Role::Admin),
            "ROLE_DOCTOR" => Ok(Role::Doctor),
            _ => Err(format!("Invalid role: {value}")),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Role::Client => write!(f, "ROLE_CLIENT"),
            Role::Admin => write!(f, "ROLE_ADMIN"),
            Role::Doctor => write!(f, "ROLE_DOCTOR"),
        }
    }
}

pub fn to_role(value: &str) -> Result<Role, InvalidRoleError> {
    Role::try_from(value).map_err(|_| InvalidRoleError {
        role: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_role_valid() {
        assert_eq!(to_role("ROLE_ADMIN").unwrap(), Role::Admin);
        assert_eq!(to_role("ROLE_DOCTOR").unwrap(), Role::Doctor);
    }

    #[test]
    fn test_to_role_invalid() {
        let role = to_role("ROLE_NETFLIX");
        assert!(role.is_err());
        if let Err(e) = role {
            assert_eq!(e.to_string(), "Invalid role: ROLE_NETFLIX");
        }
    }

    #[test]
    fn test_display_matches_wire() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role));
        }
    }

    #[test]
    fn test_home_path() {
        assert_eq!(Role::Client.home_path(), "/client/home");
        assert_eq!(Role::Doctor.home_path(), "/doctor/home");
    }
}
