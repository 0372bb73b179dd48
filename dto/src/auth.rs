use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,

    #[validate(length(min = 1, max = 60))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 4, max = 50))]
    pub username: String,

    #[validate(length(min = 8, max = 50))]
    #[validate(custom(function = "crate::validators::password"))]
    pub password: String,

    #[validate(length(min = 2, max = 50))]
    #[validate(custom(function = "crate::validators::name"))]
    pub name: String,

    #[validate(length(min = 2, max = 50))]
    #[validate(custom(function = "crate::validators::name"))]
    pub surname: String,

    #[validate(email)]
    pub email: String,

    #[validate(custom(function = "crate::validators::phone"))]
    pub phone: String,

    #[validate(custom(function = "crate::validators::dni"))]
    pub dni: String,
}

/// Client self sign-up. `foundation` marks animal shelters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub user: RegisterRequest,

    #[serde(default)]
    pub foundation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    #[serde(default)]
    pub reset_token: Option<String>,

    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1))]
    pub token: String,

    #[validate(length(min = 8, max = 50))]
    #[validate(custom(function = "crate::validators::password"))]
    pub new_password: String,
}

/// Email change for an account that has not been verified yet.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEmailRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,

    #[validate(length(min = 1, max = 60))]
    pub password: String,

    #[validate(email)]
    pub new_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register() -> RegisterRequest {
        RegisterRequest {
            username: "juanp".to_string(),
            password: "secreto123".to_string(),
            name: "Juan".to_string(),
            surname: "Pérez".to_string(),
            email: "juan@mail.com".to_string(),
            phone: "2235550000".to_string(),
            dni: "12345678".to_string(),
        }
    }

    #[test]
    fn test_login_response() {
        let res: LoginResponse =
            serde_json::from_value(json!({"token": "abc.def.ghi", "userId": 5})).unwrap();
        assert_eq!(res.user_id, 5);
    }

    #[test]
    fn test_register_client_is_flat() {
        let req = RegisterClientRequest {
            user: register(),
            foundation: true,
        };
        assert!(req.validate().is_ok());

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["username"], json!("juanp"));
        assert_eq!(value["foundation"], json!(true));
    }

    #[test]
    fn test_register_weak_password() {
        let req = RegisterRequest {
            password: "password".to_string(),
            ..register()
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_reset_password_wire() {
        let req = ResetPasswordRequest {
            token: "tok".to_string(),
            new_password: "nueva1234".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["newPassword"], json!("nueva1234"));
    }
}
