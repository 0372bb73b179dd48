use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::pet::PetDto;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    #[validate(length(min = 2, max = 50))]
    #[validate(custom(function = "crate::validators::name"))]
    pub name: String,

    #[validate(length(min = 2, max = 50))]
    #[validate(custom(function = "crate::validators::name"))]
    pub surname: String,

    #[validate(custom(function = "crate::validators::dni"))]
    pub dni: String,

    #[validate(custom(function = "crate::validators::phone"))]
    pub phone: String,

    #[validate(email)]
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pets: Option<Vec<PetDto>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_without_pets() {
        let client: ClientDto = serde_json::from_value(json!({
            "name": "Juan",
            "surname": "Pérez",
            "dni": "12345678",
            "phone": "2235550000",
            "email": "juan@mail.com"
        }))
        .unwrap();
        assert!(client.pets.is_none());
        assert!(client.validate().is_ok());
    }

    #[test]
    fn test_client_invalid_phone() {
        let client = ClientDto {
            name: "Juan".to_string(),
            surname: "Pérez".to_string(),
            dni: "12345678".to_string(),
            phone: "555".to_string(),
            email: "juan@mail.com".to_string(),
            pets: None,
        };
        let errors = client.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
    }
}
