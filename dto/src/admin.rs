use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

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
    pub active: Option<bool>,
}
