use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Speciality {
    GeneralMedicine,
    InternalMedicine,
    Nutrition,
}

impl Speciality {
    pub const ALL: [Speciality; 3] = [
        Speciality::GeneralMedicine,
        Speciality::InternalMedicine,
        Speciality::Nutrition,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Speciality::GeneralMedicine => "Medicina General",
            Speciality::InternalMedicine => "Medicina Interna",
            Speciality::Nutrition => "Nutrición",
        }
    }
}

impl TryFrom<&str> for Speciality {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "GENERAL_MEDICINE" => Ok(Speciality::GeneralMedicine),
            "INTERNAL_MEDICINE" => Ok(Speciality::InternalMedicine),
            "NUTRITION" => Ok(Speciality::Nutrition),
            _ => Err(format!("Invalid speciality: {value}")),
        }
    }
}

impl core::fmt::Display for Speciality {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Speciality::GeneralMedicine => write!(f, "GENERAL_MEDICINE"),
            Speciality::InternalMedicine => write!(f, "INTERNAL_MEDICINE"),
            Speciality::Nutrition => write!(f, "NUTRITION"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDto {
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

    pub speciality: Speciality,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl DoctorDto {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// Doctor sign-up, submitted by an administrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDoctorDto {
    #[validate(length(min = 4, max = 50))]
    pub username: String,

    #[validate(length(min = 8, max = 60))]
    pub password: String,

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

    pub speciality: Speciality,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_speciality_labels() {
        assert_eq!(Speciality::InternalMedicine.label(), "Medicina Interna");
        assert_eq!(
            Speciality::try_from("GENERAL_MEDICINE"),
            Ok(Speciality::GeneralMedicine)
        );
        assert!(Speciality::try_from("CARDIOLOGY").is_err());
    }

    #[test]
    fn test_doctor_validation() {
        let doctor: DoctorDto = serde_json::from_value(json!({
            "id": 3,
            "name": "Ana",
            "surname": "Gómez",
            "dni": "30111222",
            "phone": "2235551234",
            "email": "ana@petsociety.com",
            "speciality": "NUTRITION"
        }))
        .unwrap();
        assert!(doctor.validate().is_ok());
        assert_eq!(doctor.full_name(), "Ana Gómez");

        let invalid = DoctorDto {
            dni: "30.111.222".to_string(),
            email: "nope".to_string(),
            ..doctor
        };
        let errors = invalid.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("dni"));
        assert!(errors.field_errors().contains_key("email"));
    }
}
