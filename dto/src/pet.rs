use serde::{Deserialize, Serialize};
use validator::Validate;

/// Fallback emoji for unknown or missing pet types
pub const DEFAULT_PET_EMOJI: &str = "🐾";

#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PetType {
    Dog,
    Cat,
    Bird,
    Rabbit,
    Hamster,
    Fish,
    Reptile,
    Capybara,
    Turtle,
    Other,
}

impl PetType {
    pub const ALL: [PetType; 10] = [
        PetType::Dog,
        PetType::Cat,
        PetType::Bird,
        PetType::Rabbit,
        PetType::Hamster,
        PetType::Fish,
        PetType::Reptile,
        PetType::Capybara,
        PetType::Turtle,
        PetType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PetType::Dog => "Perro",
            PetType::Cat => "Gato",
            PetType::Bird => "Ave",
            PetType::Rabbit => "Conejo",
            PetType::Hamster => "Hámster",
            PetType::Fish => "Pez",
            PetType::Reptile => "Reptil",
            PetType::Capybara => "Capibara",
            PetType::Turtle => "Tortuga",
            PetType::Other => "Otro",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            PetType::Dog => "🐕",
            PetType::Cat => "🐱",
            PetType::Bird => "🐦",
            PetType::Rabbit => "🐰",
            PetType::Hamster => "🐹",
            PetType::Fish => "🐠",
            PetType::Reptile => "🦎",
            PetType::Capybara => "🦫",
            PetType::Turtle => "🐢",
            PetType::Other => DEFAULT_PET_EMOJI,
        }
    }
}

/// Emoji for a raw wire value, falling back to the paw print.
pub fn pet_emoji(value: Option<&str>) -> &'static str {
    value
        .and_then(|v| PetType::try_from(v).ok())
        .map(|t| t.emoji())
        .unwrap_or(DEFAULT_PET_EMOJI)
}

impl TryFrom<&str> for PetType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "DOG" => Ok(PetType::Dog),
            "CAT" => Ok(PetType::Cat),
            "BIRD" => Ok(PetType::Bird),
            "RABBIT" => Ok(PetType::Rabbit),
            "HAMSTER" => Ok(PetType::Hamster),
            "FISH" => Ok(PetType::Fish),
            "REPTILE" => Ok(PetType::Reptile),
            "CAPYBARA" => Ok(PetType::Capybara),
            "TURTLE" => Ok(PetType::Turtle),
            "OTHER" => Ok(PetType::Other),
            _ => Err(format!("Invalid pet type: {value}")),
        }
    }
}

impl core::fmt::Display for PetType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let value = match self {
            PetType::Dog => "DOG",
            PetType::Cat => "CAT",
            PetType::Bird => "BIRD",
            PetType::Rabbit => "RABBIT",
            PetType::Hamster => "HAMSTER",
            PetType::Fish => "FISH",
            PetType::Reptile => "REPTILE",
            PetType::Capybara => "CAPYBARA",
            PetType::Turtle => "TURTLE",
            PetType::Other => "OTHER",
        };
        write!(f, "{}", value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PetDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[validate(length(min = 2, max = 50))]
    #[validate(custom(function = "crate::validators::name"))]
    pub name: String,

    #[validate(range(min = 1, max = 30))]
    pub age: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    pub pet_type: PetType,

    #[validate(length(max = 50))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_type: Option<String>,

    pub client_id: i64,
}

impl PetDto {
    /// Label shown for the pet type, using the free text for `OTHER`.
    pub fn type_label(&self) -> String {
        match (&self.pet_type, &self.other_type) {
            (PetType::Other, Some(other)) if !other.trim().is_empty() => other.trim().to_string(),
            (t, _) => t.label().to_string(),
        }
    }
}
