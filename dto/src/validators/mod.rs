mod dni;
mod error;
mod hour_minute;
mod name;
mod password;
mod phone;

pub use dni::dni;
pub use error::flatten_errors;
pub use hour_minute::hour_minute;
pub use name::name;
pub use password::password;
pub use phone::phone;
