pub mod admin;
pub mod appointment;
pub mod auth;
pub mod client;
pub mod dates;
pub mod diagnose;
pub mod doctor;
pub mod pagination;
pub mod pet;
pub mod problem;
pub mod role;
pub mod validators;
