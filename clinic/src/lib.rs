pub mod calendar;
pub mod diagnosis;
pub mod filters;
pub mod messages;
pub mod pagination;
pub mod policy;
pub mod session;
pub mod text;
pub mod wizard;
