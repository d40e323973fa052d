pub mod auth;
pub mod organizer;
pub mod signup;
