pub mod admin;
pub mod organizer;
pub mod participant;
