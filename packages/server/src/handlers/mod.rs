pub mod admin;
pub mod login;
pub mod protected;
pub mod signup;
