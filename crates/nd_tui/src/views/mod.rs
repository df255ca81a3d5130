pub mod home;
pub mod login;
pub mod saved;
pub mod signup;
