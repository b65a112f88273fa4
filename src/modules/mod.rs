pub mod assignments;
pub mod auth;
pub mod login_screens;
pub mod settings;
pub mod submissions;
pub mod system;
pub mod users;
