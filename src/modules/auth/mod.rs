//! Registration, login and the current-user profile.

pub mod controller;
pub mod router;
pub mod service;
