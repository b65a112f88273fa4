//! Background images for the login screen. At most one is active.

pub mod controller;
pub mod router;
pub mod service;
