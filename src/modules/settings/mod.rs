//! Branding settings: a single row read by everyone, edited by admins.

pub mod controller;
pub mod router;
pub mod service;
