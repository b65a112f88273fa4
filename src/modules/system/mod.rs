//! Banner, endpoint listing, health check and submission downloads.

pub mod controller;
pub mod router;
