//! Assignments: creation by instructors, listings per role, and the
//! submissions received for one assignment.

pub mod controller;
pub mod router;
pub mod service;
