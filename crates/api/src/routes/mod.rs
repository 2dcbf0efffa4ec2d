//! HTTP route handlers.

pub mod admin;
pub mod budget;
pub mod content;
pub mod crew;
pub mod events;
pub mod feedback;
pub mod gallery;
pub mod health;
pub mod maintenance;
pub mod notifications;
pub mod payments;
pub mod polls;
pub mod reservations;
pub mod reviews;
