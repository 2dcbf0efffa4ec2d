//! Domain layer for the Poznej & Hraj backend.
//!
//! This crate contains:
//! - Domain models (Event, Reservation, Review, Poll, ...)
//! - Request/response DTOs with validation
//! - The reservation lifecycle rules

pub mod models;
pub mod services;
