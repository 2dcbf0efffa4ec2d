//! Shared utilities for the Poznej & Hraj backend.
//!
//! - Hashing and HMAC signatures (payment webhooks, voter keys)
//! - Argon2id password hashing for the admin login
//! - HS256 session tokens for the admin dashboard
//! - Reusable field validators

pub mod crypto;
pub mod jwt;
pub mod password;
pub mod validation;
