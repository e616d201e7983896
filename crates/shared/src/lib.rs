//! Shared utilities and common types for the Communitas backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (hashing, verification codes)
//! - JWT token generation and validation
//! - Offset pagination helpers
//! - Common validation logic

pub mod codes;
pub mod crypto;
pub mod jwt;
pub mod pagination;
pub mod validation;
