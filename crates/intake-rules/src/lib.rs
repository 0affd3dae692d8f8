//! Intake Rules
//!
//! Pure Rust check functions shared by the form schema compiler and the
//! WASM bindings. Compatible with both std and no_std environments.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod email;
pub mod string;

#[cfg(feature = "garde")]
pub mod garde_validators;

// Re-export all validators
pub use email::*;
pub use string::*;

#[cfg(feature = "garde")]
pub use garde_validators::*;
