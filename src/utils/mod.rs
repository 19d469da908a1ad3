//! Shared helpers.

pub mod inflect;

pub use inflect::underscore;
