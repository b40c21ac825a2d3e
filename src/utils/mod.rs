//! Shared helpers for category keys, display text and rounding

pub mod text;

pub use text::{category_key, round_to, title_case};
