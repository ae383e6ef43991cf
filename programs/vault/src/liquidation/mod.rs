//! Liquidation system components

pub mod engine;
pub mod health;

pub use health::{assess, Health};
