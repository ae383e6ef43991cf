//! Vaultline Oracle Feed Aggregator
//!
//! Ingests price observations per `(token, currency)` feed and turns them
//! into one consensus price per interval.
//!
//! ## Operations
//!
//! - **AppointOracle**: register a submitter with a weightage and its feeds
//! - **RemoveOracle**: drop a submitter and its observations
//! - **SubmitPrices**: validated, timestamped observations (price > 0)
//! - **computeActivePrice**: boundary rollover `active <- next <- aggregate`
//!
//! ## Feed lifecycle
//!
//! ```text
//! Unset --first fresh aggregate--> Live
//! Live  --|next-active|/active >= deviation--> Deviating --> Live
//! Live/Deviating --no fresh observation at boundary--> Stale --> Live
//! ```
//!
//! Only `Live` feeds serve prices to state-changing operations.

pub mod aggregation;
pub mod book;
pub mod instructions;
pub mod state;

pub use aggregation::{is_deviating, weighted_price};
pub use book::FeedBook;
pub use state::{FeedStatus, Observation, Oracle, OracleParams, PriceFeed};
