// crates/medivault-server/src/lib.rs
// MediVault - demo encrypted medical chat assistant (query proxy + dispatch)

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod audit;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod metrics;
pub mod mock;
pub mod proxy;
pub mod session;
pub mod state;

pub use error::{MediVaultError, Result};
