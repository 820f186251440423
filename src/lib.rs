//! In-memory model of a parsed interface-definition file.
//!
//! A parser produces one [`model::Interface`]; generators consume it. Besides
//! the model itself the crate carries a JSON interchange form ([`load`]), an
//! opt-in consistency pass ([`validate`]) and the `interface-model` CLI.
pub mod model;
pub mod load;
pub mod validate;
pub mod jq_exec;
pub mod error;
pub mod cli;

pub use error::{LoadError, ModelError};
pub use model::Interface;
