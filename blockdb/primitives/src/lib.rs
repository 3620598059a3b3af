#![warn(clippy::missing_docs_in_private_items)]

//! Types and capabilities shared by the block database, its collectors and its dashboard.

/// Runtime configuration.
pub mod config;
/// Cancellation tokens.
pub mod context;
/// Serde helpers.
pub mod deserializers;
#[cfg(test)]
mod tests;
/// Capabilities consumed and exposed by the block database.
pub mod traits;
/// Base types.
pub mod types;
