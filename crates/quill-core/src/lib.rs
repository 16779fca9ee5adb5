//! # Quill Core
//!
//! The domain layer of the Quill blog.
//! This crate contains the post lifecycle and ownership rules with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod service;

#[cfg(test)]
mod testing;

pub use error::DomainError;
pub use policy::OwnershipPolicy;
pub use service::PostService;
