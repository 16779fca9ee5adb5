//! # Quill Shared
//!
//! Wire types shared by the server and its clients: request/response DTOs,
//! form validation, and the response envelopes.

pub mod dto;
pub mod response;
pub mod validation;

pub use response::{ApiResponse, ErrorResponse};
pub use validation::{FieldError, ValidPost};
