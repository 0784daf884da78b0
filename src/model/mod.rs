//! Core value types and error taxonomy.

pub mod error;
pub mod types;

pub use error::AttachError;
pub use types::{Band, BufferOffset, Extent, LineLayout, LineNumber, ViewportSnapshot};
