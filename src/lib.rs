pub mod collection;
pub mod config;
pub mod converter;
pub mod error;
pub mod logger;
pub mod parser;

// Re-export commonly used types
pub use collection::Collection;
pub use converter::{convert_content, convert_file, write_collection};
pub use error::{ConvertError, Result};
