//! Shared parsing utilities: structural patterns, row classification and
//! timestamp parsing.
//!
//! Both stages of the transform classify rows through this module so that
//! the segmenter and the materializer can never disagree about what a row is.

pub mod datetime;
pub mod patterns;

// Re-export commonly used items
pub use datetime::{DEFAULT_DATETIME_FORMAT, is_valid_format, parse_conversation_datetime};
pub use patterns::{MetadataKey, RowKind, classify, is_block_start, is_email, is_uuid_v4};
