//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Organisation, repository list, and token resolution tests
//! - `numeric_loading`: Page size, page ceiling, and timeout loading tests
//! - `validation`: Range checks and client settings construction

mod helpers;
