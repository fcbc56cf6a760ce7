//! User-facing API messages shared across endpoints.

pub const SUCCESSFUL_DELETION_MESSAGE: &str = "The record was deleted successfully.";
