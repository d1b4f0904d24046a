// Library interface for newsdigest modules
// This allows tests and the binary to import modules

pub mod oracle;
pub mod ingestion;
pub mod extract;
pub mod classify;
pub mod trust;
pub mod summarize;
pub mod subscriptions;
pub mod digest;
pub mod commands;
