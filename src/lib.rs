// ghelper library.
// GitHub organization lookups for an Alfred Script Filter: client, cache, filter, and commands.

pub mod cache;
pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod feedback;
pub mod filter;
pub mod github;
pub mod logging;

pub use error::{GhelperError, Result};
