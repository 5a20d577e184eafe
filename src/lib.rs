pub mod boundary;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod error;
pub mod forge;
pub mod git;
pub mod grouper;
pub mod query;
pub mod tag;
pub mod ui;
pub mod version;

pub use error::{ChrnError, Result};
