//! API request handlers.

mod admin;
mod photos;

pub use admin::*;
pub use photos::*;
