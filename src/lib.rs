pub mod api;
pub mod config;
pub mod consts;
pub mod error;
pub mod key;
pub mod optimizer;
pub mod scorer;

pub use error::{SfResult, SubForgeError};
// cmd and reports belong to the binary crate.
