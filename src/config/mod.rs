//! Configuration loading, parsing, and validation
//!
//! Mailmark is configured by a single TOML file holding the fetch behavior,
//! output placement, and the link filtering policy (blocked domains and
//! excluded anchor texts).

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, FetchConfig, OutputConfig, PolicyConfig};
pub use validation::validate;
