//! Configuration loading and validation

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{CourseConfig, EmbedConfig, HarvestConfig, HarvestOptions};
pub use validation::validate;
