//! Configuration loading and path resolution.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{Config, GeneralConfig, RewardConfig};
