pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{HttpSource, LocalStorage, SnapshotSource};
pub use app::EarningsPipeline;
#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::TreasurerConfig;
pub use crate::core::{etl::EtlEngine, treasurer::Treasurer};
pub use utils::error::{Result, TreasurerError};
