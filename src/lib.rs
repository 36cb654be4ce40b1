#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod html;
pub mod models;
pub mod query;
pub mod resolver;

pub use config::BusterConfig;
pub use models::{AssetRule, RuleSet};
pub use resolver::{VERSION_PARAM, VersionResolver};
