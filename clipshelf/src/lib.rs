pub mod audio;
pub mod catalog;
pub mod config;
pub mod download;
pub mod error;
pub mod model;
pub mod naming;
pub mod transcribe;
pub mod types;
pub mod workflow;

pub use catalog::Catalog;
pub use config::AppConfig;
pub use error::{Error, Result};
pub use model::Model;
pub use types::{CatalogRecord, NewClip, Platform};
