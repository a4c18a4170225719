//! Matrix of Destiny backend
//!
//! Two independent pieces share this crate:
//! - `arcana/`: offline extractor turning the arcana description text into
//!   the front-end data script (`extract_arcana` binary)
//! - `payments/` + `api_server`: YooKassa payment relay (`api` feature,
//!   `api_server` binary)
//!
//! Shared plumbing lives in `config` and `error`.

pub mod arcana;
pub mod config;
pub mod error;
pub mod payments;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use arcana::{
    classify_sphere, extract_descriptions, render_data_script, run_extraction,
    ArcanaDescriptions, ExtractionSummary, SphereCategory,
};
pub use config::ExtractorConfig;
pub use error::{ArcanaError, ConfigError};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
#[cfg(feature = "api")]
pub use config::ServerConfig;
