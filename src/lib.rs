pub mod config;
pub mod core;
pub mod domain;
pub mod prompt;
pub mod providers;
pub mod server;
pub mod tutor;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{DatagenCli, TutorCli};

pub use config::{Credentials, DatagenFileConfig, DatagenSettings, LocalStorage};
pub use crate::core::{engine::GenerationEngine, pipeline::GenerationPipeline};
pub use domain::model::{
    DataDomain, FieldHint, GenerationRequest, ModelKind, ModelReply, OutputArtifact, OutputFormat,
    Provider, RecordSet,
};
pub use utils::error::{Result, TutorgenError};
