//! Pre-defined provider configurations.

mod config;

pub use config::{
    assemblyai_config, hugging_face_config, ProviderConfig, DEFAULT_ASSEMBLYAI_BASE_URL,
    DEFAULT_HUGGING_FACE_BASE_URL,
};
