//! Configuration module for Verktoy.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    AgentSettings, DatabaseSettings, EmbeddingSettings, GeneralSettings, ImageSettings,
    RetrievalSettings, Settings, VectorStoreSettings,
};
