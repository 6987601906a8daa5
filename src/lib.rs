pub mod action;
pub mod cli;
pub mod client_factory;
pub mod commands;
pub mod config;
pub mod env_id;
pub mod error;
pub mod github;
pub mod humanitec;
pub mod outputs;
pub mod template;

// In-memory clients, public for integration tests
pub mod mock_github;
pub mod mock_humanitec;

pub use env_id::{ENV_ID_LIMIT, ENV_ID_PREFIX, branch_name_to_env_id};
pub use error::{Error, Result};
