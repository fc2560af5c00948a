//! Simulation errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scenario parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Mesh error: {0}")]
    Mesh(#[from] strider_mesh::MeshError),

    #[error("Navigation error: {0}")]
    Nav(#[from] strider_ai::NavError),

    #[error("Gave up after {0} ticks without finishing the leg")]
    TickLimit(u32),
}

pub type Result<T> = std::result::Result<T, SimError>;
