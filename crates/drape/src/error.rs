use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrapeError {
    #[error("grid has no nodes")]
    EmptyGrid,
    #[error("grid topology changed: built with {expected} nodes, got {found}")]
    TopologyMismatch { expected: usize, found: usize },
    #[error("node {index} out of range for {count} nodes")]
    NodeOutOfRange { index: usize, count: usize },
    #[error("slideshow needs at least one slide")]
    NoSlides,
    #[error("slide count changed: built with {expected} slides, got {found}")]
    SlideCountMismatch { expected: usize, found: usize },
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, DrapeError>;
