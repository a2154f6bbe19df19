use thiserror::Error;

/// Host-level failures. Authoring mistakes (bad colors, stray `end_fill`,
/// odd angles) never surface here; they degrade visually instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("canvas dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("could not allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    #[error("session has already been started")]
    AlreadyStarted,

    #[error("window backend failed: {0:#}")]
    Window(#[from] anyhow::Error),

    #[error("display thread panicked")]
    DisplayThread,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
