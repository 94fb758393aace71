use thiserror::Error;

/// Why a portal could not be installed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PortalFault {
    /// One of the edges is shorter than the minimum portal size.
    #[error("portal too small")]
    TooSmall,
    /// The two edges differ in length by more than the allowed slack.
    #[error("portal edges have different sizes")]
    SizeMismatch,
    /// Both ends of the portal are the same edge.
    #[error("self-referential portal")]
    SelfLink,
    /// One of the edges already carries a portal.
    #[error("edge already carries a portal")]
    AlreadyLinked,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("invalid portal: {0}")]
    InvalidPortal(PortalFault),
    #[error("no active edge resolvable at angle {angle} rad")]
    AmbiguousRaycast { angle: f64 },
}

impl Error {
    pub(crate) fn geometry(reason: impl Into<String>) -> Self {
        Self::InvalidGeometry(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
