use crate::terrain::{LodLevel, PatchId};
use thiserror::Error;

/// Failures of the block-partitioned vertex pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Every block of the level is handed out. Recoverable: keep the stale geometry and retry.
    #[error("vertex pool exhausted for lod level {level} ({capacity} blocks in use)")]
    Exhausted { level: LodLevel, capacity: usize },

    #[error("lod level {level} is not partitioned by this pool")]
    UnknownLevel { level: LodLevel },

    #[error("{levels} lod levels need {levels} block capacities, got {actual}")]
    CapacityMismatch { levels: usize, actual: usize },
}

/// Errors in how patches are arranged or which levels they are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error(
        "patch {patch:?} at lod {level} cannot border patch {neighbour:?} at lod {neighbour_level} \
         (at most {max_delta} levels apart)"
    )]
    UnsupportedLodDelta {
        patch: PatchId,
        level: LodLevel,
        neighbour: PatchId,
        neighbour_level: LodLevel,
        max_delta: usize,
    },

    #[error("lod level {level} is out of range, the layout has {max_lod_levels} levels")]
    InvalidLodLevel { level: LodLevel, max_lod_levels: usize },

    #[error("no patch with id {0:?}")]
    UnknownPatch(PatchId),

    #[error("patch {0:?} cannot be its own neighbour")]
    SelfLink(PatchId),

    #[error("the patch set is full ({capacity} patches)")]
    PatchCapacity { capacity: usize },

    #[error("invalid lod layout: {0}")]
    InvalidLayout(String),
}

/// Failures reported by the graphics buffer factory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("vertex range {offset}..{end} lies outside the {capacity} vertex buffer")]
    VertexRange {
        offset: usize,
        end: usize,
        capacity: usize,
    },

    #[error("could not create vertex buffer: {0}")]
    VertexBuffer(String),

    #[error("could not create index buffer: {0}")]
    IndexBuffer(String),
}

/// Errors raised while (re)building a patch. These are fatal to the caller of `build`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("patch {0:?} has no vertex block, pre_build must succeed first")]
    NotAllocated(PatchId),

    #[error("locked {actual} vertices for a {edge}x{edge} patch")]
    VertexCount { edge: usize, actual: usize },

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse yaml config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("could not parse json config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown config format for {0:?}, expected .yaml, .yml or .json")]
    UnknownFormat(std::path::PathBuf),

    #[error("invalid config: {0}")]
    Invalid(String),
}
