//! Error types for mesh import.

use std::path::PathBuf;

/// Errors that abort an import.
///
/// All variants are fatal to the call: the destination containers are left
/// in their pre-call state. Degraded conditions (missing external buffer,
/// attribute count mismatch) are logged and do not surface here.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The scene file does not exist.
    #[error("scene file not found: {0}")]
    NotFound(PathBuf),
    /// The scene file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document failed to decode.
    #[error("glTF parse error: {0}")]
    Parse(#[from] gltf::Error),
    /// The destination layout requests a semantic the document cannot
    /// supply (only missing texture-coordinate slots are tolerated).
    #[error("unsupported layout: {0}")]
    UnsupportedLayout(String),
    /// A primitive has no POSITION attribute.
    #[error("mesh {mesh} primitive {primitive} has no POSITION attribute")]
    MissingPositions {
        /// Mesh index in the document.
        mesh: usize,
        /// Primitive index within the mesh.
        primitive: usize,
    },
    /// An accessor could not be read.
    #[error("accessor error: {0}")]
    Accessor(String),
    /// A buffer reference could not be resolved.
    #[error("buffer error: {0}")]
    Buffer(String),
}
