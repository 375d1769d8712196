//! Destination stream containers for mesh ingestion.
//!
//! This module provides the three building blocks the importer fills:
//!
//! - [`VertexStreamLayout`] - declarative description of interleaved vertex
//!   attributes: which semantic, at which byte offset, in which binding.
//! - [`VertexStream`] - owns one contiguous byte buffer per binding and
//!   exposes raw per-vertex record access for writer algorithms.
//! - [`IndicesStream`] - owns a contiguous buffer of fixed-width (16- or
//!   32-bit) indices with append, bulk-copy, and offset-merge operations.
//!
//! The containers carry no internal synchronization; callers running
//! parallel imports must give each import its own instances.

mod indices;
mod layout;
mod vertex;

pub use indices::{IndexFormat, IndicesStream};
pub use layout::{AttributeLayout, VertexFormat, VertexSemantic, VertexStreamLayout};
pub use vertex::VertexStream;
