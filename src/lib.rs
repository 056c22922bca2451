//! Extracts mesh geometry and mesh world transforms from glTF documents.
//!
//! Two independent pipelines share a parsed [`Document`] and its first binary buffer:
//! [`MeshData::from_gltf`] followed by [`dump_mesh_data`] produces OBJ-style text for one mesh,
//! and [`SceneGraph::from_gltf`] followed by [`SceneGraph::mesh_transforms`] computes the world
//! matrix of every mesh-bearing node.

pub mod asset_pipeline;
pub mod config;
pub mod document;
pub mod error;
pub mod model;
pub mod scene_graph;

pub use asset_pipeline::{decode_accessor, dump_mesh_data};
pub use config::ExportConfig;
pub use document::{Document, NodeTransform};
pub use error::{ErrorKind, ExtractError};
pub use model::MeshData;
pub use scene_graph::{format_transform_report, MeshTransform, SceneGraph, Transform};
