//! Lookups into an already parsed glTF document.

use std::str::FromStr;

use gltf::json;
use serde::Deserialize;

use crate::error::{ExtractError, Result};

/// The parsed JSON half of a glTF asset.
///
/// `gltf::json` stores node transforms as `f32`, so the node TRS and matrix values are parsed a
/// second time at full precision.
#[derive(Debug)]
pub struct Document {
    pub root: json::Root,
    pub node_transforms: Vec<NodeTransform>,
}

/// A node's transform properties as written in the file.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NodeTransform {
    pub matrix: Option<[f64; 16]>,
    pub rotation: Option<[f64; 4]>,
    pub scale: Option<[f64; 3]>,
    pub translation: Option<[f64; 3]>,
}

#[derive(Deserialize)]
struct NodeTransforms {
    #[serde(default)]
    nodes: Vec<NodeTransform>,
}

impl Document {
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        let root = serde_json::from_slice(bytes)?;
        let NodeTransforms { nodes } = serde_json::from_slice(bytes)?;

        Ok(Self {
            root,
            node_transforms: nodes,
        })
    }
}

impl FromStr for Document {
    type Err = serde_json::Error;

    fn from_str(json: &str) -> serde_json::Result<Self> {
        Self::from_slice(json.as_bytes())
    }
}

impl TryFrom<serde_json::Value> for Document {
    type Error = serde_json::Error;

    fn try_from(value: serde_json::Value) -> serde_json::Result<Self> {
        Self::from_slice(&serde_json::to_vec(&value)?)
    }
}

pub fn accessor(document: &Document, index: usize) -> Result<&json::Accessor> {
    document
        .root
        .accessors
        .get(index)
        .ok_or(ExtractError::UnknownAccessor(index))
}

/// The buffer view backing `accessor`, along with the view's index.
pub fn buffer_view(
    document: &Document,
    accessor: usize,
) -> Result<(usize, &json::buffer::View)> {
    let view = accessor_view_index(document, accessor)?;
    document
        .root
        .buffer_views
        .get(view)
        .map(|buffer_view| (view, buffer_view))
        .ok_or(ExtractError::UnknownBufferView { accessor, view })
}

pub fn mesh(document: &Document, index: usize) -> Result<&json::Mesh> {
    document
        .root
        .meshes
        .get(index)
        .ok_or(ExtractError::UnknownMesh(index))
}

fn accessor_view_index(document: &Document, index: usize) -> Result<usize> {
    accessor(document, index)?
        .buffer_view
        .as_ref()
        .map(|view| view.value())
        .ok_or(ExtractError::MissingBufferView(index))
}
