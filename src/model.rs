use gltf::json::mesh::Semantic;
use gltf::json::validation::Checked;

use crate::asset_pipeline::accessor::{decode_accessor, Element};
use crate::document::{self, Document};
use crate::error::{ExtractError, Result};

/// Decoded geometry of a single-primitive mesh.
///
/// Optional attributes, when present, are parallel to `positions`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub index: usize,
    pub indices: Vec<u32>,
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    /// Tangents keep whatever width the accessor has, usually 4 with handedness in `w`.
    pub tangents: Option<Vec<Vec<f32>>>,
    pub texcoords: Option<Vec<[f32; 2]>>,
}

impl MeshData {
    pub fn from_gltf(document: &Document, buffer: &[u8], mesh_index: usize) -> Result<MeshData> {
        let mesh = document::mesh(document, mesh_index)?;

        let primitive = match mesh.primitives.as_slice() {
            [primitive] => primitive,
            primitives => {
                return Err(ExtractError::PrimitiveCount {
                    mesh: mesh_index,
                    count: primitives.len(),
                })
            }
        };

        if primitive
            .attributes
            .keys()
            .any(|semantic| matches!(semantic, Checked::Invalid))
        {
            return Err(ExtractError::InvalidSemantic { mesh: mesh_index });
        }

        let attribute = |semantic: Semantic| {
            primitive
                .attributes
                .get(&Checked::Valid(semantic))
                .map(|accessor| accessor.value())
        };

        let indices_accessor = primitive
            .indices
            .as_ref()
            .map(|accessor| accessor.value())
            .ok_or(ExtractError::MissingIndices { mesh: mesh_index })?;
        let position_accessor = attribute(Semantic::Positions)
            .ok_or(ExtractError::MissingPositions { mesh: mesh_index })?;

        let indices = read_indices(document, buffer, indices_accessor)?;
        let positions = read_vectors::<3>(document, buffer, position_accessor, "POSITION")?;

        let normals = attribute(Semantic::Normals)
            .map(|accessor| read_vectors::<3>(document, buffer, accessor, "NORMAL"))
            .transpose()?;
        let tangents = attribute(Semantic::Tangents)
            .map(|accessor| read_components(document, buffer, accessor))
            .transpose()?;
        let texcoords = attribute(Semantic::TexCoords(0))
            .map(|accessor| read_vectors::<2>(document, buffer, accessor, "TEXCOORD_0"))
            .transpose()?;

        let mesh_data = MeshData {
            index: mesh_index,
            indices,
            positions,
            normals,
            tangents,
            texcoords,
        };
        mesh_data.validate()?;

        log::info!(
            "Loaded mesh {} ({}): {} vertices, {} triangles",
            mesh_index,
            mesh.name.as_deref().unwrap_or("Unnamed"),
            mesh_data.vertex_count(),
            mesh_data.triangle_count()
        );

        Ok(mesh_data)
    }

    /// Checks that indices form a triangle list and optional attributes match the positions.
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(ExtractError::IndexCount {
                mesh: self.index,
                count: self.indices.len(),
            });
        }

        let expected = self.positions.len();
        let lengths = [
            ("NORMAL", self.normals.as_ref().map(Vec::len)),
            ("TANGENT", self.tangents.as_ref().map(Vec::len)),
            ("TEXCOORD_0", self.texcoords.as_ref().map(Vec::len)),
        ];
        for (attribute, actual) in lengths {
            match actual {
                Some(actual) if actual != expected => {
                    return Err(ExtractError::AttributeLength {
                        mesh: self.index,
                        attribute,
                        expected,
                        actual,
                    })
                }
                _ => {}
            }
        }

        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn read_indices(document: &Document, buffer: &[u8], accessor: usize) -> Result<Vec<u32>> {
    decode_accessor(document, buffer, accessor)?
        .iter()
        .enumerate()
        .map(|(element, value)| {
            value.as_index().ok_or(ExtractError::ElementShape {
                accessor,
                element,
                attribute: "index",
            })
        })
        .collect()
}

fn read_components(document: &Document, buffer: &[u8], accessor: usize) -> Result<Vec<Vec<f32>>> {
    Ok(decode_accessor(document, buffer, accessor)?
        .iter()
        .map(Element::to_vec)
        .collect())
}

fn read_vectors<const N: usize>(
    document: &Document,
    buffer: &[u8],
    accessor: usize,
    attribute: &'static str,
) -> Result<Vec<[f32; N]>> {
    decode_accessor(document, buffer, accessor)?
        .iter()
        .enumerate()
        .map(|(element, value)| {
            value.to_array::<N>().ok_or(ExtractError::ElementShape {
                accessor,
                element,
                attribute,
            })
        })
        .collect()
}
