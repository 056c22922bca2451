//! Text dump of decoded mesh data in the Wavefront OBJ line format.

use std::borrow::Cow;
use std::fmt::Write;

use itertools::Itertools;

use crate::config::ExportConfig;
use crate::error::{ExtractError, Result};
use crate::model::MeshData;

const DEFAULT_TEXCOORD: [f32; 2] = [0.0, 0.0];
const DEFAULT_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];

/// Renders `v`, `vt`, `vn` and `f` lines for `mesh`.
///
/// Missing texcoords and normals are replaced by a constant per-vertex default so every face
/// corner can use the same 1-based index for position, texcoord and normal.
pub fn dump_mesh_data(mesh: &MeshData, config: &ExportConfig) -> Result<String> {
    if mesh.indices.len() % 3 != 0 {
        return Err(ExtractError::IndexCount {
            mesh: mesh.index,
            count: mesh.indices.len(),
        });
    }

    let vertex_count = mesh.positions.len();
    let texcoords: Cow<[[f32; 2]]> = match &mesh.texcoords {
        Some(texcoords) => Cow::Borrowed(texcoords),
        None => Cow::Owned(vec![DEFAULT_TEXCOORD; vertex_count]),
    };
    let normals: Cow<[[f32; 3]]> = match &mesh.normals {
        Some(normals) => Cow::Borrowed(normals),
        None => Cow::Owned(vec![DEFAULT_NORMAL; vertex_count]),
    };

    let precision = config.precision;
    let mut output = String::new();

    for [x, y, z] in &mesh.positions {
        let _ = writeln!(output, "v {x:.precision$} {y:.precision$} {z:.precision$}");
    }
    for [u, v] in texcoords.iter() {
        let _ = writeln!(output, "vt {u:.precision$} {v:.precision$}");
    }
    for [x, y, z] in normals.iter() {
        let _ = writeln!(output, "vn {x:.precision$} {y:.precision$} {z:.precision$}");
    }
    for (a, b, c) in mesh.indices.iter().map(|index| index + 1).tuples() {
        let _ = writeln!(output, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}");
    }

    Ok(output)
}
