//! Renders mesh world transforms as `mat4_t` array literals.

use std::fmt::Write;

use crate::config::ExportConfig;
use crate::scene_graph::scene::MeshTransform;

pub fn format_mesh_transform(mesh_transform: &MeshTransform, config: &ExportConfig) -> String {
    let precision = config.precision;
    let mut output = String::new();

    let _ = writeln!(output, "    mat4_t {}_transform = {{{{", mesh_transform.mesh);
    for [m0, m1, m2, m3] in mesh_transform.transform.rows() {
        let _ = writeln!(
            output,
            "       {{{m0:.precision$}f, {m1:.precision$}f, {m2:.precision$}f, {m3:.precision$}f}},"
        );
    }
    let _ = writeln!(output, "    }}}};");
    output.push('\n');

    output
}

pub fn format_transform_report(transforms: &[MeshTransform], config: &ExportConfig) -> String {
    transforms
        .iter()
        .map(|mesh_transform| format_mesh_transform(mesh_transform, config))
        .collect()
}
