pub mod accessor;
pub mod mesh_dumper;

pub use accessor::{decode_accessor, Component, Element};
pub use mesh_dumper::dump_mesh_data;
