pub mod node;
pub mod report;
pub mod scene;
pub mod transform;

// Re-export main types for convenience
pub use node::{Node, NodeId};
pub use report::{format_mesh_transform, format_transform_report};
pub use scene::{MeshTransform, SceneGraph};
pub use transform::Transform;
