use id_arena::Id;

use crate::scene_graph::scene::SceneGraph;
use crate::scene_graph::transform::Transform;

pub type NodeId = Id<Node>;

pub struct Node {
    /// Position of the node in the document's `nodes` array.
    pub index: usize,
    pub transform: Transform,
    pub mesh: Option<usize>,
    pub parent_id: Option<NodeId>,
    pub child_ids: Vec<NodeId>,
}

impl Node {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            transform: Transform::identity(),
            mesh: None,
            parent_id: None,
            child_ids: Vec::new(),
        }
    }

    pub fn parent<'a>(&self, scene: &'a SceneGraph) -> Option<&'a Node> {
        self.parent_id.and_then(|id| scene.get_node(id))
    }
}
