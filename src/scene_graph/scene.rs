use glam::DVec3;
use id_arena::Arena;

use crate::document::{Document, NodeTransform};
use crate::error::{ExtractError, Result};
use crate::scene_graph::node::{Node, NodeId};
use crate::scene_graph::transform::Transform;

/// World transform of one mesh-bearing node.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshTransform {
    pub node: usize,
    pub mesh: usize,
    pub transform: Transform,
}

/// The node hierarchy of a single-scene, single-root document.
pub struct SceneGraph {
    pub nodes: Arena<Node>,
    ids: Vec<NodeId>,
    root: NodeId,
}

impl SceneGraph {
    /// Builds the hierarchy in one pass over the document's nodes.
    ///
    /// Fails unless the document has exactly one scene whose only root is node 0, and unless
    /// every node has at most one parent.
    pub fn from_gltf(document: &Document) -> Result<Self> {
        validate_scene_root(document)?;

        let mut nodes = Arena::new();
        let ids: Vec<NodeId> = (0..document.root.nodes.len())
            .map(|index| nodes.alloc(Node::new(index)))
            .collect();
        let root = *ids.first().ok_or_else(|| ExtractError::UnknownNode {
            node: 0,
            referrer: "scene 0".to_string(),
        })?;

        let mut scene = Self { nodes, ids, root };

        let node_entries = document.root.nodes.iter().zip(&document.node_transforms);
        for (index, (node_data, node_transform)) in node_entries.enumerate() {
            let node_id = scene.ids[index];
            let transform = local_transform(index, node_transform)?;

            let node = &mut scene.nodes[node_id];
            node.transform = transform;
            node.mesh = node_data.mesh.as_ref().map(|mesh| mesh.value());

            for child in node_data.children.iter().flatten() {
                scene.attach_child(node_id, child.value())?;
            }

            log::debug!(
                "Node {} ({}): mesh {:?}, {} children",
                index,
                node_data.name.as_deref().unwrap_or("Unnamed"),
                scene.nodes[node_id].mesh,
                scene.nodes[node_id].child_ids.len()
            );
        }

        if let Some(parent) = scene.nodes[root].parent(&scene) {
            return Err(ExtractError::CyclicHierarchy {
                root: 0,
                parent: parent.index,
            });
        }

        Ok(scene)
    }

    fn attach_child(&mut self, parent_id: NodeId, child_index: usize) -> Result<()> {
        let parent_index = self.nodes[parent_id].index;
        let child_id = self
            .node_id(child_index)
            .ok_or_else(|| ExtractError::UnknownNode {
                node: child_index,
                referrer: format!("node {}", parent_index),
            })?;

        if let Some(existing) = self.nodes[child_id].parent(self) {
            return Err(ExtractError::DuplicateParent {
                child: child_index,
                first: existing.index,
                second: parent_index,
            });
        }

        self.nodes[child_id].parent_id = Some(parent_id);
        self.nodes[parent_id].child_ids.push(child_id);

        Ok(())
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Looks up a node by its index in the document.
    pub fn node_id(&self, index: usize) -> Option<NodeId> {
        self.ids.get(index).copied()
    }

    /// Composes the node's local transform with every ancestor's, innermost first.
    pub fn world_transform(&self, id: NodeId) -> Transform {
        let node = &self.nodes[id];
        let mut transform = node.transform;
        let mut ancestor = node.parent(self);
        while let Some(parent) = ancestor {
            transform = parent.transform * transform;
            ancestor = parent.parent(self);
        }
        transform
    }

    /// World transforms of all mesh-bearing nodes, depth first from the root.
    ///
    /// Each node's world transform is its parent's world transform times its own, so every node
    /// is visited once.
    pub fn mesh_transforms(&self) -> Vec<MeshTransform> {
        let mut transforms = Vec::new();
        let mut stack = vec![(self.root, Transform::identity())];

        while let Some((id, parent_world)) = stack.pop() {
            let node = &self.nodes[id];
            let world = parent_world * node.transform;

            if let Some(mesh) = node.mesh {
                transforms.push(MeshTransform {
                    node: node.index,
                    mesh,
                    transform: world,
                });
            }

            // Reversed so the first child is popped first.
            stack.extend(node.child_ids.iter().rev().map(|&child_id| (child_id, world)));
        }

        log::info!("Computed {} mesh transforms", transforms.len());
        transforms
    }
}

fn validate_scene_root(document: &Document) -> Result<()> {
    let document = &document.root;
    let active = document.scene.as_ref().map(|scene| scene.value());
    if active != Some(0) {
        return Err(ExtractError::ActiveScene { active });
    }

    if document.scenes.len() != 1 {
        return Err(ExtractError::SceneCount {
            count: document.scenes.len(),
        });
    }

    let roots: Vec<usize> = document.scenes[0]
        .nodes
        .iter()
        .map(|node| node.value())
        .collect();
    if roots != [0] {
        return Err(ExtractError::SceneRoots { roots });
    }

    Ok(())
}

/// The node's own transform: either its raw matrix, or `translation * rotation * scale`.
fn local_transform(index: usize, node: &NodeTransform) -> Result<Transform> {
    if let Some(matrix) = node.matrix {
        if node.scale.is_some() || node.rotation.is_some() || node.translation.is_some() {
            return Err(ExtractError::ConflictingTransform { node: index });
        }
        return Ok(Transform::from_matrix(matrix));
    }

    let scale = node.scale.unwrap_or([1.0, 1.0, 1.0]);
    let rotation = node.rotation.unwrap_or([0.0, 0.0, 0.0, 1.0]);
    let translation = node.translation.unwrap_or([0.0, 0.0, 0.0]);

    let rotation = Transform::from_rotation(rotation).ok_or(ExtractError::DegenerateRotation {
        node: index,
        rotation,
    })?;

    Ok(Transform::from_translation(DVec3::from_array(translation))
        * rotation
        * Transform::from_scale(DVec3::from_array(scale)))
}
