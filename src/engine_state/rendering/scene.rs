//! # Scene Graph
//!
//! The render graph the engine keeps in sync: a forest of transform nodes,
//! some of which carry a [`Renderable`]. Nodes reachable from a scene root are
//! "in the scene" and are what a renderer draws and what hit-testing walks.
//!
//! Each node has a position and an XYZ Euler rotation. A node's world matrix is
//! its parent's world matrix times `translation * rotation`, so rotating a
//! node turns its whole subtree about the node's own origin.

use std::collections::HashMap;

use cgmath::{Euler, Matrix4, Point3, Quaternion, Rad, SquareMatrix, Transform as _, Vector3, Zero};
use log::trace;

use super::meshing::Renderable;
use crate::engine_state::error::{EngineError, Result};

/// Identity of a node in the scene graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Local transform of a scene node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Euler<Rad<f32>>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Euler::new(Rad(0.0), Rad(0.0), Rad(0.0)),
        }
    }
}

impl Transform {
    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// `translation * rotation`.
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * Matrix4::from(Quaternion::from(self.rotation))
    }
}

/// A node in the scene graph.
#[derive(Debug)]
pub struct SceneNode {
    /// Debug label
    pub label: String,
    pub transform: Transform,
    /// Geometry drawn at this node, if any
    pub renderable: Option<Renderable>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena of scene nodes plus the list of nodes attached to the scene root.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    roots: Vec<NodeId>,
    next_id: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached transform node.
    pub fn create_node(&mut self, label: impl Into<String>, transform: Transform) -> NodeId {
        self.insert(label.into(), transform, None)
    }

    /// Creates a detached node carrying a renderable.
    pub fn create_renderable(
        &mut self,
        label: impl Into<String>,
        transform: Transform,
        renderable: Renderable,
    ) -> NodeId {
        self.insert(label.into(), transform, Some(renderable))
    }

    fn insert(&mut self, label: String, transform: Transform, renderable: Option<Renderable>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        trace!("Created scene node {:?} ({})", id, label);
        self.nodes.insert(
            id,
            SceneNode {
                label,
                transform,
                renderable,
                parent: None,
                children: Vec::new(),
            },
        );
        id
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    fn node_or_err(&self, id: NodeId) -> Result<&SceneNode> {
        self.nodes.get(&id).ok_or(EngineError::MissingNode(id))
    }

    fn node_mut_or_err(&mut self, id: NodeId) -> Result<&mut SceneNode> {
        self.nodes.get_mut(&id).ok_or(EngineError::MissingNode(id))
    }

    /// Nodes attached directly to the scene root.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Attaches `id` to the scene root, detaching it from any parent first.
    pub fn add(&mut self, id: NodeId) -> Result<()> {
        self.detach(id)?;
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
        Ok(())
    }

    /// Removes `id` from the scene root. Returns whether it was attached there.
    pub fn remove(&mut self, id: NodeId) -> bool {
        match self.roots.iter().position(|root| *root == id) {
            Some(index) => {
                self.roots.remove(index);
                true
            }
            None => false,
        }
    }

    /// Makes `child` a child of `parent`, detaching it from wherever it was.
    ///
    /// Fails without changing the graph if `parent` is `child` or one of its
    /// descendants.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node_or_err(parent)?;
        self.node_or_err(child)?;
        if self.is_descendant_or_self(parent, child) {
            return Err(EngineError::SceneCycle { parent, child });
        }
        self.detach(child)?;
        self.node_mut_or_err(child)?.parent = Some(parent);
        self.node_mut_or_err(parent)?.children.push(child);
        Ok(())
    }

    /// Detaches `id` from its parent, or from the scene root.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        let parent = self.node_mut_or_err(id)?.parent.take();
        match parent {
            Some(parent) => {
                let siblings = &mut self.node_mut_or_err(parent)?.children;
                if let Some(index) = siblings.iter().position(|c| *c == id) {
                    siblings.remove(index);
                }
            }
            None => {
                self.remove(id);
            }
        }
        Ok(())
    }

    /// Detaches `id` and drops it together with its whole subtree.
    ///
    /// Returns the removed node, or `None` if it did not exist.
    pub fn dispose(&mut self, id: NodeId) -> Option<SceneNode> {
        self.detach(id).ok()?;
        let node = self.nodes.remove(&id)?;
        let mut pending = node.children.clone();
        while let Some(descendant) = pending.pop() {
            if let Some(removed) = self.nodes.remove(&descendant) {
                pending.extend(removed.children);
            }
        }
        trace!("Disposed scene node {:?} ({})", id, node.label);
        Some(node)
    }

    fn is_descendant_or_self(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.nodes.get(&node).and_then(|n| n.parent);
        }
        false
    }

    /// `true` when the chain of parents above `id` ends at a scene root.
    pub fn is_in_scene(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            match self.nodes.get(&current) {
                Some(node) => match node.parent {
                    Some(parent) => current = parent,
                    None => return self.roots.contains(&current),
                },
                None => return false,
            }
        }
    }

    pub fn transform(&self, id: NodeId) -> Result<Transform> {
        Ok(self.node_or_err(id)?.transform)
    }

    pub fn set_position(&mut self, id: NodeId, position: Vector3<f32>) -> Result<()> {
        self.node_mut_or_err(id)?.transform.position = position;
        Ok(())
    }

    pub fn set_rotation(&mut self, id: NodeId, rotation: Euler<Rad<f32>>) -> Result<()> {
        self.node_mut_or_err(id)?.transform.rotation = rotation;
        Ok(())
    }

    /// Product of the local matrices from the top of `id`'s chain down to `id`.
    pub fn world_matrix(&self, id: NodeId) -> Result<Matrix4<f32>> {
        let mut matrix = Matrix4::identity();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node_or_err(node_id)?;
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        Ok(matrix)
    }

    /// World-space position of `id`'s origin.
    pub fn world_position(&self, id: NodeId) -> Result<Point3<f32>> {
        Ok(self.world_matrix(id)?.transform_point(Point3::new(0.0, 0.0, 0.0)))
    }

    /// Every node in the scene that carries a renderable.
    pub fn renderables_in_scene(&self) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut pending: Vec<NodeId> = self.roots.clone();
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.get(&id) {
                if node.renderable.is_some() {
                    found.push(id);
                }
                pending.extend(node.children.iter().copied());
            }
        }
        found.sort();
        found
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;

    fn assert_point_eq(a: Point3<f32>, b: Point3<f32>) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-3);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-3);
        assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-3);
    }

    #[test]
    fn add_and_remove_roots() {
        let mut scene = SceneGraph::new();
        let a = scene.create_node("a", Transform::default());

        assert!(!scene.is_in_scene(a));
        scene.add(a).unwrap();
        scene.add(a).unwrap();
        assert_eq!(scene.roots(), &[a]);
        assert!(scene.is_in_scene(a));

        assert!(scene.remove(a));
        assert!(!scene.remove(a));
        assert!(!scene.is_in_scene(a));
        assert!(scene.contains(a));
    }

    #[test]
    fn attach_moves_child_between_parents() {
        let mut scene = SceneGraph::new();
        let a = scene.create_node("a", Transform::default());
        let b = scene.create_node("b", Transform::default());
        let c = scene.create_node("c", Transform::default());
        scene.add(a).unwrap();

        scene.attach(a, c).unwrap();
        assert!(scene.is_in_scene(c));

        scene.attach(b, c).unwrap();
        assert!(scene.node(a).unwrap().children().is_empty());
        assert_eq!(scene.node(b).unwrap().children(), &[c]);
        assert_eq!(scene.node(c).unwrap().parent(), Some(b));
        assert!(!scene.is_in_scene(c));
    }

    #[test]
    fn attach_refuses_to_create_a_cycle() {
        let mut scene = SceneGraph::new();
        let a = scene.create_node("a", Transform::default());
        let b = scene.create_node("b", Transform::default());
        scene.attach(a, b).unwrap();

        let err = scene.attach(b, a).unwrap_err();
        assert!(matches!(err, EngineError::SceneCycle { parent, child } if parent == b && child == a));
        assert!(matches!(scene.attach(a, a), Err(EngineError::SceneCycle { .. })));

        assert_eq!(scene.node(a).unwrap().parent(), None);
        assert_eq!(scene.node(b).unwrap().parent(), Some(a));
        assert!(scene.node(b).unwrap().children().is_empty());
    }

    #[test]
    fn dispose_drops_subtree() {
        let mut scene = SceneGraph::new();
        let a = scene.create_node("a", Transform::default());
        let b = scene.create_node("b", Transform::default());
        let c = scene.create_node("c", Transform::default());
        scene.add(a).unwrap();
        scene.attach(a, b).unwrap();
        scene.attach(b, c).unwrap();

        let removed = scene.dispose(b).unwrap();
        assert_eq!(removed.label, "b");
        assert!(!scene.contains(b));
        assert!(!scene.contains(c));
        assert!(scene.node(a).unwrap().children().is_empty());
        assert!(scene.dispose(b).is_none());
    }

    #[test]
    fn missing_nodes_are_reported() {
        let mut scene = SceneGraph::new();
        let a = scene.create_node("a", Transform::default());
        scene.dispose(a);

        assert!(matches!(scene.add(a), Err(EngineError::MissingNode(id)) if id == a));
        assert!(scene.world_matrix(a).is_err());
    }

    #[test]
    fn world_position_composes_parent_transforms() {
        let mut scene = SceneGraph::new();
        let parent = scene.create_node("parent", Transform::from_position(Vector3::new(10.0, 0.0, 0.0)));
        let child = scene.create_node("child", Transform::from_position(Vector3::new(0.0, 0.0, 5.0)));
        scene.attach(parent, child).unwrap();

        assert_point_eq(scene.world_position(child).unwrap(), Point3::new(10.0, 0.0, 5.0));

        // A quarter turn about Y maps +Z onto +X.
        scene
            .set_rotation(parent, Euler::new(Rad(0.0), Rad(FRAC_PI_2), Rad(0.0)))
            .unwrap();
        assert_point_eq(scene.world_position(child).unwrap(), Point3::new(15.0, 0.0, 0.0));
        assert_point_eq(scene.world_position(parent).unwrap(), Point3::new(10.0, 0.0, 0.0));
    }
}
