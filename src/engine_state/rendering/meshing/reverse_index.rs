//! Reverse index from rendered objects back to the chunk that owns them.
//!
//! A hit-test against the scene yields a node id. This index answers which
//! world chunk, or which chunk of which detached group, that node draws. Each
//! scene-attached chunk mesh has exactly one entry, inserted and removed by
//! the mesh manager together with the mesh itself.

use std::collections::HashMap;

use crate::engine_state::rendering::scene::NodeId;
use crate::engine_state::voxels::chunk::ChunkCoord;

/// Identity of a detached group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u32);

/// The logical owner of a rendered chunk mesh.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MeshOwner {
    /// A chunk of the world's fixed grid
    World(ChunkCoord),
    /// A chunk of a detached group
    Detached { group: GroupId, coord: ChunkCoord },
}

impl MeshOwner {
    pub fn coord(&self) -> ChunkCoord {
        match self {
            MeshOwner::World(coord) | MeshOwner::Detached { coord, .. } => *coord,
        }
    }

    pub fn group(&self) -> Option<GroupId> {
        match self {
            MeshOwner::World(_) => None,
            MeshOwner::Detached { group, .. } => Some(*group),
        }
    }
}

#[derive(Debug, Default)]
pub struct ReverseIndex {
    owners: HashMap<NodeId, MeshOwner>,
}

impl ReverseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `object` and returns the owner it previously had, if any.
    pub fn insert(&mut self, object: NodeId, owner: MeshOwner) -> Option<MeshOwner> {
        self.owners.insert(object, owner)
    }

    pub fn remove(&mut self, object: NodeId) -> Option<MeshOwner> {
        self.owners.remove(&object)
    }

    pub fn resolve(&self, object: NodeId) -> Option<MeshOwner> {
        self.owners.get(&object).copied()
    }

    pub fn contains(&self, object: NodeId) -> bool {
        self.owners.contains_key(&object)
    }

    /// Every object owned by `owner`.
    pub fn objects_of(&self, owner: MeshOwner) -> Vec<NodeId> {
        let mut objects: Vec<NodeId> = self
            .owners
            .iter()
            .filter(|(_, o)| **o == owner)
            .map(|(object, _)| *object)
            .collect();
        objects.sort();
        objects
    }

    /// Removes every entry of a detached group and returns the objects.
    pub fn remove_group(&mut self, group: GroupId) -> Vec<NodeId> {
        let mut removed = Vec::new();
        self.owners.retain(|object, owner| {
            let keep = owner.group() != Some(group);
            if !keep {
                removed.push(*object);
            }
            keep
        });
        removed.sort();
        removed
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &MeshOwner)> {
        self.owners.iter()
    }
}
