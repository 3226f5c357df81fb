//! Transform hierarchy stored as a dense arena.
//!
//! Nodes are addressed by [`TransformId`]; a parent link is just another id,
//! so cycles are detectable when a link is made and rejected there.

use crate::Vec3;
use crate::error::{CoreError, CoreResult};
use crate::transform::Transform;

/// Stable handle into a [`TransformTree`] (dense index, never reused).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransformId(u32);

impl TransformId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Dense parallel arrays: one transform and one optional parent per node.
/// Nodes are never removed, so ids stay valid for the tree's lifetime.
#[derive(Clone, Debug, Default)]
pub struct TransformTree {
    transforms: Vec<Transform>,
    parents: Vec<Option<TransformId>>,
}

impl TransformTree {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Add a root node.
    pub fn insert(&mut self, t: Transform) -> TransformId {
        let id = TransformId(self.transforms.len() as u32);
        self.transforms.push(t);
        self.parents.push(None);
        id
    }

    /// Add a node parented under `parent`.
    pub fn insert_child(&mut self, t: Transform, parent: TransformId) -> CoreResult<TransformId> {
        self.check(parent)?;
        let id = self.insert(t);
        self.parents[id.index()] = Some(parent);
        Ok(id)
    }

    #[inline]
    pub fn contains(&self, id: TransformId) -> bool {
        id.index() < self.transforms.len()
    }

    #[inline]
    pub fn get(&self, id: TransformId) -> Option<&Transform> {
        self.transforms.get(id.index())
    }

    /// Mutable access to a transform (for animation).
    #[inline]
    pub fn get_mut(&mut self, id: TransformId) -> Option<&mut Transform> {
        self.transforms.get_mut(id.index())
    }

    #[inline]
    pub fn parent(&self, id: TransformId) -> Option<TransformId> {
        self.parents.get(id.index()).copied().flatten()
    }

    /// Re-link `child` under `parent` (or detach it with `None`).
    pub fn set_parent(&mut self, child: TransformId, parent: Option<TransformId>) -> CoreResult<()> {
        self.check(child)?;
        if let Some(parent) = parent {
            self.check(parent)?;
            // Walking up from the new parent must not reach the child.
            let mut cursor = Some(parent);
            while let Some(node) = cursor {
                if node == child {
                    return Err(CoreError::CycleDetected { child, parent });
                }
                cursor = self.parent(node);
            }
        }
        self.parents[child.index()] = parent;
        Ok(())
    }

    /// Local point of node `id` into world space, leaf to root.
    ///
    /// Panics if `id` was not issued by this tree.
    pub fn to_world(&self, id: TransformId, local: Vec3) -> Vec3 {
        let mut p = local;
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            p = self.transforms[node.index()].to_parent(p);
            cursor = self.parents[node.index()];
        }
        p
    }

    /// World point into the local space of node `id`: outer transforms are
    /// undone first, root to leaf.
    ///
    /// Panics if `id` was not issued by this tree.
    pub fn to_local(&self, id: TransformId, world: Vec3) -> Vec3 {
        let p = match self.parents[id.index()] {
            Some(parent) => self.to_local(parent, world),
            None => world,
        };
        self.transforms[id.index()].from_parent(p)
    }

    fn check(&self, id: TransformId) -> CoreResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(CoreError::UnknownTransform(id))
        }
    }
}
