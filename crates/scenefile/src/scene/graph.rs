//! Scene graph: node arena plus name registry
//!
//! Nodes live in a single arena and refer to their children by handle. A
//! master reference simply pushes an existing handle into a second parent's
//! child list, so shared sub-graphs are stored once and the graph is a DAG
//! rather than a tree.

use std::collections::{HashMap, HashSet};
use std::ops::Index;

use super::primitive::Primitive;
use super::transform::Transformation;
use crate::error::{Result, SceneError};
use crate::foundation::collections::{NodeArena, NodeHandle};

/// A node of the scene graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneNode {
    /// Local transformations, applied in order
    pub transformations: Vec<Transformation>,
    /// Primitives declared directly on this node
    pub primitives: Vec<Primitive>,
    /// Child nodes; a handle may also appear under other parents
    pub children: Vec<NodeHandle>,
}

impl SceneNode {
    /// Create an empty node
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the node carries no transformations, primitives or children
    pub fn is_empty(&self) -> bool {
        self.transformations.is_empty() && self.primitives.is_empty() && self.children.is_empty()
    }
}

/// One step of a depth-first walk
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    /// Handle of the visited node
    pub handle: NodeHandle,
    /// The visited node
    pub node: &'a SceneNode,
    /// Parent this visit came through (`None` for the start node)
    pub parent: Option<NodeHandle>,
    /// Distance from the start node
    pub depth: usize,
    /// True if the node was already visited through another parent
    pub revisit: bool,
}

/// Arena of scene nodes with the registry of named nodes
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: NodeArena<SceneNode>,
    names: HashMap<String, NodeHandle>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new empty node
    pub fn insert(&mut self, node: SceneNode) -> NodeHandle {
        self.nodes.insert(node)
    }

    /// Get a node by handle
    pub fn get(&self, handle: NodeHandle) -> Option<&SceneNode> {
        self.nodes.get(handle)
    }

    /// Get a mutable node by handle
    pub(crate) fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut SceneNode> {
        self.nodes.get_mut(handle)
    }

    /// Register `handle` under `name`
    ///
    /// Returns the handle already holding the name if it is taken; the
    /// registry is left unchanged in that case.
    pub fn register(&mut self, name: &str, handle: NodeHandle) -> std::result::Result<(), NodeHandle> {
        if let Some(existing) = self.names.get(name) {
            return Err(*existing);
        }
        self.names.insert(name.to_string(), handle);
        Ok(())
    }

    /// Look up a named node
    pub fn lookup(&self, name: &str) -> Option<NodeHandle> {
        self.names.get(name).copied()
    }

    /// Name a node was registered under, if any
    pub fn name_of(&self, handle: NodeHandle) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, h)| **h == handle)
            .map(|(name, _)| name.as_str())
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Total number of allocated nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no node has been allocated
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node that lists `handle` among its children
    pub fn parents_of(&self, handle: NodeHandle) -> Vec<NodeHandle> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.children.contains(&handle))
            .map(|(parent, _)| parent)
            .collect()
    }

    /// Depth-first, pre-order walk starting at `start`
    ///
    /// A shared node is descended into once. Later parents that reach it
    /// report it again with `revisit` set, without walking its children, so
    /// the walk is linear in nodes plus edges. Fails with
    /// [`SceneError::CyclicReference`] if a node is reached from its own
    /// sub-graph, and with [`SceneError::UnresolvedReference`] on a dangling
    /// handle.
    pub fn walk<'a, F>(&'a self, start: NodeHandle, mut visitor: F) -> Result<()>
    where
        F: FnMut(Visit<'a>),
    {
        let mut active = HashSet::new();
        let mut seen = HashSet::new();
        self.walk_node(start, None, 0, &mut active, &mut seen, &mut visitor)
    }

    fn walk_node<'a, F>(
        &'a self,
        handle: NodeHandle,
        parent: Option<NodeHandle>,
        depth: usize,
        active: &mut HashSet<NodeHandle>,
        seen: &mut HashSet<NodeHandle>,
        visitor: &mut F,
    ) -> Result<()>
    where
        F: FnMut(Visit<'a>),
    {
        let node = self.nodes.get(handle).ok_or_else(|| SceneError::UnresolvedReference {
            at: "scene graph".to_string(),
            name: format!("{handle:?}"),
        })?;

        if !active.insert(handle) {
            return Err(SceneError::CyclicReference {
                at: "scene graph".to_string(),
                name: self.describe(handle),
            });
        }

        if !seen.insert(handle) {
            visitor(Visit { handle, node, parent, depth, revisit: true });
            active.remove(&handle);
            return Ok(());
        }
        visitor(Visit { handle, node, parent, depth, revisit: false });

        for &child in &node.children {
            self.walk_node(child, Some(handle), depth + 1, active, seen, visitor)?;
        }

        active.remove(&handle);
        Ok(())
    }

    /// Number of distinct nodes reachable from `start` (including it)
    ///
    /// Fails with [`SceneError::UnresolvedReference`] on a dangling handle.
    pub fn reachable_count(&self, start: NodeHandle) -> Result<usize> {
        let mut visited = HashSet::new();
        let mut stack = vec![start];
        while let Some(handle) = stack.pop() {
            if !visited.insert(handle) {
                continue;
            }
            let node = self.nodes.get(handle).ok_or_else(|| SceneError::UnresolvedReference {
                at: "scene graph".to_string(),
                name: format!("{handle:?}"),
            })?;
            stack.extend(node.children.iter().copied());
        }
        Ok(visited.len())
    }

    fn describe(&self, handle: NodeHandle) -> String {
        self.name_of(handle)
            .map_or_else(|| format!("{handle:?}"), str::to_string)
    }
}

impl Index<NodeHandle> for SceneGraph {
    type Output = SceneNode;

    /// Panics if `handle` did not come from this graph
    fn index(&self, handle: NodeHandle) -> &SceneNode {
        &self.nodes[handle]
    }
}
