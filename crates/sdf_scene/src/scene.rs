//! Arena scene graph.
//!
//! Nodes are stored in a flat arena owned by `Scene` and addressed by
//! `NodeId` handles. Each node keeps its parent as an optional handle and
//! its children as an ordered list of handles, so back-references never
//! create ownership cycles.
//!
//! A scene may hold several independent trees at once; any node without a
//! parent is the root of its own tree. Trees are assembled once before
//! rendering and are read-only afterwards.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use sdf_math::Vec3;
use thiserror::Error;

use crate::material::Material;
use crate::shape::Shape;

/// Errors raised while assembling a tree.
///
/// Every check runs before anything is modified, so a failed attach leaves
/// both trees exactly as they were.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("Cannot add children to leaf node {0}")]
    LeafNode(String),

    #[error("Node handle {0} does not belong to this scene")]
    UnknownNode(NodeId),

    #[error("Node {0} is already part of the tree")]
    AlreadyInTree(String),

    #[error("Node {0} already has a parent")]
    AlreadyParented(String),

    #[error("Transform {0} already has a child")]
    TransformOccupied(String),
}

/// Errors from scene construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error("Illegal tube axis {0}, expected 0, 1 or 2")]
    InvalidAxis(usize),

    #[error("Node handle {0} does not belong to this scene")]
    UnknownNode(NodeId),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Handle to a node in a `Scene` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the scene tree.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: String,
    shape: Shape,
    material: Option<Arc<Material>>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Unique name, `<Kind>-<arena index>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Assigned material; `None` means the renderer default applies.
    pub fn material(&self) -> Option<&Arc<Material>> {
        self.material.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn can_have_children(&self) -> bool {
        self.shape.can_have_children()
    }
}

/// Arena holding every node of one or more trees.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<Node>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detached node and return its handle.
    pub fn add(&mut self, shape: Shape) -> NodeId {
        let id = NodeId(self.nodes.len());
        let name = format!("{}-{}", shape.kind_name(), id.0);
        self.nodes.push(Node {
            id,
            name,
            shape,
            material: None,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Add a detached node with a material.
    pub fn add_with_material(&mut self, shape: Shape, material: Arc<Material>) -> NodeId {
        let id = self.add(shape);
        self.nodes[id.0].material = Some(material);
        id
    }

    /// Assign or replace the material of a node.
    pub fn set_material(&mut self, id: NodeId, material: Arc<Material>) -> SceneResult<()> {
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or(SceneError::UnknownNode(id))?;
        node.material = Some(material);
        Ok(())
    }

    /// Get a node by handle.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Borrow a node whose handle is known to come from this scene.
    ///
    /// Panics on a foreign handle; callers on the render path validate the
    /// root once up front.
    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every node in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Append `child` to `parent`'s children.
    ///
    /// Fails when the parent is a primitive or a transform that already has
    /// its child, when the child is already somewhere in the parent's tree
    /// (including the parent itself or an ancestor), or when the child already
    /// has a parent. A parentless child roots its own tree, so those checks
    /// also reject any attach that would merge two trees sharing a node.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), StructureError> {
        let parent_node = self.node(parent).ok_or(StructureError::UnknownNode(parent))?;
        let child_node = self.node(child).ok_or(StructureError::UnknownNode(child))?;

        if !parent_node.can_have_children() {
            return Err(StructureError::LeafNode(parent_node.name.clone()));
        }
        if parent_node.shape.is_transform() && !parent_node.children.is_empty() {
            return Err(StructureError::TransformOccupied(parent_node.name.clone()));
        }

        let parent_tree = self.all_nodes(self.root_of(parent));
        if parent_tree.contains(&child) {
            return Err(StructureError::AlreadyInTree(child_node.name.clone()));
        }
        if child_node.parent.is_some() {
            return Err(StructureError::AlreadyParented(child_node.name.clone()));
        }

        log::debug!(
            "Attaching {} to {}",
            child_node.name,
            parent_node.name
        );

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// Create a `shape` node and attach `children` to it in order.
    ///
    /// On failure every child is detached again; the new node stays behind
    /// as an empty, unreferenced root.
    pub fn combine(&mut self, shape: Shape, children: &[NodeId]) -> SceneResult<NodeId> {
        let id = self.add(shape);
        for &child in children {
            if let Err(err) = self.add_child(id, child) {
                for attached in std::mem::take(&mut self.nodes[id.0].children) {
                    self.nodes[attached.0].parent = None;
                }
                return Err(err.into());
            }
        }
        Ok(id)
    }

    /// Wrap `child` in a translation by `offset`.
    pub fn translated(&mut self, child: NodeId, offset: Vec3) -> SceneResult<NodeId> {
        self.combine(Shape::translate(offset), &[child])
    }

    /// Wrap `child` in a uniform scale by `factor`.
    pub fn scaled(&mut self, child: NodeId, factor: f32) -> SceneResult<NodeId> {
        self.combine(Shape::scale(factor), &[child])
    }

    /// Whether `node` is a descendant of `ancestor`.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let Some(ancestor) = self.node(ancestor) else {
            return false;
        };
        ancestor
            .children
            .iter()
            .any(|&child| child == node || self.contains(child, node))
    }

    /// The node itself plus all of its descendants.
    pub fn all_nodes(&self, id: NodeId) -> HashSet<NodeId> {
        let mut set = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.node(current) {
                set.insert(current);
                stack.extend_from_slice(&node.children);
            }
        }
        set
    }

    /// Root of the tree containing `id`.
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.node(current).and_then(|node| node.parent) {
            current = parent;
        }
        current
    }

    /// `id` followed by its parent, grandparent and so on up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).map(|node| node.id), move |&current| {
            self.node(current).and_then(|node| node.parent)
        })
    }

    /// Nested description of a subtree, e.g.
    /// `Union(nodes=[Sphere(radius=1), Plane(normal=[0, 1, 0])])`.
    pub fn describe(&self, id: NodeId) -> String {
        let Some(node) = self.node(id) else {
            return format!("<unknown {id}>");
        };
        if node.children.is_empty() {
            return node.shape.to_string();
        }

        let children: Vec<String> = node
            .children
            .iter()
            .map(|&child| self.describe(child))
            .collect();
        let own = node.shape.to_string();
        // Strip the closing parenthesis so children land inside the argument list
        let head = own.trim_end_matches(')');
        let separator = if head.ends_with('(') { "" } else { ", " };
        format!("{head}{separator}nodes=[{}])", children.join(", "))
    }
}
