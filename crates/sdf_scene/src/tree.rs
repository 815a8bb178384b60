//! Tree walking utilities.
//!
//! Visitors receive every node of a subtree exactly once, in one of several
//! fixed orders. Scene evaluation does not depend on these; they exist for
//! multi-pass tooling and for checking tree shape in tests.

use std::collections::BTreeMap;

use crate::scene::{Node, NodeId, Scene};

/// Trait for implementing tree traversal operations.
///
/// Any `FnMut(&Node)` closure is a visitor.
pub trait NodeVisitor {
    /// Called once per node in traversal order.
    fn visit(&mut self, node: &Node);
}

impl<F: FnMut(&Node)> NodeVisitor for F {
    fn visit(&mut self, node: &Node) {
        self(node)
    }
}

impl Scene {
    /// Post-order walk: all children (in order) before the node itself.
    ///
    /// # Panics
    ///
    /// Panics if `root` was not issued by this scene.
    pub fn traverse_depth_first<V: NodeVisitor>(&self, root: NodeId, visitor: &mut V) {
        let node = self.get(root);
        for &child in node.children() {
            self.traverse_depth_first(child, visitor);
        }
        visitor.visit(node);
    }

    /// Sibling-first walk: a node, then all its children, then each child's
    /// subtree in turn.
    ///
    /// Unlike `traverse_levels` this finishes a child's whole subtree before
    /// moving to the next child's grandchildren.
    ///
    /// # Panics
    ///
    /// Panics if `root` was not issued by this scene.
    pub fn traverse_breadth_first<V: NodeVisitor>(&self, root: NodeId, visitor: &mut V) {
        visitor.visit(self.get(root));
        self.visit_children_first(root, visitor);
    }

    fn visit_children_first<V: NodeVisitor>(&self, id: NodeId, visitor: &mut V) {
        let children = self.get(id).children();
        for &child in children {
            visitor.visit(self.get(child));
        }
        for &child in children {
            self.visit_children_first(child, visitor);
        }
    }

    /// Exact reverse of `traverse_depth_first`: a node before its children,
    /// last child first.
    ///
    /// # Panics
    ///
    /// Panics if `root` was not issued by this scene.
    pub fn traverse_depth_first_reversed<V: NodeVisitor>(&self, root: NodeId, visitor: &mut V) {
        let mut order = Vec::new();
        self.traverse_depth_first(root, &mut |node: &Node| order.push(node.id()));
        self.visit_reversed(&order, visitor);
    }

    /// Exact reverse of `traverse_breadth_first`.
    ///
    /// # Panics
    ///
    /// Panics if `root` was not issued by this scene.
    pub fn traverse_breadth_first_reversed<V: NodeVisitor>(&self, root: NodeId, visitor: &mut V) {
        let mut order = Vec::new();
        self.traverse_breadth_first(root, &mut |node: &Node| order.push(node.id()));
        self.visit_reversed(&order, visitor);
    }

    fn visit_reversed<V: NodeVisitor>(&self, order: &[NodeId], visitor: &mut V) {
        for &id in order.iter().rev() {
            visitor.visit(self.get(id));
        }
    }

    /// Level-order walk: depth 0, then depth 1, and so on.
    ///
    /// # Panics
    ///
    /// Panics if `root` was not issued by this scene.
    pub fn traverse_levels<V: NodeVisitor>(&self, root: NodeId, visitor: &mut V) {
        for level in self.level_map(root).values() {
            for &id in level {
                visitor.visit(self.get(id));
            }
        }
    }

    /// Exact reverse of `traverse_levels`: deepest level first, each level back to front.
    ///
    /// # Panics
    ///
    /// Panics if `root` was not issued by this scene.
    pub fn traverse_levels_reversed<V: NodeVisitor>(&self, root: NodeId, visitor: &mut V) {
        for level in self.level_map(root).values().rev() {
            for &id in level.iter().rev() {
                visitor.visit(self.get(id));
            }
        }
    }

    /// Group the subtree at `root` by depth.
    ///
    /// Within a level nodes appear in pre-order, so a node's children always
    /// precede the children of its later siblings.
    ///
    /// # Panics
    ///
    /// Panics if `root` was not issued by this scene.
    pub fn level_map(&self, root: NodeId) -> BTreeMap<usize, Vec<NodeId>> {
        let mut levels = BTreeMap::new();
        self.collect_levels(root, 0, &mut levels);
        levels
    }

    fn collect_levels(&self, id: NodeId, depth: usize, levels: &mut BTreeMap<usize, Vec<NodeId>>) {
        levels.entry(depth).or_insert_with(Vec::new).push(id);
        for &child in self.get(id).children() {
            self.collect_levels(child, depth + 1, levels);
        }
    }

    /// Render the hierarchy as ASCII art, one node name per line.
    ///
    /// # Panics
    ///
    /// Panics if `root` was not issued by this scene.
    pub fn render_tree(&self, root: NodeId) -> String {
        self.render_tree_with(root, |node| node.name().to_string())
    }

    /// Render the hierarchy with a custom label per node.
    ///
    /// ```text
    /// A
    /// +-B
    /// | \-C
    /// \-D
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `root` was not issued by this scene.
    pub fn render_tree_with<F>(&self, root: NodeId, label: F) -> String
    where
        F: Fn(&Node) -> String,
    {
        let mut out = String::new();
        self.render_branch(root, "", &label, &mut out);
        out
    }

    fn render_branch<F>(&self, id: NodeId, prefix: &str, label: &F, out: &mut String)
    where
        F: Fn(&Node) -> String,
    {
        let node = self.get(id);
        out.push_str(prefix);
        out.push_str(&label(node));
        out.push('\n');

        // Connectors of this line turn into continuation bars for the children
        let indent: String = prefix
            .chars()
            .map(|c| match c {
                '-' | '\\' => ' ',
                '+' => '|',
                other => other,
            })
            .collect();

        let children = node.children();
        for (i, &child) in children.iter().enumerate() {
            let connector = if i + 1 < children.len() { "+-" } else { "\\-" };
            self.render_branch(child, &format!("{indent}{connector}"), label, out);
        }
    }
}
