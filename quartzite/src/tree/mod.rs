//! Generic recursive tree shared by plan nodes and expressions.
//!
//! A node is an immutable value held behind an [`Arc`]. All rewrites are functional: a rule
//! returns either a new node or the node it was given, and the traversal helpers only allocate a
//! new parent when at least one child is not reference identical to the original one. A rewrite
//! that matches nothing therefore returns the input [`Arc`] itself, see [`TreeNode::same`].
mod display;
pub use display::*;

use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::QuartziteResult;

/// Direct children of a node, in traversal order.
pub type Children<T> = SmallVec<[Arc<T>; 2]>;

pub trait TreeNode: Sized {
    /// Direct substructure of same kind. This is authoritative for traversal order.
    fn children(&self) -> Children<Self>;

    /// Copy of this node with every child positionally replaced.
    ///
    /// Fails with [`ArityMismatch`] if `children` does not have exactly as many elements as
    /// [`TreeNode::children`].
    ///
    /// [`ArityMismatch`]: crate::error::QuartziteError::ArityMismatch
    fn with_new_children(&self, children: Vec<Arc<Self>>) -> QuartziteResult<Self>;

    fn node_name(&self) -> &str;

    /// Non child arguments shown in [`TreeNode::caption`].
    fn display_fields(&self) -> Vec<(&'static str, String)>;

    fn caption(&self) -> String {
        let fields = self.display_fields();
        if fields.is_empty() {
            self.node_name().to_string()
        } else {
            let args = fields
                .iter()
                .map(|(label, value)| format!("{}: {}", label, value))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} {{ {} }}", self.node_name(), args)
        }
    }

    /// Reference identity.
    fn same(self: &Arc<Self>, other: &Arc<Self>) -> bool {
        Arc::ptr_eq(self, other)
    }

    /// Rewrites every direct child with `f`, rebuilding this node only if some child changed.
    fn map_children<F>(self: &Arc<Self>, mut f: F) -> QuartziteResult<Arc<Self>>
    where
        F: FnMut(&Arc<Self>) -> QuartziteResult<Arc<Self>>,
    {
        let children = self.children();
        if children.is_empty() {
            return Ok(Arc::clone(self));
        }

        let mut changed = false;
        let mut new_children = Vec::with_capacity(children.len());
        for child in &children {
            let new_child = f(child)?;
            changed |= !child.same(&new_child);
            new_children.push(new_child);
        }

        if changed {
            Ok(Arc::new(self.with_new_children(new_children)?))
        } else {
            Ok(Arc::clone(self))
        }
    }

    /// Pre-order rewrite.
    ///
    /// `rule` is applied to this node first, then recursion continues into the children of
    /// whatever the rule returned.
    fn transform_down<F>(self: &Arc<Self>, rule: &mut F) -> QuartziteResult<Arc<Self>>
    where
        F: FnMut(&Arc<Self>) -> QuartziteResult<Arc<Self>>,
    {
        let after_rule = rule(self)?;
        after_rule.map_children(|child| child.transform_down(&mut *rule))
    }

    /// Post-order rewrite.
    ///
    /// Children are rewritten first, the node is rebuilt from them and `rule` is applied to the
    /// rebuilt node.
    fn transform_up<F>(self: &Arc<Self>, rule: &mut F) -> QuartziteResult<Arc<Self>>
    where
        F: FnMut(&Arc<Self>) -> QuartziteResult<Arc<Self>>,
    {
        let after_children = self.map_children(|child| child.transform_up(&mut *rule))?;
        rule(&after_children)
    }

    /// Threads `init` through the tree in pre-order.
    fn fold_down<A, F>(self: &Arc<Self>, init: A, f: &mut F) -> A
    where
        F: FnMut(A, &Arc<Self>) -> A,
    {
        let acc = f(init, self);
        self.children()
            .iter()
            .fold(acc, |acc, child| child.fold_down(acc, &mut *f))
    }

    /// Threads `init` through the tree in post-order.
    fn fold_up<A, F>(self: &Arc<Self>, init: A, f: &mut F) -> A
    where
        F: FnMut(A, &Arc<Self>) -> A,
    {
        let acc = self
            .children()
            .iter()
            .fold(init, |acc, child| child.fold_up(acc, &mut *f));
        f(acc, self)
    }

    /// Values produced by `f` for every node, in pre-order.
    fn collect_down<T, F>(self: &Arc<Self>, mut f: F) -> Vec<T>
    where
        F: FnMut(&Arc<Self>) -> Option<T>,
    {
        self.fold_down(Vec::new(), &mut |mut acc, node| {
            acc.extend(f(node));
            acc
        })
    }

    /// Values produced by `f` for every node, in post-order.
    fn collect_up<T, F>(self: &Arc<Self>, mut f: F) -> Vec<T>
    where
        F: FnMut(&Arc<Self>) -> Option<T>,
    {
        self.fold_up(Vec::new(), &mut |mut acc, node| {
            acc.extend(f(node));
            acc
        })
    }

    /// Whether `predicate` holds for some node of the tree.
    fn exists<F>(self: &Arc<Self>, mut predicate: F) -> bool
    where
        F: FnMut(&Arc<Self>) -> bool,
    {
        self.fold_down(false, &mut |found, node| found || predicate(node))
    }

    /// Human readable rendering of the tree, one caption per line.
    fn tree_string(self: &Arc<Self>) -> String {
        render_tree(self)
    }
}
