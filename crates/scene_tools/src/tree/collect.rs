//! Typed collection and deferred removal over host-owned trees

use super::node::{DeferredFree, NodeView, SceneNode};
use crate::error::SceneError;

/// Collect the immediate children of `root` that satisfy view `V`
///
/// An absent root is a normal case, not an error: the result is empty.
/// Children are visited in the host's child order and the traversal has no
/// side effects.
pub fn collect_children<N, V>(root: Option<&N>) -> Vec<V>
where
    N: SceneNode,
    V: NodeView<N>,
{
    collect_children_with(root, |node| V::try_view(node))
}

/// Closure form of [`collect_children`]
///
/// `view` decides per node whether (and as what) it is collected.
pub fn collect_children_with<N, V, F>(root: Option<&N>, mut view: F) -> Vec<V>
where
    N: SceneNode,
    F: FnMut(&N) -> Option<V>,
{
    let Some(root) = root else {
        return Vec::new();
    };
    root.children().filter_map(|child| view(&child)).collect()
}

/// Collect every descendant of `root` that satisfies view `V`, in pre-order
///
/// The filter applies independently at every level: a non-matching node's
/// matching descendants are still included. Each matching node appears before
/// any of its own matching descendants, and siblings keep the host's child
/// order. An absent root yields an empty result.
pub fn collect_descendants<N, V>(root: Option<&N>) -> Vec<V>
where
    N: SceneNode,
    V: NodeView<N>,
{
    collect_descendants_with(root, |node| V::try_view(node))
}

/// Closure form of [`collect_descendants`]
pub fn collect_descendants_with<N, V, F>(root: Option<&N>, mut view: F) -> Vec<V>
where
    N: SceneNode,
    F: FnMut(&N) -> Option<V>,
{
    let mut matches = Vec::new();
    let Some(root) = root else {
        return matches;
    };

    // Explicit stack rather than recursion: tree depth is host-controlled and
    // must not be capped by the call stack. Children are pushed in reverse so
    // that popping yields them in the host's child order.
    let mut stack: Vec<N> = Vec::new();
    push_children_reversed(root, &mut stack);

    while let Some(node) = stack.pop() {
        if let Some(viewed) = view(&node) {
            matches.push(viewed);
        }
        push_children_reversed(&node, &mut stack);
    }
    matches
}

fn push_children_reversed<N: SceneNode>(node: &N, stack: &mut Vec<N>) {
    for index in (0..node.child_count()).rev() {
        if let Some(child) = node.child(index) {
            stack.push(child);
        }
    }
}

/// Request deferred destruction of every immediate child of `node`
///
/// Issues exactly one [`DeferredFree::queue_free`] per immediate child -
/// grandchildren go down with their subtree when the host performs the
/// deletion, and the node itself is left untouched. Returns the number of
/// requests issued.
///
/// # Errors
///
/// [`SceneError::PreconditionViolation`] if `node` is absent. Unlike the
/// query operations, removal requires a node to act on.
pub fn queue_free_children<N>(node: Option<&N>) -> Result<usize, SceneError>
where
    N: DeferredFree,
{
    let node = node.ok_or(SceneError::PreconditionViolation(
        "subtree removal requires a node",
    ))?;

    let mut issued = 0;
    for child in node.children() {
        child.queue_free();
        issued += 1;
    }
    log::debug!("Queued {} children for deferred removal", issued);
    Ok(issued)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Runtime tag standing in for the host's node classes
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Tag {
        X,
        Y,
    }

    struct TestData {
        label: &'static str,
        tag: Tag,
        children: Vec<TestNode>,
        freed: Rc<RefCell<Vec<&'static str>>>,
    }

    #[derive(Clone)]
    struct TestNode {
        data: Rc<TestData>,
    }

    impl SceneNode for TestNode {
        fn child_count(&self) -> usize {
            self.data.children.len()
        }

        fn child(&self, index: usize) -> Option<Self> {
            self.data.children.get(index).cloned()
        }
    }

    impl DeferredFree for TestNode {
        fn queue_free(&self) {
            self.data.freed.borrow_mut().push(self.data.label);
        }
    }

    /// Typed view matching only `Tag::X` nodes
    struct XView(TestNode);

    impl NodeView<TestNode> for XView {
        fn try_view(node: &TestNode) -> Option<Self> {
            (node.data.tag == Tag::X).then(|| XView(node.clone()))
        }
    }

    /// Typed view matching only `Tag::Y` nodes
    struct YView(TestNode);

    impl NodeView<TestNode> for YView {
        fn try_view(node: &TestNode) -> Option<Self> {
            (node.data.tag == Tag::Y).then(|| YView(node.clone()))
        }
    }

    struct Fixture {
        freed: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                freed: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn node(&self, label: &'static str, tag: Tag, children: Vec<TestNode>) -> TestNode {
            TestNode {
                data: Rc::new(TestData {
                    label,
                    tag,
                    children,
                    freed: Rc::clone(&self.freed),
                }),
            }
        }
    }

    fn labels_of_x(views: &[XView]) -> Vec<&'static str> {
        views.iter().map(|v| v.0.data.label).collect()
    }

    /// R[A(X)[C(X)], B(Y)] - the reference tree used by several tests
    fn reference_tree(fixture: &Fixture) -> TestNode {
        let c = fixture.node("C", Tag::X, vec![]);
        let a = fixture.node("A", Tag::X, vec![c]);
        let b = fixture.node("B", Tag::Y, vec![]);
        fixture.node("R", Tag::X, vec![a, b])
    }

    #[test]
    fn test_absent_root_collects_nothing() {
        let children = collect_children::<TestNode, XView>(None);
        assert!(children.is_empty());

        let descendants = collect_descendants::<TestNode, XView>(None);
        assert!(descendants.is_empty());
    }

    #[test]
    fn test_collect_children_is_immediate_only() {
        let fixture = Fixture::new();
        let root = reference_tree(&fixture);

        let children: Vec<XView> = collect_children(Some(&root));
        assert_eq!(labels_of_x(&children), vec!["A"]);
    }

    #[test]
    fn test_collect_descendants_is_preorder() {
        let fixture = Fixture::new();
        let root = reference_tree(&fixture);

        let descendants: Vec<XView> = collect_descendants(Some(&root));
        assert_eq!(labels_of_x(&descendants), vec!["A", "C"]);

        let others: Vec<YView> = collect_descendants(Some(&root));
        let labels: Vec<_> = others.iter().map(|v| v.0.data.label).collect();
        assert_eq!(labels, vec!["B"]);
    }

    #[test]
    fn test_filter_applies_at_every_level() {
        // A matching grandchild under a non-matching child is still found.
        let fixture = Fixture::new();
        let c = fixture.node("C", Tag::X, vec![]);
        let b = fixture.node("B", Tag::Y, vec![c]);
        let root = fixture.node("R", Tag::X, vec![b]);

        let descendants: Vec<XView> = collect_descendants(Some(&root));
        assert_eq!(labels_of_x(&descendants), vec!["C"]);
    }

    #[test]
    fn test_any_view_visits_every_node_once() {
        let fixture = Fixture::new();
        let root = reference_tree(&fixture);

        // The root itself is excluded; A, C and B are each visited exactly once.
        let all: Vec<TestNode> = collect_descendants(Some(&root));
        let labels: Vec<_> = all.iter().map(|n| n.data.label).collect();
        assert_eq!(labels, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_siblings_keep_host_order() {
        let fixture = Fixture::new();
        let children = (0..8)
            .map(|i| {
                let label: &'static str =
                    Box::leak(format!("child-{}", i).into_boxed_str());
                fixture.node(label, Tag::X, vec![])
            })
            .collect();
        let root = fixture.node("R", Tag::X, children);

        let collected: Vec<XView> = collect_descendants(Some(&root));
        let labels = labels_of_x(&collected);
        let expected: Vec<String> = (0..8).map(|i| format!("child-{}", i)).collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_children_are_depth_one_prefix_of_descendants() {
        let fixture = Fixture::new();
        let root = reference_tree(&fixture);

        let children: Vec<XView> = collect_children(Some(&root));
        let descendants: Vec<XView> = collect_descendants(Some(&root));
        let descendant_labels = labels_of_x(&descendants);

        for child in &children {
            assert!(descendant_labels.contains(&child.0.data.label));
        }
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        // A 10k-deep chain would blow the call stack under naive recursion.
        let fixture = Fixture::new();
        let mut node = fixture.node("leaf", Tag::X, vec![]);
        for _ in 0..10_000 {
            node = fixture.node("link", Tag::X, vec![node]);
        }

        let all: Vec<XView> = collect_descendants(Some(&node));
        assert_eq!(all.len(), 10_000);
        assert_eq!(all.last().map(|v| v.0.data.label), Some("leaf"));

        // Unlink the chain iteratively: letting drop glue recurse through
        // 10k nested nodes would overflow the stack the same way a
        // recursive traversal would.
        drop(all);
        let mut current = node;
        loop {
            let mut data = Rc::try_unwrap(current.data).ok().unwrap();
            match data.children.pop() {
                Some(next) => current = next,
                None => break,
            }
        }
    }

    #[test]
    fn test_closure_form_collects_projected_values() {
        let fixture = Fixture::new();
        let root = reference_tree(&fixture);

        let labels = collect_descendants_with(Some(&root), |node| {
            (node.data.tag == Tag::X).then_some(node.data.label)
        });
        assert_eq!(labels, vec!["A", "C"]);
    }

    #[test]
    fn test_queue_free_children_hits_immediate_children_only() {
        let fixture = Fixture::new();
        let root = reference_tree(&fixture);

        let issued = queue_free_children(Some(&root)).unwrap();
        assert_eq!(issued, 2);
        // One request per immediate child; C goes down with A's subtree
        // when the host performs the deletion, so no request for it.
        assert_eq!(*fixture.freed.borrow(), vec!["A", "B"]);
    }

    #[test]
    fn test_queue_free_children_requires_a_node() {
        let result = queue_free_children::<TestNode>(None);
        assert!(matches!(
            result,
            Err(SceneError::PreconditionViolation(_))
        ));
    }
}
