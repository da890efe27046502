//! Namespace index - group the flat declaration collection by container path
//!
//! Direct members of a path are nodes whose container path equals it exactly,
//! grouped by kind in emission order: variables, then functions, then
//! interface/class-like types. Child namespaces are the distinct paths one
//! segment longer that share the queried path as a prefix, deduplicated and
//! sorted lexicographically so output never depends on source order.

use crate::model::{TsNode, TsNodeKind};

/// Direct members of one container path, kind-grouped in emission order.
#[derive(Debug, Default)]
pub struct Members<'a> {
    pub variables: Vec<&'a TsNode>,
    pub functions: Vec<&'a TsNode>,
    pub types: Vec<&'a TsNode>,
}

impl Members<'_> {
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.functions.is_empty() && self.types.is_empty()
    }
}

/// Read-only index over the full `TsNode` collection.
pub struct NamespaceIndex<'a> {
    nodes: &'a [TsNode],
}

impl<'a> NamespaceIndex<'a> {
    pub fn new(nodes: &'a [TsNode]) -> Self {
        Self { nodes }
    }

    /// All indexed nodes in declaration order.
    pub fn nodes(&self) -> &'a [TsNode] {
        self.nodes
    }

    /// Direct members of `path`, preserving declaration order within each
    /// kind group. Enums are modeled but carry no binding, so they are not
    /// part of any group.
    pub fn members(&self, path: &[String]) -> Members<'a> {
        let mut members = Members::default();
        for node in self.nodes.iter().filter(|n| n.container == path) {
            match node.kind {
                TsNodeKind::Variable => members.variables.push(node),
                TsNodeKind::Function => members.functions.push(node),
                kind if kind.is_type_like() => members.types.push(node),
                _ => {}
            }
        }
        members
    }

    /// Distinct child namespace paths: exactly one segment longer than
    /// `path`, sharing it as a prefix. Sorted and deduplicated. Derived from
    /// container-path prefixes, so a namespace holding only deeper
    /// namespaces is still discovered.
    pub fn children(&self, path: &[String]) -> Vec<Vec<String>> {
        let mut children: Vec<Vec<String>> = self
            .nodes
            .iter()
            .filter(|n| n.container.len() > path.len() && n.container.starts_with(path))
            .map(|n| n.container[..path.len() + 1].to_vec())
            .collect();
        children.sort();
        children.dedup();
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TsType;

    fn node(container: &[&str], name: &str, kind: TsNodeKind) -> TsNode {
        TsNode::new(
            container.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            name,
            kind,
            TsType::any(),
        )
    }

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_members_match_path_exactly() {
        let nodes = vec![
            node(&[], "globalVar", TsNodeKind::Variable),
            node(&["numbers"], "x", TsNodeKind::Variable),
            node(&["numbers"], "add", TsNodeKind::Function),
            node(&["numbers", "array_math"], "sum", TsNodeKind::Function),
        ];
        let index = NamespaceIndex::new(&nodes);

        let members = index.members(&path(&["numbers"]));
        assert_eq!(members.variables.len(), 1);
        assert_eq!(members.functions.len(), 1);
        for member in members.variables.iter().chain(&members.functions) {
            assert_eq!(member.container, path(&["numbers"]));
        }

        // Deeper nodes are not direct members
        assert_eq!(members.functions[0].name, "add");
    }

    #[test]
    fn test_members_kind_grouping_order() {
        let nodes = vec![
            node(&[], "Person", TsNodeKind::Interface),
            node(&[], "greet", TsNodeKind::Function),
            node(&[], "x", TsNodeKind::Variable),
            node(&[], "Color", TsNodeKind::Enum),
        ];
        let index = NamespaceIndex::new(&nodes);
        let members = index.members(&[]);

        assert_eq!(members.variables[0].name, "x");
        assert_eq!(members.functions[0].name, "greet");
        assert_eq!(members.types[0].name, "Person");
        // Enums are modeled but not grouped for emission
        assert!(!members.is_empty());
        assert_eq!(
            members.variables.len() + members.functions.len() + members.types.len(),
            3
        );
    }

    #[test]
    fn test_children_one_segment_longer() {
        let nodes = vec![
            node(&["numbers"], "x", TsNodeKind::Variable),
            node(&["numbers", "array_math"], "sum", TsNodeKind::Function),
            node(&["numbers", "array_math"], "sum2", TsNodeKind::Function),
            node(&["numbers", "bit_math"], "and", TsNodeKind::Function),
            node(&["strings"], "concat", TsNodeKind::Function),
        ];
        let index = NamespaceIndex::new(&nodes);

        let roots = index.children(&[]);
        assert_eq!(roots, vec![path(&["numbers"]), path(&["strings"])]);

        let children = index.children(&path(&["numbers"]));
        assert_eq!(
            children,
            vec![path(&["numbers", "array_math"]), path(&["numbers", "bit_math"])]
        );
        for child in &children {
            assert_eq!(child.len(), 2);
            assert!(child.starts_with(&path(&["numbers"])));
        }
    }

    #[test]
    fn test_children_found_through_deeper_prefixes() {
        // Only a deeply nested node exists; every intermediate namespace is
        // still discovered one segment at a time.
        let nodes = vec![node(&["a", "b", "c"], "x", TsNodeKind::Variable)];
        let index = NamespaceIndex::new(&nodes);

        assert_eq!(index.children(&[]), vec![path(&["a"])]);
        assert_eq!(index.children(&path(&["a"])), vec![path(&["a", "b"])]);
        assert_eq!(
            index.children(&path(&["a", "b"])),
            vec![path(&["a", "b", "c"])]
        );
        assert!(index.children(&path(&["a", "b", "c"])).is_empty());
    }

    #[test]
    fn test_children_sorted_independent_of_source_order() {
        let nodes = vec![
            node(&["zeta"], "z", TsNodeKind::Variable),
            node(&["alpha"], "a", TsNodeKind::Variable),
            node(&["alpha"], "b", TsNodeKind::Variable),
        ];
        let index = NamespaceIndex::new(&nodes);
        assert_eq!(index.children(&[]), vec![path(&["alpha"]), path(&["zeta"])]);
    }
}
