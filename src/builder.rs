//! Type model builder - walk a `.d.ts` syntax tree into the declaration model
//!
//! The builder performs a depth-first walk over the tree-sitter-typescript
//! syntax tree. Supported declaration kinds produce normalized `TsNode`
//! records tagged with the namespace path in effect; every other node is
//! entered to keep searching its descendants. Declarations can therefore
//! occur at any nesting depth.
//!
//! Generic-parameter scope is threaded explicitly: each declaration kind that
//! can introduce type parameters passes the union of the enclosing scope and
//! its own parameters to every nested classification call. That union is the
//! sole mechanism for telling a generic placeholder apart from a concrete
//! type name.

use crate::model::{TsNode, TsNodeKind, TsParameter, TsType};
use crate::{Error, Result};
use std::collections::HashSet;
use tree_sitter::{Node, Parser};

/// The set of generic-parameter names visible at a classification site.
#[derive(Debug, Clone, Default)]
pub struct GenericScope(HashSet<String>);

impl GenericScope {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// A new scope holding this scope's names plus `names`.
    pub fn extended(&self, names: &[String]) -> GenericScope {
        let mut set = self.0.clone();
        set.extend(names.iter().cloned());
        GenericScope(set)
    }
}

/// Parse declaration source text and build the flat `TsNode` collection.
pub fn build_model(source: &str) -> Result<Vec<TsNode>> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::Parse("tree-sitter produced no syntax tree".to_string()))?;

    let mut builder = ModelBuilder {
        source,
        nodes: Vec::new(),
    };
    builder.walk(tree.root_node(), &[]);
    Ok(builder.nodes)
}

/// Walks the syntax tree, appending finalized nodes to an append-only arena.
/// Sibling recursive calls never observe each other's unfinalized nodes.
struct ModelBuilder<'s> {
    source: &'s str,
    nodes: Vec<TsNode>,
}

impl<'s> ModelBuilder<'s> {
    /// Top-level dispatch over declaration kinds. Unmatched kinds recurse
    /// into their children rather than failing.
    fn walk(&mut self, node: Node, path: &[String]) {
        match node.kind() {
            "type_alias_declaration" => self.build_type_alias(node, path),
            "variable_declaration" | "lexical_declaration" => self.build_variables(node, path),
            "function_declaration" | "function_signature" => self.build_function(node, path),
            "enum_declaration" => self.build_enum(node, path),
            "interface_declaration" => self.build_object_like(node, path, TsNodeKind::Interface),
            "class_declaration" => self.build_object_like(node, path, TsNodeKind::Class),
            "module" | "internal_module" => self.enter_module(node, path),
            _ => self.walk_children(node, path),
        }
    }

    fn walk_children(&mut self, node: Node, path: &[String]) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.walk(child, path);
        }
    }

    /// `module "name" { ... }` / `namespace name { ... }`: append the
    /// quote-stripped name segments to the working path and recurse.
    fn enter_module(&mut self, node: Node, path: &[String]) {
        let Some(name_node) = node.child_by_field_name("name") else {
            self.walk_children(node, path);
            return;
        };
        let raw = self.text(name_node);
        let name = raw.trim_matches(|c| c == '"' || c == '\'');

        let mut inner = path.to_vec();
        inner.extend(name.split('.').map(|s| s.to_string()));

        if let Some(body) = node.child_by_field_name("body") {
            self.walk_children(body, &inner);
        }
    }

    fn build_type_alias(&mut self, node: Node, path: &[String]) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();
        let generics = GenericScope::default().extended(&self.type_params(node));

        let ty = node
            .child_by_field_name("value")
            .map(|value| self.classify(value, path, &generics))
            .unwrap_or_else(TsType::any);

        self.nodes
            .push(TsNode::new(path.to_vec(), name, TsNodeKind::TypeAlias, ty));
    }

    /// One `TsNode` per declarator; const-ness comes from the declaration's
    /// leading keyword.
    fn build_variables(&mut self, node: Node, path: &[String]) {
        let is_const = node
            .child_by_field_name("kind")
            .map(|kind| self.text(kind) == "const")
            .unwrap_or(false);

        let generics = GenericScope::default();
        let mut cursor = node.walk();
        for declarator in node.named_children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name_node) = declarator.child_by_field_name("name") else {
                continue;
            };
            let name = self.text(name_node).to_string();
            let ty = self.annotated_type(declarator, path, &generics);
            self.nodes.push(
                TsNode::new(path.to_vec(), name, TsNodeKind::Variable, ty).with_const(is_const),
            );
        }
    }

    /// Named functions only; anonymous functions are skipped but their
    /// children are still visited.
    fn build_function(&mut self, node: Node, path: &[String]) {
        let Some(name_node) = node.child_by_field_name("name") else {
            self.walk_children(node, path);
            return;
        };
        let name = self.text(name_node).to_string();
        let generics = GenericScope::default().extended(&self.type_params(node));
        let parameters =
            self.parameters(node.child_by_field_name("parameters"), path, &generics);
        let ty = self.return_type(node, path, &generics);

        self.nodes.push(
            TsNode::new(path.to_vec(), name, TsNodeKind::Function, ty)
                .with_parameters(parameters),
        );
    }

    /// Ordered member names only; enum values are not modeled.
    fn build_enum(&mut self, node: Node, path: &[String]) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();

        let mut members = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                let member_name = match member.kind() {
                    "property_identifier" | "string" => Some(self.text(member)),
                    "enum_assignment" => member
                        .child_by_field_name("name")
                        .map(|n| self.text(n)),
                    _ => None,
                };
                if let Some(member_name) = member_name {
                    members.push(
                        member_name
                            .trim_matches(|c| c == '"' || c == '\'')
                            .to_string(),
                    );
                }
            }
        }

        self.nodes.push(
            TsNode::new(path.to_vec(), name, TsNodeKind::Enum, TsType::any())
                .with_enum_members(members),
        );
    }

    /// Interfaces and classes: one node whose type is the literal of its
    /// members. Members are recorded under `path + name`.
    fn build_object_like(&mut self, node: Node, path: &[String], kind: TsNodeKind) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();
        let generics = GenericScope::default().extended(&self.type_params(node));

        let mut member_path = path.to_vec();
        member_path.push(name.clone());

        let members = node
            .child_by_field_name("body")
            .map(|body| self.members(body, &member_path, &generics))
            .unwrap_or_default();

        self.nodes.push(TsNode::new(
            path.to_vec(),
            name,
            kind,
            TsType::TypeLiteral { members },
        ));
    }

    /// Classify any type-expression node into the closed variant set.
    fn classify(&mut self, node: Node, path: &[String], generics: &GenericScope) -> TsType {
        match node.kind() {
            "parenthesized_type" => node
                .named_child(0)
                .map(|inner| self.classify(inner, path, generics))
                .unwrap_or_else(TsType::any),

            "array_type" => {
                let element = node
                    .named_child(0)
                    .map(|el| self.classify(el, path, generics))
                    .unwrap_or_else(TsType::any);
                TsType::Array {
                    element: Box::new(element),
                }
            }

            "tuple_type" => {
                let mut elements = Vec::new();
                let mut cursor = node.walk();
                for element in node.named_children(&mut cursor) {
                    elements.push(self.classify(element, path, generics));
                }
                TsType::Tuple { elements }
            }

            "object_type" => TsType::TypeLiteral {
                members: self.members(node, path, generics),
            },

            // Primitive keyword, bare identifier, external type reference,
            // or a shape we do not model: keep the literal source text and
            // let the emitter degrade it to the placeholder when unresolved.
            _ => {
                let name = self.text(node).to_string();
                let is_generic = generics.contains(&name);
                TsType::Regular { name, is_generic }
            }
        }
    }

    /// Member dispatch within an interface/class body or an object type.
    fn members(&mut self, body: Node, path: &[String], generics: &GenericScope) -> Vec<TsNode> {
        let mut members = Vec::new();
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            if let Some(member) = self.member(member, path, generics) {
                members.push(member);
            }
        }
        members
    }

    fn member(&mut self, node: Node, path: &[String], generics: &GenericScope) -> Option<TsNode> {
        let kind = match node.kind() {
            "property_signature" => TsNodeKind::PropertySignature,
            "public_field_definition" => TsNodeKind::PropertyDeclaration,
            "method_signature" | "abstract_method_signature" => TsNodeKind::MethodSignature,
            "method_definition" => TsNodeKind::MethodDeclaration,
            other => {
                tracing::debug!(kind = other, "skipping unsupported member shape");
                return None;
            }
        };

        let name_node = node.child_by_field_name("name")?;
        if name_node.kind() != "property_identifier" {
            // Computed, string-literal, and numeric-literal member names are
            // dropped. Documented limitation, not an error.
            tracing::debug!(
                name = self.text(name_node),
                "dropping member with unsupported name shape"
            );
            return None;
        }
        let name = self.text(name_node).to_string();
        let optional = self.has_question_mark(node);

        if kind.is_property() {
            let annotation = node
                .child_by_field_name("type")
                .and_then(|ann| ann.named_child(0));

            // A property whose declared type is a function type is promoted
            // to a method entry with its own generic scope.
            if let Some(ty) = annotation {
                if ty.kind() == "function_type" {
                    let promoted = match kind {
                        TsNodeKind::PropertyDeclaration => TsNodeKind::MethodDeclaration,
                        _ => TsNodeKind::MethodSignature,
                    };
                    let fn_generics = generics.extended(&self.type_params(ty));
                    let parameters =
                        self.parameters(ty.child_by_field_name("parameters"), path, &fn_generics);
                    let ret = ty
                        .child_by_field_name("return_type")
                        .map(|ret| self.classify(unwrap_annotation(ret), path, &fn_generics))
                        .unwrap_or_else(TsType::any);
                    return Some(
                        TsNode::new(path.to_vec(), name, promoted, ret)
                            .with_parameters(parameters)
                            .with_optional(optional),
                    );
                }
            }

            let ty = annotation
                .map(|ty| self.classify(ty, path, generics))
                .unwrap_or_else(TsType::any);
            return Some(TsNode::new(path.to_vec(), name, kind, ty).with_optional(optional));
        }

        // Methods union their own type parameters into the enclosing scope.
        let method_generics = generics.extended(&self.type_params(node));
        let parameters =
            self.parameters(node.child_by_field_name("parameters"), path, &method_generics);
        let ty = self.return_type(node, path, &method_generics);

        Some(
            TsNode::new(path.to_vec(), name, kind, ty)
                .with_parameters(parameters)
                .with_optional(optional),
        )
    }

    fn parameters(
        &mut self,
        params: Option<Node>,
        path: &[String],
        generics: &GenericScope,
    ) -> Vec<TsParameter> {
        let Some(params) = params else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if !matches!(param.kind(), "required_parameter" | "optional_parameter") {
                continue;
            }
            let Some(pattern) = param.child_by_field_name("pattern") else {
                continue;
            };
            let name = self.text(pattern).to_string();
            let ty = self.annotated_type(param, path, generics);
            out.push(TsParameter {
                name,
                ty,
                optional: param.kind() == "optional_parameter",
            });
        }
        out
    }

    /// The declared type behind a `: T` annotation, or `any` when absent.
    fn annotated_type(&mut self, owner: Node, path: &[String], generics: &GenericScope) -> TsType {
        owner
            .child_by_field_name("type")
            .and_then(|ann| ann.named_child(0))
            .map(|ty| self.classify(ty, path, generics))
            .unwrap_or_else(TsType::any)
    }

    fn return_type(&mut self, owner: Node, path: &[String], generics: &GenericScope) -> TsType {
        owner
            .child_by_field_name("return_type")
            .map(|ret| self.classify(unwrap_annotation(ret), path, generics))
            .unwrap_or_else(TsType::any)
    }

    /// Declared type-parameter names of a declaration, empty when it has none.
    fn type_params(&self, node: Node) -> Vec<String> {
        let Some(params) = node.child_by_field_name("type_parameters") else {
            return Vec::new();
        };
        let mut names = Vec::new();
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if param.kind() != "type_parameter" {
                continue;
            }
            if let Some(name) = param.child_by_field_name("name") {
                names.push(self.text(name).to_string());
            }
        }
        names
    }

    fn has_question_mark(&self, node: Node) -> bool {
        let mut cursor = node.walk();
        node.children(&mut cursor).any(|child| child.kind() == "?")
    }

    /// Literal source text of a node, tied to the source's lifetime so the
    /// arena can keep growing while text is held.
    fn text(&self, node: Node) -> &'s str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }
}

/// Return-type fields are sometimes wrapped in a `type_annotation` node.
fn unwrap_annotation(node: Node) -> Node {
    if node.kind() == "type_annotation" {
        node.named_child(0).unwrap_or(node)
    } else {
        node
    }
}
