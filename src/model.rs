//! Declaration model - the normalized representation of `.d.ts` declarations
//!
//! Every supported declaration is mapped into a flat `TsNode` collection.
//! Type expressions are classified into a closed `TsType` variant set:
//! - `Regular`: primitive keyword, bare identifier, external type reference
//! - `Array`: element type wrapped recursively
//! - `Tuple`: ordered element types
//! - `TypeLiteral`: inline object shape with embedded member nodes
//!
//! The collection is built once per run and is read-only input to the
//! namespace index and the emitter.

use serde::{Deserialize, Serialize};

/// A classified type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum TsType {
    /// Primitive keyword, bare identifier, or external type reference.
    /// `is_generic` is true iff `name` matched a type parameter in the
    /// generic scope active at classification time.
    Regular { name: String, is_generic: bool },
    /// `T[]`
    Array { element: Box<TsType> },
    /// `[A, B, ...]`, element order preserved
    Tuple { elements: Vec<TsType> },
    /// `{ a: string; b(): void }` - members dispatched by their own kind
    TypeLiteral { members: Vec<TsNode> },
}

impl TsType {
    /// Shorthand for a non-generic named type.
    pub fn regular(name: impl Into<String>) -> Self {
        TsType::Regular {
            name: name.into(),
            is_generic: false,
        }
    }

    /// The implicit type of declarations without an annotation.
    pub fn any() -> Self {
        TsType::regular("any")
    }

    /// Members of a type literal, empty for every other shape.
    pub fn members(&self) -> &[TsNode] {
        match self {
            TsType::TypeLiteral { members } => members,
            _ => &[],
        }
    }
}

/// A function or method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TsType,
    pub optional: bool,
}

/// The kind of a modeled declaration.
///
/// The first six occur in the flat top-level collection; the member kinds
/// occur only embedded inside a `TypeLiteral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TsNodeKind {
    TypeAlias,
    Variable,
    Function,
    Enum,
    Interface,
    Class,
    PropertySignature,
    PropertyDeclaration,
    MethodSignature,
    MethodDeclaration,
}

impl TsNodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TsNodeKind::TypeAlias => "type_alias",
            TsNodeKind::Variable => "variable",
            TsNodeKind::Function => "function",
            TsNodeKind::Enum => "enum",
            TsNodeKind::Interface => "interface",
            TsNodeKind::Class => "class",
            TsNodeKind::PropertySignature => "property_signature",
            TsNodeKind::PropertyDeclaration => "property_declaration",
            TsNodeKind::MethodSignature => "method_signature",
            TsNodeKind::MethodDeclaration => "method_declaration",
        }
    }

    /// Property-like member kinds (paired getter/setter in the output).
    pub fn is_property(&self) -> bool {
        matches!(
            self,
            TsNodeKind::PropertySignature | TsNodeKind::PropertyDeclaration
        )
    }

    /// Method-like member kinds (receiver-style binding in the output).
    pub fn is_method(&self) -> bool {
        matches!(
            self,
            TsNodeKind::MethodSignature | TsNodeKind::MethodDeclaration
        )
    }

    /// Kinds emitted as their own nested module with an abstract type.
    pub fn is_type_like(&self) -> bool {
        matches!(self, TsNodeKind::Interface | TsNodeKind::Class)
    }

    /// Kinds that receive a forward opaque type declaration.
    pub fn has_nominal_type(&self) -> bool {
        matches!(
            self,
            TsNodeKind::Interface | TsNodeKind::Class | TsNodeKind::TypeAlias
        )
    }
}

impl std::fmt::Display for TsNodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A normalized declaration record.
///
/// `container` is the sequence of enclosing declaration names from outermost
/// to the node's immediate parent; it never includes the node's own name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsNode {
    pub container: Vec<String>,
    pub name: String,
    pub kind: TsNodeKind,
    #[serde(rename = "type")]
    pub ty: TsType,
    pub parameters: Vec<TsParameter>,
    pub is_const: bool,
    pub enum_members: Vec<String>,
    pub optional: bool,
}

impl TsNode {
    /// Create a node with empty parameters/members and no flags set.
    pub fn new(
        container: impl Into<Vec<String>>,
        name: impl Into<String>,
        kind: TsNodeKind,
        ty: TsType,
    ) -> Self {
        Self {
            container: container.into(),
            name: name.into(),
            kind,
            ty,
            parameters: Vec::new(),
            is_const: false,
            enum_members: Vec::new(),
            optional: false,
        }
    }

    /// Set the parameter list
    pub fn with_parameters(mut self, parameters: Vec<TsParameter>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Mark a variable declaration as `const`
    pub fn with_const(mut self, is_const: bool) -> Self {
        self.is_const = is_const;
        self
    }

    /// Set the ordered enum member names
    pub fn with_enum_members(mut self, members: Vec<String>) -> Self {
        self.enum_members = members;
        self
    }

    /// Mark a member as optional (`?`)
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Embedded members when this node's type is a type literal.
    pub fn members(&self) -> &[TsNode] {
        self.ty.members()
    }
}
