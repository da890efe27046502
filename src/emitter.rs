//! Emitter - render the declaration model as ReasonML binding source text
//!
//! Output order: a header comment, the `t_TODO` placeholder declaration, one
//! forward opaque type per interface/class/alias in first-seen order, then
//! nested module blocks walked depth-first from the root namespace. Within a
//! namespace: variable externals, function externals, one nested module per
//! interface/class, then child namespace modules (sorted).
//!
//! Binding names pass through a `NameAllocator`: one global scope for
//! top-level externals, one fresh scope per emitted type's members.

use crate::model::{TsNode, TsType};
use crate::names::{NameAllocator, capitalize, lower_cap, normalize};
use crate::namespace::NamespaceIndex;

/// Placeholder type for shapes the generator cannot resolve; the binding
/// needs manual completion wherever it appears.
const PLACEHOLDER: &str = "t_TODO";

/// Emission options
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Columns per indentation level
    pub indent: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// Accumulates output text, padding each new line to `depth * indent`
/// columns. Depth moves with module blocks only.
struct Writer {
    out: String,
    depth: usize,
    indent: usize,
}

impl Writer {
    fn new(indent: usize) -> Self {
        Self {
            out: String::new(),
            depth: 0,
            indent,
        }
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Start a new line padded to the current depth, then write `text`.
    fn line(&mut self, text: &str) {
        self.out.push('\n');
        for _ in 0..self.depth * self.indent {
            self.out.push(' ');
        }
        self.out.push_str(text);
    }

    /// An empty separator line, never padded.
    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self, header: &str) {
        self.line(header);
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth -= 1;
        self.line("};");
    }
}

/// Renders a built model. Holds only read-only state; allocator scopes are
/// created per emission scope and never shared.
pub struct Emitter<'a> {
    index: NamespaceIndex<'a>,
    indent: usize,
}

impl<'a> Emitter<'a> {
    pub fn new(nodes: &'a [TsNode], options: &EmitOptions) -> Self {
        Self {
            index: NamespaceIndex::new(nodes),
            indent: options.indent,
        }
    }

    /// Produce the complete binding text. Deterministic for a fixed model.
    pub fn emit(&self) -> String {
        let mut w = Writer::new(self.indent);

        w.write("/* Generated by tsbind. Do not edit. */");
        w.blank();
        w.line(&format!("type {};", PLACEHOLDER));

        // Forward opaque types, first-seen order
        for node in self.index.nodes() {
            if node.kind.has_nominal_type() {
                w.line(&format!("type {};", nominal_name(&node.container, &node.name)));
            }
        }

        let mut globals = NameAllocator::new();
        self.emit_namespace(&mut w, &[], &mut globals);

        w.blank();
        w.out
    }

    fn emit_namespace(&self, w: &mut Writer, path: &[String], globals: &mut NameAllocator) {
        let members = self.index.members(path);

        if !members.variables.is_empty() || !members.functions.is_empty() {
            w.blank();
        }
        for variable in &members.variables {
            self.emit_variable(w, variable, path, globals);
        }
        for function in &members.functions {
            self.emit_function(w, function, path, globals);
        }
        for type_node in &members.types {
            self.emit_type_module(w, type_node, path);
        }

        for child in self.index.children(path) {
            let module = capitalize(&normalize(child.last().map(String::as_str).unwrap_or("")));
            w.blank();
            w.open(&format!("module {} = {{", module));
            self.emit_namespace(w, &child, globals);
            w.close();
        }
    }

    fn emit_variable(
        &self,
        w: &mut Writer,
        node: &TsNode,
        path: &[String],
        globals: &mut NameAllocator,
    ) {
        let alias = globals.allocate(&node.name);
        let ty = self.render_type(&node.ty, path);
        w.line(&format!(
            "{} external {}: {} = \"{}\";",
            locator(path),
            alias,
            ty,
            node.name
        ));
    }

    fn emit_function(
        &self,
        w: &mut Writer,
        node: &TsNode,
        path: &[String],
        globals: &mut NameAllocator,
    ) {
        let alias = globals.allocate(&node.name);
        let args = if node.parameters.is_empty() {
            "unit".to_string()
        } else {
            let rendered: Vec<String> = node
                .parameters
                .iter()
                .map(|p| format!("~{}: {}", p.name, self.render_type(&p.ty, path)))
                .collect();
            format!("({})", rendered.join(", "))
        };
        let ret = self.render_type(&node.ty, path);
        w.line(&format!(
            "{} external {}: {} => {} = \"{}\";",
            locator(path),
            alias,
            args,
            ret,
            node.name
        ));
    }

    /// One nested module per interface/class: abstract type, paired
    /// getter/setter per property, receiver-style binding per method, and a
    /// factory iff the type has no methods.
    fn emit_type_module(&self, w: &mut Writer, node: &TsNode, path: &[String]) {
        w.blank();
        w.open(&format!("module {} = {{", capitalize(&normalize(&node.name))));
        w.line(&format!(
            "type t = {};",
            nominal_name(&node.container, &node.name)
        ));

        // Fresh scope per emitted type; never leaks into siblings
        let mut scope = NameAllocator::new();

        let properties: Vec<&TsNode> = node
            .members()
            .iter()
            .filter(|m| m.kind.is_property())
            .collect();
        let methods: Vec<&TsNode> = node
            .members()
            .iter()
            .filter(|m| m.kind.is_method())
            .collect();

        for property in &properties {
            let ty = self.render_type(&property.ty, path);
            let getter = scope.allocate(&format!("get{}", capitalize(&property.name)));
            w.line(&format!(
                "let {} = (_inst: t): {} => [%bs.raw {{| _inst.{} |}}];",
                getter, ty, property.name
            ));
            let setter = scope.allocate(&format!("set{}", capitalize(&property.name)));
            w.line(&format!(
                "let {} = (_inst: t, _value: {}): {} => [%bs.raw {{| _inst.{} = _value |}}];",
                setter, ty, ty, property.name
            ));
        }

        for method in &methods {
            let alias = scope.allocate(&method.name);
            let mut args = vec!["_inst: t".to_string()];
            args.extend(
                method
                    .parameters
                    .iter()
                    .map(|p| format!("_{}: {}", p.name, self.render_type(&p.ty, path))),
            );
            let call_args: Vec<String> = method
                .parameters
                .iter()
                .map(|p| format!("_{}", p.name))
                .collect();
            let ret = self.render_type(&method.ty, path);
            w.line(&format!(
                "let {} = ({}): {} => [%bs.raw {{| _inst.{}({}) |}}];",
                alias,
                args.join(", "),
                ret,
                method.name,
                call_args.join(", ")
            ));
        }

        if methods.is_empty() {
            self.emit_factory(w, &properties, path, &mut scope);
        }

        w.close();
    }

    /// Record constructor: one labeled argument per property in discovery
    /// order, inline object-construction on the JS side.
    fn emit_factory(
        &self,
        w: &mut Writer,
        properties: &[&TsNode],
        path: &[String],
        scope: &mut NameAllocator,
    ) {
        let alias = scope.allocate("make");
        let args = if properties.is_empty() {
            "()".to_string()
        } else {
            let rendered: Vec<String> = properties
                .iter()
                .map(|p| format!("~{}: {}", p.name, self.render_type(&p.ty, path)))
                .collect();
            format!("({})", rendered.join(", "))
        };
        let fields: Vec<String> = properties
            .iter()
            .map(|p| format!("{}: {}", p.name, p.name))
            .collect();
        w.line(&format!(
            "let {} = {}: t => [%bs.raw {{| {{{}}} |}}];",
            alias,
            args,
            fields.join(", ")
        ));
    }

    /// Map a classified type to ReasonML syntax. Unresolved shapes degrade
    /// to the placeholder instead of failing the run.
    fn render_type(&self, ty: &TsType, path: &[String]) -> String {
        match ty {
            TsType::Regular { name, is_generic } => {
                if *is_generic {
                    return format!("'{}", lower_cap(name));
                }
                match name.as_str() {
                    "string" => "string".to_string(),
                    "boolean" => "bool".to_string(),
                    // TODO: infer int vs float for TS `number`
                    "number" => "int".to_string(),
                    "any" => "'a".to_string(),
                    "void" => "unit".to_string(),
                    _ => self
                        .resolve_named(name, path)
                        .unwrap_or_else(|| PLACEHOLDER.to_string()),
                }
            }
            TsType::Array { element } => format!("array({})", self.render_type(element, path)),
            TsType::Tuple { elements } => match elements.len() {
                0 => "unit".to_string(),
                1 => self.render_type(&elements[0], path),
                _ => {
                    let rendered: Vec<String> = elements
                        .iter()
                        .map(|el| self.render_type(el, path))
                        .collect();
                    format!("({})", rendered.join(", "))
                }
            },
            TsType::TypeLiteral { .. } => PLACEHOLDER.to_string(),
        }
    }

    /// Resolve a type reference against declared interfaces/classes/aliases.
    /// Fully qualified names match their whole container path; bare names
    /// prefer the nearest enclosing container, then first declaration.
    fn resolve_named(&self, name: &str, path: &[String]) -> Option<String> {
        let declared = || {
            self.index
                .nodes()
                .iter()
                .filter(|n| n.kind.has_nominal_type())
        };

        if name.contains('.') {
            return declared()
                .find(|n| {
                    let mut qualified = n.container.join(".");
                    if !qualified.is_empty() {
                        qualified.push('.');
                    }
                    qualified.push_str(&n.name);
                    qualified == name
                })
                .map(|n| nominal_name(&n.container, &n.name));
        }

        let nearest = declared()
            .filter(|n| n.name == name && path.starts_with(&n.container))
            .max_by_key(|n| n.container.len());
        nearest
            .or_else(|| declared().find(|n| n.name == name))
            .map(|n| nominal_name(&n.container, &n.name))
    }
}

/// `t_` plus the qualified name: container segments and the own name joined
/// with `_`, punctuation replaced and quotes stripped.
fn nominal_name(container: &[String], name: &str) -> String {
    let mut segments: Vec<&str> = container.iter().map(String::as_str).collect();
    segments.push(name);
    format!("t_{}", normalize(&segments.join("_")))
}

/// Foreign-module locator attribute: the namespace path for namespaced
/// symbols, the global scope otherwise.
fn locator(path: &[String]) -> String {
    if path.is_empty() {
        "[@bs.val]".to_string()
    } else {
        format!("[@bs.module \"{}\"]", path.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_model;

    fn emit(source: &str) -> String {
        let nodes = build_model(source).unwrap();
        Emitter::new(&nodes, &EmitOptions::default()).emit()
    }

    #[test]
    fn test_interface_properties_and_factory() {
        let out = emit(
            r#"
declare interface Setting {
    value1: string;
    value2: number;
    enabled: boolean;
}
"#,
        );

        assert!(out.contains("type t_Setting;"));
        assert!(out.contains("module Setting = {"));
        assert!(out.contains("type t = t_Setting;"));
        assert!(out.contains(
            "let getValue1 = (_inst: t): string => [%bs.raw {| _inst.value1 |}];"
        ));
        assert!(out.contains(
            "let setValue1 = (_inst: t, _value: string): string => [%bs.raw {| _inst.value1 = _value |}];"
        ));
        assert!(out.contains("let getValue2 = (_inst: t): int"));
        assert!(out.contains("let getEnabled = (_inst: t): bool"));
        // Zero methods: the factory takes one labeled argument per property
        assert!(out.contains(
            "let make = (~value1: string, ~value2: int, ~enabled: bool): t => [%bs.raw {| {value1: value1, value2: value2, enabled: enabled} |}];"
        ));
    }

    #[test]
    fn test_interface_with_method_has_no_factory() {
        let out = emit(
            r#"
declare interface Greeter {
    greet(name: string): string;
}
"#,
        );

        assert!(out.contains("type t = t_Greeter;"));
        assert!(out.contains(
            "let greet = (_inst: t, _name: string): string => [%bs.raw {| _inst.greet(_name) |}];"
        ));
        assert!(!out.contains("let make"));
    }

    #[test]
    fn test_namespaced_function_locator_and_symbol() {
        let out = emit(
            r#"
declare module 'numbers' {
    export var x: number;
    export function add(a: number, b: number): number;
    module array_math {
        export function sum(nums: number[]): number;
    }
}
"#,
        );

        assert!(out.contains("module Numbers = {"));
        assert!(out.contains("module Array_math = {"));
        assert!(out.contains(
            "[@bs.module \"numbers\"] external x: int = \"x\";"
        ));
        assert!(out.contains(
            "[@bs.module \"numbers\"] external add: (~a: int, ~b: int) => int = \"add\";"
        ));
        assert!(out.contains(
            "[@bs.module \"numbers/array_math\"] external sum: (~nums: array(int)) => int = \"sum\";"
        ));
    }

    #[test]
    fn test_root_bindings_use_val_attribute() {
        let out = emit("declare function greet(name: string): void;");
        assert!(out.contains(
            "[@bs.val] external greet: (~name: string) => unit = \"greet\";"
        ));
    }

    #[test]
    fn test_reserved_word_binding() {
        let out = emit("declare var type: string;");
        assert!(out.contains("[@bs.val] external type_: string = \"type\";"));
    }

    #[test]
    fn test_duplicate_names_across_namespaces() {
        let out = emit(
            r#"
declare module "alpha" { export function add(a: number): number; }
declare module "beta" { export function add(a: number): number; }
"#,
        );
        assert!(out.contains("external add:"));
        assert!(out.contains("external add2:"));
    }

    #[test]
    fn test_named_type_reference_resolves_to_abstract_type() {
        let out = emit(
            r#"
declare interface Person {
    firstName: string;
}
declare interface Company {
    owner: Person;
}
"#,
        );
        assert!(out.contains("type t_Person;"));
        assert!(out.contains(
            "let getOwner = (_inst: t): t_Person => [%bs.raw {| _inst.owner |}];"
        ));
    }

    #[test]
    fn test_qualified_reference_and_alias_forward_declaration() {
        let out = emit(
            r#"
declare namespace autoprefixer {
    type Autoprefixer = any;
}
declare const autoprefixer: autoprefixer.Autoprefixer;
"#,
        );
        assert!(out.contains("type t_autoprefixer_Autoprefixer;"));
        assert!(out.contains(
            "[@bs.val] external autoprefixer: t_autoprefixer_Autoprefixer = \"autoprefixer\";"
        ));
    }

    #[test]
    fn test_unresolved_shape_degrades_to_placeholder() {
        let out = emit(
            r#"
declare type Odd = string | number;
declare interface Holder {
    value: Odd2;
}
"#,
        );
        // The run completes; the unknown reference renders as the placeholder
        assert!(out.contains("type t_TODO;"));
        assert!(out.contains("let getValue = (_inst: t): t_TODO"));
    }

    #[test]
    fn test_indentation_is_depth_times_unit() {
        let out = emit(
            r#"
declare module 'numbers' {
    module array_math {
        export function sum(nums: number[]): number;
    }
}
"#,
        );
        // depth 0 module header, depth 1 nested header, depth 2 binding
        assert!(out.contains("\nmodule Numbers = {"));
        assert!(out.contains("\n  module Array_math = {"));
        assert!(out.contains("\n    [@bs.module \"numbers/array_math\"]"));
        assert!(out.contains("\n  };"));
        assert!(out.contains("\n};"));
    }

    #[test]
    fn test_generic_and_tuple_rendering() {
        let out = emit(
            r#"
declare interface Box<T> {
    unwrap(): T;
}
declare type Pair = [string, number];
declare module "m" {
    export function pick(pair: [string, number]): string;
}
"#,
        );
        assert!(out.contains("let unwrap = (_inst: t): 't => [%bs.raw {| _inst.unwrap() |}];"));
        assert!(out.contains("(~pair: (string, int)) => string"));
    }

    #[test]
    fn test_header_comes_first() {
        let out = emit("declare var x: number;");
        assert!(out.starts_with("/* Generated by tsbind. Do not edit. */"));
    }

    #[test]
    fn test_optional_function_property_binds_as_method() {
        let out = emit(
            r#"
declare interface Options {
    transform: (input: string) => string;
}
"#,
        );
        assert!(out.contains(
            "let transform = (_inst: t, _input: string): string => [%bs.raw {| _inst.transform(_input) |}];"
        ));
        // Promotion counts as a method, so no factory
        assert!(!out.contains("let make"));
    }
}
