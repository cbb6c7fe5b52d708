//! Shape queries over tree-sitter-cpp declarators.
//!
//! Shared by the definition index and the lowering pass so that both agree
//! on names, scopes and keys.

use tree_sitter::Node;

/// Preprocessor conditionals whose contents are treated as siblings.
pub const CONDITIONAL_BLOCKS: &[&str] = &[
    "preproc_if",
    "preproc_ifdef",
    "preproc_else",
    "preproc_elif",
    "preproc_elifdef",
];

/// Enclosing scope while walking declarations.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Namespace and record names, outermost first
    pub path: Vec<String>,
    /// Unqualified name of the record whose body is being walked
    pub record: Option<String>,
}

impl Scope {
    pub fn enter_namespace(&self, names: &[String]) -> Scope {
        let mut path = self.path.clone();
        path.extend(names.iter().cloned());
        Scope { path, record: None }
    }

    pub fn enter_record(&self, qualifier: &[String], name: &str) -> Scope {
        let mut path = self.path.clone();
        path.extend(qualifier.iter().cloned());
        path.push(name.to_string());
        Scope {
            path,
            record: Some(name.to_string()),
        }
    }

    /// `a::b::name` for a name declared in this scope behind `qualifier`.
    pub fn qualify(&self, qualifier: &[String], name: &str) -> String {
        self.path
            .iter()
            .chain(qualifier)
            .map(String::as_str)
            .chain(std::iter::once(name))
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("::")
    }
}

/// Text with all whitespace removed, for comparing spelled names.
pub fn compact(text: &str) -> String {
    text.split_whitespace().collect()
}

pub fn is_record_specifier(node: Node) -> bool {
    matches!(
        node.kind(),
        "struct_specifier" | "class_specifier" | "union_specifier"
    )
}

/// Peel `a::b::name` into (`["a", "b"]`, `name`).
///
/// Template arguments on scopes are dropped (`Box<T>::get` → `["Box"]`).
pub fn split_qualified<'t>(node: Node<'t>, source: &[u8]) -> (Vec<String>, Node<'t>) {
    let mut qualifier = Vec::new();
    let mut current = node;

    while current.kind() == "qualified_identifier" {
        if let Some(scope) = current.child_by_field_name("scope") {
            let scope = match scope.kind() {
                "template_type" => scope.child_by_field_name("name").unwrap_or(scope),
                _ => scope,
            };
            qualifier.push(compact(scope.utf8_text(source).unwrap_or("")));
        }
        match current.child_by_field_name("name") {
            Some(name) => current = name,
            None => break,
        }
    }

    let name = match current.kind() {
        "template_function" | "template_method" | "template_type" => {
            current.child_by_field_name("name").unwrap_or(current)
        }
        _ => current,
    };
    (qualifier, name)
}

/// The name node a declarator ultimately declares.
pub fn declarator_name(node: Node) -> Option<Node> {
    match node.kind() {
        "identifier" | "field_identifier" | "qualified_identifier" | "destructor_name"
        | "operator_name" | "template_function" | "template_method" | "type_identifier"
        | "operator_cast" => Some(node),
        "function_declarator" | "pointer_declarator" | "reference_declarator"
        | "array_declarator" | "init_declarator" | "attributed_declarator" => {
            declarator_name(node.child_by_field_name("declarator")?)
        }
        "parenthesized_declarator" => declarator_name(node.named_child(0)?),
        _ => None,
    }
}

/// The function declarator inside `node`, if `node` declares a function.
///
/// `int (*fp)(int)` declares a variable, so a function declarator wrapping a
/// parenthesized declarator does not count.
pub fn function_declarator(node: Node) -> Option<Node> {
    match node.kind() {
        "function_declarator" => {
            let inner = node.child_by_field_name("declarator")?;
            (inner.kind() != "parenthesized_declarator").then_some(node)
        }
        "pointer_declarator" | "reference_declarator" | "attributed_declarator" => {
            function_declarator(node.child_by_field_name("declarator")?)
        }
        _ => None,
    }
}

/// Number of parameters in a function declarator; `(void)` counts as zero.
pub fn arity(function_declarator: Node, source: &[u8]) -> usize {
    let Some(params) = function_declarator.child_by_field_name("parameters") else {
        return 0;
    };

    let mut cursor = params.walk();
    let params: Vec<Node> = params
        .children(&mut cursor)
        .filter(|p| {
            matches!(
                p.kind(),
                "parameter_declaration"
                    | "optional_parameter_declaration"
                    | "variadic_parameter_declaration"
                    | "..."
            )
        })
        .collect();

    match params.as_slice() {
        [only] if only.kind() == "parameter_declaration"
            && compact(only.utf8_text(source).unwrap_or("")) == "void" =>
        {
            0
        }
        _ => params.len(),
    }
}

/// Key identifying a function across declarations and definitions.
pub fn function_key(qualified: &str, arity: usize) -> String {
    format!("{}/{}", qualified, arity)
}

/// Whether a declaration carries the given storage class (`static`, `extern`).
pub fn has_storage_class(node: Node, class: &str, source: &[u8]) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| {
        child.kind() == "storage_class_specifier" && child.utf8_text(source).unwrap_or("") == class
    });
    found
}

/// The `declarator` fields of a declaration, in order.
pub fn declarators(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.children_by_field_name("declarator", &mut cursor)
        .collect()
}

/// Named children of a conditional block minus its name/condition.
pub fn conditional_contents(node: Node) -> Vec<Node> {
    let skipped: Vec<usize> = ["name", "condition"]
        .iter()
        .filter_map(|field| node.child_by_field_name(field))
        .map(|n| n.id())
        .collect();

    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !skipped.contains(&child.id()))
        .collect()
}

/// Namespace segments spelled by a `namespace_definition` name
/// (`a::b` yields two).
pub fn namespace_segments<'t>(name: Node<'t>) -> Vec<Node<'t>> {
    if name.kind() == "namespace_identifier" {
        return vec![name];
    }
    let mut segments = Vec::new();
    let mut cursor = name.walk();
    for child in name.named_children(&mut cursor) {
        segments.extend(namespace_segments(child));
    }
    segments
}
