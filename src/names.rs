//! Name allocation - collision-safe identifier synthesis
//!
//! ReasonML let-bindings start lowercase and must not collide with the
//! language's own keywords or with earlier bindings in the same scope. The
//! allocator keeps a per-scope history; scopes never share it. One scope is
//! created for top-level bindings and a fresh one per emitted type's members.

/// Identifiers that collide with ReasonML syntax and get an `_` suffix.
const RESERVED: &[&str] = &[
    "sig", "module", "begin", "end", "object", "switch", "to", "then", "type", "as",
];

/// A mutable history of previously allocated names within one emission scope.
#[derive(Debug, Default)]
pub struct NameAllocator {
    history: Vec<String>,
}

impl NameAllocator {
    /// Create a fresh, empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a binding name for `candidate`.
    ///
    /// Lowercases the first character, rewrites reserved words with a
    /// trailing underscore, and disambiguates repeats by appending the
    /// 1-based occurrence count (starting at 2). Deterministic for a fixed
    /// call sequence and unique within the scope.
    pub fn allocate(&mut self, candidate: &str) -> String {
        let mut name = lower_cap(candidate);
        if RESERVED.contains(&name.as_str()) {
            name.push('_');
        }

        self.history.push(name.clone());

        let occurrences = self.history.iter().filter(|n| **n == name).count();
        if occurrences > 1 {
            format!("{}{}", name, occurrences)
        } else {
            name
        }
    }
}

/// Lowercase the first character, leaving the rest untouched.
pub fn lower_cap(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replace punctuation (`$`, `.`, `-`) with `_` and strip quote characters.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '"' | '\''))
        .map(|c| if matches!(c, '$' | '.' | '-') { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_repeats() {
        let mut scope = NameAllocator::new();
        let names: Vec<String> = ["a", "a", "a"].iter().map(|n| scope.allocate(n)).collect();
        assert_eq!(names, vec!["a", "a2", "a3"]);
    }

    #[test]
    fn test_allocate_reserved_word() {
        let mut scope = NameAllocator::new();
        assert!(scope.allocate("type").starts_with("type_"));
        assert!(scope.allocate("module").starts_with("module_"));
    }

    #[test]
    fn test_allocate_lowercases_first_char() {
        let mut scope = NameAllocator::new();
        assert_eq!(scope.allocate("GetName"), "getName");
    }

    #[test]
    fn test_scopes_are_independent() {
        let mut first = NameAllocator::new();
        let mut second = NameAllocator::new();
        assert_eq!(first.allocate("x"), "x");
        assert_eq!(second.allocate("x"), "x");
        assert_eq!(first.allocate("x"), "x2");
    }

    #[test]
    fn test_reserved_then_repeated() {
        let mut scope = NameAllocator::new();
        assert_eq!(scope.allocate("end"), "end_");
        assert_eq!(scope.allocate("end"), "end_2");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("a.b-c$d"), "a_b_c_d");
        assert_eq!(normalize("\"numbers\""), "numbers");
        assert_eq!(normalize("'quoted'"), "quoted");
    }

    #[test]
    fn test_capitalize_and_lower_cap() {
        assert_eq!(capitalize("array_math"), "Array_math");
        assert_eq!(lower_cap("Person"), "person");
        assert_eq!(capitalize(""), "");
        assert_eq!(lower_cap(""), "");
    }
}
