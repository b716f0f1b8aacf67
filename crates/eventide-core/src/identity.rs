//! Assembly identity by full name
//!
//! Two references are the same assembly when their full names are equal
//! under an ordinal, case-sensitive comparison. Version and public key token
//! differences hidden inside a differing full name still make the names
//! differ; nothing else about a reference takes part.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use tracing::debug;

use crate::metadata::{Assembly, AssemblyMetadata};

/// Anything identified by an assembly full name.
pub trait AssemblyReference {
    fn full_name(&self) -> &str;
}

impl AssemblyReference for Assembly {
    fn full_name(&self) -> &str {
        &self.full_name
    }
}

impl AssemblyReference for str {
    fn full_name(&self) -> &str {
        self
    }
}

impl AssemblyReference for String {
    fn full_name(&self) -> &str {
        self
    }
}

impl<T: AssemblyReference + ?Sized> AssemblyReference for &T {
    fn full_name(&self) -> &str {
        (**self).full_name()
    }
}

/// Equality and hashing of assembly references by full name.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssemblyNameComparer;

impl AssemblyNameComparer {
    /// Two absent references are equal; an absent and a present one are not.
    pub fn equals<A, B>(a: Option<&A>, b: Option<&B>) -> bool
    where
        A: AssemblyReference + ?Sized,
        B: AssemblyReference + ?Sized,
    {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => a.full_name() == b.full_name(),
            _ => false,
        }
    }

    /// Hash consistent with [`AssemblyNameComparer::equals`].
    pub fn hash<A: AssemblyReference + ?Sized>(reference: &A) -> u64 {
        let mut hasher = DefaultHasher::new();
        reference.full_name().hash(&mut hasher);
        hasher.finish()
    }
}

/// Wrapper giving a reference full-name set semantics.
#[derive(Debug, Clone, Copy)]
pub struct ByFullName<T>(pub T);

impl<T: AssemblyReference> PartialEq for ByFullName<T> {
    fn eq(&self, other: &Self) -> bool {
        AssemblyNameComparer::equals(Some(&self.0), Some(&other.0))
    }
}

impl<T: AssemblyReference> Eq for ByFullName<T> {}

impl<T: AssemblyReference> Hash for ByFullName<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.full_name().hash(state);
    }
}

/// Keep the first assembly seen for every full name, in input order.
pub fn dedup_assemblies<A, I>(assemblies: I) -> Vec<A>
where
    A: AssemblyMetadata,
    I: IntoIterator<Item = A>,
{
    let mut seen: HashSet<ByFullName<String>> = HashSet::new();
    let mut unique = Vec::new();
    for assembly in assemblies {
        if seen.insert(ByFullName(assembly.full_name().to_string())) {
            unique.push(assembly);
        } else {
            debug!(assembly = assembly.full_name(), "skipping duplicate assembly reference");
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_names_are_equal_and_hash_equal() {
        let a = Assembly::new("Contoso.Widgets, Version=1.0.0.0");
        let b = Assembly::new("Contoso.Widgets, Version=1.0.0.0");
        assert!(AssemblyNameComparer::equals(Some(&a), Some(&b)));
        assert_eq!(AssemblyNameComparer::hash(&a), AssemblyNameComparer::hash(&b));
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let a = Assembly::new("Contoso.Widgets");
        let b = Assembly::new("contoso.widgets");
        assert!(!AssemblyNameComparer::equals(Some(&a), Some(&b)));
    }

    #[test]
    fn null_handling() {
        let a = Assembly::new("A");
        assert!(AssemblyNameComparer::equals::<Assembly, Assembly>(None, None));
        assert!(!AssemblyNameComparer::equals(None::<&Assembly>, Some(&a)));
        assert!(!AssemblyNameComparer::equals(Some(&a), None::<&Assembly>));
    }

    #[test]
    fn only_full_name_participates() {
        let mut a = Assembly::new("A");
        a.target_frameworks.push("net8.0".to_string());
        let b = Assembly::new("A");
        assert!(AssemblyNameComparer::equals(Some(&a), Some(&b)));
        assert!(AssemblyNameComparer::equals(Some(&a), Some("A")));
    }

    #[test]
    fn by_full_name_collapses_in_sets() {
        let mut set = HashSet::new();
        assert!(set.insert(ByFullName(Assembly::new("A"))));
        assert!(!set.insert(ByFullName(Assembly::new("A"))));
        assert!(set.insert(ByFullName(Assembly::new("B"))));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn dedup_keeps_first_seen() {
        let mut first = Assembly::new("A");
        first.target_frameworks.push("first".to_string());
        let mut second = Assembly::new("A");
        second.target_frameworks.push("second".to_string());
        let unique = dedup_assemblies(vec![first, Assembly::new("B"), second]);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].target_frameworks, vec!["first"]);
        assert_eq!(unique[1].full_name, "B");
    }

    #[test]
    fn dedup_follows_comparer_semantics() {
        let unique = dedup_assemblies(vec![
            Assembly::new("Contoso.Widgets"),
            Assembly::new("contoso.widgets"),
            Assembly::new("Contoso.Widgets, Version=2.0.0.0"),
            Assembly::new("Contoso.Widgets"),
        ]);
        let names: Vec<_> = unique.iter().map(|a| a.full_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Contoso.Widgets",
                "contoso.widgets",
                "Contoso.Widgets, Version=2.0.0.0"
            ]
        );
    }
}
