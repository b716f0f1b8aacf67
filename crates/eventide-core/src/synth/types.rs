//! Type name handling for emitted code

/// C# keywords that name built-in types and are never qualified.
const BUILTIN_TYPES: &[&str] = &[
    "bool", "byte", "sbyte", "char", "decimal", "double", "float", "int", "uint", "long", "ulong",
    "short", "ushort", "object", "string", "void", "nint", "nuint", "dynamic",
];

/// Reserved words that need an `@` prefix when used as identifiers.
const RESERVED_IDENTIFIERS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Rx unit type used when a handler carries no data.
pub const UNIT_TYPE: &str = "global::System.Reactive.Unit";

/// Prefix `global::` onto every type identifier in `type_name`.
///
/// Built-in keywords, names listed in `generics`, and identifiers that are
/// already qualified are left untouched. Punctuation (`<>,[]?*`) and spacing
/// pass through.
pub fn qualify(type_name: &str, generics: &[String]) -> String {
    let mut output = String::with_capacity(type_name.len() + 16);
    let mut ident = String::new();

    for c in type_name.chars() {
        if c.is_alphanumeric() || matches!(c, '_' | '.' | ':' | '`') {
            ident.push(c);
        } else {
            flush_identifier(&mut output, &mut ident, generics);
            output.push(c);
        }
    }
    flush_identifier(&mut output, &mut ident, generics);
    output
}

fn flush_identifier(output: &mut String, ident: &mut String, generics: &[String]) {
    if ident.is_empty() {
        return;
    }
    let keep = ident.starts_with("global::")
        || BUILTIN_TYPES.contains(&ident.as_str())
        || generics.iter().any(|g| g == ident);
    if !keep {
        output.push_str("global::");
    }
    output.push_str(ident);
    ident.clear();
}

/// A usable C# identifier for a parameter name; `fallback` when empty.
pub fn identifier(name: &str, fallback: &str) -> String {
    if name.is_empty() {
        fallback.to_string()
    } else if RESERVED_IDENTIFIERS.contains(&name) {
        format!("@{name}")
    } else {
        name.to_string()
    }
}

/// Whether a type name denotes `System.Object`.
pub fn is_object(type_name: &str) -> bool {
    matches!(
        type_name,
        "object" | "System.Object" | "global::System.Object"
    )
}

/// Whether a type name is a pointer or function pointer.
pub fn is_pointer(type_name: &str) -> bool {
    type_name.contains('*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifies_plain_names() {
        assert_eq!(qualify("System.EventArgs", &[]), "global::System.EventArgs");
    }

    #[test]
    fn qualifies_generic_arguments() {
        assert_eq!(
            qualify("System.Collections.Generic.List<System.Int32>", &[]),
            "global::System.Collections.Generic.List<global::System.Int32>"
        );
        assert_eq!(
            qualify("System.Collections.Generic.Dictionary<string, Ns.Item[]>", &[]),
            "global::System.Collections.Generic.Dictionary<string, global::Ns.Item[]>"
        );
    }

    #[test]
    fn leaves_keywords_generics_and_qualified_names() {
        let generics = vec!["T".to_string()];
        assert_eq!(qualify("int", &generics), "int");
        assert_eq!(qualify("T", &generics), "T");
        assert_eq!(qualify("Ns.Box<T>?", &generics), "global::Ns.Box<T>?");
        assert_eq!(qualify("global::Ns.Item", &generics), "global::Ns.Item");
    }

    #[test]
    fn identifiers_escape_reserved_words() {
        assert_eq!(identifier("event", "arg0"), "@event");
        assert_eq!(identifier("", "arg0"), "arg0");
        assert_eq!(identifier("sender", "arg0"), "sender");
    }

    #[test]
    fn object_and_pointer_detection() {
        assert!(is_object("object"));
        assert!(is_object("System.Object"));
        assert!(!is_object("System.EventArgs"));
        assert!(is_pointer("byte*"));
        assert!(!is_pointer("byte[]"));
    }
}
