//! C# source emission for wrapper groups
//!
//! Output style:
//! - 4-space indentation
//! - one `namespace` block per emitted wrapper group
//! - wrapper classes are `partial` so a type contributed by several
//!   assemblies can be reopened later in the same file

use crate::synth::{Declaration, DeclarationKind, Wrapper, WrapperPreamble, DATA_FIELD};
use crate::metadata::generic_list;
use crate::doc::DocBlock;

/// Default indentation: 4 spaces
const INDENT: &str = "    ";

/// Directives written after the header comment.
const USINGS: &[&str] = &["System", "System.Reactive", "System.Reactive.Linq"];

/// Buffered writer producing one self-contained chunk of C# source.
pub(crate) struct CodeWriter {
    output: String,
    indent_level: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    // ==================== Output Helpers ====================

    fn indent_str(&self) -> String {
        INDENT.repeat(self.indent_level)
    }

    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            let indent = self.indent_str();
            self.output.push_str(&indent);
            self.output.push_str(text);
        }
        self.output.push('\n');
    }

    fn blank(&mut self) {
        self.output.push('\n');
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn open_brace(&mut self) {
        self.line("{");
        self.indent();
    }

    fn close_brace(&mut self) {
        self.dedent();
        self.line("}");
    }

    fn doc(&mut self, doc: &DocBlock) {
        let indent = self.indent_str();
        doc.write_trivia(&mut self.output, &indent);
    }

    // ==================== Header ====================

    /// File header: auto-generated marker, source lines, using directives.
    pub fn write_header(&mut self, source_lines: &[String]) {
        self.line("// <auto-generated />");
        self.line(&format!("// Generated by eventide {}.", crate::VERSION));
        if !source_lines.is_empty() {
            self.line("// Sources:");
            for source in source_lines {
                self.line(&format!("//   {source}"));
            }
        }
        self.blank();
        for using in USINGS {
            self.line(&format!("using global::{using};"));
        }
        self.blank();
        self.line("#pragma warning disable CS0618 // Wrapped members may be obsolete");
    }

    // ==================== Wrapper groups ====================

    /// Emit one wrapper class block. The preamble is only written when the
    /// wrapper is opened for the first time in the run.
    pub fn write_group(
        &mut self,
        wrapper: &Wrapper,
        preamble: Option<&WrapperPreamble>,
        declarations: &[&Declaration],
    ) {
        self.blank();
        let namespaced = !wrapper.namespace.is_empty();
        if namespaced {
            self.line(&format!("namespace {}", wrapper.namespace));
            self.open_brace();
        }

        if let Some(preamble) = preamble {
            self.doc(&preamble.doc);
        }
        let modifiers = if wrapper.scheme.is_static() {
            "public static partial class"
        } else {
            "public partial class"
        };
        self.line(&format!(
            "{modifiers} {}{}",
            wrapper.name,
            generic_list(&wrapper.generic_parameters)
        ));
        self.open_brace();

        let mut first = true;
        if let Some(preamble) = preamble {
            if let Some(constructor) = &preamble.constructor {
                self.line(&format!(
                    "private readonly {} {DATA_FIELD};",
                    wrapper.source_type
                ));
                self.blank();
                self.write_declaration(constructor);
                first = false;
            }
        }

        for declaration in declarations {
            if !first {
                self.blank();
            }
            self.write_declaration(declaration);
            first = false;
        }

        self.close_brace();
        if namespaced {
            self.close_brace();
        }
    }

    fn write_declaration(&mut self, declaration: &Declaration) {
        self.doc(&declaration.doc);
        let signature = signature(declaration);
        self.line(&format!("{signature} => {};", declaration.body));
    }
}

/// Declaration signature without the body.
fn signature(declaration: &Declaration) -> String {
    let static_modifier = if declaration.is_static { "static " } else { "" };
    match declaration.kind {
        DeclarationKind::ObservableProperty => format!(
            "public {static_modifier}{} {}",
            declaration.return_type.as_deref().unwrap_or_default(),
            declaration.name
        ),
        DeclarationKind::ObservableMethod => format!(
            "public {static_modifier}{} {}{}({})",
            declaration.return_type.as_deref().unwrap_or_default(),
            declaration.name,
            generic_list(&declaration.generic_parameters),
            parameter_list(declaration)
        ),
        DeclarationKind::Constructor => {
            format!("public {}({})", declaration.name, parameter_list(declaration))
        }
    }
}

fn parameter_list(declaration: &Declaration) -> String {
    declaration
        .parameters
        .iter()
        .map(|p| {
            let this = if p.is_receiver { "this " } else { "" };
            format!("{this}{} {}", p.type_name, p.name)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::DocBuilder;
    use crate::synth::{GeneratedParameter, NamingScheme};

    fn wrapper(scheme: NamingScheme, namespace: &str) -> Wrapper {
        Wrapper {
            scheme,
            namespace: namespace.to_string(),
            name: scheme.wrapper_name("Rx", "Button"),
            generic_parameters: Vec::new(),
            source_type: "global::Ns.Button".to_string(),
            source_display: "Ns.Button".to_string(),
        }
    }

    fn property(name: &str) -> Declaration {
        Declaration {
            kind: DeclarationKind::ObservableProperty,
            container: "Ns.RxButtonEvents".to_string(),
            source: "global::Ns.Button".to_string(),
            name: name.to_string(),
            is_static: false,
            generic_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type: Some("global::System.IObservable<int>".to_string()),
            body: "source".to_string(),
            doc: DocBuilder::new(format!("{name} doc.")).build(),
        }
    }

    #[test]
    fn header_lists_sources_and_usings() {
        let mut writer = CodeWriter::new();
        writer.write_header(&["Contoso.Widgets >=1.0.0".to_string()]);
        let output = writer.finish();
        assert!(output.starts_with("// <auto-generated />\n"));
        assert!(output.contains("//   Contoso.Widgets >=1.0.0\n"));
        assert!(output.contains("using global::System.Reactive.Linq;\n"));
    }

    #[test]
    fn group_without_preamble_has_only_members() {
        let mut writer = CodeWriter::new();
        let a = property("A");
        let b = property("B");
        writer.write_group(&wrapper(NamingScheme::InstanceEvents, "Ns"), None, &[&a, &b]);
        let output = writer.finish();
        let expected = "
namespace Ns
{
    public partial class RxButtonEvents
    {
        /// <summary>
        /// A doc.
        /// </summary>
        public global::System.IObservable<int> A => source;

        /// <summary>
        /// B doc.
        /// </summary>
        public global::System.IObservable<int> B => source;
    }
}
";
        assert_eq!(output, expected);
    }

    #[test]
    fn preamble_writes_field_and_constructor() {
        let mut writer = CodeWriter::new();
        let constructor = Declaration {
            kind: DeclarationKind::Constructor,
            container: "Ns.RxButtonEvents".to_string(),
            source: "global::Ns.Button".to_string(),
            name: "RxButtonEvents".to_string(),
            is_static: false,
            generic_parameters: Vec::new(),
            parameters: vec![GeneratedParameter::new("data", "global::Ns.Button")],
            return_type: None,
            body: "_data = data".to_string(),
            doc: DocBlock::inherit(),
        };
        let preamble = WrapperPreamble {
            doc: DocBuilder::new("Wrapper.").build(),
            constructor: Some(constructor),
        };
        let member = property("A");
        writer.write_group(
            &wrapper(NamingScheme::InstanceEvents, ""),
            Some(&preamble),
            &[&member],
        );
        let output = writer.finish();
        assert!(output.starts_with("\n/// <summary>\n/// Wrapper.\n"));
        assert!(output.contains("    private readonly global::Ns.Button _data;\n"));
        assert!(output.contains("    /// <inheritdoc />\n    public RxButtonEvents(global::Ns.Button data) => _data = data;\n"));
        assert!(!output.contains("namespace"));
    }

    #[test]
    fn method_signature_marks_receiver() {
        let declaration = Declaration {
            kind: DeclarationKind::ObservableMethod,
            container: "Ns.RxButtonMethods".to_string(),
            source: "global::Ns.Button".to_string(),
            name: "MoveObservable".to_string(),
            is_static: true,
            generic_parameters: vec!["T".to_string()],
            parameters: vec![
                GeneratedParameter::receiver("instance", "global::Ns.Button"),
                GeneratedParameter::new("value", "T"),
            ],
            return_type: Some("global::System.IObservable<bool>".to_string()),
            body: String::new(),
            doc: DocBlock::inherit(),
        };
        assert_eq!(
            signature(&declaration),
            "public static global::System.IObservable<bool> MoveObservable<T>(this global::Ns.Button instance, T value)"
        );
    }

    #[test]
    fn static_wrapper_is_static_partial() {
        let mut writer = CodeWriter::new();
        let member = property("A");
        writer.write_group(&wrapper(NamingScheme::StaticEvents, "Ns"), None, &[&member]);
        assert!(writer
            .finish()
            .contains("public static partial class RxButtonStaticEvents\n"));
    }
}
