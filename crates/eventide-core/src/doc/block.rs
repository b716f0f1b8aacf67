//! Documentation blocks attached to generated declarations

use std::fmt::Write;

use super::template::{format_template, TemplateError};

/// Trivia emitted for declarations that inherit their documentation.
///
/// Always ends with a line break so it never shares a line with the
/// declaration it decorates.
pub const INHERIT_DOC_TRIVIA: &str = "/// <inheritdoc />\n";

/// Prefix of every documentation comment line.
pub const DOC_PREFIX: &str = "/// ";

/// Documentation for one generated parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDoc {
    /// Parameter name as it appears in the declaration
    pub name: String,
    /// Description text
    pub text: String,
}

impl ParamDoc {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// A fully rendered summary comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryDoc {
    /// Summary body, possibly spanning several lines
    pub summary: String,
    /// Parameter docs in declaration order
    pub params: Vec<ParamDoc>,
    /// Return value documentation
    pub returns: Option<String>,
    /// Escaped cross-reference target substituted into the summary, if any
    pub cross_reference: Option<String>,
}

/// Documentation attached to a declaration.
///
/// A block is either a full summary comment or the inherit-doc marker, never
/// both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocBlock {
    /// Documentation is inherited from an overridden or implemented member
    InheritDoc,
    /// Synthesized documentation
    Summary(SummaryDoc),
}

impl DocBlock {
    /// The inherit-doc marker block.
    pub fn inherit() -> Self {
        DocBlock::InheritDoc
    }

    pub fn is_inherit_doc(&self) -> bool {
        matches!(self, DocBlock::InheritDoc)
    }

    /// The synthesized summary, if this is not an inherit-doc block.
    pub fn summary(&self) -> Option<&SummaryDoc> {
        match self {
            DocBlock::Summary(doc) => Some(doc),
            DocBlock::InheritDoc => None,
        }
    }

    /// Render the block as comment trivia, one `///` line per entry.
    pub fn to_trivia(&self) -> String {
        let mut output = String::new();
        self.write_trivia(&mut output, "");
        output
    }

    /// Append the block to `output`, prefixing every line with `indent`.
    pub fn write_trivia(&self, output: &mut String, indent: &str) {
        let doc = match self {
            DocBlock::InheritDoc => {
                output.push_str(indent);
                output.push_str(INHERIT_DOC_TRIVIA);
                return;
            }
            DocBlock::Summary(doc) => doc,
        };

        writeln!(output, "{indent}{DOC_PREFIX}<summary>").unwrap();
        for line in doc.summary.lines().map(str::trim_end) {
            if !line.trim().is_empty() {
                writeln!(output, "{indent}{DOC_PREFIX}{}", line.trim_start()).unwrap();
            }
        }
        writeln!(output, "{indent}{DOC_PREFIX}</summary>").unwrap();

        for param in &doc.params {
            writeln!(
                output,
                "{indent}{DOC_PREFIX}<param name=\"{}\">{}</param>",
                param.name,
                single_line(&param.text)
            )
            .unwrap();
        }

        if let Some(returns) = &doc.returns {
            writeln!(
                output,
                "{indent}{DOC_PREFIX}<returns>{}</returns>",
                single_line(returns)
            )
            .unwrap();
        }
    }
}

/// Collapse multi-line text so a tag stays on one comment line.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape a cross-reference target so it stays valid inside a `cref`
/// attribute: `<` becomes `{` and `>` becomes `}`.
///
/// The mapping is lossy. Targets that already contain braces cannot be
/// told apart from escaped generics afterwards.
pub fn escape_cref(target: &str) -> String {
    target.replace('<', "{").replace('>', "}")
}

/// A `<see cref="..." />` element for `target`, escaped.
pub fn see_cref(target: &str) -> String {
    format!("<see cref=\"{}\" />", escape_cref(target))
}

/// Builder collapsing every rendering shape into one representation.
#[derive(Debug, Clone, Default)]
pub struct DocBuilder {
    doc: SummaryDoc,
}

impl DocBuilder {
    /// Start from literal summary text.
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            doc: SummaryDoc {
                summary: summary.into(),
                ..SummaryDoc::default()
            },
        }
    }

    /// Start from a summary template whose single placeholder receives a
    /// cross-reference to `target`.
    pub fn see_also(summary_format: &str, target: &str) -> Result<Self, TemplateError> {
        let summary = format_template(summary_format, &[&see_cref(target)])?;
        Ok(Self {
            doc: SummaryDoc {
                summary,
                cross_reference: Some(escape_cref(target)),
                ..SummaryDoc::default()
            },
        })
    }

    /// Append one parameter doc.
    pub fn param(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.doc.params.push(ParamDoc::new(name, text));
        self
    }

    /// Append parameter docs, keeping the caller's order.
    pub fn params<I, N, T>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        self.doc
            .params
            .extend(params.into_iter().map(|(name, text)| ParamDoc::new(name, text)));
        self
    }

    /// Append one parameter doc per name, formatting `template` with the name.
    pub fn param_template<'a, I>(mut self, template: &str, names: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            let text = format_template(template, &[name])?;
            self.doc.params.push(ParamDoc::new(name, text));
        }
        Ok(self)
    }

    /// Set the return value text.
    pub fn returns(mut self, text: impl Into<String>) -> Self {
        self.doc.returns = Some(text.into());
        self
    }

    pub fn build(self) -> DocBlock {
        DocBlock::Summary(self.doc)
    }
}
