//! Composite format templates
//!
//! Templates use indexed placeholders (`{0}`, `{1}`, ...) with `{{` and `}}`
//! as literal brace escapes. Alignment and format specifiers are not
//! supported; anything other than a bare index inside braces is rejected.

use thiserror::Error;

/// Errors raised while formatting a documentation template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template references an argument that was not supplied.
    #[error("template placeholder {{{index}}} has no argument ({available} supplied)")]
    MissingArgument { index: usize, available: usize },

    /// A `{` or `}` without a partner.
    #[error("unmatched brace at byte {position} in template")]
    UnmatchedBrace { position: usize },

    /// Braces containing something other than an argument index.
    #[error("invalid placeholder '{{{text}}}' in template")]
    InvalidPlaceholder { text: String },
}

/// A single parsed piece of a template.
#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Brace(char),
    Placeholder(usize),
}

fn parse(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                if literal_start < i {
                    segments.push(Segment::Literal(&template[literal_start..i]));
                }
                if bytes.get(i + 1) == Some(&b'{') {
                    segments.push(Segment::Brace('{'));
                    i += 2;
                } else {
                    let close = template[i + 1..]
                        .find('}')
                        .map(|offset| i + 1 + offset)
                        .ok_or(TemplateError::UnmatchedBrace { position: i })?;
                    let inner = &template[i + 1..close];
                    if inner.contains('{') {
                        return Err(TemplateError::UnmatchedBrace { position: i });
                    }
                    let index = inner
                        .trim()
                        .parse::<usize>()
                        .map_err(|_| TemplateError::InvalidPlaceholder {
                            text: inner.to_string(),
                        })?;
                    segments.push(Segment::Placeholder(index));
                    i = close + 1;
                }
                literal_start = i;
            }
            b'}' => {
                if literal_start < i {
                    segments.push(Segment::Literal(&template[literal_start..i]));
                }
                if bytes.get(i + 1) == Some(&b'}') {
                    segments.push(Segment::Brace('}'));
                    i += 2;
                    literal_start = i;
                } else {
                    return Err(TemplateError::UnmatchedBrace { position: i });
                }
            }
            _ => i += 1,
        }
    }

    if literal_start < bytes.len() {
        segments.push(Segment::Literal(&template[literal_start..]));
    }

    Ok(segments)
}

/// Substitute `args` into `template`.
///
/// Extra arguments are ignored; a placeholder whose index is out of range is
/// an error.
pub fn format_template(template: &str, args: &[&str]) -> Result<String, TemplateError> {
    let mut output = String::with_capacity(template.len());
    for segment in parse(template)? {
        match segment {
            Segment::Literal(text) => output.push_str(text),
            Segment::Brace(c) => output.push(c),
            Segment::Placeholder(index) => {
                let arg = args.get(index).ok_or(TemplateError::MissingArgument {
                    index,
                    available: args.len(),
                })?;
                output.push_str(arg);
            }
        }
    }
    Ok(output)
}

/// Number of arguments a template needs (highest placeholder index + 1).
pub fn required_arguments(template: &str) -> Result<usize, TemplateError> {
    Ok(parse(template)?
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder(index) => Some(index + 1),
            _ => None,
        })
        .max()
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_single_placeholder() {
        let text = format_template("Occurs when {0} happens.", &["Clicked"]).unwrap();
        assert_eq!(text, "Occurs when Clicked happens.");
    }

    #[test]
    fn repeated_and_reordered_placeholders() {
        let text = format_template("{1} then {0} then {1}", &["a", "b"]).unwrap();
        assert_eq!(text, "b then a then b");
    }

    #[test]
    fn escaped_braces_are_literal() {
        let text = format_template("{{literal}} {0}", &["x"]).unwrap();
        assert_eq!(text, "{literal} x");
    }

    #[test]
    fn argument_braces_are_not_reparsed() {
        let text = format_template("See {0}", &["List{Int32}"]).unwrap();
        assert_eq!(text, "See List{Int32}");
    }

    #[test]
    fn missing_argument_is_an_error() {
        let err = format_template("{0} and {1}", &["only"]).unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingArgument {
                index: 1,
                available: 1
            }
        );
    }

    #[test]
    fn unmatched_braces_are_errors() {
        assert!(matches!(
            format_template("open {0", &["x"]),
            Err(TemplateError::UnmatchedBrace { position: 5 })
        ));
        assert!(matches!(
            format_template("close }", &[]),
            Err(TemplateError::UnmatchedBrace { position: 6 })
        ));
    }

    #[test]
    fn format_specifiers_are_rejected() {
        assert!(matches!(
            format_template("{0:N2}", &["1"]),
            Err(TemplateError::InvalidPlaceholder { .. })
        ));
    }

    #[test]
    fn required_arguments_counts_highest_index() {
        assert_eq!(required_arguments("no placeholders").unwrap(), 0);
        assert_eq!(required_arguments("{0}").unwrap(), 1);
        assert_eq!(required_arguments("{2} {0}").unwrap(), 3);
        assert!(required_arguments("{oops}").is_err());
    }
}
