//! Rendering entry points for the common documentation shapes
//!
//! Every function here is pure and returns a [`DocBlock`]; the shapes only
//! differ in which optional parts of the block they fill in.

use crate::metadata::MemberDescriptor;

use super::block::{DocBlock, DocBuilder};
use super::template::TemplateError;

/// Summary only.
pub fn render_summary(text: &str) -> DocBlock {
    DocBuilder::new(text).build()
}

/// Summary followed by return value text.
pub fn render_summary_returns(text: &str, returns: &str) -> DocBlock {
    DocBuilder::new(text).returns(returns).build()
}

/// Summary plus one parameter doc per parameter of `member`, each produced by
/// substituting the parameter name into `parameter_template`.
pub fn render_summary_for(
    text: &str,
    member: &MemberDescriptor,
    parameter_template: &str,
) -> Result<DocBlock, TemplateError> {
    Ok(DocBuilder::new(text)
        .param_template(parameter_template, member.parameter_names())?
        .build())
}

/// Summary plus caller-supplied parameter docs, order preserved.
pub fn render_summary_params<'a, I>(text: &str, params: I) -> DocBlock
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    DocBuilder::new(text).params(params).build()
}

/// Summary, caller-supplied parameter docs, then return value text.
pub fn render_summary_params_returns<'a, I>(text: &str, params: I, returns: &str) -> DocBlock
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    DocBuilder::new(text).params(params).returns(returns).build()
}

/// Summary template whose placeholder receives a cross-reference to `target`.
pub fn render_see_also(summary_format: &str, target: &str) -> Result<DocBlock, TemplateError> {
    Ok(DocBuilder::see_also(summary_format, target)?.build())
}

/// Cross-referencing summary with explicit parameter docs appended.
pub fn render_see_also_params<'a, I>(
    summary_format: &str,
    target: &str,
    params: I,
) -> Result<DocBlock, TemplateError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    Ok(DocBuilder::see_also(summary_format, target)?
        .params(params)
        .build())
}
