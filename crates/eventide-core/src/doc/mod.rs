//! Documentation comment synthesis
//!
//! This module renders the XML documentation comments attached to generated
//! wrapper declarations: summaries, parameter and return docs, cross-reference
//! summaries and the inherit-doc marker.

mod block;
mod render;
mod template;

pub use block::{
    escape_cref, see_cref, DocBlock, DocBuilder, ParamDoc, SummaryDoc, DOC_PREFIX,
    INHERIT_DOC_TRIVIA,
};
pub use render::{
    render_see_also, render_see_also_params, render_summary, render_summary_for,
    render_summary_params, render_summary_params_returns, render_summary_returns,
};
pub use template::{format_template, required_arguments, TemplateError};
