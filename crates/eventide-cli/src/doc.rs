//! Implementation of the `eventide doc` command.

use anyhow::{anyhow, Result};
use eventide_core::doc::{DocBlock, DocBuilder};

/// Options for rendering one documentation block.
#[derive(Debug, Default)]
pub struct DocOptions {
    /// Summary text, or a template when `see_also` is set.
    pub summary: String,
    /// Cross-reference target substituted into the summary template.
    pub see_also: Option<String>,
    /// Explicit parameter docs as `name=text`.
    pub params: Vec<String>,
    /// Template producing one parameter doc per name in `param_names`.
    pub param_template: Option<String>,
    pub param_names: Vec<String>,
    pub returns: Option<String>,
    /// Emit only the inherit-doc marker.
    pub inherit: bool,
}

/// Render the block described by `options` as comment trivia.
pub fn render_doc(options: DocOptions) -> Result<String> {
    if options.inherit {
        return Ok(DocBlock::inherit().to_trivia());
    }

    let mut builder = match &options.see_also {
        Some(target) => DocBuilder::see_also(&options.summary, target)?,
        None => DocBuilder::new(options.summary.as_str()),
    };

    for param in &options.params {
        let (name, text) = param
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid parameter doc '{param}', expected name=text"))?;
        builder = builder.param(name.trim(), text.trim());
    }

    if let Some(template) = &options.param_template {
        builder = builder.param_template(template, options.param_names.iter().map(String::as_str))?;
    } else if !options.param_names.is_empty() {
        return Err(anyhow!("--params requires --param-template"));
    }

    if let Some(returns) = &options.returns {
        builder = builder.returns(returns.as_str());
    }

    Ok(builder.build().to_trivia())
}
