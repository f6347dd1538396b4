//! Render markdown to HTML

use anyhow::{Context, Result};
use std::path::Path;
use web::{create_element, parse_markdown, parse_markdown_escaped};

use crate::util;

pub async fn run(file: Option<&Path>, escape: bool, class: Option<&str>) -> Result<()> {
    let input = util::read_input(file)?;
    println!("{}", render(&input, escape, class)?);
    Ok(())
}

/// Render input text; the final line terminator is not turned into `<br>`
pub fn render(input: &str, escape: bool, class: Option<&str>) -> Result<String> {
    let text = input
        .strip_suffix("\r\n")
        .or_else(|| input.strip_suffix('\n'))
        .unwrap_or(input);

    let html = if escape {
        parse_markdown_escaped(text)
    } else {
        parse_markdown(text)
    };

    match class {
        Some(class) => Ok(create_element("div", Some(class), &html)
            .context("Failed to build wrapper element")?
            .to_html()),
        None => Ok(html),
    }
}
