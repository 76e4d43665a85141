//! Page generation: markdown file + HTML template -> HTML page.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONTENT_PLACEHOLDER: &str = "{{ Content }}";
pub const TITLE_PLACEHOLDER: &str = "{{ Title }}";

/// Fill `template` with the converted markdown and its title.
///
/// Content is substituted before the title, so a literal `{{ Title }}` inside
/// the page body is replaced as well.
pub fn render_page(template: &str, markdown: &str) -> Result<String> {
    let html = mdsite_parse::markdown_to_html(markdown)?;
    let title = mdsite_parse::extract_title(markdown)?;

    Ok(template
        .replace(CONTENT_PLACEHOLDER, &html)
        .replace(TITLE_PLACEHOLDER, &title))
}

/// Generate a single page from `src` into `dest`, creating parent directories.
pub fn generate_page(src: &Path, template: &str, dest: &Path) -> Result<()> {
    tracing::info!("Generating page from {} to {}", src.display(), dest.display());

    let markdown = fs::read_to_string(src)
        .with_context(|| format!("Failed to read '{}'", src.display()))?;
    let page = render_page(template, &markdown)
        .with_context(|| format!("Failed to convert '{}'", src.display()))?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    fs::write(dest, page).with_context(|| format!("Failed to write '{}'", dest.display()))?;
    Ok(())
}

/// Output path for a content file: same relative location, `.html` extension.
pub fn page_dest(content_dir: &Path, src: &Path, out_dir: &Path) -> Result<PathBuf> {
    let rel = src.strip_prefix(content_dir)?;
    Ok(out_dir.join(rel).with_extension("html"))
}

/// Generate a page for every file under `content_dir`.
///
/// Returns the paths of the generated pages, in walk order.
pub fn generate_pages(content_dir: &Path, template: &str, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut generated = Vec::new();

    for entry in walkdir::WalkDir::new(content_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk '{}'", content_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let dest = page_dest(content_dir, entry.path(), out_dir)?;
        generate_page(entry.path(), template, &dest)?;
        generated.push(dest);
    }

    Ok(generated)
}
