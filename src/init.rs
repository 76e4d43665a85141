use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{CONFIG_FILE, SiteConfig};

const TEMPLATE_HTML: &str = r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{{ Title }}</title>
    <link href="/index.css" rel="stylesheet" />
  </head>

  <body>
    <article>{{ Content }}</article>
  </body>
</html>
"#;

const INDEX_CSS: &str = r#"body {
  max-width: 720px;
  margin: 0 auto;
  padding: 2rem 1rem;
  font-family: system-ui, sans-serif;
  line-height: 1.6;
}

pre {
  overflow-x: auto;
  padding: 1rem;
  background: #f4f4f4;
}

blockquote {
  margin-left: 0;
  padding-left: 1rem;
  border-left: 4px solid #ccc;
}
"#;

const SITE_JSON: &str = r#"{
  "contentDir": "content",
  "staticDir": "static",
  "templatePath": "template.html",
  "outDir": "public"
}
"#;

fn index_md(project_name: &str) -> String {
    format!(
        "# {project_name}\n\nWelcome to **{project_name}**.\n\n\
         - Write pages in `content/`\n\
         - Put stylesheets and images in `static/`\n\
         - Run `mdsite build` to render everything into `public/`\n"
    )
}

/// Scaffold a new site at the given path. Existing files are left untouched.
pub fn init_project(path: Option<&str>, quiet: bool) -> Result<()> {
    let target = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };

    let project_name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "my-site".to_string());

    if !quiet {
        println!(
            "{} {} at {}",
            "Initializing".green().bold(),
            project_name,
            target.display()
        );
    }

    let defaults = SiteConfig::default();
    fs::create_dir_all(target.join(&defaults.content_dir))?;
    fs::create_dir_all(target.join(&defaults.static_dir))?;

    let files = [
        (PathBuf::from(CONFIG_FILE), SITE_JSON.to_string()),
        (defaults.template_path.clone(), TEMPLATE_HTML.to_string()),
        (defaults.content_dir.join("index.md"), index_md(&project_name)),
        (defaults.static_dir.join("index.css"), INDEX_CSS.to_string()),
    ];

    for (rel, contents) in files {
        write_if_missing(&target, &rel, &contents, quiet)?;
    }

    if !quiet {
        println!();
        println!("Next: {} {}", "mdsite build --root".cyan(), target.display());
    }

    Ok(())
}

fn write_if_missing(root: &Path, rel: &Path, contents: &str, quiet: bool) -> Result<()> {
    let path = root.join(rel);
    if path.exists() {
        if !quiet {
            println!("  {} {} (already exists)", "Skipped".yellow(), rel.display());
        }
        return Ok(());
    }

    fs::write(&path, contents).with_context(|| format!("Failed to write '{}'", path.display()))?;
    if !quiet {
        println!("  {} {}", "Created".green(), rel.display());
    }
    Ok(())
}
