//! `mdsite build`: turn the content directory into a static site.
//!
//! Every build starts from scratch: the output directory is deleted, static
//! files are copied in, and every content file is rendered through the
//! template.

use anyhow::{Context, Result};
use colored::Colorize;
use notify::{EventKind, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::assets;
use crate::config::SiteConfig;
use crate::page;

/// Counts from a finished build.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages: Vec<PathBuf>,
    pub static_files: usize,
}

impl BuildReport {
    pub fn print_summary(&self, out_dir: &Path) {
        for page in &self.pages {
            println!("  {} {}", "page".dimmed(), page.display());
        }
        println!(
            "{} {} pages, {} static files → {}",
            "Built".green().bold(),
            self.pages.len(),
            self.static_files,
            out_dir.display(),
        );
    }
}

/// Run one full build.
pub fn build_site(config: &SiteConfig) -> Result<BuildReport> {
    let out_dir = &config.out_dir;

    if out_dir.exists() {
        ensure_out_dir_is_disposable(config)?;
        tracing::info!("Deleting {}", out_dir.display());
        fs::remove_dir_all(out_dir)
            .with_context(|| format!("Failed to delete '{}'", out_dir.display()))?;
    }
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create '{}'", out_dir.display()))?;

    tracing::info!("Copying static files to {}", out_dir.display());
    let static_files = assets::copy_static(&config.static_dir, out_dir)?;

    let template = fs::read_to_string(&config.template_path)
        .with_context(|| format!("Failed to read template '{}'", config.template_path.display()))?;
    let pages = page::generate_pages(&config.content_dir, &template, out_dir)?;

    Ok(BuildReport {
        pages,
        static_files,
    })
}

/// Refuse to delete an output directory that is, or contains, a source.
fn ensure_out_dir_is_disposable(config: &SiteConfig) -> Result<()> {
    let out_dir = canonical(&config.out_dir);
    let sources = [
        ("content directory", &config.content_dir),
        ("static directory", &config.static_dir),
        ("template", &config.template_path),
    ];
    for (what, source) in sources {
        if canonical(source).starts_with(&out_dir) {
            anyhow::bail!(
                "Refusing to delete output directory '{}': it contains the {} '{}'",
                config.out_dir.display(),
                what,
                source.display()
            );
        }
    }
    Ok(())
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Canonical source and output locations a watcher filters events against.
struct WatchedPaths {
    content_dir: PathBuf,
    static_dir: PathBuf,
    template_path: PathBuf,
    out_dir: PathBuf,
}

impl WatchedPaths {
    fn new(config: &SiteConfig) -> Self {
        Self {
            content_dir: canonical(&config.content_dir),
            static_dir: canonical(&config.static_dir),
            template_path: canonical(&config.template_path),
            out_dir: canonical(&config.out_dir),
        }
    }

    /// A rebuild is due when a source is created, modified or removed.
    /// Events under the output directory never count, or every build would
    /// trigger the next one.
    fn should_rebuild(&self, event: &notify::Event) -> bool {
        let relevant_kind = matches!(
            event.kind,
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
        );
        relevant_kind
            && event.paths.iter().any(|p| {
                let p = canonical(p);
                !p.starts_with(&self.out_dir)
                    && (p.starts_with(&self.content_dir)
                        || p.starts_with(&self.static_dir)
                        || p == self.template_path)
            })
    }
}

pub fn handle_build(config: &SiteConfig, quiet: bool) -> Result<()> {
    let report = build_site(config)?;
    if !quiet {
        report.print_summary(&config.out_dir);
    }
    Ok(())
}

/// Watch content, static files and the template, and rebuild on each change.
///
/// Debounces rapid events (e.g. editors that write in stages) with a 200ms window.
/// Build errors are reported and watching continues. Ctrl+C exits.
pub fn watch_and_rebuild(config: &SiteConfig, quiet: bool) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for dir in [&config.content_dir, &config.static_dir] {
        if dir.exists() {
            watcher
                .watch(dir, RecursiveMode::Recursive)
                .with_context(|| format!("Failed to watch '{}'", dir.display()))?;
        }
    }
    let template_dir = config.template_path.parent().ok_or_else(|| {
        anyhow::anyhow!(
            "Cannot determine parent directory of '{}'",
            config.template_path.display()
        )
    })?;
    watcher.watch(template_dir, RecursiveMode::NonRecursive)?;

    println!(
        "{} {} for changes (Ctrl+C to stop)",
        "Watching".cyan().bold(),
        config.content_dir.display()
    );

    let watched = WatchedPaths::new(config);

    let mut last_rebuild = Instant::now();
    let debounce = Duration::from_millis(200);

    loop {
        match rx.recv_timeout(Duration::from_secs(1)) {
            Ok(event) => {
                if watched.should_rebuild(&event) && last_rebuild.elapsed() > debounce {
                    // Small delay to let the editor finish writing
                    std::thread::sleep(Duration::from_millis(50));

                    match handle_build(config, quiet) {
                        Ok(()) => {
                            last_rebuild = Instant::now();
                        }
                        Err(e) => {
                            eprintln!("{} {:#}", "Build error:".red().bold(), e);
                        }
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                // Keep looping
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind, RemoveKind};

    fn watched() -> WatchedPaths {
        WatchedPaths {
            content_dir: PathBuf::from("/nonexistent-site/content"),
            static_dir: PathBuf::from("/nonexistent-site/static"),
            template_path: PathBuf::from("/nonexistent-site/template.html"),
            out_dir: PathBuf::from("/nonexistent-site/public"),
        }
    }

    fn event(kind: EventKind, path: &str) -> notify::Event {
        notify::Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn content_changes_trigger_rebuild() {
        let w = watched();
        let created = event(
            EventKind::Create(CreateKind::File),
            "/nonexistent-site/content/blog/new.md",
        );
        let removed = event(
            EventKind::Remove(RemoveKind::File),
            "/nonexistent-site/content/index.md",
        );
        assert!(w.should_rebuild(&created));
        assert!(w.should_rebuild(&removed));
    }

    #[test]
    fn template_and_static_changes_trigger_rebuild() {
        let w = watched();
        let modify = EventKind::Modify(ModifyKind::Data(DataChange::Content));
        assert!(w.should_rebuild(&event(modify, "/nonexistent-site/template.html")));
        assert!(w.should_rebuild(&event(modify, "/nonexistent-site/static/index.css")));
    }

    #[test]
    fn output_dir_events_are_ignored() {
        let w = watched();
        let created = event(
            EventKind::Create(CreateKind::File),
            "/nonexistent-site/public/index.html",
        );
        assert!(!w.should_rebuild(&created));
    }

    #[test]
    fn unrelated_files_next_to_template_are_ignored() {
        let w = watched();
        let modify = EventKind::Modify(ModifyKind::Data(DataChange::Content));
        assert!(!w.should_rebuild(&event(modify, "/nonexistent-site/notes.txt")));
    }

    #[test]
    fn access_events_are_ignored() {
        let w = watched();
        let read = event(
            EventKind::Access(AccessKind::Read),
            "/nonexistent-site/content/index.md",
        );
        assert!(!w.should_rebuild(&read));
    }

    #[test]
    fn out_dir_holding_content_is_refused() {
        let root = std::env::temp_dir().join("mdsite-build-unit").join("refuse");
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("content")).unwrap();
        fs::write(root.join("content/index.md"), "# Home").unwrap();

        let config = SiteConfig {
            out_dir: root.clone(),
            ..SiteConfig::default()
        }
        .resolve(&root);
        let err = build_site(&config).unwrap_err();
        assert!(err.to_string().contains("Refusing to delete"), "unexpected error: {err}");
        assert!(root.join("content/index.md").is_file());

        let _ = fs::remove_dir_all(&root);
    }
}
