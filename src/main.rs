use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod assets;
mod build;
mod config;
mod init;
mod page;

#[derive(Parser)]
#[command(name = "mdsite", version, about = "Static site generator for Markdown content")]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log debug details to stderr (overridden by RUST_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum RenderFormat {
    Html,
    Tree,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site: copy static files and render every content page
    Build {
        /// Project root containing site.json (default: current directory)
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Content directory (overrides site.json)
        #[arg(long)]
        content: Option<PathBuf>,

        /// Static files directory (overrides site.json)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// HTML template (overrides site.json)
        #[arg(long)]
        template: Option<PathBuf>,

        /// Output directory (overrides site.json)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Rebuild whenever a source file changes
        #[arg(long)]
        watch: bool,
    },

    /// Render a single Markdown file to stdout
    Render {
        /// Path to the .md file
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value = "html")]
        format: RenderFormat,
    },

    /// Check that Markdown file(s) convert without errors
    Check {
        /// Path to the .md file(s)
        files: Vec<String>,
    },

    /// Scaffold a new site
    Init {
        /// Directory to initialize (default: current directory)
        path: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            root,
            content,
            static_dir,
            template,
            out,
            watch,
        } => {
            let overrides = config::Overrides {
                content_dir: content,
                static_dir,
                template_path: template,
                out_dir: out,
            };
            let site = config::load_config(&root)?.apply(overrides).resolve(&root);

            if watch {
                // A failed first build should not stop the watcher.
                if let Err(e) = build::handle_build(&site, cli.quiet) {
                    eprintln!("{} {:#}", "Build error:".red().bold(), e);
                }
                build::watch_and_rebuild(&site, cli.quiet)?;
            } else {
                build::handle_build(&site, cli.quiet)?;
            }
        }
        Commands::Render { file, format } => {
            handle_render(&file, format)?;
        }
        Commands::Check { files } => {
            handle_check(&files)?;
        }
        Commands::Init { path } => {
            init::init_project(path.as_deref(), cli.quiet)?;
        }
    }

    Ok(())
}

fn handle_render(file: &str, format: RenderFormat) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read '{}': {}", file, e))?;

    let root = mdsite_parse::markdown_to_html_node(&content)
        .map_err(|e| anyhow::anyhow!("{}: {}", file, e))?;

    let output = match format {
        RenderFormat::Html => root.to_html()?,
        RenderFormat::Tree => serde_json::to_string_pretty(&root)?,
    };

    println!("{output}");
    Ok(())
}

fn handle_check(files: &[String]) -> Result<()> {
    let mut has_errors = false;

    for file in files {
        // A page needs both a clean conversion and a title to build.
        let checked = std::fs::read_to_string(file)
            .map_err(|e| anyhow::anyhow!("Failed to read file: {}", e))
            .and_then(|content| {
                mdsite_parse::markdown_to_html(&content)?;
                Ok(mdsite_parse::extract_title(&content)?)
            });

        match checked {
            Ok(_) => println!("{}: {}", file, "OK".green()),
            Err(e) => {
                has_errors = true;
                println!("{}: {}: {}", file, "error".red().bold(), e);
            }
        }
    }

    if has_errors {
        std::process::exit(1);
    }

    Ok(())
}
