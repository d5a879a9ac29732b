//! Seedling CLI - Project scaffolding for Node.js services

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use seedling_core::runtime::{check_runtimes, REQUIRED_TOOLS};
use seedling_core::templates::{list_templates, resolve_template_source};
use seedling_core::{
    tui, PackageJsonWriter, ProductConfig, ScaffoldConfig, ScaffoldRequest, Scaffolder,
    SystemRunner,
};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Seedling product configuration
#[derive(Clone)]
pub struct SeedlingConfig;

impl ProductConfig for SeedlingConfig {
    fn name(&self) -> &'static str {
        env!("CARGO_PKG_NAME")
    }

    fn display_name(&self) -> &'static str {
        "Seedling"
    }

    fn template_dir_env(&self) -> &'static str {
        "SEEDLING_TEMPLATE_DIR"
    }

    fn next_steps(&self, dir: &Path) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        // Step 1: cd to directory if not current
        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        // Step 2: Fill in local settings
        steps.push("Review .env for local settings".to_string());

        // Step 3: Start dev server
        steps.push("npm run dev".to_string());

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "seedling")]
#[command(about = "CLI for scaffolding Node.js projects with git hooks and Docker support")]
#[command(version)]
pub struct Args {
    /// Show debug diagnostics (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project
    Create(CreateArgs),
    /// List the configured templates and where they resolve to
    Templates(TemplatesArgs),
}

#[derive(Parser, Debug, Default)]
pub struct CreateArgs {
    /// Project directory to create (also the package name)
    pub directory: Option<PathBuf>,

    /// No prompts; pass --quiet to git init and git commit
    #[arg(short, long)]
    pub silent: bool,

    /// Add the fetch helper (src/utils/utils.mjs) and its dependencies
    #[arg(long = "fetch")]
    pub with_fetch: bool,

    /// Add Dockerfile and compose files
    #[arg(long = "docker")]
    pub with_docker: bool,

    /// Add commitlint configuration and a commit-msg hook
    #[arg(long = "commitlint")]
    pub with_commitlint: bool,

    /// Write package.json without running npm install
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    #[command(flatten)]
    pub sources: SourceArgs,
}

#[derive(Parser, Debug, Default)]
pub struct TemplatesArgs {
    #[command(flatten)]
    pub sources: SourceArgs,
}

#[derive(Parser, Debug, Default)]
pub struct SourceArgs {
    /// Local directory to use for templates instead of the bundled ones
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Scaffold configuration file (YAML) replacing the built-in one
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn create(product: &SeedlingConfig, args: CreateArgs) -> Result<()> {
    let mut config = ScaffoldConfig::load_or_default(args.sources.config.as_deref())?;
    if args.skip_install {
        config.options.install = false;
    }
    let source = resolve_template_source(product, args.sources.template_dir.as_deref());
    debug!(
        templates = %source,
        config = ?args.sources.config,
        install = config.options.install,
        "resolved scaffold sources"
    );

    if !args.silent {
        tui::intro(product)?;
    }

    let directory = match args.directory {
        Some(dir) => dir,
        None if args.silent => anyhow::bail!("A project directory is required with --silent"),
        None => tui::select_directory()?,
    };

    if !args.silent && !tui::confirm_existing_directory(&directory)? {
        anyhow::bail!("Setup cancelled.");
    }

    let (found, missing) = check_runtimes(REQUIRED_TOOLS);
    for info in found.iter().filter(|info| info.available) {
        debug!(tool = info.name, version = ?info.version, "found tool");
    }
    for tool in &missing {
        eprintln!("{} {} was not found on PATH", "Warning:".yellow(), tool);
    }

    let request = ScaffoldRequest {
        directory,
        silent: args.silent,
        with_fetch: args.with_fetch,
        with_docker: args.with_docker,
        with_commitlint: args.with_commitlint,
    };

    let writer = PackageJsonWriter::new(config.commands.clone(), SystemRunner);
    let scaffolder = Scaffolder::new(config, source, product.name(), SystemRunner, writer);

    let summary = scaffolder
        .run(&request)
        .await
        .context("Failed to write package.json")?;

    if summary.is_aborted() {
        anyhow::bail!("Project was not created in {}", request.directory.display());
    }

    if !summary.failures.is_empty() {
        println!();
        println!(
            "{} {} step(s) failed and can be re-run by hand:",
            "Note:".yellow().bold(),
            summary.failures.len()
        );
        for failure in &summary.failures {
            println!("  {} {}", "->".blue(), failure.error);
        }
    }

    if args.silent {
        println!();
        println!("{} {}", "Created".green().bold(), request.directory.display());
    } else {
        tui::print_next_steps(product, &request.directory)?;
    }

    Ok(())
}

fn templates(product: &SeedlingConfig, args: TemplatesArgs) -> Result<()> {
    let config = ScaffoldConfig::load_or_default(args.sources.config.as_deref())?;
    let source = resolve_template_source(product, args.sources.template_dir.as_deref());
    debug!(templates = %source, "listing templates");

    println!("{} {}", "Templates from:".cyan().bold(), source);
    println!();

    for template in list_templates(&config, &source) {
        let status = if template.exists {
            "ok".green()
        } else {
            "missing".red()
        };
        let dest = if template.dest.is_empty() {
            "."
        } else {
            template.dest.as_str()
        };
        println!(
            "  {} {:<11} {} -> {} ({})",
            "->".blue(),
            template.key.name(),
            template.location,
            dest,
            status
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);
    let product = SeedlingConfig;

    let result = match args.command {
        Some(Command::Create(create_args)) => create(&product, create_args).await,
        Some(Command::Templates(templates_args)) => templates(&product, templates_args),
        // No subcommand provided, default to create behavior (interactive mode)
        None => create(&product, CreateArgs::default()).await,
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
