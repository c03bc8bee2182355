mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{prompt::PromptSubcommand, template::TemplateSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "forge",
    about = "Manage prompt templates, validate documents, and generate filled-in prompts",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .forge/ or .git/)
    #[arg(long, global = true, env = "FORGE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize forge in the current project
    Init,

    /// Manage templates
    Template {
        #[command(subcommand)]
        subcommand: TemplateSubcommand,
    },

    /// Validate a markdown document for compliance
    Validate {
        /// Path to the document
        file: PathBuf,

        /// Validate against a stored template's metadata instead of the
        /// fixed quick checks
        #[arg(long)]
        template: Option<String>,

        /// Also check fit for an agent role
        #[arg(long)]
        role: Option<String>,
    },

    /// Generate a document from a template
    Generate {
        slug: String,

        /// Variable value as NAME=VALUE (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,

        /// Section content as NAME=TEXT (repeatable)
        #[arg(long = "section", value_name = "NAME=TEXT")]
        sections: Vec<String>,

        /// Write the generated document to a file
        #[arg(long)]
        out: Option<PathBuf>,

        /// Don't record the generation in prompt history
        #[arg(long)]
        no_save: bool,
    },

    /// Show the wizard steps for a template
    Steps {
        slug: String,

        /// Include resolved metadata and guidance
        #[arg(long)]
        enhanced: bool,
    },

    /// Show guidance for one section of a template
    Guidance { slug: String, section: String },

    /// Browse generation history
    Prompt {
        #[command(subcommand)]
        subcommand: PromptSubcommand,
    },

    /// Launch the web API server
    Ui {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3141")]
        port: u16,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Ui { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Template { subcommand } => cmd::template::run(&root, subcommand, cli.json),
        Commands::Validate {
            file,
            template,
            role,
        } => cmd::validate::run(&root, &file, template.as_deref(), role.as_deref(), cli.json),
        Commands::Generate {
            slug,
            vars,
            sections,
            out,
            no_save,
        } => cmd::generate::run(&root, &slug, &vars, &sections, out.as_deref(), no_save, cli.json),
        Commands::Steps { slug, enhanced } => cmd::steps::run(&root, &slug, enhanced, cli.json),
        Commands::Guidance { slug, section } => {
            cmd::guidance::run(&root, &slug, &section, cli.json)
        }
        Commands::Prompt { subcommand } => cmd::prompt::run(&root, subcommand, cli.json),
        Commands::Ui { port, no_open } => cmd::ui::run(&root, port, no_open),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
