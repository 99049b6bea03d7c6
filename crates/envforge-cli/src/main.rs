use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "envforge",
    about = "envforge — deterministic resource names, profiles, and tags per environment",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve names, capacity profile, and tags for one environment.
    ///
    /// The uniqueness token is either given with --token or derived from
    /// the deployment scope with --scope (e.g. subscription id, then
    /// resource group name).
    Resolve {
        /// Environment label: dev, staging, or prod
        #[arg(short, long)]
        env: String,
        /// Explicit uniqueness token (lowercase letters and digits)
        #[arg(short, long, conflicts_with = "scope", required_unless_present = "scope")]
        token: Option<String>,
        /// Scope parts to derive the token from, in order
        #[arg(short, long, num_args = 1..)]
        scope: Vec<String>,
        /// Path to envforge.toml (default: ./envforge.toml if present)
        #[arg(short, long)]
        config: Option<String>,
        /// Creation date for the `created` tag (default: today, UTC)
        #[arg(long)]
        created: Option<NaiveDate>,
        /// Output format: json, toml, or env
        #[arg(short, long, default_value = "json")]
        format: String,
    },
    /// Derive the uniqueness token for a deployment scope
    Token {
        #[arg(short, long, num_args = 1.., required = true)]
        scope: Vec<String>,
        /// Also print the full scope digest
        #[arg(long)]
        digest: bool,
    },
    /// Show the capacity profile table
    Profiles {
        /// Output format: text, json, or toml
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Write an envforge.toml scaffold
    Init {
        #[arg(short, long, default_value = ".")]
        path: String,
        #[arg(long, default_value = envforge_core::naming::DEFAULT_PREFIX)]
        prefix: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("envforge=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve { env, token, scope, config, created, format } => {
            commands::resolve::resolve(commands::resolve::ResolveArgs {
                env: &env,
                token: token.as_deref(),
                scope: &scope,
                config: config.as_deref(),
                created,
                format: &format,
            })
        }
        Commands::Token { scope, digest } => commands::token::token(&scope, digest),
        Commands::Profiles { format } => commands::profiles::profiles(&format),
        Commands::Init { path, prefix } => commands::init::init(&path, &prefix),
    }
}
