/*
 * flowctl - manage Flowgate configuration entities and export/import bundles
 *
 * SPDX-License-Identifier: Apache-2.0
 */
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use flowgate::prelude::*;

use crate::{
    config::{self, CliConfig},
    output::{Output, OutputFormat},
};

pub mod backup;
pub mod bucket;
pub mod entity;
pub mod profile;
pub mod server;

#[derive(Parser, Debug)]
#[command(name = "flowctl")]
#[command(author, version, about = "flowctl: manage Flowgate configuration entities", long_about = None)]
pub struct Cli {
    /// Configuration profile name
    #[arg(short = 'P', long, env = "FLOWGATE_PROFILE", default_value = config::DEFAULT_PROFILE)]
    pub profile: String,

    /// Core service URL (overrides the profile)
    #[arg(short = 'u', long, env = "FLOWGATE_URL")]
    pub url: Option<String>,

    /// API key (overrides the profile)
    #[arg(long, env = "FLOWGATE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Write output to file (default: stdout)
    #[arg(short = 'o', long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Quiet mode - suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (repeat for more: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Credential CRUD operations
    #[command(alias = "credentials")]
    Credential(EntityArgs),

    /// Secret CRUD operations
    #[command(alias = "secrets")]
    Secret(EntityArgs),

    /// Server CRUD and lifecycle operations
    #[command(alias = "servers")]
    Server(ServerArgs),

    /// Label CRUD operations
    #[command(alias = "labels")]
    Label(EntityArgs),

    /// Seed CRUD operations
    #[command(alias = "seeds")]
    Seed(EntityArgs),

    /// Bucket operations
    #[command(alias = "buckets")]
    Bucket(BucketArgs),

    /// Export all configured products into one bundle file
    Export(ExportArgs),

    /// Import a bundle file into the configured products
    Import(ImportArgs),

    /// Manage configuration profiles
    #[command(alias = "profiles")]
    Profile(ProfileArgs),
}

#[derive(Args, Debug)]
pub struct EntityArgs {
    #[command(subcommand)]
    pub command: EntityCommands,
}

#[derive(Subcommand, Debug)]
pub enum EntityCommands {
    /// Create or update entities from JSON input
    Store {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Get one entity by name or id
    Get { name_or_id: String },

    /// List entities
    List {
        /// Filter by text query
        #[arg(long)]
        query: Option<String>,

        /// Maximum number of results
        #[arg(long)]
        max: Option<usize>,
    },

    /// Delete one entity by name or id
    Delete { name_or_id: String },
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Inline JSON data: a single object or an array of objects
    #[arg(short = 'd', long)]
    pub data: Option<String>,

    /// Read JSON from file(s), concatenated in argument order
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Stop at the first failing entity instead of recording per-entity results
    #[arg(long)]
    pub abort_on_error: bool,
}

#[derive(Args, Debug)]
pub struct ServerArgs {
    #[command(subcommand)]
    pub command: ServerCommands,
}

#[derive(Subcommand, Debug)]
pub enum ServerCommands {
    /// Create or update servers from JSON input
    Store {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Get one server by name or id
    Get { name_or_id: String },

    /// List servers
    List {
        /// Filter by text query
        #[arg(long)]
        query: Option<String>,

        /// Maximum number of results
        #[arg(long)]
        max: Option<usize>,
    },

    /// Delete one server by name or id
    Delete { name_or_id: String },

    /// Check that a server is reachable
    Ping { name_or_id: String },

    /// Halt a running server
    Halt { name_or_id: String },

    /// Start a halted server
    Start { name_or_id: String },
}

#[derive(Args, Debug)]
pub struct BucketArgs {
    #[command(subcommand)]
    pub command: BucketCommands,
}

#[derive(Subcommand, Debug)]
pub enum BucketCommands {
    /// Create buckets, reconciling indices for buckets that already exist
    Create {
        /// Inline JSON data: a single bucket definition or an array of them
        #[arg(short = 'd', long)]
        data: Option<String>,

        /// Read bucket definitions from file(s)
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Get one bucket by name
    Get { name: String },

    /// List buckets
    Dump {
        /// Page size hint forwarded to the remote
        #[arg(long)]
        max: Option<usize>,
    },

    /// Delete one bucket by name
    Delete { name: String },
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Bundle file to write (default: flowgate-export-<timestamp>.zip in the
    /// working directory)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Bundle file to import
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// How the remote should treat entities whose id already exists
    #[arg(long, value_enum, default_value = "fail")]
    pub on_conflict: OnConflictArg,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OnConflictArg {
    #[default]
    Fail,
    Ignore,
    Update,
}

impl OnConflictArg {
    pub fn to_policy(self) -> OnConflict {
        match self {
            Self::Fail => OnConflict::Fail,
            Self::Ignore => OnConflict::Ignore,
            Self::Update => OnConflict::Update,
        }
    }
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List profile names
    List,

    /// Show one profile
    Show { name: String },

    /// Create or update a profile
    Set {
        name: String,

        /// API key sent with every request
        #[arg(long)]
        api_key: Option<String>,

        /// Base URL of the core product
        #[arg(long)]
        core_url: Option<String>,

        /// Base URL of the ingestion product
        #[arg(long)]
        ingestion_url: Option<String>,

        /// Base URL of the queryflow product
        #[arg(long)]
        queryflow_url: Option<String>,

        /// Base URL of the staging product
        #[arg(long)]
        staging_url: Option<String>,
    },

    /// Remove a profile
    Remove { name: String },
}

pub struct AppContext {
    pub client: FlowgateClient,
    pub output: Output,
}

pub async fn run(cli: Cli) -> Result<()> {
    let output = Output::new(resolve_output_format(&cli), cli.output.clone());
    let client = build_client(&cli)?;
    let ctx = AppContext { client, output };

    match cli.command {
        Commands::Credential(args) => {
            entity::handle(&ctx, EntityKind::Credential, args.command).await
        }
        Commands::Secret(args) => entity::handle(&ctx, EntityKind::Secret, args.command).await,
        Commands::Server(args) => server::handle(&ctx, args).await,
        Commands::Label(args) => entity::handle(&ctx, EntityKind::Label, args.command).await,
        Commands::Seed(args) => entity::handle(&ctx, EntityKind::Seed, args.command).await,
        Commands::Bucket(args) => bucket::handle(&ctx, args).await,
        Commands::Export(args) => backup::handle_export(&ctx, args).await,
        Commands::Import(args) => backup::handle_import(&ctx, args).await,
        Commands::Profile(args) => profile::handle(&ctx, args),
    }
}

fn resolve_output_format(cli: &Cli) -> OutputFormat {
    if cli.quiet {
        OutputFormat::Quiet
    } else if cli.pretty {
        OutputFormat::Pretty
    } else {
        OutputFormat::Json
    }
}

fn build_client(cli: &Cli) -> Result<FlowgateClient> {
    let config = CliConfig::load()?;
    let mut profile = config.profile(&cli.profile)?;
    if let Some(url) = &cli.url {
        profile.core_url = Some(url.clone());
    }
    if let Some(api_key) = &cli.api_key {
        profile.api_key = Some(api_key.clone());
    }
    let client = FlowgateClient::with_config(profile.client_config())?;
    Ok(client)
}
