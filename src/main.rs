//! botforge CLI entry point

use botforge::{
    commands::{
        build_pipeline, cmd_delete, cmd_documents, cmd_ingest, cmd_init, cmd_query, cmd_respond,
        cmd_status, print_delete_result, print_documents, print_ingest_result, print_init,
        print_query_result, print_respond_result, print_status,
    },
    config::Config,
    error::Result,
    meta::MetaDb,
    respond::Personality,
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "botforge")]
#[command(version, about = "Multi-chatbot knowledge platform", long_about = None)]
struct Cli {
    /// Base directory for config and data (defaults to ~/.botforge)
    #[arg(short, long, global = true)]
    base_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize botforge configuration and database
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Ingest a document into a chatbot's knowledge base
    Ingest {
        /// Chatbot id
        chatbot_id: i64,

        /// Document id
        document_id: i64,

        /// Path to the document file
        file: PathBuf,

        /// Override format detection (plain, pdf, markdown)
        #[arg(long)]
        format: Option<String>,
    },

    /// Retrieve the most relevant chunks for a query
    Query {
        /// Chatbot id
        chatbot_id: i64,

        /// The search query
        query: String,

        /// Maximum number of chunks (defaults to query.default_k from config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Answer a query with a personality-shaped response
    Respond {
        /// Chatbot id
        chatbot_id: i64,

        /// The user query
        query: String,

        /// Friendliness (0-1)
        #[arg(long, default_value = "0.5")]
        friendliness: f32,

        /// Formality (0-1)
        #[arg(long, default_value = "0.5")]
        formality: f32,

        /// Creativity / sampling temperature (0-1)
        #[arg(long, default_value = "0.5")]
        creativity: f32,

        /// Chunks of context to retrieve (defaults to query.default_k from
        /// config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// List a chatbot's documents
    Documents {
        /// Chatbot id
        chatbot_id: i64,
    },

    /// Delete a chatbot's collection and document records
    Delete {
        /// Chatbot id
        chatbot_id: i64,
    },

    /// Show system status
    Status,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Init doesn't need an existing config
    if let Commands::Init { force } = cli.command {
        let config = cmd_init(cli.base_dir, force).await?;
        if cli.json {
            println!("{}", serde_json::json!({"initialized": config.paths.base_dir}));
        } else {
            print_init(&config);
        }
        return Ok(());
    }

    // Completions need no config/db either
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "botforge", &mut std::io::stdout());
        return Ok(());
    }

    // Load configuration and initialize components
    let config = Config::load_from(cli.base_dir)?;
    let db = MetaDb::connect(&config.paths.db_file).await?;
    db.init_schema().await?;
    let pipeline = build_pipeline(&config).await?;

    match cli.command {
        Commands::Init { .. } | Commands::Completions { .. } => unreachable!(),

        Commands::Ingest {
            chatbot_id,
            document_id,
            file,
            format,
        } => {
            let result = cmd_ingest(
                &db,
                &pipeline,
                chatbot_id,
                document_id,
                &file,
                format.as_deref(),
            )
            .await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_ingest_result(&result);
            }
        }

        Commands::Query {
            chatbot_id,
            query,
            top_k,
        } => {
            let k = top_k.unwrap_or(config.query.default_k);
            let result = cmd_query(&pipeline, chatbot_id, &query, k).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_query_result(&result);
            }
        }

        Commands::Respond {
            chatbot_id,
            query,
            friendliness,
            formality,
            creativity,
            top_k,
        } => {
            let personality = Personality::new(friendliness, formality, creativity)?;
            let k = top_k.unwrap_or(config.query.default_k);
            let result = cmd_respond(&pipeline, chatbot_id, &query, personality, k).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_respond_result(&result);
            }
        }

        Commands::Documents { chatbot_id } => {
            let documents = cmd_documents(&db, chatbot_id).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&documents)?);
            } else {
                print_documents(chatbot_id, &documents);
            }
        }

        Commands::Delete { chatbot_id } => {
            let result = cmd_delete(&db, &pipeline, chatbot_id).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_delete_result(&result);
            }
        }

        Commands::Status => {
            let report = cmd_status(&config, &db).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_status(&report);
            }
        }
    }

    Ok(())
}
