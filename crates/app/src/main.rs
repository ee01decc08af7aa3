mod shell;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use parent_retrieval_core::{
    load_folder_documents, render_query_response, ClientConfig, HttpRetrievalClient, IngestForm,
    IngestRequest, IngestStatus, QueryForm, RetrievalApi, BASE_URL_ENV, DEFAULT_BASE_URL,
    DEFAULT_MAX_PARENTS, DEFAULT_ORIGIN, DEFAULT_TOP_CHILDREN, INGEST_FAILED, ORIGIN_ENV,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pdr", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Retrieval API base URL. Relative paths resolve against --origin.
    #[arg(long, global = true, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Origin used to resolve a relative base URL.
    #[arg(long, global = true, env = ORIGIN_ENV, default_value = DEFAULT_ORIGIN)]
    origin: String,

    /// Request timeout in seconds. Unset means requests never time out.
    #[arg(long, global = true, env = "PDR_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest one document as parent sections and child chunks.
    Ingest {
        /// Document title.
        #[arg(long)]
        title: String,
        /// Document text.
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,
        /// Read the document text from a file.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Ingest every .txt/.md file under a folder in a single request.
    IngestDir {
        /// Folder scanned recursively.
        #[arg(long)]
        folder: PathBuf,
    },
    /// Run a parent-aware query and print child hits, parent sections and the answer.
    Query {
        /// Question to ask.
        #[arg(long)]
        question: String,
        /// Number of child chunks to retrieve; 0 or invalid falls back to the default.
        #[arg(long, default_value_t = DEFAULT_TOP_CHILDREN.to_string())]
        top_children: String,
        /// Maximum parent sections in context; 0 or invalid falls back to the default.
        #[arg(long, default_value_t = DEFAULT_MAX_PARENTS.to_string())]
        max_parents: String,
        /// Skip answer generation.
        #[arg(long, default_value_t = false)]
        no_answer: bool,
        /// Print the raw response as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Check that the backend is up.
    Health,
    /// Interactive session keeping both forms between submissions.
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::resolve(&cli.base_url, &cli.origin)?
        .with_timeout(cli.timeout_secs.map(Duration::from_secs));
    info!(
        version = app_version,
        base_url = %config.base_url,
        started_at = %Utc::now().to_rfc3339(),
        "pdr boot"
    );
    let client = HttpRetrievalClient::new(config)?;

    match cli.command {
        Command::Ingest { title, text, file } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, None) => String::new(),
            };

            let mut form = IngestForm::new();
            form.title = title;
            form.text = text;

            let Some(status) = form.submit(&client).await else {
                bail!("title and document text must not be blank");
            };
            if !status.is_success() {
                bail!("{status}");
            }
            println!("{status}");
        }
        Command::IngestDir { folder } => {
            let batch = load_folder_documents(&folder)?;

            for skipped in &batch.skipped_files {
                warn!(path = %skipped.path.display(), reason = %skipped.reason, "skipped document");
            }
            if batch.documents.is_empty() {
                bail!("no ingestible documents in {}", folder.display());
            }

            info!(folder = %folder.display(), documents = batch.documents.len(), "ingesting folder");
            let request = IngestRequest {
                documents: batch.documents,
            };
            let response = client
                .ingest(&request)
                .await
                .map_err(|error| anyhow::anyhow!(error.user_message(INGEST_FAILED)))?;

            println!(
                "{} ({} document(s))",
                IngestStatus::from(response),
                request.documents.len()
            );
        }
        Command::Query {
            question,
            top_children,
            max_parents,
            no_answer,
            json,
        } => {
            let mut form = QueryForm::new();
            form.query = question;
            form.set_top_children(&top_children);
            form.set_max_parents(&max_parents);
            form.generate_answer = !no_answer;

            if !form.submit(&client).await {
                bail!("question must not be blank");
            }
            if let Some(error) = form.error() {
                bail!("{error}");
            }

            if let Some(result) = form.result() {
                if json {
                    println!("{}", serde_json::to_string_pretty(result)?);
                } else {
                    print!("{}", render_query_response(result));
                }
            }
        }
        Command::Health => {
            let health = client.health().await?;
            println!("status: {}", health.status);
            if !health.is_ok() {
                bail!("backend reported status {}", health.status);
            }
        }
        Command::Shell => {
            shell::run(&client).await?;
        }
    }

    Ok(())
}
