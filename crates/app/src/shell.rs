//! Line-oriented session that keeps one ingest form and one query form alive
//! across submissions.

use parent_retrieval_core::{
    render_query_response, IngestForm, QueryForm, RetrievalApi, DEFAULT_MAX_PARENTS,
    DEFAULT_TOP_CHILDREN,
};
use std::io;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

pub const HELP: &str = "\
commands:
  title <text>        set the document title (kept between ingests)
  text <text>         replace the document text
  append <text>       append a line to the document text
  file <path>         load the document text from a file
  ingest              send the document
  ask <question>      run a query with the current tuning
  top <n>             top child chunks (0 or invalid resets to 30)
  parents <n>         max parents in context (0 or invalid resets to 4)
  answer on|off       toggle answer generation
  show                print form state
  help                this text
  quit                leave the shell";

#[derive(Debug, PartialEq, Eq)]
pub enum ShellOutcome {
    Continue(String),
    Quit,
}

#[derive(Debug, Default)]
pub struct Shell {
    pub ingest: IngestForm,
    pub query: QueryForm,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn execute<A>(&mut self, api: &A, line: &str) -> ShellOutcome
    where
        A: RetrievalApi + ?Sized,
    {
        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(command, rest)| (command, rest.trim()))
            .unwrap_or((line, ""));

        let message = match command {
            "" => String::new(),
            "quit" | "exit" => return ShellOutcome::Quit,
            "help" => HELP.to_string(),
            "title" => {
                self.ingest.title = rest.to_string();
                format!("title set to “{rest}”")
            }
            "text" => {
                self.ingest.text = rest.to_string();
                format!("text set ({} chars)", self.ingest.text.chars().count())
            }
            "append" => {
                if !self.ingest.text.is_empty() {
                    self.ingest.text.push('\n');
                }
                self.ingest.text.push_str(rest);
                format!("text now {} chars", self.ingest.text.chars().count())
            }
            "file" => match std::fs::read_to_string(Path::new(rest)) {
                Ok(text) => {
                    self.ingest.text = text;
                    format!("loaded {} chars from {rest}", self.ingest.text.chars().count())
                }
                Err(error) => format!("error: cannot read {rest}: {error}"),
            },
            "ingest" => self.submit_ingest(api).await,
            "ask" => {
                self.query.query = rest.to_string();
                self.submit_query(api).await
            }
            "top" => {
                self.query.set_top_children(rest);
                format!("top child chunks: {}", self.query.top_children)
            }
            "parents" => {
                self.query.set_max_parents(rest);
                format!("max parents: {}", self.query.max_parents)
            }
            "answer" => match rest {
                "on" => {
                    self.query.generate_answer = true;
                    "answer generation on".to_string()
                }
                "off" => {
                    self.query.generate_answer = false;
                    "answer generation off".to_string()
                }
                _ => "usage: answer on|off".to_string(),
            },
            "show" => self.describe(),
            other => format!("unknown command: {other} (try `help`)"),
        };

        ShellOutcome::Continue(message)
    }

    async fn submit_ingest<A>(&mut self, api: &A) -> String
    where
        A: RetrievalApi + ?Sized,
    {
        match self.ingest.submit(api).await {
            Some(status) if status.is_success() => format!("ok: {status}"),
            Some(status) => format!("error: {status}"),
            None => "error: title and document text are required".to_string(),
        }
    }

    async fn submit_query<A>(&mut self, api: &A) -> String
    where
        A: RetrievalApi + ?Sized,
    {
        if !self.query.submit(api).await {
            return "error: question is required".to_string();
        }

        if let Some(error) = self.query.error() {
            return format!("error: {error}");
        }

        self.query
            .result()
            .map(render_query_response)
            .unwrap_or_default()
    }

    fn describe(&self) -> String {
        format!(
            "title: “{}”\ntext: {} chars\ntop child chunks: {} (default {})\nmax parents: {} (default {})\ngenerate answer: {}",
            self.ingest.title,
            self.ingest.text.chars().count(),
            self.query.top_children,
            DEFAULT_TOP_CHILDREN,
            self.query.max_parents,
            DEFAULT_MAX_PARENTS,
            self.query.generate_answer,
        )
    }
}

pub async fn run<A>(api: &A) -> io::Result<()>
where
    A: RetrievalApi + ?Sized,
{
    let reader = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{HELP}\n").as_bytes()).await?;
    run_session(api, reader, stdout).await
}

/// Drives a shell over any line source until `quit` or end of input.
pub async fn run_session<A, R, W>(api: &A, reader: R, mut writer: W) -> io::Result<()>
where
    A: RetrievalApi + ?Sized,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut shell = Shell::new();
    let mut lines = reader.lines();

    writer.write_all(b"> ").await?;
    writer.flush().await?;

    while let Some(line) = lines.next_line().await? {
        match shell.execute(api, &line).await {
            ShellOutcome::Quit => break,
            ShellOutcome::Continue(message) => {
                if !message.is_empty() {
                    writer.write_all(message.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                }
            }
        }
        writer.write_all(b"> ").await?;
        writer.flush().await?;
    }

    Ok(())
}
