use std::io::{stdout, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use covergen::client::history::HistoryStore;
use covergen::client::session::{GenerationSession, SessionEvent, SessionState};
use covergen::client::transport::HttpTransport;
use covergen::client::JobAssistant;
use covergen::config::ClientConfig;
use covergen::extraction;
use covergen::models::application::Application;
use covergen::models::generation::GenerateRequest;
use covergen::models::style::{Length, Tone};
use covergen::telemetry;

const SUMMARY_CHARS: usize = 50;

#[derive(Parser)]
#[command(author, version, about = "Generate tailored cover letters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Generation endpoint URL
    #[arg(long)]
    url: Option<String>,

    /// Path of the local application history
    #[arg(long)]
    history: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a cover letter and record it in the history
    Generate {
        /// File holding the job description
        #[arg(long)]
        job: PathBuf,

        /// CV file (.pdf, .docx, .txt or .md)
        #[arg(long)]
        cv: PathBuf,

        /// Professional, Friendly or Concise
        #[arg(long, default_value = "Professional")]
        tone: String,

        /// Short, Medium or Long
        #[arg(long, default_value = "Medium")]
        length: String,

        /// Also write the finished letter to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the most recent applications
    History,
    /// Print one stored application
    Show {
        /// Application id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.url {
        config.generate_url = url;
    }
    if let Some(path) = cli.history {
        config.history_path = path;
    }

    telemetry::init(&config.rust_log, env!("CARGO_CRATE_NAME"));

    let history = HistoryStore::load(&config.history_path);

    match cli.command {
        Commands::Generate {
            job,
            cv,
            tone,
            length,
            out,
        } => {
            let job_description = std::fs::read_to_string(&job)
                .with_context(|| format!("Failed to read job description {}", job.display()))?;
            let resume = extraction::extract_file(&cv)?;
            let request =
                GenerateRequest::new(job_description, resume, Tone::from(tone), Length::from(length));

            let transport = HttpTransport::new(config.generate_url.clone())?;
            let mut assistant = JobAssistant::new(transport, history);
            generate(&mut assistant, request, out).await?;
        }
        Commands::History => {
            let recent = history.recent();
            if recent.is_empty() {
                println!("No applications yet.");
            }
            for app in recent {
                print_summary(app);
            }
        }
        Commands::Show { id } => {
            let app = history
                .get(&id)
                .with_context(|| format!("No application with id {id}"))?;
            print_summary(app);
            println!("\n{}", app.cover_letter);
        }
    }

    Ok(())
}

async fn generate(
    assistant: &mut JobAssistant<HttpTransport>,
    request: GenerateRequest,
    out: Option<PathBuf>,
) -> Result<()> {
    let mut session = GenerationSession::new(request);
    let mut events = session.subscribe();

    let printer = tokio::spawn(async move {
        let mut stdout = stdout();
        while let Some(event) = events.recv().await {
            match event {
                SessionEvent::State(SessionState::Submitting) => eprintln!("Generating..."),
                SessionEvent::State(SessionState::Streaming { fit_score }) => {
                    eprintln!("Fit score: {fit_score}%\n");
                }
                SessionEvent::Delta(text) => {
                    print!("{text}");
                    let _ = stdout.flush();
                }
                SessionEvent::State(_) => {}
            }
        }
        println!();
    });

    let outcome = assistant.generate(&mut session).await;
    drop(session);
    printer.await?;

    match outcome? {
        Some(app) => {
            info!("Saved application {}", app.id);
            eprintln!("Saved as {}", app.id);
            if let Some(path) = out {
                std::fs::write(&path, &app.cover_letter)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("Written to {}", path.display());
            }
        }
        None => eprintln!("The model returned no text; nothing was saved."),
    }
    Ok(())
}

fn print_summary(app: &Application) {
    println!(
        "{}  {}  {:>3}%  {}/{}  {}",
        app.id,
        app.date.format("%Y-%m-%d %H:%M"),
        app.fit_score.value(),
        app.tone.as_str(),
        app.length.as_str(),
        app.summary(SUMMARY_CHARS)
    );
}
