use std::io::{self, Read};
use std::path::PathBuf;
use std::{fs, process};

use anyhow::{Context, Result};
use boj_jira::config::parse_labels;
use boj_jira::message::{handle, scrape, Request, Response};
use boj_jira::{ApiFlavor, JiraClient, TrackerConfig};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "boj-jira", about = "File Baekjoon problems as Jira issues")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a problem page and print a preview
    Scrape {
        url: String,
        /// Read the page from a saved HTML file instead of downloading it
        #[arg(long)]
        html: Option<PathBuf>,
        /// Print the full record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Scrape a problem page and file it as an issue, reusing an existing one if found
    Create {
        url: String,
        #[arg(long)]
        html: Option<PathBuf>,
        /// Open the issue in a browser afterwards
        #[arg(long)]
        open: bool,
    },
    /// Show or change the tracker settings
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Answer one JSON request from stdin on stdout
    Handle,
}

#[derive(Subcommand)]
enum ConfigCommand {
    Show,
    Set(SetArgs),
}

#[derive(Args)]
struct SetArgs {
    #[arg(long)]
    base_url: Option<String>,
    /// `dc` or `cloud`
    #[arg(long)]
    flavor: Option<ApiFlavor>,
    #[arg(long)]
    project: Option<String>,
    #[arg(long)]
    issue_type: Option<String>,
    #[arg(long)]
    user: Option<String>,
    #[arg(long)]
    token: Option<String>,
    /// Custom field storing the problem number, e.g. customfield_10100
    #[arg(long)]
    number_field: Option<String>,
    /// Single-choice custom field storing the tier name
    #[arg(long)]
    level_field: Option<String>,
    /// Comma separated default labels
    #[arg(long)]
    labels: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => TrackerConfig::default_path()?,
    };
    let config = TrackerConfig::load(&config_path)?;

    match cli.command {
        Commands::Scrape { url, html, json } => {
            let problem = scrape(&url, read_html(html.as_ref())?).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&problem)?);
            } else {
                print!("{}", problem.preview());
            }
        }
        Commands::Create { url, html, open } => {
            let problem = scrape(&url, read_html(html.as_ref())?).await?;
            let issue = JiraClient::new(config).resolve(&problem).await?;
            if issue.existed {
                println!("Already exists: {} {}", issue.key, issue.url);
            } else {
                println!("Created: {} {}", issue.key, issue.url);
            }
            if open {
                open::that(&issue.url).with_context(|| format!("open {}", issue.url))?;
            }
        }
        Commands::Config(ConfigCommand::Show) => {
            println!("# {}", config_path.display());
            println!("{config}");
        }
        Commands::Config(ConfigCommand::Set(args)) => {
            let config = apply(config, args);
            config.save(&config_path)?;
            info!(path = %config_path.display(), "saved");
        }
        Commands::Handle => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            let response = match Request::from_json(&input) {
                Ok(request) => handle(request, &config).await,
                Err(err) => Response::Error {
                    error: err.to_string(),
                },
            };
            println!("{}", response.to_json()?);
            if matches!(response, Response::Error { .. }) {
                process::exit(1);
            }
        }
    }

    Ok(())
}

fn read_html(path: Option<&PathBuf>) -> Result<Option<String>> {
    path.map(|path| fs::read_to_string(path).with_context(|| format!("read {}", path.display())))
        .transpose()
}

fn apply(mut config: TrackerConfig, args: SetArgs) -> TrackerConfig {
    if let Some(v) = args.base_url {
        config.base_url = v;
    }
    if let Some(v) = args.flavor {
        config.api_flavor = v;
    }
    if let Some(v) = args.project {
        config.project_key = v;
    }
    if let Some(v) = args.issue_type {
        config.issue_type = v;
    }
    if let Some(v) = args.user {
        config.auth_user = v;
    }
    if let Some(v) = args.token {
        config.auth_token = v;
    }
    if let Some(v) = args.number_field {
        config.problem_number_field = Some(v);
    }
    if let Some(v) = args.level_field {
        config.level_field = Some(v);
    }
    if let Some(v) = args.labels {
        config.default_labels = parse_labels(&v);
    }
    config.normalized()
}
