mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use orchestrator::{HttpOracle, Oracle, Orchestrator, ScriptedOracle};
use patterns_core::{Task, TaskStatus};
use server::{create_router, state::AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{AppConfig, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "agent-patterns")]
#[command(about = "Delegation, planning and reflection over a reasoning oracle", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to read.
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Answer every oracle call locally instead of contacting a provider.
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file.
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Start the HTTP API.
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Decompose a request into tasks and assign each one.
    Project {
        request: String,

        /// Run every task after assignment.
        #[arg(long)]
        execute: bool,
    },
    /// Generate a plan for a goal.
    Plan {
        goal: String,

        #[arg(long)]
        execute: bool,
    },
    /// Generate an answer and refine it.
    Reflect {
        query: String,

        #[arg(short, long)]
        iterations: Option<u32>,
    },
    /// Ask the assistant directly.
    Ask { query: String },
    /// Reason step by step and print the final answer.
    React {
        query: String,

        /// Also print the reasoning transcript.
        #[arg(long)]
        show_reasoning: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { force }) => init_config(&cli.config, force),
        Some(Commands::Serve { host, port }) => {
            let mut config = AppConfig::load(&cli.config)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config, cli.dry_run).await
        }
        Some(Commands::Project { request, execute }) => {
            let orchestrator = build_orchestrator(&cli.config, cli.dry_run)?;
            run_project(&orchestrator, &request, execute).await
        }
        Some(Commands::Plan { goal, execute }) => {
            let orchestrator = build_orchestrator(&cli.config, cli.dry_run)?;
            run_plan(&orchestrator, &goal, execute).await
        }
        Some(Commands::Reflect { query, iterations }) => {
            let orchestrator = build_orchestrator(&cli.config, cli.dry_run)?;
            let reflection = orchestrator.reflect(&query, iterations).await?;
            println!("{}", "Initial answer".bold());
            println!("{}", reflection.initial_output);
            println!();
            println!(
                "{}",
                format!("Refined answer ({} rounds)", reflection.iterations).bold()
            );
            println!("{}", reflection.reflected_output);
            Ok(())
        }
        Some(Commands::Ask { query }) => {
            let orchestrator = build_orchestrator(&cli.config, cli.dry_run)?;
            println!("{}", orchestrator.ask(&query).await?);
            Ok(())
        }
        Some(Commands::React {
            query,
            show_reasoning,
        }) => {
            let orchestrator = build_orchestrator(&cli.config, cli.dry_run)?;
            let response = orchestrator.react(&query).await?;
            if show_reasoning {
                println!("{}", response.transcript.dimmed());
                println!();
            }
            println!("{}", response.final_answer.bold());
            Ok(())
        }
        None => serve(AppConfig::load(&cli.config)?, cli.dry_run).await,
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!("Config already exists at {}", path.display());
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    let content = AppConfig::default().to_toml()?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Export your provider key (OPENAI_API_KEY by default)");
    println!("  2. Run 'agent-patterns serve' to start the API");
    Ok(())
}

fn build_oracle(config: &AppConfig, dry_run: bool) -> Result<Arc<dyn Oracle>> {
    if dry_run {
        tracing::info!("Dry run: oracle replies are generated locally");
        return Ok(Arc::new(ScriptedOracle::dry_run()));
    }

    let oracle_config = config.oracle_config();
    if oracle_config.api_key.is_none() {
        tracing::warn!(
            "{} is not set; requests go out without credentials",
            config.oracle.api_key_env
        );
    }
    tracing::info!(
        base_url = %oracle_config.base_url,
        model = %oracle_config.model,
        "Using chat completions oracle"
    );
    let oracle = HttpOracle::new(oracle_config).context("Failed to build oracle client")?;
    Ok(Arc::new(oracle))
}

fn build_orchestrator(path: &Path, dry_run: bool) -> Result<Orchestrator> {
    init_tracing("agent_patterns=warn,orchestrator=warn");
    let config = AppConfig::load(path)?;
    let oracle = build_oracle(&config, dry_run)?;
    Ok(Orchestrator::new(oracle).with_config(config.patterns))
}

async fn serve(config: AppConfig, dry_run: bool) -> Result<()> {
    init_tracing("agent_patterns=info,orchestrator=info,server=info,tower_http=info");

    let oracle = build_oracle(&config, dry_run)?;
    let state = AppState::with_config(oracle, config.patterns.clone());
    let _recorder = state.spawn_event_recorder();
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    println!();
    println!("Agent Patterns");
    println!("════════════════════════════════════════");
    println!();
    println!("  API Server:  http://{}", address);
    println!("  Swagger UI:  http://{}/swagger-ui", address);
    println!("  Events:      http://{}/api/events", address);
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app).await?;

    Ok(())
}

async fn run_project(orchestrator: &Orchestrator, request: &str, execute: bool) -> Result<()> {
    let created = orchestrator.create_project(request).await?;

    println!();
    println!("Project: {}", created.project_id);
    println!();
    print_tasks(&created.tasks);

    if execute {
        let execution = orchestrator.execute_all(created.project_id).await?;
        println!();
        for task in &execution.tasks {
            println!("{}", task.description().bold());
            println!("{}", task.result().unwrap_or_default());
            println!();
        }
    }
    Ok(())
}

async fn run_plan(orchestrator: &Orchestrator, goal: &str, execute: bool) -> Result<()> {
    let plan = orchestrator.create_plan(goal).await?;

    println!();
    println!("Plan: {}", plan.goal);
    for (i, step) in plan.steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }

    if execute {
        let execution = orchestrator.execute_plan(&plan.goal).await?;
        println!();
        for (step, result) in execution.steps.iter().zip(&execution.results) {
            println!("{}", step.bold());
            println!("{}", result);
            println!();
        }
    }
    Ok(())
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }

    println!("Tasks ({}):", tasks.len());
    for task in tasks {
        let status_icon = match task.status() {
            TaskStatus::Pending => "○".normal(),
            TaskStatus::Assigned => "◐".yellow(),
            TaskStatus::Completed => "●".green(),
        };
        let handler = task
            .handler()
            .map(|h| h.as_str())
            .unwrap_or("unassigned");
        println!(
            "  {} [{}] {}",
            status_icon,
            handler.cyan(),
            task.description()
        );
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}
