//! CLI entrypoint for colloquy
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use colloquy_application::{
    NoDiscussionLogger, PanelDeps, PanelNetwork, ThrottledGateway, build_groups, generate_personas,
};
use colloquy_domain::{Agent, Model, PanelPrompt, ResearchBounds};
use colloquy_infrastructure::{
    ConfigLoader, DuckDuckGoSearch, FileConfig, HttpContentFetcher, JsonlDiscussionLogger,
    OpenAiGateway,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Multi-agent panel discussions with shared insights and deep research
#[derive(Parser, Debug)]
#[command(name = "colloquy", version, about)]
struct Cli {
    /// The discussion topic or problem statement
    topic: Option<String>,

    /// Read the topic from a file (appended topic text follows it)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Total number of agents across all groups
    #[arg(long)]
    agents: Option<usize>,

    /// Number of concurrent discussion groups
    #[arg(long)]
    groups: Option<usize>,

    /// Discussion rounds before the final report
    #[arg(long)]
    rounds: Option<usize>,

    /// Turns per group per round before insights are shared
    #[arg(long)]
    steps: Option<usize>,

    /// Comma-separated model names, assigned to agents round-robin
    #[arg(long, value_delimiter = ',')]
    models: Option<Vec<String>>,

    /// Parallel search queries per research level
    #[arg(long)]
    research_breadth: Option<usize>,

    /// Recursive research levels
    #[arg(long)]
    research_depth: Option<usize>,

    /// Model for research passes (defaults to the agent's own model)
    #[arg(long)]
    research_model: Option<String>,

    /// Generate a distinct persona per agent instead of the shared one
    #[arg(long)]
    generate_personas: bool,

    /// Discussion event log path (JSONL)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Fold CLI flags over the file-derived configuration.
    fn apply_to(&self, config: &mut FileConfig) {
        if let Some(agents) = self.agents {
            config.panel.agents = agents;
        }
        if let Some(groups) = self.groups {
            config.panel.groups = groups;
        }
        if let Some(rounds) = self.rounds {
            config.panel.rounds = rounds;
        }
        if let Some(steps) = self.steps {
            config.panel.steps = steps;
        }
        if let Some(models) = &self.models {
            config.panel.models = models.clone();
        }
        if let Some(breadth) = self.research_breadth {
            config.research.breadth = breadth;
        }
        if let Some(depth) = self.research_depth {
            config.research.depth = depth;
        }
        if let Some(model) = &self.research_model {
            config.research.model = Some(model.clone());
        }
        if self.generate_personas {
            config.panel.generate_personas = true;
        }
        if let Some(path) = &self.log_file {
            config.log.file = path.to_string_lossy().into_owned();
        }
    }

    /// Resolve the topic from the file and/or positional argument.
    fn resolve_topic(&self) -> Result<String> {
        match (&self.file, &self.topic) {
            (Some(path), topic) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("could not read topic file {}", path.display()))?;
                Ok(match topic {
                    Some(extra) => format!("{}\n\n{}", contents, extra),
                    None => contents,
                })
            }
            (None, Some(topic)) => Ok(topic.clone()),
            (None, None) => bail!("Provide a topic, or a topic file via --file"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?;
    cli.apply_to(&mut config);
    config.validate().context("invalid configuration")?;

    let topic = cli.resolve_topic()?;

    info!(
        agents = config.panel.agents,
        groups = config.panel.groups,
        rounds = config.panel.rounds,
        steps = config.panel.steps,
        "Starting colloquy"
    );

    // === Dependency Injection ===
    let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
    let base_url = config
        .api
        .base_url
        .clone()
        .or_else(|| std::env::var("OPENAI_API_URL").ok());
    let gateway = Arc::new(ThrottledGateway::new(OpenAiGateway::new(
        api_key, base_url,
    )?));

    let logger: Arc<dyn colloquy_application::DiscussionLogger> =
        match JsonlDiscussionLogger::new(&config.log.file) {
            Some(logger) => {
                info!(path = %logger.path().display(), "Writing discussion events");
                Arc::new(logger)
            }
            None => {
                warn!("Discussion log unavailable, events will not be recorded");
                Arc::new(NoDiscussionLogger)
            }
        };

    let deps = PanelDeps::new(
        gateway,
        Arc::new(DuckDuckGoSearch::new()),
        Arc::new(HttpContentFetcher::new()),
        logger,
    );

    let models: Vec<Model> = config
        .panel
        .models
        .iter()
        .map(|s| Model::from(s.as_str()))
        .collect();
    let summary_model = models.first().cloned().unwrap_or_default();
    let research_model = config
        .research
        .model
        .as_deref()
        .map(Model::from);
    let bounds = ResearchBounds::new(config.research.breadth, config.research.depth);

    let personas = if config.panel.generate_personas {
        generate_personas(&deps, &summary_model, &topic, config.panel.agents).await
    } else {
        vec![PanelPrompt::default_persona().to_string(); config.panel.agents]
    };

    let agents: Vec<Agent> = personas
        .into_iter()
        .enumerate()
        .map(|(i, persona)| {
            Agent::new(
                format!("agent-{}", i).as_str(),
                models[i % models.len()].clone(),
                persona,
                config.panel.history_limit,
                bounds,
                research_model.clone(),
            )
        })
        .collect();

    let sessions = build_groups(
        agents,
        config.panel.groups,
        &topic,
        bounds,
        research_model.unwrap_or_else(|| summary_model.clone()),
    )?;

    let network = PanelNetwork::new(deps, sessions, summary_model);
    let (report, revised) = network
        .start_conversations(&topic, config.panel.rounds, config.panel.steps)
        .await?;

    println!("Final Report:\n\n{}\n", report);
    println!("Revised Report:\n\n{}", revised);

    Ok(())
}
