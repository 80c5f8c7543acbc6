//! Maestro Console CLI
//!
//! Entry point for the `maestro` command-line tool.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};

use maestro_console::{monitor, submit, ConsoleConfig, Sequencer, SubmitRequest};

/// Snapshot poll interval for the live run view
const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Parser)]
#[command(name = "maestro")]
#[command(about = "Simulated multi-agent build orchestration console", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit an operator prompt to the mock gateway
    Submit {
        /// Operator prompt (default: the configured prompt)
        #[arg(long, short = 'p')]
        prompt: Option<String>,

        /// Path to console config file (default: maestro.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Track a simulated build run to completion
    Run {
        /// Run token (container id); minted via the gateway when omitted
        #[arg(long, short = 't')]
        token: Option<String>,

        /// Path to console config file (default: maestro.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Print the final snapshot as JSON instead of the live views
        #[arg(long)]
        json: bool,
    },

    /// Print the stage table
    Stages {
        /// Path to a stage table file (default: built-in demo table)
        #[arg(long, short = 's')]
        stages: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Submit { prompt, config, json } => {
            run_submit(prompt, config, json).await;
        }
        Commands::Run { token, config, json } => {
            run_track(token, config, json).await;
        }
        Commands::Stages { stages, json } => {
            run_stages(stages, json);
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "maestro_console=warn".into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(path: Option<PathBuf>) -> ConsoleConfig {
    match ConsoleConfig::load_or_default(path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    }
}

async fn run_submit(prompt: Option<String>, config_path: Option<PathBuf>, json_output: bool) {
    let config = load_config(config_path);
    let prompt = prompt.unwrap_or(config.prompt);
    let request = SubmitRequest::new(&prompt);

    let response = submit(&request).await;

    if json_output {
        match response.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{} {}", response.status, response.status_text);
        println!("  Status:    {}", response.data.status);
        println!("  Message:   {}", response.data.message);
        println!("  Container: {}", response.data.container_id);
        println!("  Monitor:   {}", response.data.monitor_url);
        println!();
        println!(
            "Track the build with: maestro run --token {}",
            response.data.container_id
        );
    }
}

async fn run_track(token: Option<String>, config_path: Option<PathBuf>, json_output: bool) {
    let config = load_config(config_path);

    let table = match config.stage_table() {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Error loading stage table: {}", e);
            process::exit(1);
        }
    };

    // Mint a token through the gateway when none is supplied, mirroring the
    // console flow of submit-then-track.
    let token = match token {
        Some(token) => token,
        None => {
            let response = submit(&SubmitRequest::new(&config.prompt)).await;
            eprintln!("Minted run token: {}", response.data.container_id);
            response.data.container_id
        }
    };

    let mut sequencer = Sequencer::new(table, config.handover());
    if let Err(e) = sequencer.start(&token) {
        eprintln!("Error starting run: {}", e);
        process::exit(1);
    }

    // Poll snapshots, streaming new activity-log lines as they fire.
    let mut printed = 0;
    let snapshot = loop {
        let snapshot = sequencer.snapshot();
        for line in &snapshot.log[printed..] {
            if !json_output {
                println!("> {}", line);
            }
        }
        printed = snapshot.log.len();

        if !snapshot.running {
            break snapshot;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    };

    if json_output {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    println!();
    println!("{}", monitor::render_status_line(&snapshot));
    println!();
    println!("Stages:");
    print!("{}", monitor::render_stage_chart(sequencer.table(), &snapshot));
    println!();
    println!("handover.json:");
    match monitor::render_handover(&snapshot) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing handover: {}", e);
            process::exit(1);
        }
    }
}

fn run_stages(stages_path: Option<PathBuf>, json_output: bool) {
    let table = match stages_path {
        Some(path) => match maestro_console::StageTable::from_file(&path) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("Error loading stage table: {}", e);
                process::exit(1);
            }
        },
        None => maestro_console::StageTable::default_build(),
    };

    if json_output {
        match serde_json::to_string_pretty(&table) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    println!("Stage table ({} steps):\n", table.len());
    let offsets = table.offsets();
    for (index, step) in table.steps().iter().enumerate() {
        println!(
            "  {}. t+{:>6}ms  {:<18} {}",
            index + 1,
            offsets[index].as_millis(),
            step.stage,
            step.status
        );
    }
    println!(
        "\nTotal simulated duration: {}ms",
        table.total_duration().as_millis()
    );
}
