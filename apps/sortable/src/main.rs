use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{
    GradingClient, HttpGradingClient, SubmissionController, SubmitOutcome,
    UnconfiguredGradingClient,
};
use shared::domain::Indicator;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;

use commands::{parse_command, Command, HELP};
use config::{load_settings, parse_indicator, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
struct Args {
    /// Grading handler that receives the submitted order.
    #[arg(long)]
    handler_url: Option<String>,
    /// Item text in rendered order; repeat for each item.
    #[arg(long = "item")]
    items: Vec<String>,
    /// The submit control was rendered disabled (answer already final).
    #[arg(long)]
    locked: bool,
    #[arg(long)]
    remaining_attempts: Option<i64>,
    /// Position the previous result marked incorrect; repeatable.
    #[arg(long = "marked")]
    marked: Vec<usize>,
    /// Result indicator shown when the widget was rendered.
    #[arg(long, value_parser = parse_indicator)]
    indicator: Option<Indicator>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    if let Some(url) = args.handler_url {
        settings.handler_url = Some(url);
    }
    if !args.items.is_empty() {
        settings.items = args.items;
    }
    if let Some(remaining) = args.remaining_attempts {
        settings.remaining_attempts = remaining;
    }

    let grader: Arc<dyn GradingClient> = match settings.handler_url.as_deref() {
        Some(url) => {
            let client = HttpGradingClient::from_handler_url(url)?;
            info!(handler_url = %client.handler_url(), "grading endpoint configured");
            Arc::new(client)
        }
        None => {
            warn!("no grading handler url configured; submissions will fail");
            Arc::new(UnconfiguredGradingClient)
        }
    };

    let environment = settings.widget_environment(args.locked, &args.marked, args.indicator);
    let controller = SubmissionController::new(environment, grader, settings.controller_settings());

    let mut events = controller.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            println!("* {}", render::describe_event(&event));
        }
    });

    print!("{}", render::render_view(&controller.view().await));
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err:#}");
                continue;
            }
        };

        match command {
            Command::Move { from, to } => {
                if let Err(err) = controller.reorder(from, to).await {
                    println!("cannot move: {err}");
                }
            }
            Command::Submit => {
                let controller = Arc::clone(&controller);
                tokio::spawn(async move {
                    match controller.submit().await {
                        Ok(SubmitOutcome::Correct(_)) => println!("graded: correct"),
                        Ok(SubmitOutcome::Incorrect(_)) => println!("graded: incorrect"),
                        Ok(SubmitOutcome::Failed(message)) => {
                            println!("submission failed: {message}")
                        }
                        Err(err) => println!("cannot submit: {err}"),
                    }
                });
            }
            Command::Show => print!("{}", render::render_view(&controller.view().await)),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    Ok(())
}
