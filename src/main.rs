use clap::Parser;
use rerecord::cli::Options;
use rerecord::logging::DisplayLogger;
use rerecord::{record_episode, EnvStructure, Finalized, RandomPolicy, Y4mWriter};
use std::error::Error;
use tracing_subscriber::EnvFilter;
use yansi::Paint;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Options::parse();
    let config = opts.record_config()?;

    let env = config.build_env()?;
    let mut policy = RandomPolicy::new(env.action_space(), config.seed.wrapping_add(1));
    println!("Recording {} with {}", config.env_id, policy);

    let mut logger = DisplayLogger::new();
    let writer = Y4mWriter::new(config.fps);
    let outcome = record_episode(env, writer, &config, &mut policy, &mut logger)?;

    println!(
        "Episode finished: steps={}, score={}",
        outcome.episode.step_count, outcome.episode.total_reward
    );
    match &outcome.artifact {
        Finalized::Renamed { to, .. } => {
            println!("{} {}", Paint::green("Video saved as"), to.display());
        }
        Finalized::NotFound { folder } => {
            println!(
                "{} no video found in {}",
                Paint::yellow("warning:"),
                folder.display()
            );
        }
        Finalized::Failed { .. } => {
            return Err(outcome.artifact.to_string().into());
        }
    }
    Ok(())
}
