use anyhow::{anyhow, Context, Result};
use burn::config::Config;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rl_agent_config::rl_algorithm::base::{run_episodes, RunSummary};
use rl_agent_config::rl_env::config::EnvConfig;
use rl_agent_config::rl_env::unittest_env::UnittestEnvironment;
use rl_agent_config::utils::{RngStream, SeedContext};
use rl_agent_config::{DryRunEngine, PpoConfig, ProximalPolicyOptimization, TrainingEngine};

/// Compile a PPO agent spec into the model config handed to the training engine.
#[derive(Parser, Debug)]
#[command(name = "rl_agent_config", version)]
struct Cli {
    /// JSON agent spec
    #[arg(long)]
    spec: PathBuf,

    /// Override the spec's random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Pretty-print the compiled model config
    #[arg(long)]
    pretty: bool,

    /// Run this many episodes on a synthetic environment after compiling
    #[arg(long, default_value_t = 0)]
    dry_run_episodes: usize,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the agent spec at `path`, with `seed` replacing its seed when given.
fn load_spec(path: &Path, seed: Option<u64>) -> Result<PpoConfig> {
    let mut spec = PpoConfig::load(path)
        .map_err(|err| anyhow!("failed to load {}: {:?}", path.display(), err))?;
    if seed.is_some() {
        spec.seed = seed;
    }
    return Ok(spec);
}

fn render_model_config(agent: &ProximalPolicyOptimization<DryRunEngine>, pretty: bool) -> Result<String> {
    let model_config = agent.engine().config();
    let json = if pretty {
        serde_json::to_string_pretty(model_config)?
    } else {
        serde_json::to_string(model_config)?
    };
    return Ok(json);
}

fn dry_run(
    agent: &mut ProximalPolicyOptimization<DryRunEngine>,
    num_episodes: usize,
) -> Result<RunSummary> {
    let seeds = SeedContext::new(agent.spec().seed);
    let env_config = EnvConfig::new().with_max_episode_timesteps(agent.spec().max_episode_timesteps);
    let mut env = UnittestEnvironment::new(
        agent.spec().states.clone(),
        agent.spec().actions.clone(),
        env_config,
        seeds.rng(RngStream::Environment),
    )
    .context("failed to create environment")?;
    let summary = run_episodes(agent.engine_mut(), &mut env, num_episodes)?;
    return Ok(summary);
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let spec = load_spec(&cli.spec, cli.seed)?;
    let mut agent = ProximalPolicyOptimization::<DryRunEngine>::new(spec)?;
    println!("{}", render_model_config(&agent, cli.pretty)?);

    if cli.dry_run_episodes > 0 {
        let summary = dry_run(&mut agent, cli.dry_run_episodes)?;
        let mean_reward =
            summary.episode_rewards.iter().sum::<f32>() / summary.episodes.max(1) as f32;
        info!(
            "episodes={} timesteps={} updates={} mean_reward={:.3}",
            summary.episodes,
            summary.timesteps,
            summary.updates.len(),
            mean_reward
        );
    }
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_spec(name: &str, spec: &PpoConfig) -> PathBuf {
        let path = std::env::temp_dir().join(format!("rl_agent_config_cli_{name}.json"));
        spec.save(&path).unwrap();
        path
    }

    fn spec() -> PpoConfig {
        PpoConfig {
            seed: Some(5),
            ..PpoConfig::new(
                UnittestEnvironment::default_states(),
                UnittestEnvironment::default_actions(),
                5,
                2,
            )
        }
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "rl_agent_config",
            "--spec",
            "agent.json",
            "--seed",
            "3",
            "--pretty",
            "--dry-run-episodes",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.spec, PathBuf::from("agent.json"));
        assert_eq!(cli.seed, Some(3));
        assert!(cli.pretty);
        assert_eq!(cli.dry_run_episodes, 4);

        let cli = Cli::try_parse_from(["rl_agent_config", "--spec", "agent.json"]).unwrap();
        assert_eq!(cli.seed, None);
        assert!(!cli.pretty);
        assert_eq!(cli.dry_run_episodes, 0);
        assert!(Cli::try_parse_from(["rl_agent_config"]).is_err());
    }

    #[test]
    fn test_load_spec_seed_override() {
        let path = write_spec("seed", &spec());
        let kept = load_spec(&path, None).unwrap();
        let replaced = load_spec(&path, Some(9)).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(kept, spec());
        assert_eq!(replaced.seed, Some(9));
        assert!(load_spec(Path::new("/nonexistent/agent.json"), None).is_err());
    }

    #[test]
    fn test_compile_and_dry_run() {
        let path = write_spec("dry_run", &spec());
        let loaded = load_spec(&path, Some(1)).unwrap();
        std::fs::remove_file(&path).ok();
        let mut agent = ProximalPolicyOptimization::<DryRunEngine>::new(loaded).unwrap();

        let compact = render_model_config(&agent, false).unwrap();
        let pretty = render_model_config(&agent, true).unwrap();
        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        let json: serde_json::Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(json["seed"], 1);
        assert_eq!(json, serde_json::from_str::<serde_json::Value>(&pretty).unwrap());

        let summary = dry_run(&mut agent, 4).unwrap();
        assert_eq!(summary.episodes, 4);
        assert_eq!(summary.updates.len(), 2);
    }
}
