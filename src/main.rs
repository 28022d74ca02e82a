//! damista: play checkers against the computer in the terminal

use anyhow::Context;
use clap::Parser;
use damista::board::CaptureRule;
use damista::play::{run_play_loop, GameConfig};
use damista::search::{Difficulty, SearchParams};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Computer strength (medium unless a config file is given)
    #[arg(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Override the search depth of the chosen difficulty
    #[arg(long)]
    depth: Option<u8>,

    /// RNG seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Captures are optional instead of mandatory
    #[arg(long, default_value_t = false)]
    free_captures: bool,

    /// Per-move thinking limit in milliseconds (0 = none)
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// JSON file with search parameter overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `damista=debug` (RUST_LOG also works)
    #[arg(long)]
    log_level: Option<String>,
}

fn load_params(args: &Args) -> anyhow::Result<(Option<Difficulty>, SearchParams)> {
    let from_file = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let params: SearchParams = serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?;
            Some(params)
        }
        None => None,
    };

    // an explicit --difficulty beats the file; no file and no flag means medium
    let mut difficulty = match (args.difficulty, &from_file) {
        (Some(level), _) => Some(level),
        (None, Some(_)) => None,
        (None, None) => Some(Difficulty::Medium),
    };
    let mut params = from_file.unwrap_or_default();
    if let Some(level) = difficulty {
        params = params.with_difficulty(level);
    }

    if let Some(depth) = args.depth {
        params.max_depth = depth;
        difficulty = None;
    }
    if let Some(ms) = args.time_limit_ms {
        params.time_limit_ms = ms;
    }
    if let Some(seed) = args.seed {
        params.seed = Some(seed);
    }
    Ok((difficulty, params))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = &args.log_level {
        logger.parse_filters(level);
    }
    logger.init();

    let (difficulty, params) = load_params(&args)?;
    log::debug!("starting with {:?} {:?}", difficulty, params);

    let config = GameConfig {
        difficulty,
        params,
        capture_rule: if args.free_captures {
            CaptureRule::Free
        } else {
            CaptureRule::Forced
        },
        ..GameConfig::default()
    };

    run_play_loop(config).context("game loop failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_config(name: &str, json: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("damista-{}-{}.json", name, std::process::id()));
        std::fs::write(&path, json).unwrap();
        path
    }

    fn load(argv: &[&str]) -> (Option<Difficulty>, SearchParams) {
        let args = Args::parse_from(std::iter::once("damista").chain(argv.iter().copied()));
        load_params(&args).unwrap()
    }

    fn path_arg(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    #[test]
    fn no_flags_means_medium() {
        let (difficulty, params) = load(&[]);
        assert_eq!(difficulty, Some(Difficulty::Medium));
        assert_eq!(params, Difficulty::Medium.params());
    }

    #[test]
    fn config_alone_is_used_as_given() {
        let path = write_config("alone", r#"{"max_depth": 6, "weights": {"king": 2.5}}"#);
        let (difficulty, params) = load(&["--config", path_arg(&path)]);
        std::fs::remove_file(&path).ok();
        assert_eq!(difficulty, None);
        assert_eq!(params.max_depth, 6);
        assert_eq!(params.weights.king, 2.5);
    }

    #[test]
    fn difficulty_flag_beats_config_file() {
        let path = write_config("flag", r#"{"max_depth": 6, "seed": 8, "weights": {"king": 2.5}}"#);
        let (difficulty, params) = load(&["--config", path_arg(&path), "--difficulty", "hard"]);
        std::fs::remove_file(&path).ok();
        assert_eq!(difficulty, Some(Difficulty::Hard));
        assert_eq!(params.max_depth, 4);
        assert_eq!(params.seed, Some(8));
        assert_eq!(params.weights.king, 2.5);
    }

    #[test]
    fn depth_and_seed_flags_come_last() {
        let (difficulty, params) = load(&["-d", "easy", "--depth", "5", "--seed", "3", "--time-limit-ms", "40"]);
        assert_eq!(difficulty, None);
        assert_eq!(params.max_depth, 5);
        assert_eq!(params.seed, Some(3));
        assert_eq!(params.time_limit_ms, 40);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = Args::parse_from(["damista", "--config", "/nonexistent/damista.json"]);
        assert!(load_params(&args).is_err());
    }
}
