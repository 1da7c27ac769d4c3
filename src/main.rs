use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use slide_2048::config::GameConfig;
use slide_2048::engine::RngSource;
use slide_2048::expectimax::{Expectimax, ExpectimaxParallel, MoveRecommender};
use slide_2048::game::Game;
use slide_2048::render::{BoardSnapshot, JsonLinesRenderer, Outcome, Renderer, TextRenderer};

#[derive(Debug, Parser)]
#[command(name = "slide-2048", about = "Play a sliding-tile merge game with the expectimax agent")]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid dimension
    #[arg(long)]
    size: Option<usize>,

    /// Winning piece value
    #[arg(long)]
    target: Option<u64>,

    /// Search depth (max and chance levels both count)
    #[arg(long)]
    depth: Option<u32>,

    /// Seed for reproducible games (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Use the rayon-parallel agent
    #[arg(long)]
    parallel: bool,

    /// Stop after this many moves
    #[arg(long)]
    max_moves: Option<u64>,

    /// Emit JSON lines instead of the text grid
    #[arg(long)]
    json: bool,

    /// Show a status spinner instead of printing every board
    #[arg(long)]
    quiet: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Spinner status line for `--quiet` runs.
struct SpinnerRenderer {
    pb: ProgressBar,
}

impl SpinnerRenderer {
    fn new() -> anyhow::Result<Self> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} | Moves: {msg}")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Ok(SpinnerRenderer { pb })
    }
}

impl Renderer for SpinnerRenderer {
    fn render(&mut self, snapshot: &BoardSnapshot) -> slide_2048::Result<()> {
        self.pb.set_message(format!(
            "{} | score: {} | max tile: {}",
            snapshot.moves,
            snapshot.score,
            snapshot.max_value()
        ));
        Ok(())
    }

    fn finish(&mut self, _outcome: Outcome, _snapshot: &BoardSnapshot) -> slide_2048::Result<()> {
        self.pb.finish_and_clear();
        Ok(())
    }
}

impl Drop for SpinnerRenderer {
    fn drop(&mut self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}

fn build_config(args: &Args) -> anyhow::Result<GameConfig> {
    let mut cfg = match &args.config {
        Some(path) => GameConfig::from_json_path(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(size) = args.size {
        cfg.size = size;
    }
    if let Some(target) = args.target {
        cfg.target_value = target;
    }
    if let Some(depth) = args.depth {
        cfg.search.depth = depth;
    }
    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let cfg = build_config(&args)?;
    let rng = match args.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let mut agent: Box<dyn MoveRecommender> = if args.parallel {
        Box::new(ExpectimaxParallel::with_config(cfg.agent_config()))
    } else {
        Box::new(Expectimax::with_config(cfg.agent_config()))
    };

    let start = Instant::now();
    let mut game = Game::new(cfg, rng)?;
    let renderer: Box<dyn Renderer> = if args.json {
        Box::new(JsonLinesRenderer::new(io::stdout()))
    } else if args.quiet {
        Box::new(SpinnerRenderer::new()?)
    } else {
        Box::new(TextRenderer::new(io::stdout()))
    };
    game.add_renderer(renderer)?;

    let status = game.autoplay(agent.as_mut(), args.max_moves)?;
    let elapsed = start.elapsed().as_secs_f64().max(1e-6);
    let (moves, score, max_tile) = (game.moves(), game.score(), game.board().max_value());
    // Drop renderers (and any spinner) before the summary line.
    drop(game);
    if !args.json {
        println!(
            "Moves: {} | moves/sec: {:.1} | score: {} | max tile: {} | status: {:?}",
            moves,
            moves as f64 / elapsed,
            score,
            max_tile,
            status
        );
    }
    Ok(())
}
