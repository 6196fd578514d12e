//! Fruit Basket entry point
//!
//! Headless runner: plays games with the autopilot, logs what happens and
//! records the results to the high score table and player profile.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;

use fruit_basket::highscores::format_age;
use fruit_basket::persistence::default_data_dir;
use fruit_basket::platform::{Clock, ManualClock, SystemClock};
use fruit_basket::sim::{
    Command, GamePhase, GameRng, GameState, GameSummary, TickInput, autopilot, tick,
};
use fruit_basket::{Difficulty, HighScores, Profile, ScoreSink, Settings, Tuning};

#[derive(Debug, Parser)]
#[command(
    name = "fruit-basket",
    version,
    about = "Catch-the-falling-fruit arcade engine, played headless by an autopilot."
)]
struct Args {
    /// RNG seed. Falls back to the settings file, then the current time.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Difficulty: easy, normal, hard, hell, nightmare, ultimate.
    #[arg(short, long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    /// Number of games to play.
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Tick limit per game; the game is quit when it is reached.
    #[arg(long, default_value = "20000", value_name = "N")]
    max_ticks: u64,

    /// Percent of ticks on which the autopilot acts (0-100).
    #[arg(long, default_value = "90", value_name = "PCT")]
    accuracy: u32,

    /// Directory for settings, high scores and profile.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Sleep between ticks like a real session instead of simulating time.
    #[arg(long)]
    realtime: bool,

    /// Do not write high scores or profile.
    #[arg(long)]
    no_save: bool,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty '{}'", s))
}

fn unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Wall clock or simulated clock, chosen at startup
enum Timer {
    Real(SystemClock),
    Simulated(ManualClock),
}

impl Timer {
    fn now_ms(&self) -> u64 {
        match self {
            Timer::Real(c) => c.now_ms(),
            Timer::Simulated(c) => c.now_ms(),
        }
    }

    fn wait(&self, ms: u64) {
        match self {
            Timer::Real(_) => std::thread::sleep(Duration::from_millis(ms)),
            Timer::Simulated(c) => c.advance(ms),
        }
    }
}

/// Play one game from the menu to game over
fn play_game(
    state: &mut GameState,
    timer: &Timer,
    pilot_rng: &mut GameRng,
    args: &Args,
) -> Option<GameSummary> {
    tick(state, &TickInput::command(Command::MenuSelect(1)), timer.now_ms());

    let mut ticks = 0u64;
    while state.phase == GamePhase::Playing {
        timer.wait(state.tick_interval_ms(timer.now_ms()));
        let command = if ticks >= args.max_ticks {
            log::warn!("Tick limit {} reached, quitting", args.max_ticks);
            Some(Command::Quit)
        } else if pilot_rng.percent(args.accuracy) {
            autopilot(state)
        } else {
            None
        };
        tick(state, &TickInput { command }, timer.now_ms());
        for event in &state.events {
            log::debug!("{}", event);
        }
        ticks += 1;
    }

    let summary = state.summary.clone();
    // Back to the menu for the next game
    tick(state, &TickInput::command(Command::MenuSelect(0)), timer.now_ms());
    summary
}

fn print_summary(game: u32, summary: &GameSummary) {
    println!("Game {} over", game);
    println!("  Score:          {}", summary.score);
    println!("  Level:          {}", summary.level);
    println!("  Max combo:      {}", summary.max_combo);
    println!(
        "  Caught/missed:  {}/{} ({:.1}%)",
        summary.caught,
        summary.missed,
        summary.accuracy()
    );
    println!("  Coins:          {}", summary.coins);
    println!("  Duration:       {}s", summary.duration_ms / 1000);
    println!("  Score/minute:   {}", summary.score_per_minute);
    for kind in &summary.new_achievements {
        println!("  Achievement:    {} ({})", kind.name(), kind.description());
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);
    let settings = Settings::load(&data_dir);
    let difficulty = args.difficulty.unwrap_or(settings.difficulty);
    let seed = args.seed.or(settings.seed).unwrap_or_else(unix_ms);
    log::info!(
        "Fruit Basket starting (seed {}, difficulty {}, data dir {})",
        seed,
        difficulty.as_str(),
        data_dir.display()
    );

    let timer = if args.realtime {
        Timer::Real(SystemClock::new())
    } else {
        Timer::Simulated(ManualClock::new(0))
    };

    let mut state = GameState::new(seed, Tuning::default(), difficulty);
    state.particles_enabled = settings.particles;
    let mut pilot_rng = GameRng::new(seed.rotate_left(17));

    let mut high_scores = HighScores::load(&data_dir);
    let mut profile = Profile::load(&data_dir);
    if profile.name.is_empty() {
        profile.name = settings.player_name.clone();
    }

    for game in 1..=args.games {
        let Some(summary) = play_game(&mut state, &timer, &mut pilot_rng, &args) else {
            continue;
        };
        print_summary(game, &summary);

        let rank = high_scores.potential_rank(summary.score);
        let now = unix_ms();
        high_scores.record(&settings.player_name, &summary, now);
        profile.record(&settings.player_name, &summary, now);
        if let Some(rank) = rank {
            println!("  High score rank #{}", rank);
        }
    }

    println!(
        "Coins: {}, unlocked achievements: {}",
        state.coins,
        state.achievements.unlocked().count()
    );

    let now = unix_ms();
    println!("High scores:");
    for (i, entry) in high_scores.entries.iter().enumerate() {
        println!(
            "  #{:<2} {:<12} {:>8}  level {:<3} {}",
            i + 1,
            entry.name,
            entry.score,
            entry.level,
            format_age(entry.timestamp_ms, now)
        );
    }

    if !args.no_save {
        high_scores
            .save(&data_dir)
            .context("saving high scores")?;
        profile.save(&data_dir).context("saving profile")?;
    }
    Ok(())
}
