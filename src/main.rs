//! Jumping Jack headless runner
//!
//! Plays a seeded session for the configured tick budget, then records the
//! result on the leaderboard. Rendering and input live outside this crate.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use jumping_jack::highscores::format_date;
use jumping_jack::sim::TickInput;
use jumping_jack::{Autopilot, Leaderboard, Session, SessionEvent, Settings};

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Jumping Jack (headless) starting...");

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("settings.json"));
    let settings = Settings::load(&settings_path);

    let mut session = match Session::new(settings.seed, settings.effective_lives()) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid level configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let autopilot = Autopilot;
    for _ in 0..settings.tick_budget {
        let input = if settings.autopilot {
            autopilot.decide(&session.world)
        } else {
            TickInput::default()
        };
        match session.tick(&input) {
            Ok(Some(SessionEvent::LevelComplete { level })) => {
                println!("Level {} cleared at {} points", level, session.score);
            }
            Ok(Some(SessionEvent::GameOver { score, level })) => {
                println!("Game over on level {} with {} points", level, score);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                log::error!("Could not build next level: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    log::info!(
        "Run finished after {} ticks: level {}, score {}, lives {}",
        session.world.time_ticks,
        session.level,
        session.score,
        session.lives
    );

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut board = Leaderboard::load(&settings.leaderboard_path);
    if let Some(rank) = board.add_score(&settings.player_name, session.score, session.level, now) {
        println!("New high score! Rank #{}", rank);
    }
    if let Err(e) = board.save(&settings.leaderboard_path) {
        log::warn!("Could not save leaderboard: {}", e);
    }

    println!("\n{:>3}  {:<16} {:>5} {:>7}  {}", "#", "Name", "Level", "Score", "When");
    for (i, entry) in board.top(10).iter().enumerate() {
        println!(
            "{:>3}  {:<16} {:>5} {:>7}  {}",
            i + 1,
            entry.name,
            entry.level,
            entry.score,
            format_date(entry.timestamp, now)
        );
    }

    ExitCode::SUCCESS
}

