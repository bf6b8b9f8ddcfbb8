use std::cell::Cell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use guessrank::events::Channel;
use guessrank::game::{GameEngine, GameSession, LeaderboardStore, Settings};
use guessrank::model::{GameEngineCommand, GameEngineEvent, GlobalStats, ScoreEntry, DEFAULT_PLAYER_NAME};
use guessrank::platform::{FileStorage, RandomSource, SeededRandom, SystemClock, ThreadRandom};
use guessrank::Destroyable;
use itertools::Itertools;
use log::{error, info};

fn init_logging() {
    env_logger::init();
}

fn main() {
    init_logging();

    let data_dir = Settings::data_dir();
    info!(target: "main", "Using data directory {:?}", data_dir);
    let storage = FileStorage::new(data_dir);
    let clock = Rc::new(SystemClock);
    let random: Box<dyn RandomSource> = match Settings::seed_from_env() {
        Some(seed) => {
            info!(target: "main", "Using seed {}", seed);
            Box::new(SeededRandom::new(seed))
        }
        None => Box::new(ThreadRandom),
    };

    let (commands, command_observer) = Channel::<GameEngineCommand>::new();
    let (event_emitter, event_observer) = Channel::<GameEngineEvent>::new();

    let won = Rc::new(Cell::new(false));
    let won_flag = Rc::clone(&won);
    event_observer.subscribe(move |event| render(event, &won_flag));

    let session = GameSession::new(clock.clone(), random);
    let leaderboard = LeaderboardStore::open(Box::new(storage.clone()), clock);
    let engine = GameEngine::new(
        command_observer,
        event_emitter,
        session,
        leaderboard,
        Box::new(storage),
    );

    println!("Commands: new, scores, stats, quit");
    commands.emit(GameEngineCommand::InitDisplay);

    let mut lines = io::stdin().lock().lines();
    loop {
        prompt("> ");
        let Some(line) = next_line(&mut lines) else {
            break;
        };
        match line.trim() {
            "quit" | "exit" => break,
            "new" => commands.emit(GameEngineCommand::NewGame),
            "scores" => println!("{}", format_leaderboard(engine.borrow().leaderboard().entries())),
            "stats" => println!("{}", format_stats(engine.borrow().leaderboard().global_stats())),
            input => commands.emit(GameEngineCommand::Guess(input.to_string())),
        }

        // Name capture happens here, outside the event callbacks, so the
        // engine is no longer borrowed when the score is submitted.
        if won.replace(false) {
            let default_name = engine
                .borrow()
                .settings()
                .last_player_name
                .clone()
                .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string());
            prompt(&format!("Your name [{default_name}]: "));
            let name = next_line(&mut lines).unwrap_or_default();
            let name = if name.trim().is_empty() { default_name } else { name };
            commands.emit(GameEngineCommand::SubmitScore(name));
            println!("Type 'new' to play again.");
        }
    }

    engine.borrow_mut().destroy();
}

fn render(event: &GameEngineEvent, won: &Cell<bool>) {
    match event {
        GameEngineEvent::SessionUpdated(snapshot) => println!("{}", snapshot.message),
        GameEngineEvent::InvalidInput(message) => println!("{message}"),
        GameEngineEvent::GameWon(_) => won.set(true),
        GameEngineEvent::ScoreRecorded(ranked) => match ranked.rank {
            Some(rank) => println!(
                "{} scored {:.1} and placed #{}!",
                ranked.entry.player_name(),
                ranked.entry.score(),
                rank
            ),
            None => println!(
                "{} scored {:.1}, not enough for the top ten.",
                ranked.entry.player_name(),
                ranked.entry.score()
            ),
        },
        GameEngineEvent::LeaderboardUpdated(entries) => println!("{}", format_leaderboard(entries)),
        GameEngineEvent::GlobalStatsUpdated(_) => (),
    }
}

fn format_leaderboard(entries: &[ScoreEntry]) -> String {
    if entries.is_empty() {
        return "No scores yet.".to_string();
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{:>2}. {:<16} {:>5.1}  {:>3} attempts  {:>6.1}s",
                i + 1,
                entry.player_name(),
                entry.score(),
                entry.attempts(),
                entry.elapsed_seconds()
            )
        })
        .join("\n")
}

fn format_stats(stats: &GlobalStats) -> String {
    let average = stats
        .average_attempts()
        .map(|a| format!("{a:.1}"))
        .unwrap_or_else(|| "-".to_string());
    let best = stats
        .best_score
        .map(|s| format!("{s:.1}"))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "Games won: {}\nAverage attempts: {}\nTime played: {:.0}s\nBest score: {}",
        stats.games_won,
        average,
        stats.total_time_played.as_secs_f64(),
        best
    )
}

fn prompt(text: &str) {
    print!("{text}");
    if let Err(e) = io::stdout().flush() {
        error!(target: "main", "Failed to flush stdout: {}", e);
    }
}

fn next_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> Option<String> {
    match lines.next()? {
        Ok(line) => Some(line),
        Err(e) => {
            error!(target: "main", "Failed to read input: {}", e);
            None
        }
    }
}
