use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use typo_rush::app::{App, AppState};
use typo_rush::config::Config;
use typo_rush::game::{Game, Timings};
use typo_rush::leaderboard::{Leaderboard, SqliteLeaderboard};
use typo_rush::mode::GameMode;
use typo_rush::runtime::{FixedTicker, Runner, RushEvent, TestEventSource};
use typo_rush::session::{Phase, SessionConfig};
use typo_rush::words::FileWordSource;

fn key(c: char) -> RushEvent {
    RushEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn code(code: KeyCode) -> RushEvent {
    RushEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn single_word_app(dir: &tempfile::TempDir, word: &str, mode: GameMode) -> App {
    let path = dir.path().join("words.txt");
    std::fs::write(&path, format!("{word}\n")).unwrap();
    let settings = Config {
        mode,
        player_name: "ada".into(),
        ..Config::default()
    };
    App::new(settings, Box::new(FileWordSource::new(path)))
        .with_leaderboard(SqliteLeaderboard::open_in_memory().unwrap())
}

// Drives the app through Runner/TestEventSource without a TTY, advancing a
// virtual clock instead of sleeping.
#[test]
fn headless_time_attack_run_reaches_results() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = single_word_app(&dir, "hi", GameMode::TimeAttack);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    tx.send(code(KeyCode::Enter)).unwrap();
    tx.send(key('h')).unwrap();
    tx.send(key('i')).unwrap();

    let start = Instant::now();
    let mut clock = start;
    for _ in 0..200u32 {
        match runner.step() {
            RushEvent::Tick => {
                clock += Duration::from_millis(500);
                app.on_tick(clock);
            }
            RushEvent::Resize => {}
            RushEvent::Key(k) => app.on_key(k, clock),
        }
        if app.state == AppState::Results {
            break;
        }
    }

    assert_eq!(app.state, AppState::Results);
    let results = app.last_results.as_ref().unwrap();
    assert_eq!(results.message, "Time's up!");
    assert_eq!(results.mode, GameMode::TimeAttack);
    assert_eq!(results.player_name, "ada");
    assert!(results.score >= 2);
    assert!(results.typing_speed > 0.0);
    assert_eq!(app.leaderboard_entries.len(), 1);
}

#[test]
fn headless_conquest_ends_after_two_wrong_words() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = single_word_app(&dir, "cat", GameMode::Conquest);
    let now = Instant::now();

    app.start_session(now);
    assert_eq!(app.state, AppState::Typing);

    // wrong word, then wait for the next one to appear
    for c in "cot".chars() {
        app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), now);
    }
    assert_eq!(app.game.state().wrongs_allowance, 1);
    app.on_tick(now + Duration::from_millis(500));
    assert!(!app.game.state().awaiting_submission);

    let later = now + Duration::from_millis(600);
    for c in "dog".chars() {
        app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), later);
    }
    assert_eq!(app.game.phase(), Phase::Ending);
    assert_eq!(
        app.game.ending_message(),
        Some("No more wrongs left in Conquest Mode!")
    );

    app.on_tick(later + Duration::from_secs(1));
    assert_eq!(app.state, AppState::Results);
    let results = app.last_results.as_ref().unwrap();
    assert_eq!(results.wrongs_count, 2);
    // "cot" against "cat" keeps two letters, "dog" none
    assert_eq!(results.score, 2);
}

#[test]
fn headless_survival_penalties_drain_the_clock() {
    let mut game = Game::new(SessionConfig::new(GameMode::Survival, "ada"))
        .with_timings(Timings {
            feedback_delay: Duration::ZERO,
            ending_delay: Duration::ZERO,
            tick_interval: Duration::from_secs(1),
        })
        .with_leaderboard(Box::new(SqliteLeaderboard::open_in_memory().unwrap()));
    let now = Instant::now();
    game.begin(["apple"], now).unwrap();

    for _ in 0..6 {
        game.submit("nope", now);
        game.poll(now);
    }

    assert_eq!(game.phase(), Phase::Ended);
    let results = game.results().unwrap();
    assert_eq!(results.message, "You lost all time in Survival!");
    assert_eq!(results.wrongs_count, 6);
    assert_eq!(game.state().remaining_time, 0);
}

#[test]
fn headless_results_survive_a_restart_of_the_leaderboard() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("leaderboard.db");

    {
        let mut game = Game::new(SessionConfig::new(GameMode::TimeAttack, "grace"))
            .with_leaderboard(Box::new(SqliteLeaderboard::open(&db).unwrap()));
        let now = Instant::now();
        game.begin(["abc"], now).unwrap();
        game.submit("abc", now);
        game.end_game("Time's up!", now + Duration::from_secs(3));
    }

    let board = SqliteLeaderboard::open(&db).unwrap();
    let top = board.top(10).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].player_name, "grace");
    assert_eq!(top[0].letters_per_second, 1.0);
}
