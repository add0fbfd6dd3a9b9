use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::{app::App, leaderboard::LeaderboardEntry};

use super::format::{fit_width, format_speed, NAME_COLUMN_WIDTH};

/// Pure presenter for one ranked leaderboard row
pub fn present_row(rank: usize, entry: &LeaderboardEntry) -> Row<'static> {
    let rank_style = match rank {
        1 => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        2 | 3 => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        _ => Style::default(),
    };

    Row::new(vec![
        Cell::from(format!("{rank}.")).style(rank_style),
        Cell::from(fit_width(&entry.player_name, NAME_COLUMN_WIDTH))
            .style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(format_speed(entry.letters_per_second)).style(Style::default().fg(Color::Green)),
        Cell::from(entry.mode.to_string()),
        Cell::from(entry.recorded_at.format("%Y-%m-%d %H:%M").to_string()),
    ])
}

pub fn render_leaderboard(app: &App, f: &mut Frame) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(5),    // table
            Constraint::Length(1), // legend
        ])
        .split(area);

    let title = Paragraph::new("Top Players")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    if app.leaderboard_entries.is_empty() {
        let text = app
            .leaderboard_error
            .clone()
            .unwrap_or_else(|| "No players yet. Finish a run to get on the board!".to_string());
        let empty = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(empty, chunks[1]);
    } else {
        let rows: Vec<Row> = app
            .leaderboard_entries
            .iter()
            .enumerate()
            .map(|(i, entry)| present_row(i + 1, entry))
            .collect();

        let header = Row::new(vec!["#", "Player", "LPS", "Mode", "Date"])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Length(NAME_COLUMN_WIDTH as u16 + 2),
                Constraint::Length(8),
                Constraint::Length(12),
                Constraint::Min(16),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(table, chunks[1]);
    }

    let legend = Paragraph::new("(esc) / (b)ack")
        .style(Style::default().add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Left);
    f.render_widget(legend, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::leaderboard::{Leaderboard, SqliteLeaderboard};
    use crate::mode::GameMode;
    use crate::words::EmbeddedWordSource;
    use chrono::Local;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 24)).unwrap();
        terminal.draw(|f| render_leaderboard(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_present_row_handles_every_rank() {
        let entry = LeaderboardEntry {
            player_name: "ada".into(),
            letters_per_second: 4.5,
            mode: GameMode::Survival,
            recorded_at: Local::now(),
        };
        for rank in 1..=12 {
            let _ = present_row(rank, &entry);
        }
    }

    #[test]
    fn test_renders_ranked_entries() {
        let mut board = SqliteLeaderboard::open_in_memory().unwrap();
        for (name, lps) in [("slow", 1.25), ("fast", 5.5)] {
            board
                .submit(&LeaderboardEntry {
                    player_name: name.into(),
                    letters_per_second: lps,
                    mode: GameMode::TimeAttack,
                    recorded_at: Local::now(),
                })
                .unwrap();
        }
        let mut app = App::new(Config::default(), Box::new(EmbeddedWordSource::default()))
            .with_leaderboard(board);
        app.refresh_leaderboard();

        let text = screen_text(&app);
        assert!(text.contains("Top Players"));
        let fast = text.find("fast").unwrap();
        let slow = text.find("slow").unwrap();
        assert!(fast < slow);
        assert!(text.contains("5.50"));
    }

    #[test]
    fn test_renders_empty_message() {
        let mut app = App::new(Config::default(), Box::new(EmbeddedWordSource::default()))
            .with_leaderboard(SqliteLeaderboard::open_in_memory().unwrap());
        app.refresh_leaderboard();
        assert!(screen_text(&app).contains("No players yet"));
    }
}
