pub mod format;
pub mod leaderboard;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::{
    app::{App, AppState},
    mode::{GameMode, CONQUEST_ALLOWANCE},
    render::LetterState,
    session::Phase,
};

use self::format::{fit_width, format_clock, format_speed, NAME_COLUMN_WIDTH};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn letter_style(state: LetterState) -> Style {
    match state {
        LetterState::Correct => bold().fg(Color::Green),
        LetterState::Incorrect => bold().fg(Color::Red),
        LetterState::Untyped => bold().add_modifier(Modifier::DIM),
    }
}

/// Vertically centers `height` rows inside `area`
fn centered(area: Rect, height: u16) -> Rect {
    let pad = area.height.saturating_sub(height) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(pad),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    chunks[1]
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.state {
            AppState::Typing => render_typing(self, area, buf),
            AppState::Results => render_results(self, area, buf),
            AppState::Menu | AppState::EditingName => render_menu(self, area, buf),
            AppState::LoadFailed(message) => render_load_failed(message, area, buf),
            // drawn as a full frame by the leaderboard screen
            AppState::Leaderboard => {}
        }
    }
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let game = &app.game;
    let state = game.state();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(1)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let mut status = vec![
        Span::styled(game.mode().to_string(), bold().fg(Color::Cyan)),
        Span::raw("   "),
        Span::styled(format!("Score: {}", state.score), bold()),
        Span::raw("   "),
        Span::styled(
            format_clock(state.remaining_time),
            if state.remaining_time <= 5 {
                bold().fg(Color::Red)
            } else {
                bold()
            },
        ),
    ];
    if game.mode() == GameMode::Conquest {
        status.push(Span::raw("   "));
        status.push(Span::styled(
            format!("Wrongs Left: {}/{}", state.wrongs_allowance, CONQUEST_ALLOWANCE),
            bold().fg(Color::Yellow),
        ));
    }
    Paragraph::new(Line::from(status))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let body = centered(chunks[1], 5);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // word
            Constraint::Length(1),
            Constraint::Length(1), // input
            Constraint::Length(1),
            Constraint::Length(1), // notice
        ])
        .split(body);

    if game.phase() == Phase::Ending || game.phase() == Phase::Ended {
        let message = game.ending_message().unwrap_or_default();
        Paragraph::new(Span::styled(
            format!("{message} Final Score: {}", state.score),
            bold().fg(Color::Magenta),
        ))
        .alignment(Alignment::Center)
        .render(rows[0], buf);
    } else {
        let spans: Vec<Span> = game
            .letters()
            .into_iter()
            .map(|letter| Span::styled(letter.char.to_string(), letter_style(letter.state)))
            .collect();
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(rows[0], buf);
    }

    let typed = match state.input.as_str() {
        "" => Span::styled("_", Style::default().add_modifier(Modifier::DIM)),
        s => Span::styled(s.replace(' ', "·"), Style::default().fg(Color::White)),
    };
    Paragraph::new(Line::from(vec![Span::raw("> "), typed]))
        .alignment(Alignment::Center)
        .render(rows[2], buf);

    if let Some(notice) = &app.notice {
        Paragraph::new(Span::styled(notice.text.clone(), bold().fg(Color::Green)))
            .alignment(Alignment::Center)
            .render(rows[4], buf);
    }

    Paragraph::new(Span::styled(
        "(enter) submit / (esc) menu",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[2], buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(8), // summary
            Constraint::Min(3),    // leaderboard preview
            Constraint::Length(1), // legend
        ])
        .split(area);

    if let Some(results) = &app.last_results {
        let lines = vec![
            Line::from(Span::styled(results.message.clone(), bold().fg(Color::Magenta))),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} / {}", results.player_name, results.mode),
                Style::default().fg(Color::Cyan),
            )),
            Line::from(Span::styled(format!("Score: {}", results.score), bold())),
            Line::from(format!("Wrongs: {}", results.wrongs_count)),
            Line::from(format!("Words: {}", results.total_words_presented)),
            Line::from(Span::styled(
                format!("{} LPS", format_speed(results.typing_speed)),
                bold().fg(Color::Green),
            )),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(chunks[0], buf);
    }

    let top: Vec<Line> = if app.leaderboard_entries.is_empty() {
        vec![Line::from(
            app.leaderboard_error
                .clone()
                .unwrap_or_else(|| "No players yet".to_string()),
        )]
    } else {
        app.leaderboard_entries
            .iter()
            .take(5)
            .enumerate()
            .map(|(i, e)| {
                Line::from(format!(
                    "{}. {}  {} LPS",
                    i + 1,
                    fit_width(&e.player_name, NAME_COLUMN_WIDTH),
                    format_speed(e.letters_per_second)
                ))
            })
            .collect()
    };
    Paragraph::new(top)
        .block(Block::default().borders(Borders::ALL).title("Top Players"))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        "(r)etry / (l)eaderboard / (m)enu / (q)uit",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[2], buf);
}

fn render_menu(app: &App, area: Rect, buf: &mut Buffer) {
    let modes = [
        ('1', GameMode::TimeAttack),
        ('2', GameMode::Survival),
        ('3', GameMode::Conquest),
    ];

    let mut lines = vec![
        Line::from(Span::styled("TYPO RUSH", bold().fg(Color::Magenta))),
        Line::from(""),
    ];
    for (key, mode) in modes {
        let selected = app.settings.mode == mode;
        let style = if selected {
            bold().fg(Color::Green)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let marker = if selected { ">" } else { " " };
        lines.push(Line::from(Span::styled(
            format!("{marker} ({key}) {mode} - {}s", mode.initial_time()),
            style,
        )));
    }
    lines.push(Line::from(""));

    let name = if app.state == AppState::EditingName {
        Span::styled(format!("{}_", app.name_draft), bold().fg(Color::Yellow))
    } else {
        Span::styled(fit_width(&app.settings.player_name, NAME_COLUMN_WIDTH), bold())
    };
    lines.push(Line::from(vec![Span::raw("Player: "), name]));
    lines.push(Line::from(format!(
        "Music: {}",
        if app.music().is_music_on() { "On" } else { "Off" }
    )));

    if let Some(last) = &app.last_results {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Last run: {} pts, {:.2} LPS ({})", last.score, last.typing_speed, last.mode),
            Style::default().fg(Color::Gray),
        )));
    }

    let height = lines.len() as u16;
    let body = centered(area, height + 2);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(body, buf);

    let legend = if app.state == AppState::EditingName {
        "type a name, (enter) save, (esc) cancel"
    } else {
        "(enter) play / (n)ame / (m)usic / (l)eaderboard / (q)uit"
    };
    let legend_area = Rect {
        y: area.bottom().saturating_sub(VERTICAL_MARGIN),
        height: 1,
        ..area
    };
    Paragraph::new(Span::styled(
        legend,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(legend_area, buf);
}

fn render_load_failed(message: &str, area: Rect, buf: &mut Buffer) {
    let body = centered(area, 3);
    Paragraph::new(vec![
        Line::from(Span::styled(message.to_string(), bold().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled(
            "(esc) back to menu",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(body, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::words::EmbeddedWordSource;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    fn buffer_text(app: &App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| f.render_widget(app, f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_menu_shows_modes() {
        let app = App::new(Config::default(), Box::new(EmbeddedWordSource::default()));
        let text = buffer_text(&app);
        assert!(text.contains("TYPO RUSH"));
        assert!(text.contains("Time Attack"));
        assert!(text.contains("Conquest"));
    }

    #[test]
    fn test_typing_screen_shows_score_and_clock() {
        let mut app = App::new(Config::default(), Box::new(EmbeddedWordSource::default()));
        app.start_session(Instant::now());
        let text = buffer_text(&app);
        assert!(text.contains("Score: 0"));
        assert!(text.contains("01:00"));
        assert!(text.contains(&app.game.state().current_word));
    }

    #[test]
    fn test_conquest_shows_wrongs_left() {
        let mut settings = Config::default();
        settings.mode = GameMode::Conquest;
        let mut app = App::new(settings, Box::new(EmbeddedWordSource::default()));
        app.start_session(Instant::now());
        assert!(buffer_text(&app).contains("Wrongs Left: 2/2"));
    }

    #[test]
    fn test_load_failure_message() {
        let mut app = App::new(Config::default(), Box::new(EmbeddedWordSource::new("missing")));
        app.start_session(Instant::now());
        assert!(buffer_text(&app).contains("Error loading words"));
    }

    #[test]
    fn test_letter_styles() {
        assert_eq!(letter_style(LetterState::Correct).fg, Some(Color::Green));
        assert_eq!(letter_style(LetterState::Incorrect).fg, Some(Color::Red));
        assert!(letter_style(LetterState::Untyped)
            .add_modifier
            .contains(Modifier::DIM));
    }
}
