use ratatui::Frame;

use crate::app::{App, AppState};
use crate::ui::leaderboard::render_leaderboard;

/// A UI screen boundary: decides how one app state is drawn
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Menu, typing, results and error states all go through the App widget
pub struct WidgetScreen;

impl Screen for WidgetScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

pub struct LeaderboardScreen;

impl Screen for LeaderboardScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_leaderboard(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Leaderboard => Box::new(LeaderboardScreen),
        AppState::Menu
        | AppState::EditingName
        | AppState::Typing
        | AppState::Results
        | AppState::LoadFailed(_) => Box::new(WidgetScreen),
    }
}

/// Draws whatever the app is currently showing
pub fn draw(app: &App, f: &mut Frame) {
    current_screen(&app.state).render(app, f);
}
