pub mod render;
pub mod state;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use state::{DashboardState, View};
use std::io::stdout;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Commands the dashboard sends back to the refresh task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    Quit,
    Refresh,
}

/// What a key press does. View switches never leave the dashboard loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Send(DashboardCommand),
    NextView,
    PrevView,
    Show(View),
}

impl KeyAction {
    /// The view after this action, or `None` for commands.
    pub fn apply(&self, view: View) -> Option<View> {
        match self {
            KeyAction::Send(_) => None,
            KeyAction::NextView => Some(view.next()),
            KeyAction::PrevView => Some(view.prev()),
            KeyAction::Show(v) => Some(*v),
        }
    }
}

/// Map a key press to an action.
pub fn action_for_key(code: KeyCode) -> Option<KeyAction> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Send(DashboardCommand::Quit)),
        KeyCode::Char('r') => Some(KeyAction::Send(DashboardCommand::Refresh)),
        KeyCode::Tab | KeyCode::Right => Some(KeyAction::NextView),
        KeyCode::BackTab | KeyCode::Left => Some(KeyAction::PrevView),
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            Some(KeyAction::Show(View::ALL[idx]))
        }
        _ => None,
    }
}

/// Run the dashboard. Reads state from `state_rx`, sends commands on `cmd_tx`.
pub async fn run_dashboard(
    state_rx: watch::Receiver<DashboardState>,
    cmd_tx: mpsc::Sender<DashboardCommand>,
) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = dashboard_loop(&mut terminal, state_rx, cmd_tx).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn dashboard_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut state_rx: watch::Receiver<DashboardState>,
    cmd_tx: mpsc::Sender<DashboardCommand>,
) -> Result<()> {
    let mut view = View::default();
    loop {
        let state = state_rx.borrow_and_update().clone();
        terminal.draw(|f| render::draw(f, &state, view))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match action_for_key(key.code) {
                        Some(KeyAction::Send(DashboardCommand::Quit)) => {
                            let _ = cmd_tx.try_send(DashboardCommand::Quit);
                            return Ok(());
                        }
                        // The refresh task may be busy; a full queue already holds a refresh.
                        Some(KeyAction::Send(cmd)) => {
                            let _ = cmd_tx.try_send(cmd);
                        }
                        Some(action) => {
                            if let Some(next) = action.apply(view) {
                                view = next;
                            }
                            continue;
                        }
                        None => {}
                    }
                }
            }
        }

        // Redraw on state change, or at least every 250ms to pick up key presses.
        let _ = tokio::time::timeout(Duration::from_millis(250), state_rx.changed()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(
            action_for_key(KeyCode::Char('q')),
            Some(KeyAction::Send(DashboardCommand::Quit))
        );
        assert_eq!(
            action_for_key(KeyCode::Char('r')),
            Some(KeyAction::Send(DashboardCommand::Refresh))
        );
        assert_eq!(action_for_key(KeyCode::Char('3')), Some(KeyAction::Show(View::Animals)));
        assert_eq!(action_for_key(KeyCode::Char('9')), None);
        assert_eq!(action_for_key(KeyCode::BackTab), Some(KeyAction::PrevView));
    }

    #[test]
    fn test_view_keys_switch_locally() {
        let view = View::Herd;
        assert_eq!(KeyAction::NextView.apply(view), Some(View::Production));
        assert_eq!(KeyAction::PrevView.apply(view), Some(View::Logs));
        assert_eq!(KeyAction::Show(View::Animals).apply(view), Some(View::Animals));
        assert_eq!(KeyAction::Send(DashboardCommand::Refresh).apply(view), None);
    }
}
