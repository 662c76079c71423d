//! Connection and loading indicators, drawn in the top-right corner.
//!
//! Pure reflections of the latest fetch cycle: loading while a request
//! is in flight, disconnected after a failed fetch.

use color_eyre::eyre::Result;
use ratatui::{prelude::*, widgets::*};

use super::Component;
use crate::action::Action;
use crate::tui::Frame;

pub struct Indicators {
    loading: bool,
    connected: bool,
}

impl Indicators {
    pub fn new() -> Self {
        Self {
            loading: false,
            connected: true,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl Default for Indicators {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Indicators {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::FetchStarted => {
                self.loading = true;
                // optimistic until the cycle reports otherwise
                self.connected = true;
            }
            Action::FetchSucceeded(_) => {
                self.loading = false;
                self.connected = true;
            }
            Action::FetchFailed(_) => {
                self.loading = false;
                self.connected = false;
            }
            _ => {}
        };

        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let width = 16.min(area.width);
        let corner = Rect::new(area.right().saturating_sub(width), area.y, width, 1);

        let mut spans = Vec::new();
        if self.loading {
            spans.push(Span::styled(
                "Updating... ",
                Style::default().add_modifier(Modifier::DIM),
            ));
        }
        let dot = if self.connected {
            Span::styled("●", Style::default().fg(Color::Green))
        } else {
            Span::styled("●", Style::default().fg(Color::Red))
        };
        spans.push(dot);

        f.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
            corner,
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::snapshot::Snapshot;

    #[test]
    fn test_fetch_cycle_success() {
        let mut indicators = Indicators::new();

        indicators
            .update(Action::FetchStarted)
            .expect("update succeeds");
        assert!(indicators.is_loading());
        assert!(indicators.is_connected());

        indicators
            .update(Action::FetchSucceeded(Snapshot::default()))
            .expect("update succeeds");
        assert!(!indicators.is_loading());
        assert!(indicators.is_connected());
    }

    #[test]
    fn test_fetch_cycle_failure_ends_loading() {
        let mut indicators = Indicators::new();

        indicators
            .update(Action::FetchStarted)
            .expect("update succeeds");
        indicators
            .update(Action::FetchFailed("HTTP 503".into()))
            .expect("update succeeds");

        assert!(!indicators.is_loading());
        assert!(!indicators.is_connected());
    }

    #[test]
    fn test_reconnect_after_failure() {
        let mut indicators = Indicators::new();
        indicators
            .update(Action::FetchFailed("timeout".into()))
            .expect("update succeeds");
        assert!(!indicators.is_connected());

        indicators
            .update(Action::FetchStarted)
            .expect("update succeeds");
        assert!(indicators.is_connected());

        indicators
            .update(Action::FetchSucceeded(Snapshot::default()))
            .expect("update succeeds");
        assert_eq!(
            (indicators.is_loading(), indicators.is_connected()),
            (false, true)
        );
    }

    #[test]
    fn test_unrelated_actions_ignored() {
        let mut indicators = Indicators::new();
        indicators.update(Action::Tick).expect("update succeeds");
        assert!(!indicators.is_loading());
        assert!(indicators.is_connected());
    }
}
