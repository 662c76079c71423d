//! The core widget: binds display regions, drives the per-second clock
//! refresh, applies fetched snapshots, and keeps the last good data
//! visible through outages.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, Timelike};
use color_eyre::eyre::Result;
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;

use super::Component;
use crate::{
    action::Action,
    clock,
    config::Config,
    discovery::{Bindings, DiscoveryState, Region},
    page::{ElementId, ElementKind, Page},
    snapshot::Snapshot,
    tui::Frame,
};

pub const UPDATING_DWELL: Duration = Duration::from_millis(100);
pub const UPDATED_DWELL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Stable,
    Updating,
    Updated,
}

/// Per-write transient visual state: Stable → Updating → Updated → Stable.
/// Advanced against an injected `Instant` so the timing is testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    phase: Phase,
    since: Instant,
}

impl Highlight {
    pub fn begin(now: Instant) -> Self {
        Self {
            phase: Phase::Updating,
            since: now,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn advance(&mut self, now: Instant) {
        if self.phase == Phase::Updating && now.duration_since(self.since) >= UPDATING_DWELL {
            self.phase = Phase::Updated;
            self.since += UPDATING_DWELL;
        }
        if self.phase == Phase::Updated && now.duration_since(self.since) >= UPDATED_DWELL {
            self.phase = Phase::Stable;
        }
    }

    fn style(&self) -> Style {
        match self.phase {
            Phase::Updating => Style::default().add_modifier(Modifier::DIM),
            Phase::Updated => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            Phase::Stable => Style::default(),
        }
    }
}

pub struct Updater {
    command_tx: Option<UnboundedSender<Action>>,
    config: Config,
    page: Page,
    bindings: Bindings,
    discovery: DiscoveryState,
    snapshot: Option<Snapshot>,
    user_name: String,
    highlights: HashMap<Region, Highlight>,
}

impl Updater {
    pub fn new(config: Config) -> Self {
        let page = Page::screensaver(&config.user_name);
        Self::with_page(config, page)
    }

    /// Start against a caller-supplied page instead of the stock layout.
    pub fn with_page(config: Config, page: Page) -> Self {
        let user_name = config.user_name.clone();
        Self {
            command_tx: None,
            config,
            page,
            bindings: Bindings::default(),
            discovery: DiscoveryState::Scanning { attempts: 0 },
            snapshot: None,
            user_name,
            highlights: HashMap::new(),
        }
    }

    /// Explicit typed registration; bypasses the heuristic scan for this
    /// region.
    pub fn bind(&mut self, region: Region, id: ElementId) {
        self.bindings.bind(region, id);
        self.page.mark(id);
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn discovery(&self) -> DiscoveryState {
        self.discovery
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn region_text(&self, region: Region) -> Option<&str> {
        self.bindings.get(region).and_then(|id| self.page.text(id))
    }

    pub fn highlight_phase(&self, region: Region) -> Option<Phase> {
        self.highlights.get(&region).map(Highlight::phase)
    }

    /// One scan pass. Retries itself on a short delay while the page may
    /// still be filling in; gives up (observably) after the configured
    /// attempt cap. Once bound, never rescans.
    fn try_discover(&mut self) -> Option<Action> {
        let attempts = match self.discovery {
            DiscoveryState::Scanning { attempts } => attempts,
            _ => return None,
        };

        let scanned = Bindings::scan(&self.page);
        for region in Region::ALL {
            if self.bindings.get(region).is_none() {
                if let Some(id) = scanned.get(region) {
                    self.bindings.bind(region, id);
                }
            }
        }

        if self.bindings.is_ready() {
            for region in Region::ALL {
                if let Some(id) = self.bindings.get(region) {
                    self.page.mark(id);
                }
            }
            self.discovery = DiscoveryState::Bound;
            log::info!("display regions bound after {} scans", attempts + 1);
            // run the clock once immediately; the 1s cadence takes over
            self.refresh_clock(Local::now(), Instant::now());
            return Some(Action::DiscoveryComplete);
        }

        let attempts = attempts + 1;
        if attempts >= self.config.discovery_max_attempts {
            self.discovery = DiscoveryState::Failed;
            log::warn!("discovery gave up after {attempts} scans; display will not update");
            return Some(Action::DiscoveryFailed);
        }

        self.discovery = DiscoveryState::Scanning { attempts };
        if let Some(tx) = self.command_tx.clone() {
            let delay = Duration::from_millis(self.config.discovery_retry_ms);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = tx.send(Action::Discover);
            });
        }
        None
    }

    pub fn refresh_clock(&mut self, now: DateTime<Local>, at: Instant) {
        self.write(Region::Time, clock::hours_minutes(&now), Some(at));
        self.write(Region::Seconds, clock::seconds(&now), None);
        self.write(Region::Date, clock::long_date(&now), None);
        let greeting = format!("{}, {}!", clock::greeting(now.hour()), self.user_name);
        self.write(Region::Greeting, greeting, Some(at));
        self.advance_highlights(at);
    }

    /// Applies whatever the payload carries; absent fields leave the
    /// corresponding region untouched.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot, at: Instant) {
        if let Some(name) = &snapshot.user_name {
            self.user_name = name.clone();
        }
        if let Some(weather) = &snapshot.weather {
            self.write(Region::Weather, weather.line(), Some(at));
        }
        if let Some(traffic) = &snapshot.traffic {
            self.write(Region::Traffic, traffic.line(), Some(at));
        }
        if let Some(quote) = &snapshot.quote {
            self.write(Region::Quote, quote.clone(), Some(at));
        }
    }

    fn write(&mut self, region: Region, text: String, highlight: Option<Instant>) {
        let Some(id) = self.bindings.get(region) else {
            return;
        };
        self.page.set_text(id, text);
        if let Some(at) = highlight {
            self.highlights.insert(region, Highlight::begin(at));
        }
    }

    fn advance_highlights(&mut self, now: Instant) {
        for highlight in self.highlights.values_mut() {
            highlight.advance(now);
        }
    }
}

impl Component for Updater {
    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        self.command_tx = Some(tx);
        Ok(())
    }

    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.config = config;
        Ok(())
    }

    fn init(&mut self, _area: Size) -> Result<()> {
        if let Some(tx) = &self.command_tx {
            tx.send(Action::Discover)?;
        }
        Ok(())
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                if self.discovery == DiscoveryState::Bound {
                    self.refresh_clock(Local::now(), Instant::now());
                }
            }
            Action::Render => self.advance_highlights(Instant::now()),
            Action::Discover => return Ok(self.try_discover()),
            Action::FetchSucceeded(snapshot) => {
                self.apply_snapshot(&snapshot, Instant::now());
                self.snapshot = Some(snapshot);
            }
            Action::FetchFailed(reason) => {
                log::warn!("keeping last good data after failed fetch: {reason}");
                if let Some(snapshot) = self.snapshot.clone() {
                    self.apply_snapshot(&snapshot, Instant::now());
                }
            }
            _ => {}
        };

        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let mut lines: Vec<Line> = Vec::new();
        for (id, element) in self.page.iter() {
            let mut style = match element.kind {
                ElementKind::Heading1 => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ElementKind::Heading2 => Style::default().add_modifier(Modifier::BOLD),
                ElementKind::Heading3 => Style::default().fg(Color::Gray),
                ElementKind::Paragraph => Style::default(),
                ElementKind::Inline => Style::default().add_modifier(Modifier::DIM),
            };
            if element.italic {
                style = style.add_modifier(Modifier::ITALIC);
            }
            if let Some(region) = self.bindings.region_of(id) {
                if let Some(highlight) = self.highlights.get(&region) {
                    style = style.patch(highlight.style());
                }
            }

            let span = Span::styled(element.text.clone(), style);
            if element.kind == ElementKind::Inline {
                if let Some(last) = lines.last_mut() {
                    last.spans.push(span);
                    continue;
                }
            }
            lines.push(Line::from(span));
        }

        let height = (lines.len() as u16).min(area.height);
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .areas(area);
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), middle);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::page::Element;

    fn bound_updater() -> Updater {
        let mut updater = Updater::new(Config::default());
        let action = updater.update(Action::Discover).expect("update succeeds");
        assert_eq!(action, Some(Action::DiscoveryComplete));
        updater
    }

    #[test]
    fn test_discover_binds_and_reports_complete() {
        let updater = bound_updater();
        assert_eq!(updater.discovery(), DiscoveryState::Bound);
    }

    #[test]
    fn test_discover_never_rescans_once_bound() {
        let mut updater = bound_updater();
        let action = updater.update(Action::Discover).expect("update succeeds");
        assert_eq!(action, None);
        assert_eq!(updater.discovery(), DiscoveryState::Bound);
    }

    #[test]
    fn test_discover_bounded_retry_fails_observably() {
        let mut config = Config::default();
        config.discovery_max_attempts = 3;
        let mut updater = Updater::with_page(config, Page::new());

        for _ in 0..2 {
            let action = updater.update(Action::Discover).expect("update succeeds");
            assert_eq!(action, None);
        }
        let action = updater.update(Action::Discover).expect("update succeeds");
        assert_eq!(action, Some(Action::DiscoveryFailed));
        assert_eq!(updater.discovery(), DiscoveryState::Failed);

        // terminal state; further scans are no-ops
        let action = updater.update(Action::Discover).expect("update succeeds");
        assert_eq!(action, None);
    }

    #[test]
    fn test_refresh_clock_writes_all_time_regions() {
        let mut updater = bound_updater();
        let now = Local
            .with_ymd_and_hms(2025, 6, 2, 9, 5, 7)
            .single()
            .expect("valid time");
        updater.refresh_clock(now, Instant::now());

        assert_eq!(updater.region_text(Region::Time), Some("09:05"));
        assert_eq!(updater.region_text(Region::Seconds), Some(":07"));
        assert_eq!(updater.region_text(Region::Date), Some("Monday, June 2, 2025"));
        assert_eq!(
            updater.region_text(Region::Greeting),
            Some("Good Morning, User!")
        );
    }

    #[test]
    fn test_snapshot_user_name_flows_into_greeting() {
        let mut updater = bound_updater();
        let snapshot = Snapshot {
            user_name: Some("Deepak".into()),
            ..Snapshot::default()
        };
        updater
            .update(Action::FetchSucceeded(snapshot))
            .expect("update succeeds");

        let evening = Local
            .with_ymd_and_hms(2025, 6, 2, 18, 0, 0)
            .single()
            .expect("valid time");
        updater.refresh_clock(evening, Instant::now());
        assert_eq!(
            updater.region_text(Region::Greeting),
            Some("Good Evening, Deepak!")
        );
    }

    #[test]
    fn test_apply_snapshot_formats_regions() {
        let mut updater = bound_updater();
        let snapshot: Snapshot = serde_json::from_str(
            r#"{
                "weather": {"location": "NYC", "temperature": "72F", "condition": "Sunny"},
                "traffic": {"status": "Heavy", "travelTime": "45min"},
                "quote": "Simplicity is the soul of efficiency."
            }"#,
        )
        .expect("valid payload");
        updater
            .update(Action::FetchSucceeded(snapshot))
            .expect("update succeeds");

        assert_eq!(
            updater.region_text(Region::Weather),
            Some("Weather: 72F, Sunny (NYC)")
        );
        assert_eq!(
            updater.region_text(Region::Traffic),
            Some("Traffic: Heavy (45min) - Unknown")
        );
        assert_eq!(
            updater.region_text(Region::Quote),
            Some("Simplicity is the soul of efficiency.")
        );
    }

    #[test]
    fn test_absent_payload_fields_leave_regions_untouched() {
        let mut updater = bound_updater();
        let full: Snapshot = serde_json::from_str(
            r#"{"weather": {"location": "NYC", "temperature": "72F", "condition": "Sunny"},
                "quote": "Make it work, make it right, make it fast."}"#,
        )
        .expect("valid payload");
        updater
            .update(Action::FetchSucceeded(full))
            .expect("update succeeds");

        let weather_only: Snapshot =
            serde_json::from_str(r#"{"weather": {"temperature": "60F", "condition": "Rain"}}"#)
                .expect("valid payload");
        updater
            .update(Action::FetchSucceeded(weather_only))
            .expect("update succeeds");

        assert_eq!(
            updater.region_text(Region::Weather),
            Some("Weather: 60F, Rain (Unknown)")
        );
        // quote absent from the second payload; previous text retained
        assert_eq!(
            updater.region_text(Region::Quote),
            Some("Make it work, make it right, make it fast.")
        );
    }

    #[test]
    fn test_failed_fetch_redisplays_last_snapshot() {
        let mut updater = bound_updater();
        let snapshot: Snapshot = serde_json::from_str(
            r#"{"weather": {"location": "NYC", "temperature": "72F", "condition": "Sunny"}}"#,
        )
        .expect("valid payload");
        updater
            .update(Action::FetchSucceeded(snapshot.clone()))
            .expect("update succeeds");

        updater
            .update(Action::FetchFailed("connection refused".into()))
            .expect("update succeeds");

        assert_eq!(
            updater.region_text(Region::Weather),
            Some("Weather: 72F, Sunny (NYC)")
        );
        assert_eq!(updater.snapshot(), Some(&snapshot));
    }

    #[test]
    fn test_first_fetch_failure_touches_nothing() {
        let mut updater = bound_updater();
        let before = updater.page().clone();

        updater
            .update(Action::FetchFailed("connection refused".into()))
            .expect("update succeeds");

        assert_eq!(updater.page(), &before);
        assert_eq!(updater.snapshot(), None);
    }

    #[test]
    fn test_missing_region_update_is_noop() {
        let mut page = Page::new();
        page.push(Element::new(ElementKind::Heading2, "10:00"));
        page.push(Element::new(ElementKind::Heading3, "Monday, June 2, 2025"));
        let mut updater = Updater::with_page(Config::default(), page);
        updater.update(Action::Discover).expect("update succeeds");

        let snapshot: Snapshot =
            serde_json::from_str(r#"{"quote": "A quote with nowhere to go, sadly."}"#)
                .expect("valid payload");
        updater
            .update(Action::FetchSucceeded(snapshot))
            .expect("update succeeds");

        assert_eq!(updater.region_text(Region::Quote), None);
    }

    #[test]
    fn test_highlight_phase_timing() {
        let start = Instant::now();
        let mut highlight = Highlight::begin(start);
        assert_eq!(highlight.phase(), Phase::Updating);

        highlight.advance(start + Duration::from_millis(50));
        assert_eq!(highlight.phase(), Phase::Updating);

        highlight.advance(start + Duration::from_millis(150));
        assert_eq!(highlight.phase(), Phase::Updated);

        highlight.advance(start + Duration::from_millis(400));
        assert_eq!(highlight.phase(), Phase::Updated);

        highlight.advance(start + Duration::from_millis(700));
        assert_eq!(highlight.phase(), Phase::Stable);
    }

    #[test]
    fn test_highlight_skips_straight_to_stable_after_long_gap() {
        let start = Instant::now();
        let mut highlight = Highlight::begin(start);
        highlight.advance(start + Duration::from_secs(2));
        assert_eq!(highlight.phase(), Phase::Stable);
    }

    #[test]
    fn test_write_sets_highlight_updating() {
        let mut updater = bound_updater();
        let snapshot: Snapshot = serde_json::from_str(
            r#"{"weather": {"location": "NYC", "temperature": "72F", "condition": "Sunny"}}"#,
        )
        .expect("valid payload");
        updater.apply_snapshot(&snapshot, Instant::now());
        assert_eq!(updater.highlight_phase(Region::Weather), Some(Phase::Updating));
    }

    #[test]
    fn test_explicit_bind_skips_heuristics() {
        let mut page = Page::new();
        let target = page.push(Element::new(ElementKind::Paragraph, "anything at all"));
        let mut updater = Updater::with_page(Config::default(), page);
        updater.bind(Region::Quote, target);

        let snapshot: Snapshot = serde_json::from_str(r#"{"quote": "Registered, not discovered."}"#)
            .expect("valid payload");
        updater.apply_snapshot(&snapshot, Instant::now());
        assert_eq!(
            updater.region_text(Region::Quote),
            Some("Registered, not discovered.")
        );
    }
}
