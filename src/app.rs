use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use crate::{
    action::Action,
    components::{Component, Indicators, Updater},
    config::Config,
    fetch::{FetchOutcome, Fetcher},
    tui,
};

pub struct App {
    pub config: Config,
    pub tick_rate: f64,
    pub frame_rate: f64,
    pub components: Vec<Box<dyn Component>>,
    pub should_quit: bool,
    pub should_suspend: bool,
}

impl App {
    pub fn new(config: Config, tick_rate: f64, frame_rate: f64) -> Result<Self> {
        let updater = Updater::new(config.clone());
        let indicators = Indicators::new();
        Ok(Self {
            tick_rate,
            frame_rate,
            components: vec![Box::new(updater), Box::new(indicators)],
            should_quit: false,
            should_suspend: false,
            config,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let mut tui = tui::Tui::new()?
            .tick_rate(self.tick_rate)
            .frame_rate(self.frame_rate);
        tui.enter()?;

        for component in self.components.iter_mut() {
            component.register_action_handler(action_tx.clone())?;
        }

        for component in self.components.iter_mut() {
            component.register_config_handler(self.config.clone())?;
        }

        for component in self.components.iter_mut() {
            component.init(tui.size()?)?;
        }

        // started once discovery completes, mirroring the page lifecycle
        let mut fetch_rx: Option<mpsc::UnboundedReceiver<FetchOutcome>> = None;
        let mut fetch_stop: Option<mpsc::UnboundedSender<()>> = None;

        loop {
            if let Some(e) = tui.next().await {
                match e {
                    tui::Event::Quit => action_tx.send(Action::Quit)?,
                    tui::Event::Tick => action_tx.send(Action::Tick)?,
                    tui::Event::Render => action_tx.send(Action::Render)?,
                    tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
                    tui::Event::Key(key) => {
                        action_tx.send(Action::Key(key))?;
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => action_tx.send(Action::Quit)?,
                            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                                action_tx.send(Action::Quit)?
                            }
                            KeyCode::Char('z') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                                action_tx.send(Action::Suspend)?
                            }
                            _ => {}
                        }
                    }
                    _ => {}
                }
                for component in self.components.iter_mut() {
                    if let Some(action) = component.handle_events(Some(e.clone()))? {
                        action_tx.send(action)?;
                    }
                }
            }

            if let Some(rx) = fetch_rx.as_mut() {
                while let Ok(outcome) = rx.try_recv() {
                    let action = match outcome {
                        FetchOutcome::Started => Action::FetchStarted,
                        FetchOutcome::Succeeded(snapshot) => Action::FetchSucceeded(snapshot),
                        FetchOutcome::Failed(reason) => Action::FetchFailed(reason),
                    };
                    action_tx.send(action)?;
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                if action != Action::Tick && action != Action::Render {
                    log::debug!("{action:?}");
                }
                match action {
                    Action::Quit => self.should_quit = true,
                    Action::Suspend => self.should_suspend = true,
                    Action::Resume => self.should_suspend = false,
                    Action::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, w, h))?;
                        tui.draw(|f| {
                            for component in self.components.iter_mut() {
                                let r = component.draw(f, f.area());
                                if let Err(e) = r {
                                    let _ = action_tx
                                        .send(Action::Error(format!("Failed to draw: {e:?}")));
                                }
                            }
                        })?;
                    }
                    Action::Render => {
                        tui.draw(|f| {
                            for component in self.components.iter_mut() {
                                let r = component.draw(f, f.area());
                                if let Err(e) = r {
                                    let _ = action_tx
                                        .send(Action::Error(format!("Failed to draw: {e:?}")));
                                }
                            }
                        })?;
                    }
                    Action::DiscoveryComplete => {
                        if fetch_rx.is_none() {
                            let (rx, stop_tx, fetcher) = Fetcher::new(
                                self.config.endpoint.clone(),
                                Duration::from_secs(self.config.data_refresh_secs),
                                Duration::from_secs(self.config.request_timeout_secs),
                            );
                            fetcher.run();
                            fetch_rx = Some(rx);
                            fetch_stop = Some(stop_tx);
                            log::info!("data refresh started against {}", self.config.endpoint);
                        }
                    }
                    Action::DiscoveryFailed => {
                        log::warn!("no display regions found; running clockless");
                    }
                    Action::Error(ref msg) => {
                        log::error!("{msg}");
                    }
                    _ => {}
                }
                for component in self.components.iter_mut() {
                    if let Some(action) = component.update(action.clone())? {
                        action_tx.send(action)?
                    };
                }
            }

            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(Action::Resume)?;
                tui = tui::Tui::new()?
                    .tick_rate(self.tick_rate)
                    .frame_rate(self.frame_rate);
                tui.enter()?;
            } else if self.should_quit {
                if let Some(stop) = &fetch_stop {
                    let _ = stop.send(());
                }
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }
}
