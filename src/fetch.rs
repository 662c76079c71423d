//! Periodic remote data refresh.
//!
//! A single task owns the whole cycle: each request is awaited to
//! completion before the next interval tick, so two fetches can never be
//! in flight at once. Outcomes are reported over an unbounded channel and
//! pumped into actions by the app loop.

use std::time::Duration;

use color_eyre::eyre::ErrReport;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::snapshot::Snapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Started,
    Succeeded(Snapshot),
    Failed(String),
}

pub struct Fetcher {
    endpoint: String,
    interval: Duration,
    timeout: Duration,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    terminate_rx: mpsc::UnboundedReceiver<()>,
}

type NewFetcher = (
    mpsc::UnboundedReceiver<FetchOutcome>,
    mpsc::UnboundedSender<()>,
    Fetcher,
);

impl Fetcher {
    pub fn new(endpoint: String, interval: Duration, timeout: Duration) -> NewFetcher {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (terminate_tx, terminate_rx) = mpsc::unbounded_channel();

        (
            outcome_rx,
            terminate_tx,
            Self {
                endpoint,
                interval,
                timeout,
                outcome_tx,
                terminate_rx,
            },
        )
    }

    pub fn run(mut self) {
        tokio::spawn(async move {
            let client = reqwest::Client::builder().timeout(self.timeout).build()?;
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.outcome_tx.send(FetchOutcome::Started)?;
                        let outcome = Self::fetch_once(&client, &self.endpoint).await;
                        if let FetchOutcome::Failed(ref reason) = outcome {
                            log::warn!("data fetch failed: {reason}");
                        }
                        self.outcome_tx.send(outcome)?;
                    }
                    _ = self.terminate_rx.recv() => break,
                }
            }

            Ok::<(), ErrReport>(())
        });
    }

    async fn fetch_once(client: &reqwest::Client, endpoint: &str) -> FetchOutcome {
        match client.get(endpoint).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<Snapshot>().await {
                    Ok(snapshot) => FetchOutcome::Succeeded(snapshot),
                    Err(e) => FetchOutcome::Failed(format!("invalid payload: {e}")),
                }
            }
            Ok(response) => FetchOutcome::Failed(format!("HTTP {}", response.status())),
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }
}
