//! Heuristic binding of display regions to page elements.
//!
//! Regions are located by matching element text (and, for the quote, its
//! italic styling plus a minimum length) against a fixed pattern set.
//! Pages that know their own layout can skip the heuristic and call
//! [`Bindings::bind`] directly.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::page::{Element, ElementId, ElementKind, Page};

lazy_static! {
    static ref TIME_RE: Regex = Regex::new(r"\d{1,2}:\d{2}").expect("valid regex");
    static ref SECONDS_RE: Regex = Regex::new(r"^:\d{2}$").expect("valid regex");
    static ref DATE_RE: Regex =
        Regex::new(r"\d{1,2}/\d{1,2}/\d{4}|\w+ \d{1,2}, \d{4}").expect("valid regex");
    static ref GREETING_RE: Regex = Regex::new(r"(?i)^(good|hello|hi|welcome)").expect("valid regex");
}

/// Quotes are recognized by italic styling plus text longer than this.
const QUOTE_MIN_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Time,
    Seconds,
    Date,
    Greeting,
    Weather,
    Traffic,
    Quote,
}

impl Region {
    pub const ALL: [Self; 7] = [
        Self::Time,
        Self::Seconds,
        Self::Date,
        Self::Greeting,
        Self::Weather,
        Self::Traffic,
        Self::Quote,
    ];
}

/// True when `element` is a plausible display target for `region`.
pub fn matches(region: Region, element: &Element) -> bool {
    let text = element.text.as_str();
    match region {
        Region::Time => element.kind == ElementKind::Heading2 && TIME_RE.is_match(text),
        Region::Seconds => element.kind == ElementKind::Inline && SECONDS_RE.is_match(text),
        Region::Date => element.kind == ElementKind::Heading3 && DATE_RE.is_match(text),
        Region::Greeting => element.kind == ElementKind::Heading1 && GREETING_RE.is_match(text),
        Region::Weather => element.kind == ElementKind::Paragraph && text.contains("Weather:"),
        Region::Traffic => element.kind == ElementKind::Paragraph && text.contains("Traffic:"),
        Region::Quote => {
            element.kind == ElementKind::Paragraph && element.italic && text.len() > QUOTE_MIN_LEN
        }
    }
}

/// Which page element each display region writes into. A missing entry
/// makes that kind of update a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    targets: HashMap<Region, ElementId>,
}

impl Bindings {
    /// Explicit registration; wins over any later heuristic scan.
    pub fn bind(&mut self, region: Region, id: ElementId) {
        self.targets.entry(region).or_insert(id);
    }

    pub fn get(&self, region: Region) -> Option<ElementId> {
        self.targets.get(&region).copied()
    }

    /// Discovery is considered successful once both a time-shaped and a
    /// date-shaped element are bound.
    pub fn is_ready(&self) -> bool {
        self.targets.contains_key(&Region::Time) && self.targets.contains_key(&Region::Date)
    }

    pub fn region_of(&self, id: ElementId) -> Option<Region> {
        self.targets
            .iter()
            .find(|(_, bound)| **bound == id)
            .map(|(region, _)| *region)
    }

    /// Scans the page in element order; the first element matching each
    /// pattern is bound as that region's target.
    pub fn scan(page: &Page) -> Self {
        let mut bindings = Self::default();
        for (id, element) in page.iter() {
            for region in Region::ALL {
                if bindings.get(region).is_none() && matches(region, element) {
                    bindings.bind(region, id);
                }
            }
        }
        bindings
    }
}

/// Discovery lifecycle. Retries are bounded; exhausting them is an
/// observable terminal state rather than silent endless polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    Scanning { attempts: u64 },
    Bound,
    Failed,
}
