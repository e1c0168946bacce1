//! Live match reconciliation
//!
//! Each poll result is diffed against the last snapshot of every match.
//! Visible fragments are patched in place through [`LiveSurface`]; alerts fire
//! only when a known match changes score or status. The first observation of a
//! match is the baseline and never alerts.

use std::collections::HashMap;

use tracing::{debug, info};

use super::relevance::Relevance;
use crate::nav::{NodeId, ViewTree};
use crate::store::UserProfile;
use crate::types::Match;

/// Text slots of rendered match cards and the detail score box
pub mod slots {
    pub const HOME_SCORE: &str = "home_score";
    pub const AWAY_SCORE: &str = "away_score";
    pub const STATUS: &str = "status";
    pub const TRACKED: &str = "tracked";
    /// "1" while the match is in progress
    pub const LIVE: &str = "live";
    pub const SCORE: &str = "score";
}

/// Key of the rendered card(s) of a match
pub fn card_key(fixture_id: i64) -> String {
    format!("match-card-{}", fixture_id)
}

/// Key of the detail page score box
pub const DETAIL_SCORE_KEY: &str = "details-score";

/// Last seen state of a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub score: (u32, u32),
    pub status: String,
}

impl From<&Match> for Snapshot {
    fn from(m: &Match) -> Self {
        Self {
            score: m.goals.pair(),
            status: m.fixture.status.short.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Goal,
    FullTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveAlert {
    pub kind: AlertKind,
    pub title: String,
    pub description: String,
    pub fixture: Match,
    /// Silent alerts are shown but never take focus
    pub silent: bool,
}

impl LiveAlert {
    pub fn goal(fixture: &Match, silent: bool) -> Self {
        Self {
            kind: AlertKind::Goal,
            title: "GOAL!".to_string(),
            description: "Goal!".to_string(),
            fixture: fixture.clone(),
            silent,
        }
    }

    pub fn full_time(fixture: &Match, silent: bool) -> Self {
        Self {
            kind: AlertKind::FullTime,
            title: "Full Time".to_string(),
            description: format!("Finished: {}", fixture.goals.compact()),
            fixture: fixture.clone(),
            silent,
        }
    }

    pub fn fixture_id(&self) -> i64 {
        self.fixture.id()
    }
}

/// View operations the reconciler needs from the front-end
pub trait LiveSurface {
    /// Match shown on the detail page
    fn open_match(&self) -> Option<i64>;

    fn has_cards(&self, fixture_id: i64) -> bool;

    /// Update score and status text of every card of the match
    fn patch_cards(&mut self, fixture: &Match);

    /// Update the detail page score box
    fn patch_detail(&mut self, fixture: &Match);

    /// Replace the cached record of a rendered match
    fn update_rendered(&mut self, fixture: &Match);

    fn remove_track_indicator(&mut self, fixture_id: i64);
}

/// Outcome of one reconciliation pass
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub alerts: Vec<LiveAlert>,
    /// Matches whose tracking ended (profile needs saving)
    pub untracked: Vec<i64>,
    pub relevant: usize,
}

#[derive(Debug, Default)]
pub struct LiveReconciler {
    snapshots: HashMap<i64, Snapshot>,
}

impl LiveReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, fixture_id: i64) -> Option<&Snapshot> {
        self.snapshots.get(&fixture_id)
    }

    pub fn reconcile(
        &mut self,
        matches: &[Match],
        profile: &mut UserProfile,
        allowed_leagues: &[i64],
        surface: &mut dyn LiveSurface,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let open_match = surface.open_match();

        for m in matches {
            let id = m.id();
            let rendered = surface.has_cards(id);
            let relevance = Relevance {
                profile: &*profile,
                allowed_leagues,
                open_match,
            };
            let Some(reason) = relevance.reason(m, rendered) else {
                continue;
            };
            report.relevant += 1;
            let tracked = profile.is_tracked(id);

            surface.update_rendered(m);
            if rendered {
                surface.patch_cards(m);
            }
            if open_match == Some(id) {
                surface.patch_detail(m);
            }

            let current = Snapshot::from(m);
            let Some(previous) = self.snapshots.insert(id, current.clone()) else {
                debug!("LIVE: baseline for {} ({:?})", id, reason);
                continue;
            };

            if previous.score != current.score {
                info!("LIVE: goal in {} ({} -> {})", id, fmt_score(previous.score), m.goals.compact());
                report.alerts.push(LiveAlert::goal(m, !tracked));
            }
            if previous.status != current.status && m.fixture.status.is_finished() {
                info!("LIVE: full time in {} ({})", id, m.goals.compact());
                report.alerts.push(LiveAlert::full_time(m, !tracked));
                if tracked {
                    profile.untrack(id);
                    surface.remove_track_indicator(id);
                    report.untracked.push(id);
                }
            }
        }
        report
    }
}

/// Value of the [`slots::LIVE`] slot for a match
pub fn live_flag(fixture: &Match) -> &'static str {
    if fixture.fixture.status.is_live() {
        "1"
    } else {
        ""
    }
}

fn fmt_score(score: (u32, u32)) -> String {
    format!("{}-{}", score.0, score.1)
}

/// [`LiveSurface`] over a rendered [`ViewTree`]
pub struct TreeSurface<'a> {
    pub tree: &'a mut ViewTree,
    /// Records of the matches currently rendered
    pub rendered: &'a mut Vec<Match>,
    pub open_match: Option<i64>,
}

impl TreeSurface<'_> {
    fn cards(&self, fixture_id: i64) -> Vec<NodeId> {
        self.tree.find_by_key(&card_key(fixture_id))
    }
}

impl LiveSurface for TreeSurface<'_> {
    fn open_match(&self) -> Option<i64> {
        self.open_match
    }

    fn has_cards(&self, fixture_id: i64) -> bool {
        !self.cards(fixture_id).is_empty()
    }

    fn patch_cards(&mut self, fixture: &Match) {
        let (home, away) = fixture.goals.pair();
        let status = fixture.fixture.status.display_text();
        for card in self.cards(fixture.id()) {
            let mut changed = self.tree.set_slot(card, slots::HOME_SCORE, &home.to_string());
            changed |= self.tree.set_slot(card, slots::AWAY_SCORE, &away.to_string());
            changed |= self.tree.set_slot(card, slots::STATUS, &status);
            changed |= self.tree.set_slot(card, slots::LIVE, live_flag(fixture));
            if changed {
                debug!("LIVE: patched card {:?}", card);
            }
        }
    }

    fn patch_detail(&mut self, fixture: &Match) {
        let status = fixture.fixture.status.display_text();
        for node in self.tree.find_by_key(DETAIL_SCORE_KEY) {
            self.tree.set_slot(node, slots::SCORE, &fixture.goals.display());
            self.tree.set_slot(node, slots::STATUS, &status);
        }
    }

    fn update_rendered(&mut self, fixture: &Match) {
        for rendered in self.rendered.iter_mut().filter(|r| r.id() == fixture.id()) {
            *rendered = fixture.clone();
        }
    }

    fn remove_track_indicator(&mut self, fixture_id: i64) {
        for card in self.cards(fixture_id) {
            self.tree.remove_slot(card, slots::TRACKED);
        }
    }
}
