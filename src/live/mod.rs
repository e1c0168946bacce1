pub mod alerts;
pub mod poller;
pub mod reconciler;
pub mod relevance;

pub use alerts::{enrich_goal_description, AlertOverlay, RefreshCountdown};
pub use poller::{poll_once, spawn, PollEvent, PollSettings, PollerHandle};
pub use reconciler::{
    card_key, AlertKind, LiveAlert, LiveReconciler, LiveSurface, ReconcileReport, Snapshot, TreeSurface,
};
pub use relevance::{needs_refresh, MatchTiming, Reason, Relevance};
