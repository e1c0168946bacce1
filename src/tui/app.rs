//! Application state for the terminal front-end
//!
//! [`App`] owns the view tree and the navigation context. Everything that
//! mutates the tree (key handling, poll results, async load results) goes
//! through `&mut App` on the UI loop, so patches and focus moves never
//! interleave.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::layout::{
    self, actions, alert_overlay, build_shell, confirm_modal, detail_body, detail_page, favorites_page, home_page,
    league_body, league_page, live_page, DetailData, DetailTab, LeagueData, LeagueTab, Shell, SidebarEntry,
    DESCRIPTION_SLOT,
};
use crate::cache::{fetch_events_cached, fetch_fixtures_cached};
use crate::config::Config;
use crate::data_provider::FootballDataProvider;
use crate::live::reconciler::{card_key, slots};
use crate::live::{
    enrich_goal_description, AlertOverlay, LiveAlert, LiveReconciler, MatchTiming, PollEvent, RefreshCountdown,
    TreeSurface,
};
use crate::nav::{
    normalize, Activation, ElementKind, Key, KeyOutcome, NavKey, NavigationContext, NodeId, RawKey, Rect,
    ScrollSettings, ViewTree,
};
use crate::store::{Favorite, ProfileStore, UserProfile};
use crate::types::{
    season_for, FixtureEvent, League, LeagueStandings, Match, PlayerLeader, Prediction, TeamLineup, TeamStatistics,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Live,
    Favorites,
    Detail { fixture_id: i64, tab: DetailTab },
    League { league_id: i64, tab: LeagueTab },
}

/// Results of background loads, delivered to the UI loop
#[derive(Debug)]
pub enum AppMessage {
    Fixtures(NaiveDate, Result<Vec<Match>, String>),
    Live(Result<Vec<Match>, String>),
    Events(i64, Result<Vec<FixtureEvent>, String>),
    Lineups(i64, Result<Vec<TeamLineup>, String>),
    Statistics(i64, Result<Vec<TeamStatistics>, String>),
    Predictions(i64, Result<Vec<Prediction>, String>),
    Standings(i64, Result<Vec<LeagueStandings>, String>),
    /// Top scorers or top assists of a league
    Leaders(i64, LeagueTab, Result<Vec<PlayerLeader>, String>),
    GoalDescription(i64, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

pub struct App {
    pub config: Config,
    provider: Arc<dyn FootballDataProvider>,
    store: Arc<dyn ProfileStore>,
    messages: mpsc::UnboundedSender<AppMessage>,
    scroll_settings: ScrollSettings,

    pub profile: UserProfile,
    pub tree: ViewTree,
    pub nav: NavigationContext,
    pub shell: Shell,
    viewport: Rect,

    pub screen: Screen,
    entry: SidebarEntry,
    history: Vec<Screen>,
    pub date: NaiveDate,
    day: Option<Vec<Match>>,
    live: Option<Vec<Match>>,
    detail: Option<Match>,
    details: HashMap<i64, DetailData>,
    league: Option<League>,
    leagues: HashMap<i64, LeagueData>,
    /// Matches with cards (or the detail page) on screen
    rendered: Vec<Match>,
    rendered_dirty: bool,
    /// Focus fell back to the sidebar because the content had nothing focusable
    parked: bool,

    reconciler: LiveReconciler,
    pub overlay: AlertOverlay,
    alert_node: Option<NodeId>,
    modal: Option<NodeId>,
    pub countdown: RefreshCountdown,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
    pub refresh_requested: bool,
}

impl App {
    pub fn new(
        config: Config,
        provider: Arc<dyn FootballDataProvider>,
        store: Arc<dyn ProfileStore>,
        messages: mpsc::UnboundedSender<AppMessage>,
        size: (u16, u16),
        now_ms: u64,
    ) -> Self {
        let profile = match store.load(&config.user_id) {
            Ok(profile) => profile,
            Err(e) => {
                warn!("STORE: failed to load profile {}: {}", config.user_id, e);
                UserProfile::default()
            }
        };
        let scroll_settings = config.scroll.settings();
        let viewport = Rect::new(0.0, 0.0, size.0 as f64, size.1 as f64);
        let mut tree = ViewTree::new();
        let shell = build_shell(&mut tree, viewport.width, viewport.height);
        let interval_ms = config.refresh_interval as u64 * 1000;
        let alert_ms = config.alert_duration_secs as u64 * 1000;

        let mut app = Self {
            config,
            provider,
            store,
            messages,
            scroll_settings,
            profile,
            tree,
            nav: NavigationContext::new(scroll_settings),
            shell,
            viewport,
            screen: Screen::Home,
            entry: SidebarEntry::Home,
            history: Vec::new(),
            date: Utc::now().date_naive(),
            day: None,
            live: None,
            detail: None,
            details: HashMap::new(),
            league: None,
            leagues: HashMap::new(),
            rendered: Vec::new(),
            rendered_dirty: true,
            parked: false,
            reconciler: LiveReconciler::new(),
            overlay: AlertOverlay::new(alert_ms),
            alert_node: None,
            modal: None,
            countdown: RefreshCountdown::new(interval_ms, now_ms),
            status: None,
            should_quit: false,
            refresh_requested: false,
        };
        app.mark_sidebar();
        app.rebuild();
        app
    }

    /// Start loading whatever the current screen needs
    pub fn load(&self) {
        match self.screen {
            Screen::Home | Screen::Favorites => self.spawn_fixtures(self.date),
            Screen::Live => self.spawn_live(),
            Screen::Detail { fixture_id, tab } => {
                let loaded = self.details.get(&fixture_id).is_some_and(|d| !d.missing(tab));
                // Events change during a match; the cache bounds how often they are fetched
                if tab == DetailTab::Events || !loaded {
                    self.spawn_detail(fixture_id, tab);
                }
            }
            Screen::League { league_id, tab } => {
                if self.leagues.get(&league_id).map_or(true, |l| l.missing(tab)) {
                    self.spawn_league(league_id, tab);
                }
            }
        }
    }

    fn spawn_fixtures(&self, date: NaiveDate) {
        let provider = Arc::clone(&self.provider);
        let tx = self.messages.clone();
        tokio::spawn(async move {
            let result = fetch_fixtures_cached(provider.as_ref(), date)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppMessage::Fixtures(date, result));
        });
    }

    fn spawn_live(&self) {
        let provider = Arc::clone(&self.provider);
        let tx = self.messages.clone();
        tokio::spawn(async move {
            let result = provider.live_matches().await.map_err(|e| e.to_string());
            let _ = tx.send(AppMessage::Live(result));
        });
    }

    fn spawn_detail(&self, fixture_id: i64, tab: DetailTab) {
        let provider = Arc::clone(&self.provider);
        let tx = self.messages.clone();
        tokio::spawn(async move {
            let provider = provider.as_ref();
            let message = match tab {
                DetailTab::Events => AppMessage::Events(
                    fixture_id,
                    fetch_events_cached(provider, fixture_id).await.map_err(|e| e.to_string()),
                ),
                DetailTab::Lineups => AppMessage::Lineups(
                    fixture_id,
                    provider.fixture_lineups(fixture_id).await.map_err(|e| e.to_string()),
                ),
                DetailTab::Statistics => AppMessage::Statistics(
                    fixture_id,
                    provider.fixture_statistics(fixture_id).await.map_err(|e| e.to_string()),
                ),
                DetailTab::Predictions => AppMessage::Predictions(
                    fixture_id,
                    provider.predictions(fixture_id).await.map_err(|e| e.to_string()),
                ),
                DetailTab::Details => return,
            };
            let _ = tx.send(message);
        });
    }

    fn spawn_league(&self, league_id: i64, tab: LeagueTab) {
        let provider = Arc::clone(&self.provider);
        let tx = self.messages.clone();
        let season = season_for(self.date);
        tokio::spawn(async move {
            let provider = provider.as_ref();
            let message = match tab {
                LeagueTab::Standings => AppMessage::Standings(
                    league_id,
                    provider.standings(league_id, season).await.map_err(|e| e.to_string()),
                ),
                LeagueTab::TopScorers => AppMessage::Leaders(
                    league_id,
                    tab,
                    provider.top_scorers(league_id, season).await.map_err(|e| e.to_string()),
                ),
                LeagueTab::TopAssists => AppMessage::Leaders(
                    league_id,
                    tab,
                    provider.top_assists(league_id, season).await.map_err(|e| e.to_string()),
                ),
            };
            let _ = tx.send(message);
        });
    }

    fn spawn_enrichment(&self, alert: LiveAlert) {
        let provider = Arc::clone(&self.provider);
        let tx = self.messages.clone();
        tokio::spawn(async move {
            if let Some(description) = enrich_goal_description(provider.as_ref(), &alert).await {
                let _ = tx.send(AppMessage::GoalDescription(alert.fixture_id(), description));
            }
        });
    }

    // === rendering ===

    /// Rebuild the content area for the current screen
    pub fn rebuild(&mut self) {
        let content = self.shell.content;
        let area = self.shell.area;
        self.tree.clear_children(content);

        let mut shown: Vec<Match> = Vec::new();
        match self.screen {
            Screen::Home => match &self.day {
                Some(day) => {
                    home_page(&mut self.tree, content, area, self.date, day, &self.profile);
                    shown = day.clone();
                }
                None => layout::placeholder(&mut self.tree, content, area, area.y, "Loading fixtures..."),
            },
            Screen::Live => match &self.live {
                Some(live) => {
                    live_page(&mut self.tree, content, area, live, &self.profile);
                    shown = live.clone();
                }
                None => layout::placeholder(&mut self.tree, content, area, area.y, "Loading live matches..."),
            },
            Screen::Favorites => match &self.day {
                Some(day) => {
                    favorites_page(&mut self.tree, content, area, day, &self.profile);
                    shown = day
                        .iter()
                        .filter(|m| {
                            self.profile.is_tracked(m.id())
                                || self.profile.is_favorite_team(m.teams.home.id)
                                || self.profile.is_favorite_team(m.teams.away.id)
                        })
                        .cloned()
                        .collect();
                }
                None => layout::placeholder(&mut self.tree, content, area, area.y, "Loading favourites..."),
            },
            Screen::Detail { fixture_id, tab } => match &self.detail {
                Some(m) if m.id() == fixture_id => {
                    let data = self.details.get(&fixture_id).cloned().unwrap_or_default();
                    let body = detail_body(m, tab, &data);
                    detail_page(&mut self.tree, content, area, m, &self.profile, tab, &body);
                    shown = vec![m.clone()];
                }
                _ => layout::placeholder(&mut self.tree, content, area, area.y, "Match not available"),
            },
            Screen::League { league_id, tab } => match &self.league {
                Some(league) if league.id == league_id => {
                    let data = self.leagues.get(&league_id).cloned().unwrap_or_default();
                    let body = league_body(tab, &data);
                    league_page(&mut self.tree, content, area, league, &self.profile, tab, &body);
                }
                _ => layout::placeholder(&mut self.tree, content, area, area.y, "League not available"),
            },
        }
        debug!("RENDER: {:?} with {} matches", self.screen, shown.len());
        self.rendered = shown;
        self.rendered_dirty = true;
        self.nav.after_render(&mut self.tree);

        let first_in_content = self.tree.first_eligible(content);
        if self.parked && self.nav.scope(&self.tree).is_none() && self.focus_in_sidebar() {
            self.nav.focus(&mut self.tree, first_in_content, true);
        }
        self.parked = first_in_content.is_none();
    }

    fn focus_in_sidebar(&self) -> bool {
        self.nav
            .current(&self.tree)
            .and_then(|id| self.tree.get(id))
            .is_some_and(|n| n.membership.sidebar.is_some())
    }

    /// Terminal size changed: lay everything out again
    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Rect::new(0.0, 0.0, width as f64, height as f64);
        self.tree = ViewTree::new();
        self.shell = build_shell(&mut self.tree, self.viewport.width, self.viewport.height);
        self.nav = NavigationContext::new(self.scroll_settings);
        self.modal = None;
        self.alert_node = None;
        self.mark_sidebar();
        self.rebuild();
        if let Some(alert) = self.overlay.current().cloned() {
            self.place_alert(&alert);
        }
    }

    fn mark_sidebar(&mut self) {
        for (entry, id) in self.shell.items.clone() {
            self.tree.set_active(id, entry == self.entry);
        }
    }

    /// Kickoff and state of what is on screen, for the poller's relevance check
    pub fn take_timings(&mut self) -> Option<Vec<MatchTiming>> {
        if !self.rendered_dirty {
            return None;
        }
        self.rendered_dirty = false;
        Some(self.rendered.iter().map(MatchTiming::from).collect())
    }

    pub fn rendered(&self) -> &[Match] {
        &self.rendered
    }

    pub fn open_match(&self) -> Option<i64> {
        match self.screen {
            Screen::Detail { fixture_id, .. } => Some(fixture_id),
            _ => None,
        }
    }

    fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error,
        });
    }

    // === screens ===

    fn navigate(&mut self, entry: SidebarEntry) {
        self.entry = entry;
        self.history.clear();
        self.screen = match entry {
            SidebarEntry::Home => Screen::Home,
            SidebarEntry::Live => Screen::Live,
            SidebarEntry::Favorites => Screen::Favorites,
        };
        self.status = None;
        self.mark_sidebar();
        self.rebuild();
        self.load();
    }

    /// Every match record the app holds
    fn find_matches(&self) -> impl Iterator<Item = &Match> {
        self.rendered
            .iter()
            .chain(self.day.iter().flatten())
            .chain(self.live.iter().flatten())
            .chain(self.detail.iter())
            .chain(self.overlay.current().map(|a| &a.fixture))
    }

    fn find_match(&self, fixture_id: i64) -> Option<Match> {
        self.find_matches().find(|m| m.id() == fixture_id).cloned()
    }

    fn open_detail(&mut self, fixture_id: i64) {
        let Some(m) = self.find_match(fixture_id) else {
            debug!("NAV: no record for match {}", fixture_id);
            return;
        };
        if !matches!(self.screen, Screen::Detail { .. }) {
            self.history.push(self.screen);
        }
        self.detail = Some(m);
        self.screen = Screen::Detail {
            fixture_id,
            tab: DetailTab::Events,
        };
        self.rebuild();
        self.load();
    }

    fn find_league(&self, league_id: i64) -> Option<League> {
        self.league
            .iter()
            .chain(self.find_matches().map(|m| &m.league))
            .find(|l| l.id == league_id)
            .cloned()
    }

    fn open_league(&mut self, league_id: i64) {
        let Some(league) = self.find_league(league_id) else {
            debug!("NAV: no record for league {}", league_id);
            return;
        };
        if !matches!(self.screen, Screen::League { .. }) {
            self.history.push(self.screen);
        }
        self.league = Some(league);
        self.screen = Screen::League {
            league_id,
            tab: LeagueTab::default(),
        };
        self.rebuild();
        self.load();
    }

    fn select_tab(&mut self, index: i64) {
        self.screen = match self.screen {
            Screen::Detail { fixture_id, .. } => Screen::Detail {
                fixture_id,
                tab: DetailTab::from_index(index),
            },
            Screen::League { league_id, .. } => Screen::League {
                league_id,
                tab: LeagueTab::from_index(index),
            },
            _ => return,
        };
        self.rebuild();
        self.load();
    }

    fn go_back(&mut self) {
        if self.modal.is_some() {
            self.close_modal();
            return;
        }
        if let Screen::Detail { .. } | Screen::League { .. } = self.screen {
            self.screen = self.history.pop().unwrap_or(Screen::Home);
            self.rebuild();
            return;
        }
        let item = self.shell.item(self.entry);
        self.nav.focus(&mut self.tree, item, true);
    }

    fn shift_day(&mut self, days: i64) {
        let date = if days >= 0 {
            self.date.checked_add_days(Days::new(days as u64))
        } else {
            self.date.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(date) = date {
            self.set_date(date);
        }
    }

    fn set_date(&mut self, date: NaiveDate) {
        if date == self.date && self.day.is_some() {
            return;
        }
        info!("DATE: {}", date);
        self.date = date;
        self.day = None;
        if matches!(self.screen, Screen::Home | Screen::Favorites) {
            self.rebuild();
            self.load();
        }
    }

    // === profile ===

    fn save_profile(&mut self) {
        if let Err(e) = self.store.save(&self.config.user_id, &self.profile) {
            warn!("STORE: failed to save profile: {}", e);
            self.set_status(format!("Could not save profile: {}", e), true);
        }
    }

    fn toggle_track(&mut self, fixture_id: i64) {
        if self.profile.is_tracked(fixture_id) {
            self.profile.untrack(fixture_id);
        } else {
            let finished = self
                .find_match(fixture_id)
                .is_some_and(|m| m.fixture.status.is_finished());
            if finished {
                self.set_status("Match finished, cannot track", false);
                return;
            }
            self.profile.track(fixture_id);
        }
        self.save_profile();
        let tracked = self.profile.is_tracked(fixture_id);
        info!("STORE: match {} tracked={}", fixture_id, tracked);

        if self.screen == Screen::Favorites {
            self.rebuild();
            return;
        }
        for card in self.tree.find_by_key(&card_key(fixture_id)) {
            if tracked {
                self.tree.set_slot(card, slots::TRACKED, "●");
            } else {
                self.tree.remove_slot(card, slots::TRACKED);
            }
        }
        let label = if tracked { "● Tracking" } else { "○ Track" };
        self.relabel(actions::TOGGLE_TRACK, fixture_id, label.to_string());
    }

    fn toggle_favorite_team(&mut self, team_id: i64) {
        let name = self
            .find_team_name(team_id)
            .unwrap_or_else(|| format!("Team {}", team_id));
        if !self.profile.remove_favorite_team(team_id) {
            self.profile.add_favorite_team(Favorite::new(team_id, name.clone()));
        }
        self.save_profile();
        let star = if self.profile.is_favorite_team(team_id) { "★" } else { "☆" };
        self.relabel(actions::FAVORITE_TEAM, team_id, format!("{} {}", star, name));
    }

    fn toggle_favorite_league(&mut self, league_id: i64) {
        let name = self
            .find_league(league_id)
            .map(|l| l.name)
            .unwrap_or_else(|| format!("League {}", league_id));
        if !self.profile.remove_favorite_league(league_id) {
            self.profile.add_favorite_league(Favorite::new(league_id, name.clone()));
        }
        self.save_profile();
        let star = if self.profile.is_favorite_league(league_id) { "★" } else { "☆" };
        let label = format!("{} {}", star, name);
        // Row headers open the league and carry the star too
        self.relabel(actions::OPEN_LEAGUE, league_id, label.clone());
        self.relabel(actions::FAVORITE_LEAGUE, league_id, label);
    }

    fn find_team_name(&self, team_id: i64) -> Option<String> {
        self.rendered.iter().find_map(|m| {
            if m.teams.home.id == team_id {
                Some(m.teams.home.name.clone())
            } else if m.teams.away.id == team_id {
                Some(m.teams.away.name.clone())
            } else {
                None
            }
        })
    }

    /// Update the label of content elements bound to `action` / `id`
    fn relabel(&mut self, action: &str, id: i64, label: String) {
        for node_id in self.tree.descendants(self.shell.content) {
            if let Some(node) = self.tree.get_mut(node_id) {
                let bound = node
                    .activation
                    .as_ref()
                    .is_some_and(|a| a.action == action && a.id == Some(id));
                if bound {
                    node.label = label.clone();
                }
            }
        }
    }

    // === overlays ===

    fn open_modal(&mut self) {
        if let Some(old) = self.modal.take() {
            self.tree.remove(old);
        }
        let modal = confirm_modal(&mut self.tree, self.viewport);
        self.modal = Some(modal);
        self.nav.set_scope(&mut self.tree, Some(modal));
    }

    fn close_modal(&mut self) {
        if let Some(modal) = self.modal.take() {
            self.tree.remove(modal);
            self.nav.clear_scope_and_reanchor(&mut self.tree);
        }
    }

    /// Scope to return to once an alert goes away
    fn restore_scope(&mut self) {
        match self.modal {
            Some(modal) => self.nav.set_scope(&mut self.tree, Some(modal)),
            None => self.nav.clear_scope_and_reanchor(&mut self.tree),
        }
    }

    fn place_alert(&mut self, alert: &LiveAlert) {
        let node = alert_overlay(&mut self.tree, self.viewport, alert);
        self.alert_node = Some(node);
        if !alert.silent {
            self.nav.set_scope(&mut self.tree, Some(node));
        }
    }

    pub fn show_alert(&mut self, alert: LiveAlert, now_ms: u64) {
        let had_scope = self.remove_alert_node();
        info!("LIVE: alert {} {}", alert.title, alert.fixture_id());
        self.overlay.show(alert.clone(), now_ms);
        self.place_alert(&alert);
        if alert.silent && had_scope {
            self.restore_scope();
        }
        self.spawn_enrichment(alert);
    }

    /// Detach the alert overlay; true if it held the navigation scope
    fn remove_alert_node(&mut self) -> bool {
        let Some(node) = self.alert_node.take() else {
            return false;
        };
        let scoped = self.nav.scope(&self.tree) == Some(node);
        self.tree.remove(node);
        scoped
    }

    pub fn dismiss_alert(&mut self) {
        self.overlay.dismiss();
        if self.remove_alert_node() {
            self.restore_scope();
        }
    }

    // === input ===

    /// Key-down from the input source
    pub fn handle_key_down(&mut self, raw: &RawKey, now_ms: u64) {
        if normalize(raw) == Key::Nav(NavKey::Right) && self.leave_sidebar() {
            return;
        }
        match self.nav.handle_key_down(&mut self.tree, raw, now_ms) {
            KeyOutcome::Moved | KeyOutcome::Scrolled | KeyOutcome::Nothing => {}
            KeyOutcome::Activate(activation) => self.activate(&activation, now_ms),
            KeyOutcome::Back => self.go_back(),
            KeyOutcome::Unhandled(NavKey::ChannelUp) => self.shift_day(1),
            KeyOutcome::Unhandled(NavKey::ChannelDown) => self.shift_day(-1),
            KeyOutcome::Unhandled(NavKey::MediaPlayPause) => {
                if let Some(league_id) = self.focused_activation(ElementKind::RowHeader).and_then(|a| a.id) {
                    self.toggle_favorite_league(league_id);
                }
            }
            KeyOutcome::Unhandled(NavKey::Guide) => {
                if let Some(id) = self.focused_activation(ElementKind::Card).and_then(|a| a.id) {
                    self.toggle_track(id);
                }
            }
            KeyOutcome::Unhandled(_) => {}
            KeyOutcome::Passthrough(name) => match name.as_str() {
                "q" => self.should_quit = true,
                "r" => {
                    self.refresh_requested = true;
                    self.load();
                }
                _ => debug!("KEY: ignored {}", name),
            },
        }
    }

    pub fn handle_key_up(&mut self, raw: &RawKey) {
        self.nav.handle_key_up(raw);
    }

    /// Right from the sidebar enters the content area
    fn leave_sidebar(&mut self) -> bool {
        if self.nav.scope(&self.tree).is_some() {
            return false;
        }
        if !self.focus_in_sidebar() {
            return false;
        }
        let target = self.tree.first_eligible(self.shell.content);
        self.nav.focus(&mut self.tree, target, true);
        target.is_some()
    }

    fn focused_activation(&self, kind: ElementKind) -> Option<Activation> {
        let node = self.nav.current(&self.tree).and_then(|id| self.tree.get(id))?;
        if node.element_kind() != Some(kind) {
            return None;
        }
        node.activation.clone()
    }

    fn activate(&mut self, activation: &Activation, now_ms: u64) {
        debug!("ACTION: {} {:?}", activation.action, activation.id);
        let id = activation.id;
        match (activation.action.as_str(), id) {
            (actions::NAV_HOME, _) => self.navigate(SidebarEntry::Home),
            (actions::NAV_LIVE, _) => self.navigate(SidebarEntry::Live),
            (actions::NAV_FAVORITES, _) => self.navigate(SidebarEntry::Favorites),
            (actions::OPEN_MATCH, Some(fixture_id)) => {
                if self.alert_node.is_some_and(|n| self.nav.scope(&self.tree) == Some(n)) {
                    self.dismiss_alert();
                }
                self.open_detail(fixture_id);
            }
            (actions::PREV_DAY, _) => self.shift_day(-1),
            (actions::NEXT_DAY, _) => self.shift_day(1),
            (actions::TODAY, _) => self.set_date(Utc::now().date_naive()),
            (actions::OPEN_LEAGUE, Some(league_id)) => self.open_league(league_id),
            (actions::FAVORITE_LEAGUE, Some(league_id)) => self.toggle_favorite_league(league_id),
            (actions::FAVORITE_TEAM, Some(team_id)) => self.toggle_favorite_team(team_id),
            (actions::TOGGLE_TRACK, Some(fixture_id)) => self.toggle_track(fixture_id),
            (actions::TAB, Some(index)) => self.select_tab(index),
            (actions::BACK, _) => self.go_back(),
            (actions::UNTRACK_ALL, _) => self.open_modal(),
            (actions::CONFIRM_UNTRACK_ALL, _) => {
                self.profile.tracked_matches.clear();
                self.save_profile();
                self.close_modal();
                self.rebuild();
            }
            (actions::CLEAR_FAVORITE_TEAMS, _) => {
                self.profile.favorite_teams.clear();
                self.save_profile();
                self.rebuild();
            }
            (actions::CLOSE_MODAL, _) => self.close_modal(),
            (actions::DISMISS_ALERT, _) => self.dismiss_alert(),
            _ => debug!("ACTION: unhandled {:?} at {}", activation, now_ms),
        }
    }

    /// Advance timers: hold-scroll and alert expiry. Returns true if a redraw is needed.
    pub fn tick(&mut self, delta_ms: u64, now_ms: u64) -> bool {
        let mut changed = self.nav.tick(&mut self.tree, delta_ms, now_ms);
        if self.overlay.expire(now_ms) {
            if self.remove_alert_node() {
                self.restore_scope();
            }
            changed = true;
        }
        changed
    }

    // === data ===

    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::Fixtures(date, result) => {
                if date != self.date {
                    return;
                }
                let day = match result {
                    Ok(day) => day,
                    Err(e) => {
                        warn!("DATA: fixtures for {} failed: {}", date, e);
                        self.set_status(format!("Could not load fixtures: {}", e), true);
                        Vec::new()
                    }
                };
                self.day = Some(day);
                if matches!(self.screen, Screen::Home | Screen::Favorites) {
                    self.rebuild();
                }
            }
            AppMessage::Live(result) => {
                let live = match result {
                    Ok(live) => live,
                    Err(e) => {
                        warn!("DATA: live matches failed: {}", e);
                        self.set_status(format!("Could not load live matches: {}", e), true);
                        Vec::new()
                    }
                };
                self.live = Some(live);
                if self.screen == Screen::Live {
                    self.rebuild();
                }
            }
            AppMessage::Events(fixture_id, result) => {
                let events = or_empty(result, "events", fixture_id);
                self.set_detail(fixture_id, |d| d.events = Some(events));
            }
            AppMessage::Lineups(fixture_id, result) => {
                let lineups = or_empty(result, "lineups", fixture_id);
                self.set_detail(fixture_id, |d| d.lineups = Some(lineups));
            }
            AppMessage::Statistics(fixture_id, result) => {
                let statistics = or_empty(result, "statistics", fixture_id);
                self.set_detail(fixture_id, |d| d.statistics = Some(statistics));
            }
            AppMessage::Predictions(fixture_id, result) => {
                let predictions = or_empty(result, "predictions", fixture_id);
                self.set_detail(fixture_id, |d| d.predictions = Some(predictions));
            }
            AppMessage::Standings(league_id, result) => {
                let standings = or_empty(result, "standings", league_id);
                self.set_league(league_id, |l| l.standings = Some(standings));
            }
            AppMessage::Leaders(league_id, tab, result) => {
                let leaders = or_empty(result, tab.label(), league_id);
                self.set_league(league_id, |l| match tab {
                    LeagueTab::TopAssists => l.assists = Some(leaders),
                    _ => l.scorers = Some(leaders),
                });
            }
            AppMessage::GoalDescription(fixture_id, description) => {
                if self.overlay.update_description(fixture_id, description.clone()) {
                    if let Some(node) = self.alert_node {
                        for id in self.tree.descendants(node) {
                            if self.tree.get(id).and_then(|n| n.element_kind()) == Some(ElementKind::AlertBody) {
                                self.tree.set_slot(id, DESCRIPTION_SLOT, &description);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Apply one poll result on the UI loop
    pub fn apply_poll(&mut self, event: PollEvent, now_ms: u64) {
        self.countdown.reset(now_ms);
        let matches = match event {
            PollEvent::Skipped => return,
            PollEvent::Failed(e) => {
                self.set_status(format!("Live update failed: {}", e), true);
                return;
            }
            PollEvent::Fetched(matches) => matches,
        };

        let open_match = self.open_match();
        let mut surface = TreeSurface {
            tree: &mut self.tree,
            rendered: &mut self.rendered,
            open_match,
        };
        let report = self.reconciler.reconcile(
            &matches,
            &mut self.profile,
            &self.config.allowed_leagues,
            &mut surface,
        );
        debug!("LIVE: {} of {} matches relevant", report.relevant, matches.len());

        // Keep cached records current so later renders show fresh scores
        for fresh in &matches {
            let records = self.day.iter_mut().flatten().chain(self.detail.iter_mut());
            for m in records.filter(|m| m.id() == fresh.id()) {
                *m = fresh.clone();
            }
        }
        let live_changed = self
            .live
            .as_ref()
            .is_some_and(|live| live.iter().map(Match::id).ne(matches.iter().map(Match::id)));
        if self.live.is_some() {
            self.live = Some(matches);
        }

        if !report.untracked.is_empty() {
            self.save_profile();
            self.relabel_untracked(&report.untracked);
        }
        for alert in report.alerts {
            self.show_alert(alert, now_ms);
        }
        if live_changed && self.screen == Screen::Live {
            self.rebuild();
        }
    }

    fn set_detail(&mut self, fixture_id: i64, update: impl FnOnce(&mut DetailData)) {
        update(self.details.entry(fixture_id).or_default());
        if self.open_match() == Some(fixture_id) {
            self.rebuild();
        }
    }

    fn set_league(&mut self, league_id: i64, update: impl FnOnce(&mut LeagueData)) {
        update(self.leagues.entry(league_id).or_default());
        if matches!(self.screen, Screen::League { league_id: open, .. } if open == league_id) {
            self.rebuild();
        }
    }

    fn relabel_untracked(&mut self, untracked: &[i64]) {
        for id in untracked {
            self.relabel(actions::TOGGLE_TRACK, *id, "○ Track".to_string());
        }
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }
}

/// Failed tab loads show as empty; the failure is logged
fn or_empty<T>(result: Result<Vec<T>, String>, what: &str, id: i64) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!("DATA: {} for {} failed: {}", what, id, e);
        Vec::new()
    })
}
