//! Screen layouts expressed as view trees
//!
//! Every screen is built into the shared [`ViewTree`] in terminal cell
//! coordinates. Building never draws; `render` walks the tree afterwards.

use chrono::NaiveDate;

use crate::live::reconciler::{card_key, live_flag, slots, DETAIL_SCORE_KEY};
use crate::live::LiveAlert;
use crate::nav::{Activation, ContainerKind, ElementKind, NodeId, NodeSpec, Rect, ViewTree};
use crate::store::UserProfile;
use crate::types::{
    FixtureEvent, League, LeagueStandings, LineupEntry, Match, PlayerLeader, Prediction, TeamLineup,
    TeamStatistics,
};

pub const SIDEBAR_WIDTH: f64 = 18.0;
pub const CONTENT_X: f64 = SIDEBAR_WIDTH + 2.0;
pub const CARD_WIDTH: f64 = 24.0;
pub const CARD_HEIGHT: f64 = 5.0;
pub const CARD_GAP: f64 = 2.0;
pub const ROW_HEADER_WIDTH: f64 = 20.0;
/// Header line + rail + spacing
pub const ROW_HEIGHT: f64 = CARD_HEIGHT + 3.0;

/// Slot holding the text of a scroll panel, one line per `\n`
pub const BODY_SLOT: &str = "body";
/// Slot with the alert description
pub const DESCRIPTION_SLOT: &str = "description";

/// Action names carried by [`Activation`]s
pub mod actions {
    pub const NAV_HOME: &str = "nav-home";
    pub const NAV_LIVE: &str = "nav-live";
    pub const NAV_FAVORITES: &str = "nav-favorites";
    pub const OPEN_MATCH: &str = "open-match";
    pub const PREV_DAY: &str = "prev-day";
    pub const NEXT_DAY: &str = "next-day";
    pub const TODAY: &str = "today";
    pub const OPEN_LEAGUE: &str = "open-league";
    pub const FAVORITE_LEAGUE: &str = "favorite-league";
    pub const FAVORITE_TEAM: &str = "favorite-team";
    pub const TOGGLE_TRACK: &str = "toggle-track";
    pub const TAB: &str = "tab";
    pub const BACK: &str = "back";
    pub const UNTRACK_ALL: &str = "untrack-all";
    pub const CONFIRM_UNTRACK_ALL: &str = "confirm-untrack-all";
    pub const CLEAR_FAVORITE_TEAMS: &str = "clear-favorite-teams";
    pub const CLOSE_MODAL: &str = "close-modal";
    pub const DISMISS_ALERT: &str = "dismiss-alert";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarEntry {
    Home,
    Live,
    Favorites,
}

impl SidebarEntry {
    pub const ALL: [SidebarEntry; 3] = [SidebarEntry::Home, SidebarEntry::Live, SidebarEntry::Favorites];

    pub fn label(self) -> &'static str {
        match self {
            SidebarEntry::Home => "Home",
            SidebarEntry::Live => "Live",
            SidebarEntry::Favorites => "Favourites",
        }
    }

    fn action(self) -> &'static str {
        match self {
            SidebarEntry::Home => actions::NAV_HOME,
            SidebarEntry::Live => actions::NAV_LIVE,
            SidebarEntry::Favorites => actions::NAV_FAVORITES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Events,
    Lineups,
    Statistics,
    Predictions,
    Details,
}

impl DetailTab {
    pub const ALL: [DetailTab; 5] = [
        DetailTab::Events,
        DetailTab::Lineups,
        DetailTab::Statistics,
        DetailTab::Predictions,
        DetailTab::Details,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DetailTab::Events => "Events",
            DetailTab::Lineups => "Lineups",
            DetailTab::Statistics => "Stats",
            DetailTab::Predictions => "Predictions",
            DetailTab::Details => "Details",
        }
    }

    pub fn index(self) -> i64 {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0) as i64
    }

    /// Out-of-range indices fall back to the first tab
    pub fn from_index(index: i64) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeagueTab {
    #[default]
    Standings,
    TopScorers,
    TopAssists,
}

impl LeagueTab {
    pub const ALL: [LeagueTab; 3] = [LeagueTab::Standings, LeagueTab::TopScorers, LeagueTab::TopAssists];

    pub fn label(self) -> &'static str {
        match self {
            LeagueTab::Standings => "Standings",
            LeagueTab::TopScorers => "Top scorers",
            LeagueTab::TopAssists => "Top assists",
        }
    }

    pub fn index(self) -> i64 {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0) as i64
    }

    pub fn from_index(index: i64) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or_default()
    }
}

/// Per-match tab data; `None` until its load completes
#[derive(Debug, Clone, Default)]
pub struct DetailData {
    pub events: Option<Vec<FixtureEvent>>,
    pub lineups: Option<Vec<TeamLineup>>,
    pub statistics: Option<Vec<TeamStatistics>>,
    pub predictions: Option<Vec<Prediction>>,
}

impl DetailData {
    /// Whether `tab` still has to be fetched
    pub fn missing(&self, tab: DetailTab) -> bool {
        match tab {
            DetailTab::Events => self.events.is_none(),
            DetailTab::Lineups => self.lineups.is_none(),
            DetailTab::Statistics => self.statistics.is_none(),
            DetailTab::Predictions => self.predictions.is_none(),
            DetailTab::Details => false,
        }
    }
}

/// Per-league tab data; `None` until its load completes
#[derive(Debug, Clone, Default)]
pub struct LeagueData {
    pub standings: Option<Vec<LeagueStandings>>,
    pub scorers: Option<Vec<PlayerLeader>>,
    pub assists: Option<Vec<PlayerLeader>>,
}

impl LeagueData {
    pub fn missing(&self, tab: LeagueTab) -> bool {
        match tab {
            LeagueTab::Standings => self.standings.is_none(),
            LeagueTab::TopScorers => self.scorers.is_none(),
            LeagueTab::TopAssists => self.assists.is_none(),
        }
    }
}

/// Containers that live for the whole session
#[derive(Debug, Clone)]
pub struct Shell {
    pub sidebar: NodeId,
    pub items: Vec<(SidebarEntry, NodeId)>,
    pub content: NodeId,
    /// Content area in cells
    pub area: Rect,
}

impl Shell {
    pub fn item(&self, entry: SidebarEntry) -> Option<NodeId> {
        self.items.iter().find(|(e, _)| *e == entry).map(|(_, id)| *id)
    }
}

/// Sidebar and content area for a `width` x `height` terminal (status bar excluded)
pub fn build_shell(tree: &mut ViewTree, width: f64, height: f64) -> Shell {
    tree.set_viewport(Rect::new(0.0, 0.0, width, height));
    let sidebar = tree.insert(
        tree.root(),
        NodeSpec::container(ContainerKind::Sidebar, Rect::new(0.0, 0.0, SIDEBAR_WIDTH, height))
            .label("touchline"),
    );
    let items = SidebarEntry::ALL
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let id = tree.insert(
                sidebar,
                NodeSpec::element(
                    ElementKind::SidebarItem,
                    Rect::new(1.0, 2.0 + 2.0 * i as f64, SIDEBAR_WIDTH - 2.0, 1.0),
                )
                .label(entry.label())
                .activation(Activation::new(entry.action(), None)),
            );
            (*entry, id)
        })
        .collect();
    let area = Rect::new(CONTENT_X, 0.0, (width - CONTENT_X).max(CARD_WIDTH + 4.0), height);
    let content = tree.insert(tree.root(), NodeSpec::container(ContainerKind::Content, area));
    Shell {
        sidebar,
        items,
        content,
        area,
    }
}

/// Insert a match card; its key and slots are what live updates patch
pub fn match_card(tree: &mut ViewTree, parent: NodeId, rect: Rect, m: &Match, profile: &UserProfile) -> NodeId {
    let card = tree.insert(
        parent,
        NodeSpec::element(ElementKind::Card, rect)
            .key(card_key(m.id()))
            .activation(Activation::new(actions::OPEN_MATCH, Some(m.id()))),
    );
    let (home, away) = m.goals.pair();
    tree.set_slot(card, "home", &m.teams.home.name);
    tree.set_slot(card, "away", &m.teams.away.name);
    tree.set_slot(card, slots::HOME_SCORE, &home.to_string());
    tree.set_slot(card, slots::AWAY_SCORE, &away.to_string());
    tree.set_slot(card, slots::STATUS, &m.fixture.status.display_text());
    tree.set_slot(card, slots::LIVE, live_flag(m));
    if profile.is_tracked(m.id()) {
        tree.set_slot(card, slots::TRACKED, "●");
    }
    card
}

/// Matches grouped by league, leagues in order of first appearance
pub fn group_by_league(matches: &[Match]) -> Vec<(i64, String, Vec<&Match>)> {
    let mut groups: Vec<(i64, String, Vec<&Match>)> = Vec::new();
    for m in matches {
        match groups.iter_mut().find(|(id, ..)| *id == m.league.id) {
            Some((_, _, list)) => list.push(m),
            None => groups.push((m.league.id, m.league.name.clone(), vec![m])),
        }
    }
    groups
}

/// One row per league starting at `y`; returns the cards in build order
fn league_rows(
    tree: &mut ViewTree,
    parent: NodeId,
    area: Rect,
    mut y: f64,
    matches: &[Match],
    profile: &UserProfile,
) -> Vec<NodeId> {
    let mut cards = Vec::new();
    for (league_id, name, list) in group_by_league(matches) {
        let row = tree.insert(
            parent,
            NodeSpec::container(ContainerKind::Row, Rect::new(area.x, y, area.width, ROW_HEIGHT - 1.0)),
        );
        let star = if profile.is_favorite_league(league_id) { "★" } else { "☆" };
        tree.insert(
            row,
            NodeSpec::element(ElementKind::RowHeader, Rect::new(area.x + 2.0, y, ROW_HEADER_WIDTH, 1.0))
                .label(format!("{} {}", star, name))
                .activation(Activation::new(actions::OPEN_LEAGUE, Some(league_id))),
        );
        let rail = tree.insert(
            row,
            NodeSpec::container(ContainerKind::Rail, Rect::new(area.x, y + 1.0, area.width, CARD_HEIGHT)),
        );
        for (i, m) in list.into_iter().enumerate() {
            let x = area.x + 2.0 + i as f64 * (CARD_WIDTH + CARD_GAP);
            cards.push(match_card(tree, rail, Rect::new(x, y + 1.0, CARD_WIDTH, CARD_HEIGHT), m, profile));
        }
        y += ROW_HEIGHT;
    }
    cards
}

/// One line of text in place of a page that has nothing to show
pub fn placeholder(tree: &mut ViewTree, parent: NodeId, area: Rect, y: f64, text: &str) {
    tree.insert(
        parent,
        NodeSpec::container(ContainerKind::Panel, Rect::new(area.x + 2.0, y, area.width - 4.0, 1.0)).label(text),
    );
}

/// Date header plus one row per league
pub fn home_page(
    tree: &mut ViewTree,
    content: NodeId,
    area: Rect,
    date: NaiveDate,
    matches: &[Match],
    profile: &UserProfile,
) -> Vec<NodeId> {
    let header = tree.insert(
        content,
        NodeSpec::container(ContainerKind::DateHeader, Rect::new(area.x, area.y, area.width, 1.0))
            .label(date.format("%A %-d %B %Y").to_string()),
    );
    let controls = [
        ("◀ Prev", actions::PREV_DAY, 2.0),
        ("Today", actions::TODAY, 12.0),
        ("Next ▶", actions::NEXT_DAY, 21.0),
    ];
    for (label, action, dx) in controls {
        tree.insert(
            header,
            NodeSpec::element(ElementKind::Button, Rect::new(area.x + dx, area.y, 8.0, 1.0))
                .label(label)
                .activation(Activation::new(action, None)),
        );
    }
    if matches.is_empty() {
        placeholder(tree, content, area, area.y + 2.0, "No fixtures on this day");
        return Vec::new();
    }
    league_rows(tree, content, area, area.y + 2.0, matches, profile)
}

pub fn live_page(tree: &mut ViewTree, content: NodeId, area: Rect, matches: &[Match], profile: &UserProfile) -> Vec<NodeId> {
    if matches.is_empty() {
        placeholder(tree, content, area, area.y, "No matches in progress");
        return Vec::new();
    }
    league_rows(tree, content, area, area.y, matches, profile)
}

/// Titled section with a header action and a card grid; returns the section's cards
fn grid_section(
    tree: &mut ViewTree,
    parent: NodeId,
    area: Rect,
    y: f64,
    title: &str,
    action: (&str, &str),
    matches: &[&Match],
    profile: &UserProfile,
) -> (Vec<NodeId>, f64) {
    let cols = (((area.width - 2.0) / (CARD_WIDTH + CARD_GAP)).floor() as usize).max(1);
    let rows = matches.len().div_ceil(cols).max(1);
    let grid_height = rows as f64 * (CARD_HEIGHT + 1.0);
    let section = tree.insert(
        parent,
        NodeSpec::container(ContainerKind::Section, Rect::new(area.x, y, area.width, grid_height + 1.0)).label(title),
    );
    tree.insert(
        section,
        NodeSpec::element(ElementKind::SectionAction, Rect::new(area.right() - 18.0, y, 16.0, 1.0))
            .label(action.0)
            .activation(Activation::new(action.1, None)),
    );
    let grid = tree.insert(
        section,
        NodeSpec::container(ContainerKind::Grid, Rect::new(area.x, y + 1.0, area.width, grid_height)),
    );
    let mut cards = Vec::new();
    for (i, m) in matches.iter().enumerate() {
        let (r, c) = (i / cols, i % cols);
        let rect = Rect::new(
            area.x + 2.0 + c as f64 * (CARD_WIDTH + CARD_GAP),
            y + 1.0 + r as f64 * (CARD_HEIGHT + 1.0),
            CARD_WIDTH,
            CARD_HEIGHT,
        );
        cards.push(match_card(tree, grid, rect, m, profile));
    }
    if let Some(g) = tree.get_mut(grid).filter(|_| matches.is_empty()) {
        g.label = "Nothing here yet".to_string();
    }
    (cards, y + grid_height + 2.0)
}

/// Tracked matches and matches of favourite teams
pub fn favorites_page(
    tree: &mut ViewTree,
    content: NodeId,
    area: Rect,
    matches: &[Match],
    profile: &UserProfile,
) -> Vec<NodeId> {
    let tracked: Vec<&Match> = matches.iter().filter(|m| profile.is_tracked(m.id())).collect();
    let teams: Vec<&Match> = matches
        .iter()
        .filter(|m| profile.is_favorite_team(m.teams.home.id) || profile.is_favorite_team(m.teams.away.id))
        .collect();

    let (mut cards, y) = grid_section(
        tree,
        content,
        area,
        area.y,
        "Tracked matches",
        ("Untrack all", actions::UNTRACK_ALL),
        &tracked,
        profile,
    );
    let (more, _) = grid_section(
        tree,
        content,
        area,
        y,
        "Favourite teams",
        ("Clear teams", actions::CLEAR_FAVORITE_TEAMS),
        &teams,
        profile,
    );
    cards.extend(more);
    cards
}

fn loading(what: &str) -> Vec<String> {
    vec![format!("Loading {}...", what)]
}

/// Text of the detail page's scroll panel
pub fn detail_body(m: &Match, tab: DetailTab, data: &DetailData) -> Vec<String> {
    match tab {
        DetailTab::Events => match data.events.as_deref() {
            None => loading("events"),
            Some([]) => vec!["No events yet".to_string()],
            Some(events) => events
                .iter()
                .map(|e| {
                    let minute = e.time.elapsed.map(|m| format!("{}'", m)).unwrap_or_default();
                    let player = e.player.name.as_deref().unwrap_or("?");
                    match e.assist.name.as_deref() {
                        Some(assist) if e.is_goal() => {
                            format!("{:>4} {} {} (Assist: {})", minute, e.detail, player, assist)
                        }
                        _ => format!("{:>4} {} {}", minute, e.detail, player),
                    }
                })
                .collect(),
        },
        DetailTab::Lineups => match data.lineups.as_deref() {
            None => loading("lineups"),
            Some(lineups) if lineups.len() < 2 => vec!["No lineups".to_string()],
            Some(lineups) => lineup_lines(lineups),
        },
        DetailTab::Statistics => match data.statistics.as_deref() {
            None => loading("statistics"),
            Some([home, away, ..]) => statistic_lines(home, away),
            Some(_) => vec!["No stats".to_string()],
        },
        DetailTab::Predictions => match data.predictions.as_deref() {
            None => loading("predictions"),
            Some([prediction, ..]) => prediction_lines(prediction),
            Some([]) => vec!["No predictions available".to_string()],
        },
        DetailTab::Details => vec![
            format!("Competition: {}", m.league.name),
            format!("Country: {}", m.league.country.as_deref().unwrap_or("-")),
            format!("Kick-off: {}", m.fixture.date.format("%Y-%m-%d %H:%M UTC")),
            format!("Status: {}", m.fixture.status.long),
            format!("Fixture id: {}", m.id()),
        ],
    }
}

fn lineup_lines(lineups: &[TeamLineup]) -> Vec<String> {
    let mut lines = Vec::new();
    for lineup in lineups {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        match &lineup.formation {
            Some(formation) => lines.push(format!("{} ({})", lineup.team.name, formation)),
            None => lines.push(lineup.team.name.clone()),
        }
        let player_line = |entry: &LineupEntry| {
            let p = &entry.player;
            let number = p.number.map(|n| n.to_string()).unwrap_or_default();
            format!("{:>4} {:<24} {}", number, p.name, p.pos.as_deref().unwrap_or(""))
        };
        lines.extend(lineup.start_xi.iter().map(player_line));
        if !lineup.substitutes.is_empty() {
            lines.push("  Substitutes".to_string());
            lines.extend(lineup.substitutes.iter().map(player_line));
        }
        if let Some(coach) = &lineup.coach.name {
            lines.push(format!("  Coach: {}", coach));
        }
    }
    lines
}

/// Home and away values side by side, matched on statistic name
fn statistic_lines(home: &TeamStatistics, away: &TeamStatistics) -> Vec<String> {
    let mut lines = vec![format!("{:>8}  {:^20}  {:<8}", home.team.name, "", away.team.name)];
    for stat in &home.statistics {
        let other = away
            .statistics
            .iter()
            .find(|s| s.kind == stat.kind)
            .map(|s| s.display_value())
            .unwrap_or_else(|| "0".to_string());
        lines.push(format!("{:>8}  {:^20}  {:<8}", stat.display_value(), stat.kind, other));
    }
    lines
}

fn prediction_lines(prediction: &Prediction) -> Vec<String> {
    let p = &prediction.predictions;
    let advice = p
        .advice
        .as_deref()
        .map(|a| a.trim_start_matches("Combo Double chance : ").trim_start_matches("Double chance : "))
        .unwrap_or("No advice available");
    let winner = match &p.winner {
        Some(w) => format!(
            "{} ({})",
            w.name.as_deref().unwrap_or("-"),
            w.comment.as_deref().unwrap_or("")
        ),
        None => "-".to_string(),
    };
    let percent = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    vec![
        advice.to_string(),
        String::new(),
        format!("Winner: {}", winner),
        format!("Win or draw: {}", if p.win_or_draw.unwrap_or(false) { "Yes" } else { "No" }),
        format!("Goals: {}", p.under_over.as_deref().unwrap_or("-")),
        format!(
            "Home {} · Draw {} · Away {}",
            percent(&p.percent.home),
            percent(&p.percent.draw),
            percent(&p.percent.away)
        ),
    ]
}

/// Text of the league page's scroll panel
pub fn league_body(tab: LeagueTab, data: &LeagueData) -> Vec<String> {
    match tab {
        LeagueTab::Standings => match data.standings.as_deref() {
            None => loading("standings"),
            Some(standings) => {
                let groups: Vec<_> = standings.iter().flat_map(|s| s.league.standings.iter()).collect();
                if groups.iter().all(|g| g.is_empty()) {
                    return vec!["No standings available".to_string()];
                }
                let mut lines = Vec::new();
                for group in &groups {
                    if groups.len() > 1 {
                        if !lines.is_empty() {
                            lines.push(String::new());
                        }
                        lines.push(group.first().and_then(|t| t.group.clone()).unwrap_or_default());
                    }
                    lines.push(format!(
                        "{:>3}  {:<22} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4}",
                        "#", "Team", "P", "W", "D", "L", "GD", "Pts"
                    ));
                    for t in group.iter() {
                        let n = |v: Option<u32>| v.unwrap_or(0);
                        lines.push(format!(
                            "{:>3}  {:<22} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4}",
                            t.rank,
                            t.team.name,
                            n(t.all.played),
                            n(t.all.win),
                            n(t.all.draw),
                            n(t.all.lose),
                            t.goals_diff,
                            t.points
                        ));
                    }
                }
                lines
            }
        },
        LeagueTab::TopScorers => leader_lines(data.scorers.as_deref(), "scorers", PlayerLeader::goals),
        LeagueTab::TopAssists => leader_lines(data.assists.as_deref(), "assists", PlayerLeader::assists),
    }
}

fn leader_lines(leaders: Option<&[PlayerLeader]>, what: &str, count: fn(&PlayerLeader) -> u32) -> Vec<String> {
    match leaders {
        None => loading(what),
        Some([]) => vec!["No player stats available".to_string()],
        Some(leaders) => leaders
            .iter()
            .enumerate()
            .map(|(i, l)| {
                format!(
                    "{:>3}. {:<24} {:<22} {:>3}",
                    i + 1,
                    l.player.name.as_deref().unwrap_or("?"),
                    l.team_name(),
                    count(l)
                )
            })
            .collect(),
    }
}

/// Row of tab elements sized to their labels; `active` marks the selected one
fn tab_bar(tree: &mut ViewTree, parent: NodeId, x: f64, y: f64, labels: &[&str], active: usize) {
    let mut tx = x;
    for (i, label) in labels.iter().enumerate() {
        let width = unicode_width::UnicodeWidthStr::width(*label) as f64 + 2.0;
        tree.insert(
            parent,
            NodeSpec::element(ElementKind::Tab, Rect::new(tx, y, width, 1.0))
                .label(*label)
                .active(i == active)
                .activation(Activation::new(actions::TAB, Some(i as i64))),
        );
        tx += width + 2.0;
    }
}

/// Scroll panel holding `body`, filling the page below `y`
fn body_panel(tree: &mut ViewTree, page: NodeId, area: Rect, y: f64, body: &[String]) -> NodeId {
    let height = (area.bottom() - y).max(3.0);
    let panel = tree.insert(
        page,
        NodeSpec::element(ElementKind::ScrollPanel, Rect::new(area.x + 2.0, y, area.width - 4.0, height))
            .content_height(body.len() as f64 + 2.0),
    );
    tree.set_slot(panel, BODY_SLOT, &body.join("\n"));
    panel
}

fn back_button(tree: &mut ViewTree, page: NodeId, x: f64, y: f64) {
    tree.insert(
        page,
        NodeSpec::element(ElementKind::Button, Rect::new(x, y, 8.0, 1.0))
            .label("← Back")
            .activation(Activation::new(actions::BACK, None)),
    );
}

/// Score box, track and favourite buttons, tab bar and a scrollable panel
pub fn detail_page(
    tree: &mut ViewTree,
    content: NodeId,
    area: Rect,
    m: &Match,
    profile: &UserProfile,
    tab: DetailTab,
    body: &[String],
) -> NodeId {
    let page = tree.insert(content, NodeSpec::container(ContainerKind::Page, area));
    let (x, y, w) = (area.x + 2.0, area.y, area.width - 4.0);
    back_button(tree, page, x, y);

    let score = tree.insert(
        page,
        NodeSpec::container(ContainerKind::Panel, Rect::new(x, y + 2.0, w, 3.0))
            .key(DETAIL_SCORE_KEY)
            .label(format!("{}  vs  {}", m.teams.home.name, m.teams.away.name)),
    );
    tree.set_slot(score, slots::SCORE, &m.goals.display());
    tree.set_slot(score, slots::STATUS, &m.fixture.status.display_text());

    let track_label = if profile.is_tracked(m.id()) { "● Tracking" } else { "○ Track" };
    let buttons = [
        (track_label.to_string(), actions::TOGGLE_TRACK, Some(m.id())),
        (favorite_label(profile, m.teams.home.id, &m.teams.home.name), actions::FAVORITE_TEAM, Some(m.teams.home.id)),
        (favorite_label(profile, m.teams.away.id, &m.teams.away.name), actions::FAVORITE_TEAM, Some(m.teams.away.id)),
    ];
    let mut bx = x;
    for (label, action, id) in buttons {
        let width = unicode_width::UnicodeWidthStr::width(label.as_str()) as f64 + 2.0;
        tree.insert(
            page,
            NodeSpec::element(ElementKind::Button, Rect::new(bx, y + 6.0, width, 1.0))
                .label(label)
                .activation(Activation::new(action, id)),
        );
        bx += width + 2.0;
    }

    let labels: Vec<&str> = DetailTab::ALL.iter().map(|t| t.label()).collect();
    tab_bar(tree, page, x, y + 8.0, &labels, tab.index() as usize);
    body_panel(tree, page, area, y + 10.0, body);
    page
}

/// League title, favourite toggle, tab bar and a scrollable table
pub fn league_page(
    tree: &mut ViewTree,
    content: NodeId,
    area: Rect,
    league: &League,
    profile: &UserProfile,
    tab: LeagueTab,
    body: &[String],
) -> NodeId {
    let page = tree.insert(content, NodeSpec::container(ContainerKind::Page, area));
    let (x, y, w) = (area.x + 2.0, area.y, area.width - 4.0);
    back_button(tree, page, x, y);

    let title = match &league.country {
        Some(country) => format!("{} · {}", league.name, country),
        None => league.name.clone(),
    };
    tree.insert(
        page,
        NodeSpec::container(ContainerKind::Panel, Rect::new(x, y + 2.0, w, 1.0)).label(title),
    );
    let star = if profile.is_favorite_league(league.id) { "★" } else { "☆" };
    let label = format!("{} {}", star, league.name);
    let width = unicode_width::UnicodeWidthStr::width(label.as_str()) as f64 + 2.0;
    tree.insert(
        page,
        NodeSpec::element(ElementKind::Button, Rect::new(x, y + 4.0, width, 1.0))
            .label(label)
            .activation(Activation::new(actions::FAVORITE_LEAGUE, Some(league.id))),
    );

    let labels: Vec<&str> = LeagueTab::ALL.iter().map(|t| t.label()).collect();
    tab_bar(tree, page, x, y + 6.0, &labels, tab.index() as usize);
    body_panel(tree, page, area, y + 8.0, body);
    page
}

fn favorite_label(profile: &UserProfile, team_id: i64, name: &str) -> String {
    let star = if profile.is_favorite_team(team_id) { "★" } else { "☆" };
    format!("{} {}", star, name)
}

/// Confirmation dialog for untracking every match
pub fn confirm_modal(tree: &mut ViewTree, viewport: Rect) -> NodeId {
    let (w, h) = (40.0, 6.0);
    let x = (viewport.width - w) / 2.0;
    let y = (viewport.height - h) / 2.0;
    let modal = tree.insert(
        tree.root(),
        NodeSpec::container(ContainerKind::Modal, Rect::new(x, y, w, h)).label("Stop tracking every match?"),
    );
    tree.insert(
        modal,
        NodeSpec::element(ElementKind::Button, Rect::new(x + 4.0, y + 3.0, 14.0, 1.0))
            .label("Untrack all")
            .activation(Activation::new(actions::CONFIRM_UNTRACK_ALL, None)),
    );
    tree.insert(
        modal,
        NodeSpec::element(ElementKind::CloseButton, Rect::new(x + 22.0, y + 3.0, 10.0, 1.0))
            .label("Cancel")
            .activation(Activation::new(actions::CLOSE_MODAL, None)),
    );
    modal
}

/// Alert overlay in the bottom-right corner
pub fn alert_overlay(tree: &mut ViewTree, viewport: Rect, alert: &LiveAlert) -> NodeId {
    let (w, h) = (44.0, 6.0);
    let x = (viewport.width - w - 1.0).max(0.0);
    let y = (viewport.height - h - 1.0).max(0.0);
    let container = tree.insert(
        tree.root(),
        NodeSpec::container(ContainerKind::Alert, Rect::new(x, y, w, h)).label(alert.title.as_str()),
    );
    let m = &alert.fixture;
    let body = tree.insert(
        container,
        NodeSpec::element(ElementKind::AlertBody, Rect::new(x + 1.0, y + 1.0, w - 2.0, 2.0))
            .label(format!("{} {} {}", m.teams.home.name, m.goals.compact(), m.teams.away.name))
            .activation(Activation::new(actions::OPEN_MATCH, Some(m.id()))),
    );
    tree.set_slot(body, DESCRIPTION_SLOT, &alert.description);
    tree.insert(
        container,
        NodeSpec::element(ElementKind::CloseButton, Rect::new(x + 1.0, y + 4.0, 10.0, 1.0))
            .label("Dismiss")
            .activation(Activation::new(actions::DISMISS_ALERT, None)),
    );
    container
}
