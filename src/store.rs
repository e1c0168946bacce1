//! User profile persistence
//!
//! Profiles hold favorites and the set of tracked matches. The live poller
//! only needs membership queries and add/remove mutations; where profiles
//! are kept is behind [`ProfileStore`].

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid profile data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unable to determine data directory")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    pub name: String,
}

impl Favorite {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub favorite_teams: Vec<Favorite>,
    pub favorite_leagues: Vec<Favorite>,
    /// Not edited here; carried so saved profiles keep it
    pub favorite_players: Vec<Favorite>,
    pub tracked_matches: BTreeSet<i64>,
}

fn add_favorite(list: &mut Vec<Favorite>, favorite: Favorite) -> bool {
    if list.iter().any(|f| f.id == favorite.id) {
        return false;
    }
    list.push(favorite);
    true
}

fn remove_favorite(list: &mut Vec<Favorite>, id: i64) -> bool {
    let before = list.len();
    list.retain(|f| f.id != id);
    list.len() != before
}

impl UserProfile {
    pub fn is_tracked(&self, fixture_id: i64) -> bool {
        self.tracked_matches.contains(&fixture_id)
    }

    /// Returns false if the match was already tracked
    pub fn track(&mut self, fixture_id: i64) -> bool {
        self.tracked_matches.insert(fixture_id)
    }

    /// Returns false if the match was not tracked
    pub fn untrack(&mut self, fixture_id: i64) -> bool {
        self.tracked_matches.remove(&fixture_id)
    }

    pub fn is_favorite_team(&self, team_id: i64) -> bool {
        self.favorite_teams.iter().any(|f| f.id == team_id)
    }

    pub fn is_favorite_league(&self, league_id: i64) -> bool {
        self.favorite_leagues.iter().any(|f| f.id == league_id)
    }

    pub fn add_favorite_team(&mut self, team: Favorite) -> bool {
        add_favorite(&mut self.favorite_teams, team)
    }

    pub fn remove_favorite_team(&mut self, team_id: i64) -> bool {
        remove_favorite(&mut self.favorite_teams, team_id)
    }

    pub fn add_favorite_league(&mut self, league: Favorite) -> bool {
        add_favorite(&mut self.favorite_leagues, league)
    }

    pub fn remove_favorite_league(&mut self, league_id: i64) -> bool {
        remove_favorite(&mut self.favorite_leagues, league_id)
    }
}

/// Persistence collaborator keyed by user identity
pub trait ProfileStore: Send + Sync {
    /// Load a profile; unknown users get an empty one
    fn load(&self, user: &str) -> Result<UserProfile, StoreError>;

    fn save(&self, user: &str, profile: &UserProfile) -> Result<(), StoreError>;
}

/// One JSON document per user under a directory
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under `$XDG_DATA_HOME/touchline/profiles`
    pub fn from_xdg() -> Result<Self, StoreError> {
        crate::config::get_profiles_dir()
            .map(Self::new)
            .ok_or(StoreError::NoDataDir)
    }

    fn path_for(&self, user: &str) -> PathBuf {
        let file: String = user
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file))
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self, user: &str) -> Result<UserProfile, StoreError> {
        let path = self.path_for(user);
        if !path.exists() {
            debug!("STORE: no profile at {}, using empty profile", path.display());
            return Ok(UserProfile::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, user: &str, profile: &UserProfile) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(user);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(profile)?)?;
        fs::rename(&tmp, &path)?;
        debug!("STORE: saved profile {}", path.display());
        Ok(())
    }
}

/// In-process store for tests and mock mode
#[derive(Default)]
pub struct MemoryStore {
    profiles: Mutex<HashMap<String, UserProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(user: &str, profile: UserProfile) -> Self {
        let store = Self::new();
        if let Ok(mut profiles) = store.profiles.lock() {
            profiles.insert(user.to_string(), profile);
        }
        store
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self, user: &str) -> Result<UserProfile, StoreError> {
        let profiles = self
            .profiles
            .lock()
            .map_err(|_| StoreError::Io(std::io::Error::other("profile store poisoned")))?;
        Ok(profiles.get(user).cloned().unwrap_or_default())
    }

    fn save(&self, user: &str, profile: &UserProfile) -> Result<(), StoreError> {
        let mut profiles = self
            .profiles
            .lock()
            .map_err(|_| StoreError::Io(std::io::Error::other("profile store poisoned")))?;
        profiles.insert(user.to_string(), profile.clone());
        Ok(())
    }
}
