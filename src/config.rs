use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};

/// Who lives in the household and which features each member gets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdConfig {
    pub members: Vec<String>,
    /// Members who take part in chore rotation.
    pub chore_members: Vec<String>,
    /// Members who can claim media time.
    pub media_members: Vec<String>,
    /// Minutes granted per media claim, by member.
    pub reward_minutes: HashMap<String, u32>,
    pub default_reward_minutes: u32,
    /// Grants allowed per week (Sunday to Saturday).
    pub weekly_media_cap: u32,
    /// Two members whose current chore is kept in sync.
    pub linked_pair: Option<(String, String)>,
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        HouseholdConfig {
            members: names(&["Toby", "Sharmila", "Aiden", "Liah", "Llewyn", "Elaine"]),
            chore_members: names(&["Aiden", "Liah", "Elaine", "Llewyn"]),
            media_members: names(&["Aiden", "Liah", "Llewyn"]),
            reward_minutes: HashMap::from([("Llewyn".to_string(), 15)]),
            default_reward_minutes: 30,
            weekly_media_cap: 3,
            linked_pair: Some(("Elaine".to_string(), "Llewyn".to_string())),
        }
    }
}

impl HouseholdConfig {
    /// Returns the path to the config file.
    ///
    /// `HOMEBOARD_CONFIG` wins, otherwise `~/.config/homeboard/config.toml`
    /// (on Linux).
    pub fn path() -> PathBuf {
        std::env::var("HOMEBOARD_CONFIG").map(PathBuf::from).unwrap_or_else(|_| {
            let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("homeboard");
            p.push("config.toml");
            p
        })
    }

    /// Loads the config from [`HouseholdConfig::path`], using defaults when
    /// the file does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| BoardError::Config(e.to_string()))
    }

    /// Declines names that are not configured members, so a typo does not
    /// start a new person's records.
    pub fn check_member(&self, person: &str) -> Result<()> {
        if self.members.iter().any(|m| m == person) {
            Ok(())
        } else {
            Err(BoardError::UnknownMember(person.to_string(), self.members.join(", ")))
        }
    }

    pub fn reward_minutes_for(&self, person: &str) -> u32 {
        self.reward_minutes
            .get(person)
            .copied()
            .unwrap_or(self.default_reward_minutes)
    }

    pub fn has_chores(&self, person: &str) -> bool {
        self.chore_members.iter().any(|m| m == person)
    }

    pub fn has_media_time(&self, person: &str) -> bool {
        self.media_members.iter().any(|m| m == person)
    }

    /// The member whose chore mirrors `person`'s, if `person` is in the pair.
    pub fn chore_partner(&self, person: &str) -> Option<&str> {
        match &self.linked_pair {
            Some((a, b)) if a == person => Some(b.as_str()),
            Some((a, b)) if b == person => Some(a.as_str()),
            _ => None,
        }
    }
}
