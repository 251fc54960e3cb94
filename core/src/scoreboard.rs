use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    #[serde(deserialize_with = "time_from_number")]
    pub time: Seconds,
}

/// Accepts any non-negative JSON number, rounding fractional seconds to the nearest whole one.
///
/// Other writers on the same origin may store times as floats.
fn time_from_number<'de, D>(deserializer: D) -> core::result::Result<Seconds, D::Error>
where
    D: Deserializer<'de>,
{
    let time = f64::deserialize(deserializer)?;
    if time.is_nan() || time < 0.0 {
        return Err(D::Error::custom("score time must be a non-negative number"));
    }
    // saturating cast, huge times clamp to Seconds::MAX
    Ok((time + 0.5) as Seconds)
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, time: Seconds) -> Self {
        Self {
            name: name.into(),
            time,
        }
    }
}

/// Completion times ranked fastest first. Names may repeat.
///
/// Serialized as a bare JSON array of `{"name", "time"}` objects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scoreboard(Vec<ScoreEntry>);

impl Scoreboard {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn best(&self) -> Option<&ScoreEntry> {
        self.0.first()
    }

    /// Appends `entry` and re-sorts by time. Equal times keep their insertion order.
    pub fn insert(&mut self, entry: ScoreEntry) {
        self.0.push(entry);
        self.0.sort_by_key(|entry| entry.time);
    }

    pub fn iter(&self) -> core::slice::Iter<'_, ScoreEntry> {
        self.0.iter()
    }
}

impl FromIterator<ScoreEntry> for Scoreboard {
    fn from_iter<I: IntoIterator<Item = ScoreEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Scoreboard {
    type Item = &'a ScoreEntry;
    type IntoIter = core::slice::Iter<'a, ScoreEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Reads and writes the scoreboard persisted under a single key.
///
/// The persisted value is the source of truth: every operation re-reads it, and [`Self::record`] is a
/// read-modify-write against whatever other writers left there.
#[derive(Clone, Debug)]
pub struct ScoreboardStore<S> {
    storage: S,
    key: String,
}

impl<S: ScoreStorage> ScoreboardStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, SCOREBOARD_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Missing or malformed data reads as an empty scoreboard.
    pub fn load(&self) -> Scoreboard {
        let Some(raw) = self.storage.get_item(&self.key) else {
            return Scoreboard::new();
        };

        match serde_json::from_str(&raw) {
            Ok(scoreboard) => scoreboard,
            Err(err) => {
                log::warn!("Ignoring malformed scoreboard under {:?}: {}", self.key, err);
                Scoreboard::new()
            }
        }
    }

    pub fn record(&self, entry: ScoreEntry) -> core::result::Result<Scoreboard, StorageError> {
        let mut scoreboard = self.load();
        log::debug!("recording {:?} into {} entries", entry, scoreboard.len());
        scoreboard.insert(entry);

        let raw = serde_json::to_string(&scoreboard)
            .map_err(|err| StorageError::Serialize(err.to_string()))?;
        self.storage.set_item(&self.key, &raw)?;
        Ok(scoreboard)
    }

    /// Re-reads the persisted scoreboard without merging anything.
    pub fn refresh(&self) -> Scoreboard {
        self.load()
    }
}

/// In-memory copy of the scoreboard that the UI renders from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreboardView {
    scoreboard: Scoreboard,
}

impl ScoreboardView {
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Replaces the view with the delivered scoreboard. Returns whether anything changed.
    pub fn apply(&mut self, inbound: Inbound) -> bool {
        match inbound {
            Inbound::ScoreboardChanged(scoreboard) => {
                if self.scoreboard == scoreboard {
                    false
                } else {
                    self.scoreboard = scoreboard;
                    true
                }
            }
        }
    }
}
