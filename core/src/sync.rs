//! Message boundary between the game core and its host page.
//!
//! The session raises [`Outbound`] messages, the host feeds [`HostEvent`]s into a [`SyncDispatcher`], and the
//! dispatcher answers with [`Inbound`] messages for the view. Both a local save and another tab's write end up as
//! the same [`Inbound::ScoreboardChanged`] delivery.

use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::*;

/// Key under which the scoreboard is persisted.
pub const SCOREBOARD_KEY: &str = "minesweeper-scoreboard";

/// Core → host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outbound {
    /// Raised once per won game: obtain a display name and commit the time.
    RequestSaveScore { time: Seconds },
}

/// Host → core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Inbound {
    ScoreboardChanged(Scoreboard),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageArea {
    Local,
    Session,
    Other,
}

/// A change notification from the persisted store; `key` is `None` when the whole area was cleared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageChange {
    pub area: StorageArea,
    pub key: Option<String>,
}

impl StorageChange {
    pub fn local(key: impl Into<String>) -> Self {
        Self {
            area: StorageArea::Local,
            key: Some(key.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// Page loaded, publish whatever is persisted.
    Boot,
    SaveScore(Outbound),
    StorageChanged(StorageChange),
}

impl From<Outbound> for HostEvent {
    fn from(outbound: Outbound) -> Self {
        Self::SaveScore(outbound)
    }
}

impl From<StorageChange> for HostEvent {
    fn from(change: StorageChange) -> Self {
        Self::StorageChanged(change)
    }
}

/// Asks the player for a display name. `None` means declined.
pub trait NamePrompt {
    fn request_name(&mut self, time: Seconds) -> Option<String>;
}

impl<F: FnMut(Seconds) -> Option<String>> NamePrompt for F {
    fn request_name(&mut self, time: Seconds) -> Option<String> {
        self(time)
    }
}

/// Translates host events into scoreboard store calls.
#[derive(Debug)]
pub struct SyncDispatcher<S, P> {
    store: ScoreboardStore<S>,
    prompt: P,
}

impl<S: ScoreStorage, P: NamePrompt> SyncDispatcher<S, P> {
    pub fn new(store: ScoreboardStore<S>, prompt: P) -> Self {
        Self { store, prompt }
    }

    pub fn store(&self) -> &ScoreboardStore<S> {
        &self.store
    }

    pub fn dispatch(&mut self, event: HostEvent) -> Option<Inbound> {
        match event {
            HostEvent::Boot => Some(self.changed()),
            HostEvent::SaveScore(Outbound::RequestSaveScore { time }) => self.save_score(time),
            HostEvent::StorageChanged(change) => self
                .owns(&change)
                .then(|| self.changed()),
        }
    }

    /// Only changes to our exact key in local storage concern us.
    pub fn owns(&self, change: &StorageChange) -> bool {
        change.area == StorageArea::Local && change.key.as_deref() == Some(self.store.key())
    }

    fn save_score(&mut self, time: Seconds) -> Option<Inbound> {
        let name = self.prompt.request_name(time).unwrap_or_default();
        log::debug!("saving score {}s for {:?}", time, name);

        match self.store.record(ScoreEntry::new(name, time)) {
            Ok(_) => Some(self.changed()),
            Err(err) => {
                log::error!("Could not save score to storage: {}", err);
                None
            }
        }
    }

    fn changed(&self) -> Inbound {
        Inbound::ScoreboardChanged(self.store.refresh())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;

    struct FailingStorage;

    impl ScoreStorage for FailingStorage {
        fn get_item(&self, _key: &str) -> Option<String> {
            None
        }

        fn set_item(&self, _key: &str, _value: &str) -> core::result::Result<(), StorageError> {
            Err(StorageError::WriteFailed("quota exceeded".to_string()))
        }
    }

    fn named(name: &'static str) -> impl FnMut(Seconds) -> Option<String> {
        move |_| Some(name.to_string())
    }

    fn entries(inbound: Option<Inbound>) -> Vec<(String, Seconds)> {
        match inbound {
            Some(Inbound::ScoreboardChanged(scoreboard)) => scoreboard
                .iter()
                .map(|entry| (entry.name.clone(), entry.time))
                .collect(),
            None => panic!("expected a scoreboard delivery"),
        }
    }

    #[test]
    fn boot_publishes_persisted_scoreboard() {
        let storage = MemoryStorage::new();
        storage
            .set_item(SCOREBOARD_KEY, r#"[{"name":"Bo","time":30}]"#)
            .unwrap();
        let mut dispatcher = SyncDispatcher::new(ScoreboardStore::new(storage), named("x"));

        assert_eq!(
            entries(dispatcher.dispatch(HostEvent::Boot)),
            vec![("Bo".to_string(), 30)]
        );
    }

    #[test]
    fn save_score_records_and_delivers() {
        let mut dispatcher =
            SyncDispatcher::new(ScoreboardStore::new(MemoryStorage::new()), named("Ann"));

        let delivered = dispatcher.dispatch(Outbound::RequestSaveScore { time: 50 }.into());

        assert_eq!(entries(delivered), vec![("Ann".to_string(), 50)]);
    }

    #[test]
    fn declined_name_is_saved_as_empty() {
        let mut dispatcher = SyncDispatcher::new(
            ScoreboardStore::new(MemoryStorage::new()),
            |_: Seconds| -> Option<String> { None },
        );

        let delivered = dispatcher.dispatch(Outbound::RequestSaveScore { time: 12 }.into());

        assert_eq!(entries(delivered), vec![(String::new(), 12)]);
    }

    #[test]
    fn failed_write_delivers_nothing() {
        let mut dispatcher = SyncDispatcher::new(ScoreboardStore::new(FailingStorage), named("x"));

        assert_eq!(
            dispatcher.dispatch(Outbound::RequestSaveScore { time: 1 }.into()),
            None
        );
    }

    #[test]
    fn other_tab_write_is_delivered_for_own_key_only() {
        let storage = MemoryStorage::new();
        let mut tab_a = SyncDispatcher::new(ScoreboardStore::new(storage.clone()), named("a"));
        let mut tab_b = SyncDispatcher::new(ScoreboardStore::new(storage), named("b"));

        tab_b.dispatch(Outbound::RequestSaveScore { time: 9 }.into());

        assert_eq!(
            entries(tab_a.dispatch(StorageChange::local(SCOREBOARD_KEY).into())),
            vec![("b".to_string(), 9)]
        );
        assert_eq!(
            tab_a.dispatch(StorageChange::local("unrelated").into()),
            None
        );
        assert_eq!(
            tab_a.dispatch(HostEvent::StorageChanged(StorageChange {
                area: StorageArea::Session,
                key: Some(SCOREBOARD_KEY.to_string()),
            })),
            None
        );
        assert_eq!(
            tab_a.dispatch(HostEvent::StorageChanged(StorageChange {
                area: StorageArea::Local,
                key: None,
            })),
            None
        );
    }

    #[test]
    fn own_and_foreign_deliveries_converge_on_the_view() {
        let storage = MemoryStorage::new();
        let mut tab_a = SyncDispatcher::new(ScoreboardStore::new(storage.clone()), named("a"));
        let mut view = ScoreboardView::default();

        let own = tab_a
            .dispatch(Outbound::RequestSaveScore { time: 3 }.into())
            .unwrap();
        assert!(view.apply(own));

        // the same write observed again through the storage listener
        let echoed = tab_a
            .dispatch(StorageChange::local(SCOREBOARD_KEY).into())
            .unwrap();
        assert!(!view.apply(echoed));
        assert_eq!(view.scoreboard().len(), 1);
    }

    #[test]
    fn won_session_flows_into_the_scoreboard() {
        let layout = MineLayout::from_mine_coords((1, 3), &[(0, 0)]).unwrap();
        let mut game = GameSession::with_board(Board::from_layout(&layout));
        let mut dispatcher =
            SyncDispatcher::new(ScoreboardStore::new(MemoryStorage::new()), named("Cy"));

        game.reveal((0, 1)).unwrap();
        game.tick();
        game.reveal((0, 2)).unwrap();

        let outbound = game.take_outbound().unwrap();
        assert_eq!(
            entries(dispatcher.dispatch(outbound.into())),
            vec![("Cy".to_string(), 1)]
        );
    }
}
