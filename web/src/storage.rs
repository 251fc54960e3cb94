use gloo::events::EventListener;
use mineboard_core::{ScoreStorage, StorageArea, StorageChange, StorageError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::StorageEvent;
use yew::Callback;

/// `None` when the browser refuses storage access, e.g. with cookies blocked.
fn local_storage() -> Option<web_sys::Storage> {
    gloo::utils::window().local_storage().ok().flatten()
}

fn session_storage() -> Option<web_sys::Storage> {
    gloo::utils::window().session_storage().ok().flatten()
}

/// Scoreboard persistence backed by the browser's `localStorage`.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct LocalStorageBackend;

impl ScoreStorage for LocalStorageBackend {
    fn get_item(&self, key: &str) -> Option<String> {
        match local_storage()?.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::error!("Could not read {:?} from local storage: {:?}", key, err);
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        local_storage()
            .ok_or(StorageError::Unavailable)?
            .set_item(key, value)
            .map_err(|err| StorageError::WriteFailed(format!("{err:?}")))
    }
}

fn storage_area(area: Option<web_sys::Storage>) -> StorageArea {
    let Some(area) = area.map(JsValue::from) else {
        return StorageArea::Other;
    };

    if local_storage().is_some_and(|local| area == JsValue::from(local)) {
        StorageArea::Local
    } else if session_storage().is_some_and(|session| area == JsValue::from(session)) {
        StorageArea::Session
    } else {
        StorageArea::Other
    }
}

pub(crate) fn storage_change(event: &StorageEvent) -> StorageChange {
    StorageChange {
        area: storage_area(event.storage_area()),
        key: event.key(),
    }
}

/// Forwards `storage` events, fired when another tab writes to storage, until the listener is dropped.
pub(crate) fn listen_storage_changes(callback: Callback<StorageChange>) -> EventListener {
    let window = gloo::utils::window();
    EventListener::new(&window, "storage", move |event| {
        if let Some(event) = event.dyn_ref::<StorageEvent>() {
            let change = storage_change(event);
            log::trace!("storage event: {:?}", change);
            callback.emit(change);
        }
    })
}
