// The document surface the portal client renders into

use crate::ui::alert::{Banner, BannerId};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// Operations the client needs from the page it runs in.
///
/// Lookups by element id return `false`/`None` when the element is absent;
/// callers decide whether that matters.
pub trait Page: Send + Sync {
    /// Path of the current view, e.g. `/patients`
    fn current_path(&self) -> String;

    /// Leave the current view for `path`
    fn navigate(&self, path: &str);

    fn has_element(&self, id: &str) -> bool;

    /// Replace the text of an element; returns whether the element exists
    fn set_text_content(&self, id: &str, text: &str) -> bool;

    /// Append a banner to a container; `None` if the container is missing
    fn append_banner(&self, container_id: &str, banner: Banner) -> Option<BannerId>;

    fn remove_banner_class(&self, id: BannerId, class: &str);

    fn remove_banner(&self, id: BannerId);
}

#[derive(Debug, Default)]
struct PageState {
    path: String,
    history: Vec<String>,
    elements: HashMap<String, String>,
    banners: BTreeMap<BannerId, (String, Banner)>,
    next_banner: u64,
}

/// A page held entirely in memory.
///
/// Used by the command-line client and by tests to observe what the
/// client did to the document.
#[derive(Debug)]
pub struct MemoryPage {
    state: Mutex<PageState>,
}

impl MemoryPage {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(PageState {
                path: path.into(),
                ..Default::default()
            }),
        }
    }

    /// Add an empty element with the given id
    pub fn with_element(self, id: impl Into<String>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.elements.insert(id.into(), String::new());
        }
        self
    }

    pub fn text_of(&self, id: &str) -> Option<String> {
        self.state.lock().ok()?.elements.get(id).cloned()
    }

    /// Every path navigated to, oldest first
    pub fn history(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.history.clone())
            .unwrap_or_default()
    }

    pub fn banner(&self, id: BannerId) -> Option<Banner> {
        let state = self.state.lock().ok()?;
        state.banners.get(&id).map(|(_, banner)| banner.clone())
    }

    /// Banners currently attached to a container, in insertion order
    pub fn banners_in(&self, container_id: &str) -> Vec<Banner> {
        self.state
            .lock()
            .map(|state| {
                state
                    .banners
                    .values()
                    .filter(|(container, _)| container == container_id)
                    .map(|(_, banner)| banner.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Page for MemoryPage {
    fn current_path(&self) -> String {
        self.state
            .lock()
            .map(|state| state.path.clone())
            .unwrap_or_default()
    }

    fn navigate(&self, path: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.path = path.to_string();
            state.history.push(path.to_string());
        }
    }

    fn has_element(&self, id: &str) -> bool {
        self.state
            .lock()
            .map(|state| state.elements.contains_key(id))
            .unwrap_or(false)
    }

    fn set_text_content(&self, id: &str, text: &str) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        match state.elements.get_mut(id) {
            Some(content) => {
                *content = text.to_string();
                true
            }
            None => false,
        }
    }

    fn append_banner(&self, container_id: &str, banner: Banner) -> Option<BannerId> {
        let mut state = self.state.lock().ok()?;
        if !state.elements.contains_key(container_id) {
            return None;
        }

        state.next_banner += 1;
        let id = BannerId(state.next_banner);
        state.banners.insert(id, (container_id.to_string(), banner));
        Some(id)
    }

    fn remove_banner_class(&self, id: BannerId, class: &str) {
        if let Ok(mut state) = self.state.lock() {
            if let Some((_, banner)) = state.banners.get_mut(&id) {
                banner.classes.retain(|c| c != class);
            }
        }
    }

    fn remove_banner(&self, id: BannerId) {
        if let Ok(mut state) = self.state.lock() {
            state.banners.remove(&id);
        }
    }
}
