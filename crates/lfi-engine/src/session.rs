use crate::store::PersistedState;

/// Per-session context handed to every component mutator.
///
/// It owns the persisted state and the pending render request; components never hold references
/// to each other, only to the session they are given.
#[derive(Debug)]
pub struct Session {
    state: PersistedState,
    render_requested: bool,
}

impl Session {
    pub fn new(state: PersistedState) -> Self {
        Self {
            state,
            render_requested: false,
        }
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    pub fn put(&mut self, key: &str, value: &str) {
        self.state.put(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        log::debug!("purge persisted key `{key}`");
        self.state.remove(key);
    }

    pub fn clear(&mut self) {
        self.state.clear();
    }

    /// Ask for the configuration to be re-derived and dispatched when the current batch settles.
    pub fn request_render(&mut self) {
        self.render_requested = true;
    }

    pub fn render_requested(&self) -> bool {
        self.render_requested
    }

    pub(crate) fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }
}
