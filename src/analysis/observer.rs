use tracing::{debug, info};

use super::Category;

/// Receives first-sighting events while a corpus is analyzed.
pub trait Observer {
    /// `name` was recorded in `category` for the first time, in `document`.
    fn first_seen(&mut self, category: Category, document: &str, name: &str);

    /// `color` was counted for the first time, in `document`.
    fn color_seen(&mut self, document: &str, color: &str);
}

/// Forwards sightings to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn first_seen(&mut self, category: Category, document: &str, name: &str) {
        debug!(%category, document, "new entry: {}", name);
    }

    fn color_seen(&mut self, document: &str, color: &str) {
        info!(document, "new color: {}", color);
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct Recorder {
    pub entries: Vec<(Category, String, String)>,
    pub colors: Vec<(String, String)>,
}

#[cfg(test)]
impl Observer for Recorder {
    fn first_seen(&mut self, category: Category, document: &str, name: &str) {
        self.entries
            .push((category, document.to_string(), name.to_string()));
    }

    fn color_seen(&mut self, document: &str, color: &str) {
        self.colors.push((document.to_string(), color.to_string()));
    }
}
