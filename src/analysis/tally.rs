use indexmap::map::Entry as MapEntry;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone)]
struct Entry {
    display: String,
    count: u64,
}

/// Occurrence counter keyed by case-folded name.
///
/// "Dungeon Master" and "dungeon master" share one counter; the casing of
/// whichever variant arrived first is what gets serialized. Entries keep
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    entries: IndexMap<String, Entry>,
}

/// Unicode default case folding, so "Straße" and "STRASSE" collide.
pub fn fold(name: &str) -> String {
    caseless::default_case_fold_str(name)
}

impl Tally {
    /// Count one occurrence. Returns `true` if the name was new.
    pub fn add(&mut self, name: &str) -> bool {
        self.add_n(name, 1)
    }

    pub fn add_n(&mut self, name: &str, n: u64) -> bool {
        match self.entries.entry(fold(name)) {
            MapEntry::Occupied(mut e) => {
                e.get_mut().count += n;
                false
            }
            MapEntry::Vacant(e) => {
                e.insert(Entry {
                    display: name.to_string(),
                    count: n,
                });
                true
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&fold(name))
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<u64> {
        self.entries.get(&fold(name)).map(|e| e.count)
    }

    /// The casing this name was first recorded with.
    #[cfg(test)]
    pub fn display_name(&self, name: &str) -> Option<&str> {
        self.entries.get(&fold(name)).map(|e| e.display.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.values().map(|e| (e.display.as_str(), e.count))
    }

    /// Empty the tally, yielding `(display, count)` pairs in insertion order.
    pub fn drain(&mut self) -> impl Iterator<Item = (String, u64)> + '_ {
        self.entries.drain(..).map(|(_, e)| (e.display, e.count))
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, count) in self.iter() {
            map.serialize_entry(name, &count)?;
        }
        map.end()
    }
}
