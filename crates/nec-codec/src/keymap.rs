use serde::{Deserialize, Serialize};

pub const MAX_KEYS: usize = 64;
pub const MAX_LABEL_LEN: usize = 16;

pub type Label = heapless::String<MAX_LABEL_LEN>;
type Entries = heapless::Vec<KeyEntry, MAX_KEYS>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    pub key: u8,
    pub label: Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum KeyMapError {
    #[error("key 0x{0:02X} is mapped more than once")]
    DuplicateKey(u8),
    #[error("label for key 0x{0:02X} is longer than {MAX_LABEL_LEN} bytes")]
    LabelTooLong(u8),
    #[error("key map holds at most {MAX_KEYS} keys")]
    Full,
}

/// Maps the key byte of a received command to a human readable label.
///
/// Serialized as a plain list of [`KeyEntry`]s; deserializing rejects duplicate keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Entries", into = "Entries")]
pub struct KeyMap {
    entries: Entries,
}

impl KeyMap {
    pub const fn new() -> KeyMap {
        KeyMap {
            entries: heapless::Vec::new(),
        }
    }

    pub fn from_entries(entries: &[(u8, &str)]) -> Result<KeyMap, KeyMapError> {
        let mut map = KeyMap::new();
        for (key, label) in entries {
            map.insert(*key, label)?;
        }
        Ok(map)
    }

    pub fn insert(&mut self, key: u8, label: &str) -> Result<(), KeyMapError> {
        if self.lookup(key).is_some() {
            return Err(KeyMapError::DuplicateKey(key));
        }
        let label: Label = label.try_into().map_err(|_| KeyMapError::LabelTooLong(key))?;
        self.entries
            .push(KeyEntry { key, label })
            .map_err(|_| KeyMapError::Full)
    }

    pub fn lookup(&self, key: u8) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyEntry> {
        self.entries.iter()
    }
}

impl TryFrom<Entries> for KeyMap {
    type Error = KeyMapError;

    fn try_from(entries: Entries) -> Result<KeyMap, KeyMapError> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.key == entry.key) {
                return Err(KeyMapError::DuplicateKey(entry.key));
            }
        }
        Ok(KeyMap { entries })
    }
}

impl From<KeyMap> for Entries {
    fn from(map: KeyMap) -> Entries {
        map.entries
    }
}
