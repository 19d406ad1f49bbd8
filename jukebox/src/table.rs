//! Card table: which card plays what
//!
//! A CSV file with the headers `rfid_uid,media_desc,sonos_uri`:
//!
//! ```text
//! rfid_uid,media_desc,sonos_uri
//! 04a2b3c4,Morning Jazz,x-SONOSFAV:SHUF:Morning Jazz Mix
//! 5d1e22f0,So What,x-sonos-spotify:spotify%3atrack%3a4vLYewWIvqHfKtJDk8c8tq
//! ```

use std::collections::HashMap;
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::error::TableError;
use crate::reader::CardUid;

/// What a registered card asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    pub media_desc: String,
    pub sonos_uri: String,
}

#[derive(Debug, Deserialize)]
struct Row {
    rfid_uid: String,
    #[serde(default)]
    media_desc: String,
    sonos_uri: String,
}

/// Card UIDs (lowercase hex) mapped to their entries
#[derive(Debug, Clone, Default)]
pub struct JukeboxTable {
    entries: HashMap<String, TableEntry>,
}

impl JukeboxTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file)?;
        tracing::debug!(path = %path.display(), cards = table.len(), "loaded jukebox file");
        Ok(table)
    }

    /// Read CSV rows; the first row for a UID wins
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, TableError> {
        let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut entries = HashMap::new();

        for row in csv.deserialize::<Row>() {
            let row = row.map_err(|source| TableError::Row {
                line: source.position().map(|p| p.line()).unwrap_or_default(),
                source,
            })?;

            let uid = row.rfid_uid.to_ascii_lowercase();
            if uid.is_empty() {
                continue;
            }
            if entries.contains_key(&uid) {
                tracing::debug!(uid = %uid, "ignoring duplicate card entry");
                continue;
            }
            entries.insert(
                uid,
                TableEntry {
                    media_desc: row.media_desc,
                    sonos_uri: row.sonos_uri,
                },
            );
        }

        Ok(Self { entries })
    }

    pub fn get(&self, uid: &CardUid) -> Option<&TableEntry> {
        self.entries.get(&uid.to_hex())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
rfid_uid,media_desc,sonos_uri
04A2B3C4, Morning Jazz ,x-SONOSFAV:SHUF:Morning Jazz Mix
5d1e22f0,So What,x-sonos-spotify:spotify%3atrack%3a4vLYewWIvqHfKtJDk8c8tq
04a2b3c4,Shadowed,x-file-cifs://nas/other.mp3
,Blank card,x-file-cifs://nas/blank.mp3
";

    #[test]
    fn test_first_entry_wins_and_keys_are_lowercase() {
        let table = JukeboxTable::from_reader(TABLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);

        let jazz = table.get(&CardUid::new(vec![0x04, 0xa2, 0xb3, 0xc4])).unwrap();
        assert_eq!(jazz.media_desc, "Morning Jazz");
        assert_eq!(jazz.sonos_uri, "x-SONOSFAV:SHUF:Morning Jazz Mix");
    }

    #[test]
    fn test_unknown_card() {
        let table = JukeboxTable::from_reader(TABLE.as_bytes()).unwrap();
        assert!(table.get(&CardUid::new(vec![0xde, 0xad])).is_none());
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let result = JukeboxTable::from_reader("rfid_uid,media_desc\n0102,Nothing\n".as_bytes());
        assert!(matches!(result, Err(TableError::Row { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = JukeboxTable::load(dir.path().join("jukebox.csv"));
        assert!(matches!(result, Err(TableError::Io { .. })));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, TABLE.as_bytes()).unwrap();
        let table = JukeboxTable::load(file.path()).unwrap();
        assert!(!table.is_empty());
    }
}
