//! The registration roster used by dynamic (late-joining) registration.
//!
//! The roster is a single store value listing every registered worker as
//! `<name>-<id>` entries joined by `,`, e.g. `"ps-0,trainer-1,trainer2-2"`.
//! It only ever grows: entries are appended, never removed or rewritten.
//!
//! Names containing `,` are outside the format and are not escaped. The id
//! is split off at the *last* `-`, so names containing `-` still parse.

use std::fmt;

use crate::error::TypeError;
use crate::worker::{WorkerId, WorkerName};

/// Separates roster entries.
pub const ENTRY_DELIMITER: u8 = b',';

/// Separates a worker name from its id within one entry.
pub const FIELD_DELIMITER: u8 = b'-';

/// One `<name>-<id>` roster entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RosterEntry {
    pub name: WorkerName,
    pub id: WorkerId,
}

impl RosterEntry {
    pub fn new(name: WorkerName, id: WorkerId) -> Self {
        Self { name, id }
    }

    /// Parse a single raw entry.
    pub fn parse(raw: &[u8]) -> Result<Self, TypeError> {
        let malformed = || TypeError::MalformedRosterEntry {
            entry: String::from_utf8_lossy(raw).into_owned(),
        };

        let split = raw
            .iter()
            .rposition(|b| *b == FIELD_DELIMITER)
            .ok_or_else(malformed)?;
        let (name, id) = (&raw[..split], &raw[split + 1..]);

        // Ids are written in canonical base-10; `u32::from_str` alone would
        // also take a leading `+`.
        if id.is_empty() || !id.iter().all(u8::is_ascii_digit) {
            return Err(malformed());
        }
        let id = std::str::from_utf8(id)
            .ok()
            .and_then(|s| s.parse::<WorkerId>().ok())
            .ok_or_else(malformed)?;

        Ok(Self {
            name: WorkerName::new(name.to_vec()),
            id,
        })
    }

    /// Encoded form, `<name>-<id>`.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.name.as_bytes().len() + 11);
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.name.as_bytes());
        out.push(FIELD_DELIMITER);
        out.extend_from_slice(self.id.key().as_bytes());
    }
}

impl fmt::Display for RosterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.id)
    }
}

/// Ordered, append-only list of [`RosterEntry`] values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a roster value as read from the store.
    ///
    /// A present-but-empty value is not a valid roster: it contains one
    /// empty entry, which lacks the name/id delimiter.
    pub fn parse(raw: &[u8]) -> Result<Self, TypeError> {
        let entries = raw
            .split(|b| *b == ENTRY_DELIMITER)
            .map(RosterEntry::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    pub fn push(&mut self, entry: RosterEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_id(&self, id: WorkerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Encoded form, entries joined by `,`.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push(ENTRY_DELIMITER);
            }
            entry.write_to(&mut out);
        }
        out
    }
}

impl IntoIterator for Roster {
    type Item = RosterEntry;
    type IntoIter = std::vec::IntoIter<RosterEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
