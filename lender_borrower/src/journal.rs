use std::collections::VecDeque;

use alloy_primitives::Address;
use candid::{CandidType, Decode, Encode};
use serde::Deserialize;

use crate::{
    constants::MAX_JOURNAL_ENTRIES,
    utils::error::{ManagerError, ManagerResult},
};

/// Category of a journal entry
#[derive(Clone, Copy, CandidType, Debug, Deserialize, PartialEq)]
pub enum LogType {
    Info,
    Harvest,
    Tend,
    Rebalance,
    HealthCheck,
    Configuration,
    Manual,
    ExecutionResult,
}

/// Journal entry
#[derive(Clone, CandidType, Debug, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub timestamp: u64,
    pub entry: ManagerResult<()>,
    pub log_type: LogType,
    pub strategy: Option<String>,
    pub turn: Option<u8>,
    pub note: Option<String>,
}

/// Builder for journal entries
impl JournalEntry {
    /// Create a new instance of a journal entry
    /// Fills the `timestamp`, `entry` and `log_type` fields
    pub fn new(timestamp: u64, entry: ManagerResult<()>, log_type: LogType) -> Self {
        Self {
            timestamp,
            entry,
            log_type,
            strategy: None,
            turn: None,
            note: None,
        }
    }

    /// Fills the `strategy` field of the entry
    pub fn strategy(mut self, strategy: Address) -> Self {
        self.strategy = Some(strategy.to_string());
        self
    }

    /// Fills the `turn` field of the entry
    pub fn turn(mut self, turn: u8) -> Self {
        self.turn = Some(turn);
        self
    }

    /// Fills the `note` field of the entry
    pub fn note<S: AsRef<str>>(mut self, text: S) -> Self {
        self.note = Some(text.as_ref().to_string());
        self
    }

    /// Candid encoding of the entry, used when exporting the journal
    pub fn to_bytes(&self) -> ManagerResult<Vec<u8>> {
        Encode!(self).map_err(|err| ManagerError::DecodingError(err.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> ManagerResult<Self> {
        Decode!(bytes, Self).map_err(|err| ManagerError::DecodingError(err.to_string()))
    }
}

/// Entries collected during a single call. Committed to the [`Journal`] once the call returns.
pub struct JournalCollection {
    timestamp: u64,
    strategy: Address,
    pub entries: Vec<JournalEntry>,
}

impl JournalCollection {
    pub fn open(timestamp: u64, strategy: Address) -> Self {
        Self {
            timestamp,
            strategy,
            entries: vec![],
        }
    }

    /// Appends a note to the collection
    pub fn append_note<S: AsRef<str>>(&mut self, entry: ManagerResult<()>, log_type: LogType, note: S) {
        self.entries.push(
            JournalEntry::new(self.timestamp, entry, log_type)
                .strategy(self.strategy)
                .note(note),
        );
    }

    /// Appends a result of an attempt
    pub fn append_turn<S: AsRef<str>>(&mut self, entry: ManagerResult<()>, turn: u8, note: S) {
        self.entries.push(
            JournalEntry::new(self.timestamp, entry, LogType::ExecutionResult)
                .strategy(self.strategy)
                .turn(turn)
                .note(note),
        );
    }
}

/// Bounded log of a strategy. The oldest entries are pruned first.
#[derive(Clone, Default)]
pub struct Journal {
    entries: VecDeque<JournalEntry>,
}

impl Journal {
    pub fn commit(&mut self, collection: JournalCollection) {
        self.entries.extend(collection.entries);
        while self.entries.len() > MAX_JOURNAL_ENTRIES {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry of the given type
    pub fn last_of(&self, log_type: LogType) -> Option<&JournalEntry> {
        self.entries.iter().rev().find(|entry| entry.log_type == log_type)
    }
}
