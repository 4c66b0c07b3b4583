//! Reference-counted listening records and the indexes built on them.
//!
//! A [`ListeningRecord`] tracks how many live handler entries exist between
//! one observer/subject pair. The observer's [`ListeningIndex`] and the
//! subject's [`ListenerSet`] both hold the record; when its count reaches
//! zero the record is removed from both sides. This is the sole mechanism
//! preventing unbounded growth of cross-references between long-lived
//! observer/subject pairs, and it is what makes the no-argument bulk detach
//! O(listening-pairs) instead of a scan over every handler list.
//!
//! # Invariant
//!
//! `count` equals the number of live handler entries referencing the record.
//! Increment when an entry is appended, decrement when one is removed;
//! at zero, delete the record from both indexes.

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::Mutex;

use crate::ident::{ObserverId, SubjectId};

// ─────────────────────────────────────────────────────────────────────────────
// ListeningRecord
// ─────────────────────────────────────────────────────────────────────────────

/// Shared record counting the live handler entries between one observer and
/// one subject.
#[derive(Debug)]
pub struct ListeningRecord {
    observer: ObserverId,
    subject: SubjectId,
    count: Mutex<usize>,
}

impl ListeningRecord {
    /// Creates a record for the given pair with a count of zero.
    #[must_use]
    pub fn new(observer: ObserverId, subject: SubjectId) -> Arc<Self> {
        Arc::new(Self {
            observer,
            subject,
            count: Mutex::new(0),
        })
    }

    /// The observer side of the pair.
    #[must_use]
    pub fn observer(&self) -> ObserverId {
        self.observer
    }

    /// The subject side of the pair.
    #[must_use]
    pub fn subject(&self) -> SubjectId {
        self.subject
    }

    /// Returns the current count.
    #[must_use]
    pub fn count(&self) -> usize {
        *self.count.lock()
    }

    /// Records one more live handler entry; returns the new count.
    pub fn increment(&self) -> usize {
        let mut count = self.count.lock();
        *count += 1;
        *count
    }

    /// Records one removed handler entry; returns the new count.
    ///
    /// Decrementing below zero indicates a bookkeeping bug upstream and is
    /// reported in debug builds.
    pub fn decrement(&self) -> usize {
        let mut count = self.count.lock();
        debug_assert!(*count > 0, "listening record decremented below zero");
        *count = count.saturating_sub(1);
        *count
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ListeningIndex (observer side)
// ─────────────────────────────────────────────────────────────────────────────

/// One listening pair as stored in the observer's index.
///
/// `target` is the observer's back-pointer to the subject (Layer 2 stores a
/// weak handle to the subject core here), enabling bulk detach without a
/// reference cycle.
#[derive(Debug)]
pub struct ListeningEntry<T> {
    /// The shared pair record.
    pub record: Arc<ListeningRecord>,
    /// Back-pointer to the subject.
    pub target: T,
}

/// Per-observer map of every subject the observer currently listens to.
#[derive(Debug)]
pub struct ListeningIndex<T> {
    entries: HashMap<SubjectId, ListeningEntry<T>>,
}

impl<T> Default for ListeningIndex<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> ListeningIndex<T> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `subject`, creating the record (count zero) and
    /// the back-pointer via `target` if the pair is new.
    pub fn get_or_insert_with(
        &mut self,
        observer: ObserverId,
        subject: SubjectId,
        target: impl FnOnce() -> T,
    ) -> &ListeningEntry<T> {
        self.entries
            .entry(subject)
            .or_insert_with(|| ListeningEntry {
                record: ListeningRecord::new(observer, subject),
                target: target(),
            })
    }

    /// Returns the entry for `subject`, if the pair exists.
    #[must_use]
    pub fn get(&self, subject: SubjectId) -> Option<&ListeningEntry<T>> {
        self.entries.get(&subject)
    }

    /// Removes and returns the entry for `subject`.
    pub fn remove(&mut self, subject: SubjectId) -> Option<ListeningEntry<T>> {
        self.entries.remove(&subject)
    }

    /// Returns every subject id the observer currently listens to.
    #[must_use]
    pub fn subjects(&self) -> Vec<SubjectId> {
        self.entries.keys().copied().collect()
    }

    /// Returns the number of listening pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the observer listens to nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ListenerSet (subject side)
// ─────────────────────────────────────────────────────────────────────────────

/// Per-subject mirror of the observers currently listening to it.
#[derive(Debug, Default)]
pub struct ListenerSet {
    records: HashMap<ObserverId, Arc<ListeningRecord>>,
}

impl ListenerSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or refreshes) the record for `observer`.
    pub fn insert(&mut self, observer: ObserverId, record: Arc<ListeningRecord>) {
        self.records.insert(observer, record);
    }

    /// Removes the record for `observer`.
    pub fn remove(&mut self, observer: ObserverId) -> Option<Arc<ListeningRecord>> {
        self.records.remove(&observer)
    }

    /// Returns the number of observers listening to the subject.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing listens to the subject.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
