//! Audit storage backends.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Mutex, PoisonError, RwLock};

use uuid::Uuid;

use crate::clock::Clock;
use crate::error::AuditError;
use crate::event::{AuditLogEntry, NewAuditEntry};
use crate::query::{newest_first, AuditFilter};

/// Trait for audit storage backends.
///
/// Implementations assign identity and time to new entries and must serialize
/// appends (including eviction) against each other. Reads return owned copies
/// so that callers never observe a half-applied append.
pub trait AuditStorage: Send + Sync {
    /// Store an entry, stamping it with an id, sequence number and `clock.now()`.
    fn store(&self, entry: NewAuditEntry, clock: &dyn Clock) -> AuditLogEntry;

    /// Matching entries, newest first, with `limit`/`offset` applied.
    fn snapshot(&self, filter: &AuditFilter) -> Vec<AuditLogEntry>;

    /// Get an entry by ID, if it has not been evicted.
    fn get(&self, id: &str) -> Option<AuditLogEntry>;

    /// Number of retained entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of retained entries.
    fn capacity(&self) -> usize;
}

/// Bounded in-memory ring of entries, oldest at the front.
pub struct MemoryStorage {
    capacity: usize,
    inner: RwLock<Ring>,
}

struct Ring {
    entries: VecDeque<AuditLogEntry>,
    next_sequence: u64,
}

impl MemoryStorage {
    /// Create a store that retains at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self, AuditError> {
        if capacity == 0 {
            return Err(AuditError::InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity,
            inner: RwLock::new(Ring {
                entries: VecDeque::with_capacity(capacity),
                next_sequence: 0,
            }),
        })
    }
}

impl AuditStorage for MemoryStorage {
    fn store(&self, entry: NewAuditEntry, clock: &dyn Clock) -> AuditLogEntry {
        let mut ring = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let sequence = ring.next_sequence;
        ring.next_sequence += 1;

        let stored = AuditLogEntry::from_new(
            entry,
            Uuid::new_v4().to_string(),
            sequence,
            clock.now(),
        );
        ring.entries.push_back(stored.clone());

        while ring.entries.len() > self.capacity {
            if let Some(evicted) = ring.entries.pop_front() {
                tracing::trace!(
                    id = %evicted.id,
                    sequence = evicted.sequence,
                    "Evicted audit entry"
                );
            }
        }

        stored
    }

    fn snapshot(&self, filter: &AuditFilter) -> Vec<AuditLogEntry> {
        let mut results: Vec<AuditLogEntry> = {
            let ring = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            ring.entries
                .iter()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect()
        };

        results.sort_by(newest_first);
        filter.paginate(results)
    }

    fn get(&self, id: &str) -> Option<AuditLogEntry> {
        let ring = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        ring.entries.iter().find(|e| e.id == id).cloned()
    }

    fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Memory storage that also writes every stored entry as a JSON line.
///
/// A failed write is reported through `tracing` and never fails the append.
pub struct MirroredStorage {
    memory: MemoryStorage,
    out: Mutex<Box<dyn Write + Send>>,
}

impl MirroredStorage {
    /// Mirror to an arbitrary writer.
    pub fn new(capacity: usize, out: Box<dyn Write + Send>) -> Result<Self, AuditError> {
        Ok(Self {
            memory: MemoryStorage::new(capacity)?,
            out: Mutex::new(out),
        })
    }

    fn mirror(&self, entry: &AuditLogEntry) -> Result<(), AuditError> {
        let json = serde_json::to_string(entry)?;
        let mut out = self
            .out
            .lock()
            .map_err(|e| AuditError::MirrorFailed(format!("writer lock poisoned: {}", e)))?;
        writeln!(out, "{}", json)?;
        out.flush()?;
        Ok(())
    }
}

impl AuditStorage for MirroredStorage {
    fn store(&self, entry: NewAuditEntry, clock: &dyn Clock) -> AuditLogEntry {
        let stored = self.memory.store(entry, clock);
        if let Err(error) = self.mirror(&stored) {
            tracing::warn!(id = %stored.id, %error, "Failed to mirror audit entry");
        }
        stored
    }

    fn snapshot(&self, filter: &AuditFilter) -> Vec<AuditLogEntry> {
        self.memory.snapshot(filter)
    }

    fn get(&self, id: &str) -> Option<AuditLogEntry> {
        self.memory.get(id)
    }

    fn len(&self) -> usize {
        self.memory.len()
    }

    fn capacity(&self) -> usize {
        self.memory.capacity()
    }
}
