//! The reading store.
//!
//! [`ReadingStore`] holds the session's readings in insertion order and writes
//! the whole collection back to its [`Backend`] after every insert or delete.
//! Nothing here orders readings for display; renderers do that themselves.

use chrono::{NaiveDateTime, Utc};
use tracing::{debug, info, warn};

use crate::classify::Category;
use crate::error::Result;
use crate::reading::{NewReading, Reading, ReadingId};
use crate::storage::Backend;

/// Key the collection is stored under unless configured otherwise.
pub const DEFAULT_KEY: &str = "bp-readings";

/// In-memory reading collection backed by a key-value store.
#[derive(Debug)]
pub struct ReadingStore<B> {
    backend: B,
    key: String,
    readings: Vec<Reading>,
}

impl<B: Backend> ReadingStore<B> {
    /// Load the collection stored under `key`.
    ///
    /// A missing key or an unparseable blob yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend itself cannot be read.
    pub fn load(backend: B, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let readings = match backend.get(&key)? {
            None => {
                debug!("No stored readings under key {}", key);
                Vec::new()
            }
            Some(blob) => match serde_json::from_str::<Vec<Reading>>(&blob) {
                Ok(readings) => readings,
                Err(e) => {
                    warn!("Stored readings under key {} are unreadable, starting empty: {}", key, e);
                    Vec::new()
                }
            },
        };

        debug!("Loaded {} readings", readings.len());
        Ok(Self {
            backend,
            key,
            readings,
        })
    }

    /// All readings in insertion order.
    #[must_use]
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Number of stored readings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the store holds no readings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Look up a reading by id.
    #[must_use]
    pub fn get(&self, id: ReadingId) -> Option<&Reading> {
        self.readings.iter().find(|r| r.id == id)
    }

    /// The key the collection is persisted under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The persistence backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Create a reading from `draft`, append it and persist the collection.
    ///
    /// The id is the current time in milliseconds, bumped past the largest
    /// existing id when needed so ids stay unique.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted. The reading is
    /// not kept in that case.
    pub fn append(&mut self, draft: NewReading) -> Result<&Reading> {
        self.append_at(draft, Utc::now().timestamp_millis())
    }

    /// Like [`append`](Self::append) with an explicit clock value.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted.
    pub fn append_at(&mut self, draft: NewReading, now_millis: i64) -> Result<&Reading> {
        let id = self.next_id(now_millis);
        self.readings.push(Reading::new(id, draft));

        if let Err(e) = self.save() {
            self.readings.pop();
            return Err(e);
        }

        info!("Recorded reading {}", id);
        let index = self.readings.len() - 1;
        Ok(&self.readings[index])
    }

    /// Delete the reading with `id` and persist the collection.
    ///
    /// Returns `false` without writing anything when no reading has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted. The reading is
    /// restored in that case.
    pub fn remove(&mut self, id: ReadingId) -> Result<bool> {
        let Some(index) = self.readings.iter().position(|r| r.id == id) else {
            debug!("No reading with id {} to remove", id);
            return Ok(false);
        };

        let removed = self.readings.remove(index);
        if let Err(e) = self.save() {
            self.readings.insert(index, removed);
            return Err(e);
        }

        info!("Deleted reading {}", id);
        Ok(true)
    }

    /// Overwrite the persisted collection with the in-memory one.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn save(&mut self) -> Result<()> {
        let blob = serde_json::to_string(&self.readings)?;
        self.backend.set(&self.key, &blob)?;
        debug!("Saved {} readings", self.readings.len());
        Ok(())
    }

    /// Summary of the stored readings.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let mut stats = StoreStats {
            total: self.readings.len(),
            oldest: self.readings.iter().map(|r| r.datetime).min(),
            newest: self.readings.iter().map(|r| r.datetime).max(),
            ..StoreStats::default()
        };
        for reading in &self.readings {
            match reading.category {
                Category::Normal => stats.normal += 1,
                Category::Elevated => stats.elevated += 1,
                Category::High => stats.high += 1,
            }
        }
        stats
    }

    fn next_id(&self, now_millis: i64) -> ReadingId {
        self.readings
            .iter()
            .map(|r| r.id)
            .max()
            .map_or(now_millis, |max| now_millis.max(max.saturating_add(1)))
    }
}

/// Counts and time span of the stored readings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Total number of readings.
    pub total: usize,
    /// Earliest measurement time.
    pub oldest: Option<NaiveDateTime>,
    /// Latest measurement time.
    pub newest: Option<NaiveDateTime>,
    /// Readings classified normal.
    pub normal: usize,
    /// Readings classified elevated.
    pub elevated: usize,
    /// Readings classified high.
    pub high: usize,
}
