use chrono::NaiveDate;
use rand::{distributions::Alphanumeric, Rng};
use std::collections::{BTreeMap, HashMap};

pub type NoteId = String;

pub const DEFAULT_DAY_CAPACITY: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub date: NaiveDate,
    pub title: String,
}

/// In-memory notes keyed by id, with one ordered bucket of ids per day.
///
/// A day only has a bucket while it holds at least one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteStore {
    capacity: usize,
    notes: HashMap<NoteId, Note>,
    days: BTreeMap<NaiveDate, Vec<NoteId>>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{date} already holds {capacity} notes")]
    DayFull { date: NaiveDate, capacity: usize },
    #[error("note not found: {0}")]
    NoteNotFound(NoteId),
}

impl Default for NoteStore {
    fn default() -> Self {
        NoteStore::with_capacity(DEFAULT_DAY_CAPACITY)
    }
}

impl NoteStore {
    pub fn with_capacity(capacity: usize) -> Self {
        NoteStore {
            capacity: capacity.max(1),
            notes: HashMap::new(),
            days: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.get(id)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    pub fn count_on(&self, date: NaiveDate) -> usize {
        self.days.get(&date).map(|ids| ids.len()).unwrap_or(0)
    }

    pub fn has_room(&self, date: NaiveDate) -> bool {
        self.count_on(date) < self.capacity
    }

    /// Notes of one day in the order they were added.
    pub fn notes_on(&self, date: NaiveDate) -> Vec<&Note> {
        self.days
            .get(&date)
            .map(|ids| ids.iter().filter_map(|id| self.notes.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn note_at(&self, date: NaiveDate, index: usize) -> Option<&Note> {
        self.days
            .get(&date)
            .and_then(|ids| ids.get(index))
            .and_then(|id| self.notes.get(id))
    }

    pub fn add_note(
        &mut self,
        date: NaiveDate,
        title: impl Into<String>,
    ) -> Result<NoteId, StoreError> {
        self.ensure_capacity(date)?;
        let id = self.fresh_id();
        self.notes.insert(
            id.clone(),
            Note {
                id: id.clone(),
                date,
                title: title.into(),
            },
        );
        self.days.entry(date).or_default().push(id.clone());
        Ok(id)
    }

    pub fn edit_note(&mut self, id: &str, title: impl Into<String>) -> Result<(), StoreError> {
        let note = self
            .notes
            .get_mut(id)
            .ok_or_else(|| StoreError::NoteNotFound(id.to_string()))?;
        note.title = title.into();
        Ok(())
    }

    pub fn delete_note(&mut self, id: &str) -> Result<Note, StoreError> {
        let note = self
            .notes
            .remove(id)
            .ok_or_else(|| StoreError::NoteNotFound(id.to_string()))?;
        if let Some(ids) = self.days.get_mut(&note.date) {
            ids.retain(|existing| existing != id);
            if ids.is_empty() {
                self.days.remove(&note.date);
            }
        }
        Ok(note)
    }

    fn ensure_capacity(&self, date: NaiveDate) -> Result<(), StoreError> {
        if !self.has_room(date) {
            return Err(StoreError::DayFull {
                date,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    fn fresh_id(&self) -> NoteId {
        loop {
            let id = generate_id();
            if !self.notes.contains_key(&id) {
                return id;
            }
        }
    }
}

fn generate_id() -> NoteId {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect()
}
