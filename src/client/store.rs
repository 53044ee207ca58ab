//! In-memory list of looked-up locations, newest first

use crate::models::{RecordId, WeatherRecord};
use std::collections::VecDeque;

/// Ordered records, most recently added at the front.
///
/// Order follows when records were added, never a sort key.
#[derive(Debug, Default, Clone)]
pub struct WeatherList {
    records: VecDeque<WeatherRecord>,
    next_id: u64,
}

impl WeatherList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` at the front and return its freshly assigned id
    pub fn prepend(&mut self, mut record: WeatherRecord) -> RecordId {
        self.next_id += 1;
        let id = RecordId(self.next_id);
        record.id = id;
        self.records.push_front(record);
        id
    }

    /// Look a record up by id
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&WeatherRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Id of the record currently shown at `position` (0-based)
    #[must_use]
    pub fn id_at(&self, position: usize) -> Option<RecordId> {
        self.records.get(position).map(|record| record.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeatherRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurrentConditions, ForecastResponse};

    fn record(name: &str) -> WeatherRecord {
        WeatherRecord::merge(
            CurrentConditions {
                name: name.to_string(),
                ..Default::default()
            },
            ForecastResponse::default(),
        )
    }

    fn names(list: &WeatherList) -> Vec<&str> {
        list.iter().map(WeatherRecord::name).collect()
    }

    #[test]
    fn test_prepend_puts_newest_first() {
        let mut list = WeatherList::new();
        list.prepend(record("A"));
        list.prepend(record("B"));
        list.prepend(record("C"));

        assert_eq!(names(&list), vec!["C", "B", "A"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_ids_survive_later_insertions() {
        let mut list = WeatherList::new();
        let a = list.prepend(record("A"));
        let position_of_a = 0;
        list.prepend(record("B"));

        assert_eq!(list.get(a).unwrap().name(), "A");
        // The old position now points at the newer record.
        assert_ne!(list.id_at(position_of_a), Some(a));
    }

    #[test]
    fn test_ids_are_unique_for_equal_payloads() {
        let mut list = WeatherList::new();
        let first = list.prepend(record("Paris"));
        let second = list.prepend(record("Paris"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_unknown_id() {
        let list = WeatherList::new();
        assert!(list.is_empty());
        assert!(list.get(RecordId(42)).is_none());
        assert!(list.id_at(0).is_none());
    }
}
