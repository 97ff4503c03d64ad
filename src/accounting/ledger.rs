use std::slice::Iter;

use super::expense::ExpenseRecord;
use super::ValidationError;

/// Expenses in insertion order. A record's 1-based rank in this order is its
/// position, which is what deletion refers to.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Ledger {
    records: Vec<ExpenseRecord>,
}

impl Ledger {
    pub fn new() -> Ledger {
        Ledger { records: Vec::new() }
    }

    pub fn from_records(records: Vec<ExpenseRecord>) -> Ledger {
        Ledger { records }
    }

    /// Appends at the end and returns the new record's position.
    pub fn append(&mut self, record: ExpenseRecord) -> usize {
        self.records.push(record);
        self.records.len()
    }

    /// Removes the record at the 1-based `position`. The remaining records
    /// keep their relative order.
    pub fn remove_at(&mut self, position: usize) -> Result<ExpenseRecord, ValidationError> {
        if position == 0 || position > self.records.len() {
            return Err(ValidationError::PositionOutOfRange {
                position,
                len: self.records.len(),
            });
        }

        Ok(self.records.remove(position - 1))
    }

    pub fn get(&self, position: usize) -> Option<&ExpenseRecord> {
        position.checked_sub(1).and_then(|index| self.records.get(index))
    }

    /// Records paired with their position, newest date first. Records sharing
    /// a date stay in insertion order.
    pub fn display_order(&self) -> Vec<(usize, &ExpenseRecord)> {
        let mut rows: Vec<(usize, &ExpenseRecord)> = self
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| (index + 1, record))
            .collect();
        rows.sort_by(|(_, a), (_, b)| b.date().cmp(&a.date()));
        rows
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn iter(&self) -> Iter<'_, ExpenseRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
