use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{EmployeeId, EmployeeRecord};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("employee {0:?} is not on the roster")]
    UnknownEmployee(EmployeeId),
    #[error("the roster must keep at least one row")]
    LastRow,
}

/// Editable employee rows for one report.
///
/// Identifiers come from a counter owned by the roster and are never reused,
/// so a row keeps its id across edits and removals of other rows. Deserialized
/// rosters are normalized on the way in so the same holds for them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roster {
    rows: Vec<EmployeeRecord>,
    next_id: u64,
}

/// Wire shape of a [`Roster`] before its invariants are restored.
#[derive(Debug, Deserialize)]
struct StoredRoster {
    #[serde(default)]
    rows: Vec<EmployeeRecord>,
    #[serde(default)]
    next_id: u64,
}

impl<'de> Deserialize<'de> for Roster {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        StoredRoster::deserialize(deserializer).map(Roster::restore)
    }
}

impl Roster {
    /// Keeps stored ids when they are non-zero and distinct, otherwise issues
    /// fresh ones. The counter always ends up past every id in use.
    fn restore(stored: StoredRoster) -> Self {
        let mut seen = HashSet::new();
        let intact = stored
            .rows
            .iter()
            .all(|row| row.id.0 > 0 && seen.insert(row.id));
        if !intact {
            return Self::from_records(stored.rows);
        }

        let highest = stored.rows.iter().map(|row| row.id.0).max().unwrap_or(0);
        let mut roster = Self {
            rows: stored.rows,
            next_id: stored.next_id.max(highest + 1),
        };
        if roster.rows.is_empty() {
            roster.add_blank();
        }
        roster
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    pub fn new() -> Self {
        let mut roster = Self {
            rows: Vec::new(),
            next_id: 1,
        };
        roster.add_blank();
        roster
    }

    /// Builds a roster from existing rows, issuing fresh ids.
    pub fn from_records(records: impl IntoIterator<Item = EmployeeRecord>) -> Self {
        let mut roster = Self {
            rows: Vec::new(),
            next_id: 1,
        };
        for record in records {
            let id = roster.issue_id();
            roster.rows.push(EmployeeRecord { id, ..record });
        }
        if roster.rows.is_empty() {
            roster.add_blank();
        }
        roster
    }

    fn issue_id(&mut self) -> EmployeeId {
        let id = EmployeeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_blank(&mut self) -> EmployeeId {
        let id = self.issue_id();
        self.rows.push(EmployeeRecord::blank(id));
        id
    }

    /// Fills the trailing blank row if there is one, otherwise appends.
    pub fn add_employee(&mut self, record: EmployeeRecord) -> EmployeeId {
        if let Some(last) = self.rows.last_mut().filter(|row| row.is_blank()) {
            let id = last.id;
            *last = EmployeeRecord { id, ..record };
            return id;
        }

        let id = self.issue_id();
        self.rows.push(EmployeeRecord { id, ..record });
        id
    }

    pub fn update<F>(&mut self, id: EmployeeId, edit: F) -> Result<&EmployeeRecord, RosterError>
    where
        F: FnOnce(&mut EmployeeRecord),
    {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(RosterError::UnknownEmployee(id))?;
        edit(row);
        row.id = id;
        Ok(row)
    }

    pub fn remove(&mut self, id: EmployeeId) -> Result<EmployeeRecord, RosterError> {
        let index = self
            .rows
            .iter()
            .position(|row| row.id == id)
            .ok_or(RosterError::UnknownEmployee(id))?;
        if self.rows.len() == 1 {
            return Err(RosterError::LastRow);
        }
        Ok(self.rows.remove(index))
    }

    /// Back to a single blank row. Ids keep counting up.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.add_blank();
    }

    pub fn rows(&self) -> &[EmployeeRecord] {
        &self.rows
    }

    pub fn get(&self, id: EmployeeId) -> Option<&EmployeeRecord> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Rows complete enough to take part in the distribution.
    pub fn named(&self) -> impl Iterator<Item = &EmployeeRecord> {
        self.rows.iter().filter(|row| row.is_named())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
