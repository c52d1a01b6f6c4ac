use log::warn;

use super::{Slot, SlotRecord};
use crate::config::{DuplicatePolicy, LoadPolicy, OutOfRangePolicy, SLOT_COUNT};
use crate::error::SlotError;

/// Fixed set of numbered slots. Slot `i` always sits at position `i`,
/// so the list is sorted by index and has no gaps or duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    slots: Vec<Slot>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(SLOT_COUNT)
    }
}

impl Registry {
    /// A registry of `capacity` unbound slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(Slot::empty).collect(),
        }
    }

    /// Build a registry from stored records: indices the records don't
    /// mention become unbound slots, the rest are judged by `policy`.
    pub fn from_records(
        records: impl IntoIterator<Item = SlotRecord>,
        capacity: usize,
        policy: LoadPolicy,
    ) -> Result<Self, SlotError> {
        let mut seen = vec![false; capacity];
        let mut registry = Self::new(capacity);

        for record in records {
            let index = match usize::try_from(record.number) {
                Ok(index) if index < capacity => index,
                _ => match policy.out_of_range {
                    OutOfRangePolicy::Reject => {
                        return Err(SlotError::OutOfRange {
                            index: record.number,
                            capacity,
                        })
                    }
                    OutOfRangePolicy::Drop => {
                        warn!(
                            "Dropping stored slot {} (outside 0..{})",
                            record.number, capacity
                        );
                        continue;
                    }
                },
            };

            if seen[index] {
                match policy.duplicates {
                    DuplicatePolicy::Reject => return Err(SlotError::Duplicate { index }),
                    DuplicatePolicy::KeepFirst => {
                        warn!("Dropping duplicate record for slot {}", index);
                        continue;
                    }
                }
            }

            seen[index] = true;
            registry.slots[index].guid = record.guid;
        }

        Ok(registry)
    }

    /// Every slot, bound or not, in index order.
    pub fn to_records(&self) -> Vec<SlotRecord> {
        self.slots.iter().map(SlotRecord::from).collect()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// The GUID bound to `index`, or `""` when the slot is unbound or doesn't exist.
    pub fn get(&self, index: usize) -> &str {
        self.slot(index).map(|s| s.guid.as_str()).unwrap_or("")
    }

    pub fn is_bound(&self, index: usize) -> bool {
        self.slot(index).is_some_and(Slot::is_bound)
    }

    pub fn set(&mut self, index: usize, guid: impl Into<String>) -> Result<(), SlotError> {
        let slot = self.slot_mut(index)?;
        slot.guid = guid.into();
        Ok(())
    }

    pub fn clear(&mut self, index: usize) -> Result<(), SlotError> {
        self.slot_mut(index)?.reset();
        Ok(())
    }

    pub fn bound_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_bound()).count()
    }

    /// Slots currently bound to `guid`. A GUID may be bookmarked more than once.
    pub fn find(&self, guid: &str) -> impl Iterator<Item = usize> + '_ {
        let guid = guid.to_string();
        self.slots
            .iter()
            .filter(move |s| s.is_bound() && s.guid == guid)
            .map(|s| s.index)
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut Slot, SlotError> {
        let capacity = self.slots.len();
        self.slots.get_mut(index).ok_or(SlotError::OutOfRange {
            index: index as i64,
            capacity,
        })
    }
}
