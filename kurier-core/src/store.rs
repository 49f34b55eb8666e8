//! Ordered stop list with the courier's selection.

use std::collections::HashSet;

use tracing::warn;

use crate::error::CourierError;
use crate::model::{Stop, StopName};

/// Holds the delivery stops in user order together with the set of checked stops.
#[derive(Debug, Default, Clone)]
pub struct PlaceStore {
    stops: Vec<Stop>,
    selected: HashSet<StopName>,
}

impl PlaceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stop list and clear the selection.
    ///
    /// Names identify stops, so a repeated name keeps its first occurrence and the
    /// later ones are returned to the caller.
    pub fn load<I>(&mut self, stops: I) -> Vec<Stop>
    where
        I: IntoIterator<Item = Stop>,
    {
        let mut seen = HashSet::new();
        let mut rejected = Vec::new();
        self.stops.clear();
        self.selected.clear();

        for stop in stops {
            if seen.insert(stop.name.clone()) {
                self.stops.push(stop);
            } else {
                warn!(stop = %stop.name, "duplicate stop name, keeping the first one");
                rejected.push(stop);
            }
        }
        rejected
    }

    /// All stops in list order.
    #[must_use]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Number of stops in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Look up a stop by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Stop> {
        self.stops.iter().find(|stop| stop.name.0 == name)
    }

    /// List position of the named stop.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.stops.iter().position(|stop| stop.name.0 == name)
    }

    /// Whether the named stop is checked.
    #[must_use]
    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    /// Number of checked stops.
    #[must_use]
    pub fn selected_len(&self) -> usize {
        self.selected.len()
    }

    /// Flip the selection of a stop and return its new state.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::NotFound`] if the stop is not in the list.
    pub fn toggle(&mut self, name: &str) -> Result<bool, CourierError> {
        let selected = !self.is_selected(self.require(name)?);
        self.set_selected(name, selected)?;
        Ok(selected)
    }

    /// Check or uncheck a stop. Returns whether the selection changed.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::NotFound`] if the stop is not in the list.
    pub fn set_selected(&mut self, name: &str, selected: bool) -> Result<bool, CourierError> {
        let name = self.require(name)?;
        let changed = if selected {
            self.selected.insert(StopName::from(name))
        } else {
            self.selected.remove(name)
        };
        Ok(changed)
    }

    /// Move the stop at `from` to `to`, shifting the stops in between.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::OutOfRange`] if either index is not a list position.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), CourierError> {
        let len = self.stops.len();
        for index in [from, to] {
            if index >= len {
                return Err(CourierError::OutOfRange { index, len });
            }
        }
        if from != to {
            let stop = self.stops.remove(from);
            self.stops.insert(to, stop);
        }
        Ok(())
    }

    /// Remove a delivered stop and its selection entry.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::NotFound`] if the stop is not in the list.
    pub fn remove_delivered(&mut self, name: &str) -> Result<Stop, CourierError> {
        let index = self
            .index_of(name)
            .ok_or_else(|| CourierError::NotFound(StopName::from(name)))?;
        let stop = self.stops.remove(index);
        self.selected.remove(name);
        Ok(stop)
    }

    /// Checked stops in list order, regardless of the order they were checked in.
    #[must_use]
    pub fn selected_ordered(&self) -> Vec<Stop> {
        self.stops
            .iter()
            .filter(|stop| self.selected.contains(&stop.name))
            .cloned()
            .collect()
    }

    fn require<'name>(&self, name: &'name str) -> Result<&'name str, CourierError> {
        if self.index_of(name).is_some() {
            Ok(name)
        } else {
            Err(CourierError::NotFound(StopName::from(name)))
        }
    }
}
