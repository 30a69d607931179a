use crate::seat::SeatId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a seat should be drawn on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatDisplayState {
    Available,
    Selected,
    Booked,
}

/// Result of a toggle. `Rejected` means the seat is booked and the click is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    Rejected,
}

/// Seats already reserved by anyone, as last reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookedSeats {
    seats: HashSet<SeatId>,
}

impl BookedSeats {
    pub fn new(seats: impl IntoIterator<Item = SeatId>) -> Self {
        Self {
            seats: seats.into_iter().collect(),
        }
    }

    pub fn contains(&self, seat: &SeatId) -> bool {
        self.seats.contains(seat)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeatId> {
        self.seats.iter()
    }
}

/// Seats picked by the current user, in click order.
///
/// The vec keeps order, the set gives O(1) membership. Both always hold the same seats.
#[derive(Debug, Clone, Default)]
pub struct SelectedSeats {
    order: Vec<SeatId>,
    members: HashSet<SeatId>,
}

impl SelectedSeats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, seat: &SeatId) -> bool {
        self.members.contains(seat)
    }

    pub fn as_slice(&self) -> &[SeatId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    fn push(&mut self, seat: SeatId) {
        if self.members.insert(seat) {
            self.order.push(seat);
        }
    }

    fn remove(&mut self, seat: &SeatId) -> bool {
        if self.members.remove(seat) {
            self.order.retain(|s| s != seat);
            true
        } else {
            false
        }
    }
}

impl PartialEq for SelectedSeats {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for SelectedSeats {}

/// Reconciles the booked set against the user's selection.
///
/// The selection never contains a booked seat: toggling a booked seat is refused, and
/// replacing the booked set drops any selected seat that became booked.
#[derive(Debug, Clone, Default)]
pub struct SeatReconciler {
    booked: BookedSeats,
    selected: SelectedSeats,
}

impl SeatReconciler {
    pub fn new(booked: BookedSeats) -> Self {
        Self {
            booked,
            selected: SelectedSeats::new(),
        }
    }

    pub fn classify(&self, seat: &SeatId) -> SeatDisplayState {
        if self.booked.contains(seat) {
            SeatDisplayState::Booked
        } else if self.selected.contains(seat) {
            SeatDisplayState::Selected
        } else {
            SeatDisplayState::Available
        }
    }

    pub fn toggle(&mut self, seat: SeatId) -> ToggleOutcome {
        if self.booked.contains(&seat) {
            return ToggleOutcome::Rejected;
        }
        if self.selected.remove(&seat) {
            ToggleOutcome::Removed
        } else {
            self.selected.push(seat);
            ToggleOutcome::Added
        }
    }

    /// Swap in a freshly fetched booked set. Returns the selected seats that were dropped.
    pub fn replace_booked(&mut self, booked: BookedSeats) -> Vec<SeatId> {
        let dropped: Vec<SeatId> = self
            .selected
            .as_slice()
            .iter()
            .filter(|seat| booked.contains(seat))
            .copied()
            .collect();
        for seat in &dropped {
            self.selected.remove(seat);
        }
        self.booked = booked;
        dropped
    }

    pub fn booked(&self) -> &BookedSeats {
        &self.booked
    }

    pub fn selected(&self) -> &SelectedSeats {
        &self.selected
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }
}
