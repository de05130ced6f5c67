//! Kanban board: requests grouped into status columns
//!
//! Moving a card is optimistic. The card changes column locally, then one
//! status-only update is sent. Success invalidates the request list; failure
//! leaves the local board as it is until the next fetch.

use std::collections::BTreeMap;

use crate::core::cache::{keys, Invalidate};
use crate::core::client::{ApiClient, ApiError, Transport};
use crate::entities::{MaintenanceRequest, RequestStatus, RequestUpdate};

/// Board columns in display order
pub const COLUMNS: [RequestStatus; 4] = RequestStatus::KNOWN;

/// Page size used to load the whole board in one call
pub const BOARD_PAGE_SIZE: u32 = 1000;

#[derive(Debug)]
pub enum DropOutcome {
    Moved,
    /// Dropped back onto its own column; nothing sent
    Unchanged,
    /// No card with that id on the board; nothing sent
    UnknownCard,
    Failed(ApiError),
}

#[derive(Debug, Default)]
pub struct KanbanBoard {
    columns: BTreeMap<usize, Vec<MaintenanceRequest>>,
    unplaced: Vec<MaintenanceRequest>,
}

fn column_index(status: &RequestStatus) -> Option<usize> {
    COLUMNS.iter().position(|c| c == status)
}

impl KanbanBoard {
    pub fn from_requests(requests: Vec<MaintenanceRequest>) -> Self {
        let mut board = KanbanBoard::default();
        for idx in 0..COLUMNS.len() {
            board.columns.insert(idx, Vec::new());
        }

        for request in requests {
            match column_index(&request.status) {
                Some(idx) => board.columns.entry(idx).or_default().push(request),
                None => {
                    tracing::warn!(
                        id = request.id,
                        status = %request.status,
                        "request has an unrecognized status and is left off the board"
                    );
                    board.unplaced.push(request);
                }
            }
        }
        board
    }

    pub fn column(&self, status: &RequestStatus) -> &[MaintenanceRequest] {
        column_index(status)
            .and_then(|idx| self.columns.get(&idx))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Requests whose status matched no column
    pub fn unplaced(&self) -> &[MaintenanceRequest] {
        &self.unplaced
    }

    pub fn card_count(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    pub fn find(&self, id: i64) -> Option<&MaintenanceRequest> {
        self.columns.values().flatten().find(|r| r.id == id)
    }

    fn take(&mut self, id: i64) -> Option<MaintenanceRequest> {
        for cards in self.columns.values_mut() {
            if let Some(pos) = cards.iter().position(|r| r.id == id) {
                return Some(cards.remove(pos));
            }
        }
        None
    }

    /// Move a card to `destination` and persist the new status.
    ///
    /// Sends at most one update and invalidates `["maintenance-requests"]`
    /// exactly once when it succeeds.
    pub fn drop_card<T: Transport>(
        &mut self,
        id: i64,
        destination: RequestStatus,
        api: &ApiClient<T>,
        cache: &impl Invalidate,
    ) -> DropOutcome {
        let Some(dest_idx) = column_index(&destination) else {
            return DropOutcome::UnknownCard;
        };
        let Some(current) = self.find(id).map(|r| r.status.clone()) else {
            return DropOutcome::UnknownCard;
        };
        if current == destination {
            return DropOutcome::Unchanged;
        }

        if let Some(mut card) = self.take(id) {
            card.status = destination.clone();
            self.columns.entry(dest_idx).or_default().push(card);
        }

        match api.update_request(id, &RequestUpdate::status_only(destination.clone())) {
            Ok(_) => {
                cache.invalidate(&keys::maintenance_requests());
                tracing::info!(id, from = %current, to = %destination, "card moved");
                DropOutcome::Moved
            }
            Err(e) => {
                tracing::warn!(id, to = %destination, error = %e, "status update failed; board left as moved");
                DropOutcome::Failed(e)
            }
        }
    }
}
