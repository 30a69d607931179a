use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::booking::{BookingError, BookingRequest, BookingResult};
use crate::gateway::{BookingGateway, GatewayResult, SeatInfo};
use crate::identity::SessionCredential;
use crate::pricing::FarePolicy;
use crate::schedule::Schedule;
use crate::seat::{SeatId, SeatMap};
use crate::selection::{SeatDisplayState, SeatReconciler, SelectedSeats, ToggleOutcome};
use crate::submitter::BookingSubmitter;

/// Identifies one booked-seat fetch. Responses carrying an outdated token are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitToken {
    visit: u64,
    load: u64,
}

/// A booking sent to the backend whose answer has not been applied yet.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub attempt_id: Uuid,
    pub request: BookingRequest,
    pub credential: SessionCredential,
    visit: u64,
}

/// State owned by the seat-selection page for one schedule.
///
/// All mutation goes through `&mut self`. At most one booking is in flight, and
/// responses that arrive after `teardown` (or after a newer fetch started) are discarded.
#[derive(Debug)]
pub struct SeatSelectionSession {
    schedule: Schedule,
    fare_policy: FarePolicy,
    seat_map: SeatMap,
    reconciler: SeatReconciler,
    available_seats: Option<i64>,
    visit: u64,
    load_seq: u64,
    mounted: bool,
    loading: bool,
    in_flight: Option<Uuid>,
    needs_refresh: bool,
}

impl SeatSelectionSession {
    pub fn open(schedule: Schedule, fare_policy: FarePolicy) -> Self {
        debug!(schedule_id = %schedule.id, "Opening seat selection");
        Self {
            schedule,
            fare_policy,
            seat_map: SeatMap::build(),
            reconciler: SeatReconciler::default(),
            available_seats: None,
            visit: 1,
            load_seq: 0,
            mounted: true,
            loading: true,
            in_flight: None,
            needs_refresh: false,
        }
    }

    // ---- read side ----

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn rows(&self) -> &[Vec<SeatId>] {
        self.seat_map.rows()
    }

    /// Every seat with its display state, row by row.
    pub fn grid(&self) -> Vec<Vec<(SeatId, SeatDisplayState)>> {
        self.seat_map
            .rows()
            .iter()
            .map(|row| row.iter().map(|s| (*s, self.reconciler.classify(s))).collect())
            .collect()
    }

    pub fn classify(&self, seat: &SeatId) -> SeatDisplayState {
        self.reconciler.classify(seat)
    }

    pub fn selected(&self) -> &SelectedSeats {
        self.reconciler.selected()
    }

    pub fn fare(&self) -> f64 {
        self.fare_policy.fare_for(&self.schedule)
    }

    pub fn total_price(&self) -> f64 {
        self.fare_policy.total(&self.schedule, self.reconciler.selected().len())
    }

    /// Remaining seats as reported by the backend, once loaded.
    pub fn available_seats(&self) -> Option<i64> {
        self.available_seats
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Submit is offered only with a selection and nothing in flight.
    pub fn can_submit(&self) -> bool {
        self.mounted && !self.is_submitting() && !self.reconciler.selected().is_empty()
    }

    /// Set after a rejected booking: the booked set may be out of date.
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    // ---- selection ----

    /// Add or remove `seat`. Refused on booked seats, while a booking is in
    /// flight, and after teardown.
    pub fn toggle(&mut self, seat: SeatId) -> ToggleOutcome {
        if !self.mounted || self.is_submitting() {
            debug!(%seat, mounted = self.mounted, "Ignoring toggle while selection is frozen");
            return ToggleOutcome::Rejected;
        }
        let outcome = self.reconciler.toggle(seat);
        if outcome == ToggleOutcome::Rejected {
            debug!(%seat, "Ignoring toggle on booked seat");
        }
        outcome
    }

    // ---- booked-seat loading ----

    /// Start a fetch. Any fetch started earlier becomes stale.
    pub fn begin_load(&mut self) -> VisitToken {
        self.load_seq += 1;
        self.loading = true;
        VisitToken {
            visit: self.visit,
            load: self.load_seq,
        }
    }

    /// Apply a fetch result. Returns `false` if the response was stale and dropped.
    pub fn apply_seat_info(&mut self, token: VisitToken, info: SeatInfo) -> bool {
        if !self.is_current(token) {
            debug!(schedule_id = %self.schedule.id, "Discarding stale seat info");
            return false;
        }
        let dropped = self.reconciler.replace_booked(info.booked);
        if !dropped.is_empty() {
            warn!(?dropped, "Selected seats were booked by someone else");
        }
        self.available_seats = Some(info.available_seats);
        self.loading = false;
        self.needs_refresh = false;
        true
    }

    /// Record a failed fetch. The page stays usable with the previous booked set.
    pub fn fail_load(&mut self, token: VisitToken) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.loading = false;
        true
    }

    /// Fetch booked seats through `gateway` and apply them.
    pub async fn load(&mut self, gateway: &dyn BookingGateway) -> GatewayResult<()> {
        let token = self.begin_load();
        match gateway.fetch_seat_info(&self.schedule.id).await {
            Ok(info) => {
                self.apply_seat_info(token, info);
                Ok(())
            }
            Err(e) => {
                warn!(schedule_id = %self.schedule.id, "Error fetching seats: {}", e);
                self.fail_load(token);
                Err(e)
            }
        }
    }

    fn is_current(&self, token: VisitToken) -> bool {
        self.mounted && token.visit == self.visit && token.load == self.load_seq
    }

    // ---- submission ----

    /// Check preconditions and mark a booking as in flight.
    pub fn begin_submission(
        &mut self,
        submitter: &BookingSubmitter,
        identity: Option<&SessionCredential>,
    ) -> Result<PendingSubmission, BookingError> {
        if self.in_flight.is_some() {
            return Err(BookingError::SubmissionInFlight);
        }
        let (request, credential) =
            submitter.prepare(self.reconciler.selected().as_slice(), &self.schedule, identity)?;
        let attempt_id = Uuid::new_v4();
        self.in_flight = Some(attempt_id);
        Ok(PendingSubmission {
            attempt_id,
            request,
            credential,
            visit: self.visit,
        })
    }

    /// Apply a booking outcome. Returns `None` if the page was torn down meanwhile.
    ///
    /// Success clears the selection. A rejection keeps it so the user can adjust and retry.
    pub fn complete_submission(&mut self, pending: PendingSubmission, outcome: BookingResult) -> Option<BookingResult> {
        if !self.mounted || pending.visit != self.visit || self.in_flight != Some(pending.attempt_id) {
            debug!(attempt = %pending.attempt_id, "Discarding stale booking response");
            return None;
        }
        self.in_flight = None;

        match &outcome {
            Ok(record) => {
                info!(booking_id = %record.id, "Booking successful");
                self.reconciler.clear_selection();
            }
            Err(BookingError::Rejected(_)) => {
                self.needs_refresh = true;
            }
            Err(_) => {}
        }
        Some(outcome)
    }

    /// Begin, send and complete in one call.
    pub async fn submit(
        &mut self,
        submitter: &BookingSubmitter,
        identity: Option<&SessionCredential>,
    ) -> BookingResult {
        let pending = self.begin_submission(submitter, identity)?;
        let outcome = submitter.send(&pending.request, &pending.credential).await;
        self.complete_submission(pending, outcome)
            .unwrap_or(Err(BookingError::Discarded))
    }

    // ---- lifecycle ----

    /// The page went away. Pending responses will be discarded.
    pub fn teardown(&mut self) {
        self.mounted = false;
        self.visit += 1;
        self.in_flight = None;
        self.reconciler.clear_selection();
    }

    /// The page was opened again for the same schedule.
    pub fn revisit(&mut self) {
        self.mounted = true;
        self.visit += 1;
        self.loading = true;
    }
}
