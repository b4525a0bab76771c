//! Outbox drain worker.

use tracing::{info, warn};

use crate::board::{CardBoard, CardRequest};
use crate::db::{record_board_card, Database, OutboxStatus};

/// Delivers queued cards to the board. Runs after commits, typically on a
/// timer; every failure is recorded on the entry and never propagated to
/// the write paths.
pub struct OutboxWorker<'a, B: CardBoard> {
    db: &'a Database,
    board: &'a B,
}

/// Counts from one drain pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DrainStats {
    pub delivered: usize,
    pub failed: usize,
}

impl<'a, B: CardBoard> OutboxWorker<'a, B> {
    pub fn new(db: &'a Database, board: &'a B) -> Self {
        Self { db, board }
    }

    /// Attempt delivery of every pending entry once.
    pub fn drain(&self) -> crate::db::DbResult<DrainStats> {
        let mut stats = DrainStats::default();

        for entry in self.db.list_pending_cards()? {
            let request: CardRequest = match serde_json::from_str(&entry.payload) {
                Ok(request) => request,
                Err(e) => {
                    // Unparseable payloads burn an attempt like any failure
                    warn!(entry_id = %entry.id, error = %e, "bad card payload");
                    self.db.mark_card_attempt_failed(&entry.id, &e.to_string())?;
                    stats.failed += 1;
                    continue;
                }
            };

            match self.board.create_card(&request) {
                Ok(card) => {
                    record_board_card(
                        self.db.conn(),
                        &entry.feedback_id,
                        &card.card_id,
                        &card.list_id,
                        &card.board_id,
                    )?;
                    self.db.mark_card_done(&entry.id)?;
                    info!(
                        entry_id = %entry.id,
                        card_id = %card.card_id,
                        feedback_id = %entry.feedback_id,
                        "card delivered"
                    );
                    stats.delivered += 1;
                }
                Err(e) => {
                    let status =
                        self.db.mark_card_attempt_failed(&entry.id, &e.to_string())?;
                    warn!(
                        entry_id = %entry.id,
                        feedback_id = %entry.feedback_id,
                        attempts = entry.attempts + 1,
                        gave_up = status == OutboxStatus::Failed,
                        error = %e,
                        "card delivery failed"
                    );
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }
}
