// Rust guideline compliant 2026-10-19

//! Finite state machines for item and swap statuses.
//!
//! Items move along:
//!
//! - PendingApproval → Available (approval)
//! - PendingApproval → Rejected (moderation, terminal)
//! - Available → Reserved (swap accepted)
//! - Available → Swapped (redeemed with points)
//! - Reserved → Swapped (swap completed)
//! - Reserved → Available (accepted swap cancelled)
//!
//! Swap requests move along:
//!
//! - Pending → Accepted | Rejected | Cancelled
//! - Accepted → Completed | Cancelled
//!
//! Every other transition fails with `InvalidState`.

use crate::{Error, ItemStatus, Result, SwapStatus};

impl ItemStatus {
    /// Checks if a transition to the target status is valid.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the transition is not in the valid set.
    pub fn can_transition_to(&self, target: ItemStatus) -> Result<()> {
        if self.valid_transitions().contains(&target) {
            return Ok(());
        }
        Err(Error::InvalidState(format!(
            "Item cannot move from {} to {}",
            self.as_str(),
            target.as_str()
        )))
    }

    /// Returns the list of valid target states for the current status.
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<ItemStatus> {
        match self {
            ItemStatus::PendingApproval => vec![ItemStatus::Available, ItemStatus::Rejected],
            ItemStatus::Available => vec![ItemStatus::Reserved, ItemStatus::Swapped],
            ItemStatus::Reserved => vec![ItemStatus::Swapped, ItemStatus::Available],
            ItemStatus::Swapped | ItemStatus::Rejected => Vec::new(),
        }
    }

    /// Returns true if no transition leaves this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Swapped | ItemStatus::Rejected)
    }
}

impl SwapStatus {
    /// Checks if a transition to the target status is valid.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the transition is not in the valid set.
    pub fn can_transition_to(&self, target: SwapStatus) -> Result<()> {
        if self.valid_transitions().contains(&target) {
            return Ok(());
        }
        if self.is_terminal() {
            return Err(Error::InvalidState(format!(
                "Swap request is already {}",
                self.as_str()
            )));
        }
        Err(Error::InvalidState(format!(
            "Swap request cannot move from {} to {}",
            self.as_str(),
            target.as_str()
        )))
    }

    /// Returns the list of valid target states for the current status.
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<SwapStatus> {
        match self {
            SwapStatus::Pending => vec![
                SwapStatus::Accepted,
                SwapStatus::Rejected,
                SwapStatus::Cancelled,
            ],
            SwapStatus::Accepted => vec![SwapStatus::Completed, SwapStatus::Cancelled],
            SwapStatus::Rejected | SwapStatus::Completed | SwapStatus::Cancelled => Vec::new(),
        }
    }

    /// Returns true if no transition leaves this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SwapStatus::Rejected | SwapStatus::Completed | SwapStatus::Cancelled
        )
    }

    /// Returns true if the request holds its items in `reserved`.
    #[must_use]
    pub fn holds_items(&self) -> bool {
        *self == SwapStatus::Accepted
    }
}
