//! Hook consulted before a donation or account status is overwritten.

use thiserror::Error;

use crate::database::models::{AccountStatus, DonationStatus};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot change status from {from} to {to}")]
pub struct TransitionError {
    pub from: String,
    pub to: String,
}

pub trait StatusTransitionPolicy: Send + Sync {
    fn check_donation(&self, _from: DonationStatus, _to: DonationStatus) -> Result<(), TransitionError> {
        Ok(())
    }

    fn check_account(&self, _from: AccountStatus, _to: AccountStatus) -> Result<(), TransitionError> {
        Ok(())
    }
}

/// Accepts any status the caller supplies.
pub struct Permissive;

impl StatusTransitionPolicy for Permissive {}

/// Donation requests move forward only:
/// `pending -> inprogress -> done`, with `canceled` reachable from either
/// open state and `inprogress -> pending` when a donor backs out.
pub struct DonationLifecycle;

impl StatusTransitionPolicy for DonationLifecycle {
    fn check_donation(&self, from: DonationStatus, to: DonationStatus) -> Result<(), TransitionError> {
        use DonationStatus::*;
        let allowed = from == to
            || matches!(
                (from, to),
                (Pending, InProgress)
                    | (Pending, Canceled)
                    | (InProgress, Done)
                    | (InProgress, Canceled)
                    | (InProgress, Pending)
            );
        if allowed {
            Ok(())
        } else {
            Err(TransitionError {
                from: from.to_string(),
                to: to.to_string(),
            })
        }
    }
}
