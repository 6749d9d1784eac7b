//! Pair guard: keep exactly one buy/sell pair resting.

/// What the guard wants done for an observed open-order count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardAction {
    /// Book is empty: quote a fresh pair.
    SubmitPair,
    /// One leg filled (or anything other than a pair): pull everything.
    CancelAll,
    /// Exactly one pair resting.
    Hold,
}

impl GuardAction {
    pub fn for_open_count(open_orders: usize) -> Self {
        match open_orders {
            0 => Self::SubmitPair,
            2 => Self::Hold,
            _ => Self::CancelAll,
        }
    }
}
