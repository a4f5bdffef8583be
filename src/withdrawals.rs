pub(crate) mod payout;
pub(crate) mod queue;
pub(crate) mod types;
