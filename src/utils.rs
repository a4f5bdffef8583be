pub(crate) mod amount;
