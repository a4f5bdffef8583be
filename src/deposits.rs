pub(crate) mod locks;
pub(crate) mod matcher;
pub(crate) mod types;
