pub(crate) mod batch;
pub(crate) mod metrics;
pub(crate) mod oracle;
pub(crate) mod parley_oracle;
pub(crate) mod resolver;
pub(crate) mod vertical;
