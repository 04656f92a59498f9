pub mod provider;
pub mod session;
pub mod snapshot_model;
