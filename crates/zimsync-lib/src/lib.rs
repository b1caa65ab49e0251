pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod local;
pub mod naming;
pub mod reconcile;
pub mod remote;
pub mod transfer;

pub use config::Config;
pub use error::ZimSyncError;
