//! Process lifecycle helpers for the replay driver

mod shutdown;

pub use shutdown::ShutdownSignal;
