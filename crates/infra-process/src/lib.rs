// AdoptML Infrastructure - Process Adapter
// Implements: ModelRunner (external-process invocation bridge)

pub mod subprocess_runner;

pub use subprocess_runner::SubprocessRunner;
