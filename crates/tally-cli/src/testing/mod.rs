//! Test run infrastructure for tally
//!
//! Discovers test scripts, decides which ones to skip, executes the rest
//! and renders the recorded outcomes.

pub mod discovery;
pub mod gates;
pub mod ingest;
pub mod reporter;
pub mod runner;

pub use discovery::TestSuite;
pub use gates::GateSet;
pub use reporter::HumanReport;
pub use runner::TestRunner;
