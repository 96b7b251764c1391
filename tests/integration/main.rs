//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host with no serial device
//! or network access required.

mod run_loop_tests;
mod service_tests;
