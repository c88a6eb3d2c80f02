//! Crate-level regression tests.

mod session_flow_test;
