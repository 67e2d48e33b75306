//! Internal test modules - whitebox tests with crate access
//!
//! Tests here drive the controller and the terminal demo through the shared
//! fixtures in `test_harness`.

mod property_tests;
