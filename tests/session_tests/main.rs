//! Session tests: command queue and line-driven state machine

#[path = "../support/mod.rs"]
mod support;

mod queue_tests;
