//! Integration tests against an in-memory database

mod common;
mod ledger_tests;
