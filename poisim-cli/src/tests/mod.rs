//! Shared test harness modules for the poisim CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;
use crate::compare::{
    CompareArgs, CompareSettings, OutputFormat, execute_compare, run_compare_with, write_report,
};

mod helpers;
