//! Shared test harness modules for the review CLI.

use super::*;

mod helpers;
mod place_steps;
