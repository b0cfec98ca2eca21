//! `pco-tools` - volunteer scheduling utilities for `Planning Center` Services.
//!
//! Matches roster spreadsheets against `Planning Center` people to post
//! blockout dates, and checks upcoming plans for duplicate or heavily used
//! volunteers.

pub mod app;
pub mod blockouts;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod planning_center;
pub mod prompt;
pub mod roster;
pub mod services;
