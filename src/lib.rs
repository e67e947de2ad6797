//! Personal work-hours tracker. Clock in and out from a terminal, then see how the hours split
//! into weeks, nights and holidays with the daily break already taken off.
//!

pub mod aggregation;
pub mod cli;
pub mod fs;
pub mod session;
pub mod storage;
pub mod utils;
