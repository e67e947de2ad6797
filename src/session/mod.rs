//! Sessions and everything the user does to them. [entities] is the data model shared with
//! storage and the aggregation engine, [tracker] drives the clock in/out lifecycle and [filter]
//! narrows sessions down before they are aggregated.

pub mod entities;
pub mod filter;
pub mod tracker;
