//! Mobile data allowance widget.
//!
//! Usage is fetched from the carrier at most once an hour and shown as the
//! remaining amount, a percentage gauge and the days left in the period.

pub mod client;
pub mod data;
pub mod policy;
pub mod theme;
pub mod types;
pub mod widget;

pub use client::{MobileClient, UsageSource};
pub use data::{MobileData, MobileRecord};
pub use types::{Allowance, MobilePayload, MobileUsage, UsageDates, UsageSnapshot};
pub use widget::{mobile_view, render, MobileWidget};
