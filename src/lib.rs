//! Mechatronics BI
//!
//! A terminal dashboard over the mechatronics parts workbook: inventory
//! availability, set delivery tracking and project BOM readiness.

pub mod cli;
pub mod core;
pub mod views;
