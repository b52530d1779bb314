//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own catalog data and outbound calls so route handlers can
//! stay focused on protocol translation.

pub mod catalog;
pub mod training;
