//! GearGuard: maintenance management client
//!
//! Typed access to the GearGuard REST backend (equipment, maintenance
//! requests, teams, users, reports) plus the client-side pieces that sit on
//! top of it: the kanban status board, the preventive calendar, route guards,
//! form validation and a local response cache.

pub mod cli;
pub mod core;
pub mod entities;
