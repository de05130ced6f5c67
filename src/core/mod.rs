//! Core module - client, cache, session and board logic

pub mod cache;
pub mod calendar;
pub mod client;
pub mod config;
pub mod guard;
pub mod kanban;
pub mod logging;
pub mod session;
pub mod stats;
pub mod validation;

pub use cache::{keys, CacheError, CacheStats, Invalidate, Mutation, QueryCache, QueryKey};
pub use calendar::{CalendarDay, CalendarGrid, CalendarView, EventColor};
pub use client::{
    ApiClient, ApiError, ApiRequest, ApiResponse, EquipmentQuery, HttpTransport, Method,
    RequestQuery, Transport,
};
pub use config::Config;
pub use guard::{guard_for_path, Guard, GuardOutcome};
pub use kanban::{DropOutcome, KanbanBoard, BOARD_PAGE_SIZE, COLUMNS};
pub use session::{resolve_identity, IdentityState, Session, SessionError, SessionStore};
pub use stats::DashboardStats;
pub use validation::{ValidationError, MAX_TEAM_MEMBERS};
