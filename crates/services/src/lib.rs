#![forbid(unsafe_code)]

pub mod app_services;
pub mod board;
pub mod error;
pub mod progress_service;
pub mod time_tracker;

pub use board_core::Clock;

pub use app_services::AppServices;
pub use board::{BoardApi, BoardApiConfig, BoardApiError, BoardService, HttpBoardApi, MoveOutcome};
pub use error::{AppServicesError, BoardError, ProgressServiceError, TimeTrackerError};
pub use progress_service::ProgressService;
pub use time_tracker::{ElapsedTicker, TimeTrackerService};
