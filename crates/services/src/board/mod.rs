//! Kanban task and column data layer: a cached view of the remote board
//! service plus refetch-after-mutation write operations.

mod api;
mod http;
mod service;

pub use api::{BoardApi, BoardApiError};
pub use http::{BoardApiConfig, HttpBoardApi};
pub use service::{BoardService, MoveOutcome};

pub use crate::error::BoardError;
