use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ColumnId, WorksheetId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ColumnError {
    #[error("column title cannot be empty")]
    EmptyTitle,

    #[error("column status cannot be empty")]
    EmptyStatus,
}

//
// ─── COLUMN ────────────────────────────────────────────────────────────────────
//

/// An ordered status lane within a worksheet.
///
/// `order` defines the display sequence; `status` is the value tasks carry
/// while they sit in this lane. Id uniqueness is owned by the board service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    id: ColumnId,
    title: String,
    status: String,
    color: String,
    order: u32,
    worksheet_id: WorksheetId,
}

impl Column {
    /// Creates a column, validating title and status.
    ///
    /// # Errors
    ///
    /// Returns `ColumnError::EmptyTitle` or `ColumnError::EmptyStatus` if the
    /// respective field is blank after trimming.
    pub fn new(
        id: ColumnId,
        title: impl Into<String>,
        status: impl Into<String>,
        color: impl Into<String>,
        order: u32,
        worksheet_id: WorksheetId,
    ) -> Result<Self, ColumnError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ColumnError::EmptyTitle);
        }
        let status = status.into();
        if status.trim().is_empty() {
            return Err(ColumnError::EmptyStatus);
        }

        Ok(Self {
            id,
            title,
            status,
            color: color.into(),
            order,
            worksheet_id,
        })
    }

    #[must_use]
    pub fn id(&self) -> &ColumnId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    #[must_use]
    pub fn worksheet_id(&self) -> &WorksheetId {
        &self.worksheet_id
    }
}

/// Sorts columns into display order (`order` ascending, id as tiebreaker).
pub fn sort_by_order(columns: &mut [Column]) {
    columns.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
}

//
// ─── REQUEST SHAPES ────────────────────────────────────────────────────────────
//

/// Payload for creating a column on the board service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewColumn {
    pub title: String,
    pub status: String,
    pub color: String,
    pub order: u32,
}

/// Partial update for an existing column. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
