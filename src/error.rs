use ash::vk;

use crate::assign::AssignError;

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("capability query failed: {0}")]
    QueryFailure(#[from] vk::Result),
    #[error("none of the {candidates} candidate devices meets the requirement")]
    NoCompliantDevice { candidates: usize },
    #[error("manual device selection returned no valid device")]
    ManualSelectionFailed,
    #[error("manual device selection was forced but no chooser was supplied")]
    ManualSelectionUnavailable,
    #[error(transparent)]
    Assignment(#[from] AssignError)
}

pub type Result<T, E = SelectionError> = std::result::Result<T, E>;
