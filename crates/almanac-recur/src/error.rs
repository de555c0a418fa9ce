use thiserror::Error;

use crate::expand::ExpansionError;
use crate::validate::ValidationError;
use crate::zone::ZoneError;

/// Recurrence engine errors
#[derive(Error, Debug)]
pub enum RecurError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Expansion(#[from] ExpansionError),

    #[error(transparent)]
    Zone(#[from] ZoneError),
}

pub type RecurResult<T> = std::result::Result<T, RecurError>;
