#![forbid(unsafe_code)]

//! Error types.
//!
//! Only caller contract violations are errors. Infeasible drags are clamped
//! and inconsistent band coordinates are healed by band generation; neither
//! ever surfaces here.

use std::fmt;

use crate::item::ItemId;

/// Invalid toolbar length configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemError {
    /// A length was negative, NaN, or (for minimums) infinite.
    InvalidLength { field: &'static str, value: f64 },
    /// `max_length < min_length`.
    InvalidLengthBounds { min: f64, max: f64 },
    /// Explicit length override was negative or not finite.
    InvalidExplicitLength { value: f64 },
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { field, value } => {
                write!(f, "invalid {field} value {value} (must be finite and >= 0)")
            }
            Self::InvalidLengthBounds { min, max } => {
                write!(f, "max_length {max} is smaller than min_length {min}")
            }
            Self::InvalidExplicitLength { value } => {
                write!(f, "invalid explicit length {value} (must be finite and >= 0)")
            }
        }
    }
}

impl std::error::Error for ItemError {}

/// Errors from structural operations on a [`Tray`](crate::Tray).
#[derive(Debug, Clone, PartialEq)]
pub enum TrayError {
    /// No item with this id lives in the tray.
    UnknownItem(ItemId),
    /// Collection position outside `0..=len` (insert) or `0..len` (move).
    IndexOutOfBounds { index: usize, len: usize },
    /// The item is being dragged and cannot be removed until the gesture ends.
    DragInProgress(ItemId),
    /// Invalid item configuration.
    Item(ItemError),
}

impl fmt::Display for TrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownItem(id) => write!(f, "unknown toolbar item {id}"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for {len} items")
            }
            Self::DragInProgress(id) => {
                write!(f, "toolbar item {id} is being dragged")
            }
            Self::Item(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TrayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Item(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemError> for TrayError {
    fn from(err: ItemError) -> Self {
        Self::Item(err)
    }
}

/// Invalid [`TrayConfig`](crate::TrayConfig) values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrayConfigError {
    InvalidDeadZone { value: f64 },
}

impl fmt::Display for TrayConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDeadZone { value } => {
                write!(f, "invalid swap dead zone {value} (must be finite and >= 0)")
            }
        }
    }
}

impl std::error::Error for TrayConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_name_the_values() {
        let err = ItemError::InvalidLengthBounds {
            min: 30.0,
            max: 10.0,
        };
        assert_eq!(
            err.to_string(),
            "max_length 10 is smaller than min_length 30"
        );
        let tray: TrayError = err.into();
        assert_eq!(tray.to_string(), err.to_string());
        assert!(std::error::Error::source(&tray).is_some());
    }

    #[test]
    fn unknown_item_mentions_id() {
        let id = ItemId::new(7).expect("non-zero");
        assert_eq!(
            TrayError::UnknownItem(id).to_string(),
            "unknown toolbar item 7"
        );
    }
}
