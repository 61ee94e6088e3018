use std::fmt;

use crate::control::ControlId;
use crate::style::ControlState;

/// Errors surfaced by the UI core.
///
/// Tree and range violations are programmer errors: the operation is refused
/// and the tree is left untouched. Stylesheet errors name the offending
/// resource, state and property.
#[derive(Debug)]
pub enum UiError {
    /// The control is already parented; remove it first.
    AlreadyHasParent { child: ControlId, parent: ControlId },
    /// `child` is not a child of `parent`.
    NotAChild { parent: ControlId, child: ControlId },
    /// The id does not refer to a live control.
    UnknownControl(ControlId),
    /// The operation needs a different kind of control.
    WrongControlKind { control: ControlId, expected: &'static str },
    /// A min/max pair where min > max.
    InvalidRange { control: ControlId, min: i64, max: i64 },
    /// A strict setter got a value outside [min, max].
    ValueOutOfRange { control: ControlId, value: i64, min: i64, max: i64 },
    /// Reading or parsing a stylesheet resource failed.
    StyleSheetLoad { resource: String, message: String },
    /// A stylesheet value could not be converted.
    StyleProperty { resource: String, state: Option<ControlState>, property: String, message: String },
    /// Strict property lookup found no value anywhere in the cascade.
    MissingStyleProperty { property: &'static str, state: ControlState },
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::AlreadyHasParent { child, parent } => {
                write!(f, "control {child:?} already has parent {parent:?}")
            }
            UiError::NotAChild { parent, child } => {
                write!(f, "control {child:?} is not a child of {parent:?}")
            }
            UiError::UnknownControl(id) => write!(f, "unknown control {id:?}"),
            UiError::WrongControlKind { control, expected } => {
                write!(f, "control {control:?} is not a {expected}")
            }
            UiError::InvalidRange { control, min, max } => {
                write!(f, "control {control:?}: min value {min} is greater than max value {max}")
            }
            UiError::ValueOutOfRange { control, value, min, max } => {
                write!(f, "control {control:?}: value {value} outside [{min}, {max}]")
            }
            UiError::StyleSheetLoad { resource, message } => {
                write!(f, "stylesheet '{resource}': {message}")
            }
            UiError::StyleProperty { resource, state, property, message } => match state {
                Some(state) => write!(f, "stylesheet '{resource}' state {state:?} property '{property}': {message}"),
                None => write!(f, "stylesheet '{resource}' property '{property}': {message}"),
            },
            UiError::MissingStyleProperty { property, state } => {
                write!(f, "style property '{property}' not set for state {state:?} or any fallback")
            }
        }
    }
}

impl std::error::Error for UiError {}

pub type Result<T> = std::result::Result<T, UiError>;
