// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// An event observed by a form document.
///
/// In most cases, it is enough to drive a document through
/// [`ready`](crate::FormDocument::ready) and
/// [`set_selector_value`](crate::FormDocument::set_selector_value) and never
/// handle events directly.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum FormEvent {
    /// The hosting page has finished initial construction. Delivered once.
    Ready,
    /// A selector's value has been written. Delivered on every write, even
    /// when the new value equals the old one.
    Change { target: String, value: String },
}

// ******** Errors *********

/// Errors that prevent a form document from being assembled.
///
/// Note that the absence of an element at event time is not an error: acting
/// on a missing element selects zero nodes and mutates zero nodes.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum FormErrors {
    /// Two elements were declared under the same identifier.
    DuplicateElement(String),
}

impl Error for FormErrors {}

impl Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormErrors::DuplicateElement(name) => {
                write!(f, "duplicate element identifier in form: {}", name)
            }
        }
    }
}
