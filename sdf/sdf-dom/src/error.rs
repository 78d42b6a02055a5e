//! Error types for loading and querying scene descriptions.
//!
//! Fallible operations never abort on the first problem. They return an
//! [`Errors`] sequence, in encounter order, alongside whatever they managed to
//! build, and the caller decides which errors matter.

use std::fmt;

use thiserror::Error;

/// Category of a load or resolution error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Malformed markup; no element tree was produced.
    ParseError,
    /// An element was given to the wrong loader, or a tag is not recognized.
    ElementIncorrectType,
    /// A required child element is missing.
    ElementMissing,
    /// An element's content is invalid.
    ElementInvalid,
    /// A required attribute is missing.
    AttributeMissing,
    /// An attribute's value is invalid.
    AttributeInvalid,
    /// Two siblings share a name.
    DuplicateName,
    /// A name is reserved (`world`, or `__name__`).
    ReservedName,
    /// A `relative_to` reference names no frame in scope.
    FrameNameNotFound,
    /// A chain of `relative_to` references loops back on itself.
    PoseCycleDetected,
    /// An `attached_to` reference names no frame in scope.
    FrameAttachedToInvalid,
    /// A chain of `attached_to` references loops back on itself.
    FrameAttachedToCycle,
    /// A joint's child is not a link of the model.
    JointChildLinkInvalid,
    /// A joint's parent and child are the same frame.
    JointParentSameAsChild,
    /// Mass or inertia of a link is not physical.
    LinkInertiaInvalid,
    /// A non-static model has neither links nor nested models.
    ModelWithoutLink,
    /// The model's canonical link does not exist.
    ModelCanonicalLinkInvalid,
}

impl ErrorCode {
    /// The code's conventional upper-case name, e.g. `DUPLICATE_NAME`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParseError => "PARSE_ERROR",
            Self::ElementIncorrectType => "ELEMENT_INCORRECT_TYPE",
            Self::ElementMissing => "ELEMENT_MISSING",
            Self::ElementInvalid => "ELEMENT_INVALID",
            Self::AttributeMissing => "ATTRIBUTE_MISSING",
            Self::AttributeInvalid => "ATTRIBUTE_INVALID",
            Self::DuplicateName => "DUPLICATE_NAME",
            Self::ReservedName => "RESERVED_NAME",
            Self::FrameNameNotFound => "FRAME_NAME_NOT_FOUND",
            Self::PoseCycleDetected => "POSE_CYCLE_DETECTED",
            Self::FrameAttachedToInvalid => "FRAME_ATTACHED_TO_INVALID",
            Self::FrameAttachedToCycle => "FRAME_ATTACHED_TO_CYCLE",
            Self::JointChildLinkInvalid => "JOINT_CHILD_LINK_INVALID",
            Self::JointParentSameAsChild => "JOINT_PARENT_SAME_AS_CHILD",
            Self::LinkInertiaInvalid => "LINK_INERTIA_INVALID",
            Self::ModelWithoutLink => "MODEL_WITHOUT_LINK",
            Self::ModelCanonicalLinkInvalid => "MODEL_CANONICAL_LINK_INVALID",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic: a code plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
}

/// Ordered sequence of diagnostics returned by fallible operations.
pub type Errors = Vec<Error>;

impl Error {
    /// Create an error from a code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The error's category.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// The error's message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, message)
    }

    /// Create a missing element error.
    pub fn missing_element(element: &str, context: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ElementMissing,
            format!("missing required element <{element}> in {context}"),
        )
    }

    /// Create a missing attribute error.
    pub fn missing_attribute(attribute: &str, element: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::AttributeMissing,
            format!("a {element} {attribute} is required, but the {attribute} is not set"),
        )
    }

    /// Create an invalid element value error.
    pub fn invalid_element(
        element: &str,
        context: impl fmt::Display,
        message: impl fmt::Display,
    ) -> Self {
        Self::new(
            ErrorCode::ElementInvalid,
            format!("invalid <{element}> in {context}: {message}"),
        )
    }

    /// Create an invalid attribute value error.
    pub fn invalid_attribute(
        attribute: &str,
        element: impl fmt::Display,
        message: impl fmt::Display,
    ) -> Self {
        Self::new(
            ErrorCode::AttributeInvalid,
            format!("invalid value for {attribute} on {element}: {message}"),
        )
    }

    /// Create a duplicate name error.
    pub fn duplicate_name(kind: &str, name: &str) -> Self {
        Self::new(
            ErrorCode::DuplicateName,
            format!("{kind} with name [{name}] already exists"),
        )
    }

    /// Create a reserved name error.
    pub fn reserved_name(kind: &str, name: &str) -> Self {
        Self::new(
            ErrorCode::ReservedName,
            format!("the supplied {kind} name [{name}] is reserved"),
        )
    }

    /// Create a frame-not-found error.
    pub fn frame_not_found(name: &str, context: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::FrameNameNotFound,
            format!("frame [{name}] referenced by {context} does not exist in scope"),
        )
    }

    /// Create a pose cycle error from the visited path.
    pub fn pose_cycle(path: &[&str]) -> Self {
        Self::new(
            ErrorCode::PoseCycleDetected,
            format!("relative_to cycle detected: {}", path.join(" -> ")),
        )
    }
}
