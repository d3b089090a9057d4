use log::error;
use snafu::Snafu;

pub use crate::errors::Error::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Runtime error: Are you sure your code runs inside a tokio runtime?
    RuntimeError,
    /// Queue error: {source}.
    QueueError { source: QueueError },
    /// Render error: {source}.
    RenderError { source: RenderError },
    /// Unknown easing function: '{name}'.
    UnknownEasing { name: String },
    /// Unknown gesture: '{name}'.
    UnknownGesture { name: String },
    /// Unknown error: {info}.
    Unknown { info: String },
}

impl From<QueueError> for Error {
    fn from(value: QueueError) -> Self {
        Self::QueueError { source: value }
    }
}

impl From<RenderError> for Error {
    fn from(value: RenderError) -> Self {
        error!("render backend error {:?}", value);
        Self::RenderError { source: value }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum QueueError {
    /// Queued action failed - {source}
    ActionFailed { source: Box<Error> },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RenderError {
    /// Unknown element {element}
    UnknownElement { element: usize },
    /// Backend failure - {info}
    Backend { info: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let runtime_error = RuntimeError;
        assert_eq!(
            format!("{}", runtime_error),
            "Runtime error: Are you sure your code runs inside a tokio runtime?"
        );

        let render_error = Error::from(RenderError::UnknownElement { element: 7 });
        assert_eq!(
            format!("{}", render_error),
            "Render error: Unknown element 7."
        );

        let easing_error = UnknownEasing {
            name: String::from("wobble"),
        };
        assert_eq!(
            format!("{}", easing_error),
            "Unknown easing function: 'wobble'."
        );

        let gesture_error = UnknownGesture {
            name: String::from("juggle"),
        };
        assert_eq!(format!("{}", gesture_error), "Unknown gesture: 'juggle'.");

        let unknown_error = Unknown {
            info: "Some unknown error".to_string(),
        };
        assert_eq!(
            format!("{}", unknown_error),
            "Unknown error: Some unknown error."
        );
    }

    #[test]
    fn test_from_queue_error() {
        let queue_error = QueueError::ActionFailed {
            source: Box::new(Unknown {
                info: String::from("broken gesture"),
            }),
        };
        let error: Error = queue_error.into();
        assert_eq!(
            format!("{}", error),
            "Queue error: Queued action failed - Unknown error: broken gesture.."
        );
    }

    #[test]
    fn test_from_render_error() {
        let render_error = RenderError::Backend {
            info: String::from("surface lost"),
        };
        let error: Error = render_error.into();
        assert_eq!(
            format!("{}", error),
            "Render error: Backend failure - surface lost."
        );
    }
}
