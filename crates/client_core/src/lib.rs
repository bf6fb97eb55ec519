//! Client-side core of the sortable quiz widget: the item list, the grading
//! call and the submission/feedback controller that ties them together.

pub mod controller;
pub mod error;
pub mod grading;
pub mod list_state;
pub mod view;

pub use controller::{
    ControllerSettings, ReorderOutcome, SubmissionController, SubmitOutcome, WidgetEnvironment,
    DEFAULT_ERROR_DISMISS_AFTER,
};
pub use error::{ControllerError, GradingError};
pub use grading::{GradingClient, HttpGradingClient, UnconfiguredGradingClient};
pub use list_state::{Item, ListState};
pub use view::{AttemptState, Icon, Notification, Tone, WidgetEvent, WidgetView};
