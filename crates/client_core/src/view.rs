//! Presentation state the controller maintains for the rendering layer.

use serde::{Deserialize, Serialize};
use shared::domain::Indicator;

use crate::list_state::ListState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Check,
    Close,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// May contain markup.
    pub message: String,
    pub attempts: String,
    pub tone: Option<Tone>,
    pub icon: Option<Icon>,
    pub visible: bool,
}

impl Notification {
    pub fn success(message: impl Into<String>, attempts: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attempts: attempts.into(),
            tone: Some(Tone::Success),
            icon: Some(Icon::Check),
            visible: true,
        }
    }

    pub fn error(message: impl Into<String>, attempts: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attempts: attempts.into(),
            tone: Some(Tone::Error),
            icon: Some(Icon::Close),
            visible: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptState {
    pub remaining: i64,
    /// Set once the answer is correct or attempts run out; never cleared.
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetView {
    pub list: ListState,
    pub submit_enabled: bool,
    pub reorder_enabled: bool,
    pub notification: Notification,
    pub indicator: Option<Indicator>,
    pub transient_message: Option<String>,
    pub attempts: AttemptState,
    pub submission_pending: bool,
}

impl WidgetView {
    pub fn marks(&self) -> Vec<bool> {
        self.list.marks()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    ItemsChanged(ListState),
    SubmitEnabledChanged(bool),
    ReorderEnabledChanged(bool),
    NotificationShown(Notification),
    IndicatorChanged(Option<Indicator>),
    TransientMessageShown(String),
    TransientMessageCleared,
    Locked,
}
