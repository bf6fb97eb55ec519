//! Submission/feedback state machine of the sortable widget.
//!
//! One controller instance per rendered widget. The host hands it the
//! rendered state through [`WidgetEnvironment`], forwards drag and submit
//! actions, and renders the [`WidgetEvent`]s it publishes.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::{Indicator, Position},
    protocol::{SubmissionResult, SubmitAnswerRequest},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    error::{ControllerError, GradingError},
    grading::GradingClient,
    list_state::{Item, ListState},
    view::{AttemptState, Notification, WidgetEvent, WidgetView},
};

pub const DEFAULT_ERROR_DISMISS_AFTER: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    /// How long a grading failure stays in the transient message area.
    pub error_dismiss_after: Duration,
    /// Keep the submit control disabled while a grading call is outstanding.
    pub guard_in_flight: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            error_dismiss_after: DEFAULT_ERROR_DISMISS_AFTER,
            guard_in_flight: true,
        }
    }
}

/// What the host page rendered before the controller took over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetEnvironment {
    pub items: Vec<Item>,
    /// The submit control was rendered disabled: the answer was already
    /// correct or attempts ran out before this page load.
    pub submit_disabled: bool,
    pub remaining_attempts: i64,
    pub indicator: Option<Indicator>,
}

impl WidgetEnvironment {
    pub fn from_texts<I, S>(texts: I, remaining_attempts: i64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            items: texts
                .into_iter()
                .map(|text| Item::new(text.as_ref()))
                .collect(),
            submit_disabled: false,
            remaining_attempts,
            indicator: None,
        }
    }

    pub fn locked(mut self, submit_disabled: bool) -> Self {
        self.submit_disabled = submit_disabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    Moved,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Correct(SubmissionResult),
    Incorrect(SubmissionResult),
    /// The call did not grade; carries the text shown to the learner.
    Failed(String),
}

struct ControllerState {
    view: WidgetView,
    // false when the widget was rendered locked: nothing is wired up.
    interactive: bool,
    drag_start: Option<Position>,
    in_flight: usize,
    dismiss_generation: u64,
}

pub struct SubmissionController {
    grader: Arc<dyn GradingClient>,
    settings: ControllerSettings,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<WidgetEvent>,
}

impl SubmissionController {
    pub fn new(
        environment: WidgetEnvironment,
        grader: Arc<dyn GradingClient>,
        settings: ControllerSettings,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        let locked = environment.submit_disabled;
        let list = ListState::new(environment.items);
        info!(
            items = list.len(),
            locked,
            remaining_attempts = environment.remaining_attempts,
            "sortable widget initialized"
        );

        Arc::new(Self {
            grader,
            settings,
            inner: Mutex::new(ControllerState {
                view: WidgetView {
                    list,
                    submit_enabled: !locked,
                    reorder_enabled: !locked,
                    notification: Notification::default(),
                    indicator: environment.indicator,
                    transient_message: None,
                    attempts: AttemptState {
                        remaining: environment.remaining_attempts,
                        locked,
                    },
                    submission_pending: false,
                },
                interactive: !locked,
                drag_start: None,
                in_flight: 0,
                dismiss_generation: 0,
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<WidgetEvent> {
        self.events.subscribe()
    }

    pub async fn view(&self) -> WidgetView {
        self.inner.lock().await.view.clone()
    }

    /// Drag start: remembers where the picked-up item was.
    pub async fn begin_reorder(&self, position: Position) -> Result<(), ControllerError> {
        let mut state = self.inner.lock().await;
        if !state.interactive {
            return Err(ControllerError::Locked);
        }
        if !state.view.reorder_enabled {
            return Err(ControllerError::ReorderDisabled);
        }
        state.view.list.check_position(position)?;
        state.drag_start = Some(position);
        debug!(start = position.index(), "reorder started");
        Ok(())
    }

    /// Drag end: moves the picked-up item to `position`. Any actual move
    /// invalidates the correctness marks of the previous submission.
    pub async fn finish_reorder(
        &self,
        position: Position,
    ) -> Result<ReorderOutcome, ControllerError> {
        let mut state = self.inner.lock().await;
        if !state.view.reorder_enabled && state.drag_start.take().is_some() {
            debug!("drop rejected; reordering was disabled mid-drag");
            return Err(ControllerError::ReorderDisabled);
        }
        let start = state
            .drag_start
            .take()
            .ok_or(ControllerError::NoDragInProgress)?;

        if !state.view.list.move_item(start, position)? {
            debug!(position = position.index(), "item dropped back in place");
            return Ok(ReorderOutcome::Unchanged);
        }

        state.view.list.clear_marks();
        debug!(
            start = start.index(),
            end = position.index(),
            "item moved; cleared correctness marks"
        );
        self.emit(WidgetEvent::ItemsChanged(state.view.list.clone()));
        Ok(ReorderOutcome::Moved)
    }

    pub async fn reorder(
        &self,
        from: Position,
        to: Position,
    ) -> Result<ReorderOutcome, ControllerError> {
        self.begin_reorder(from).await?;
        self.finish_reorder(to).await
    }

    /// Sends the current order for grading and applies the reply.
    pub async fn submit(self: &Arc<Self>) -> Result<SubmitOutcome, ControllerError> {
        let request = {
            let mut state = self.inner.lock().await;
            if !state.interactive || state.view.attempts.locked {
                return Err(ControllerError::Locked);
            }
            if self.settings.guard_in_flight && state.in_flight > 0 {
                return Err(ControllerError::SubmissionPending);
            }
            if !state.view.submit_enabled {
                return Err(ControllerError::SubmitDisabled);
            }

            state.in_flight += 1;
            state.view.submission_pending = true;
            if self.settings.guard_in_flight {
                self.set_submit_enabled(&mut state, false);
            }
            SubmitAnswerRequest(state.view.list.texts())
        };

        debug!(order = ?request.0, "submitting answer");
        let reply = self.grader.submit_answer(&request).await;

        let mut state = self.inner.lock().await;
        state.in_flight -= 1;
        state.view.submission_pending = state.in_flight > 0;

        Ok(match reply {
            Ok(result) => self.apply_graded(&mut state, result),
            Err(err) => SubmitOutcome::Failed(self.apply_failure(&mut state, err)),
        })
    }

    fn apply_graded(
        &self,
        state: &mut ControllerState,
        result: SubmissionResult,
    ) -> SubmitOutcome {
        info!(
            correct = result.correct,
            remaining_attempts = result.remaining_attempts,
            attempts = %result.attempts,
            "submission graded"
        );
        state.view.attempts.remaining = result.remaining_attempts;

        if result.correct {
            state.view.notification = Notification::success(&result.message, &result.attempts);
            self.emit(WidgetEvent::NotificationShown(
                state.view.notification.clone(),
            ));
            self.set_indicator(state, Indicator::Success);
            if state.view.list.has_marks() {
                state.view.list.clear_marks();
                self.emit(WidgetEvent::ItemsChanged(state.view.list.clone()));
            }
            self.lock_submission(state);
        } else {
            state.view.notification = Notification::error(&result.message, &result.attempts);
            self.emit(WidgetEvent::NotificationShown(
                state.view.notification.clone(),
            ));
            self.set_indicator(state, Indicator::Error);
            match result.expected_positions() {
                Some(expected) => state.view.list.apply_expected_positions(expected),
                None => {
                    warn!("incorrect grading reply carried no item state");
                    state.view.list.clear_marks();
                }
            }
            self.emit(WidgetEvent::ItemsChanged(state.view.list.clone()));
        }

        if result.attempts_exhausted() {
            self.lock_submission(state);
            if state.view.reorder_enabled {
                state.view.reorder_enabled = false;
                self.emit(WidgetEvent::ReorderEnabledChanged(false));
            }
        } else if !result.correct
            && self.settings.guard_in_flight
            && !state.view.attempts.locked
        {
            self.set_submit_enabled(state, true);
        }

        if result.correct {
            SubmitOutcome::Correct(result)
        } else {
            SubmitOutcome::Incorrect(result)
        }
    }

    fn apply_failure(
        self: &Arc<Self>,
        state: &mut ControllerState,
        err: GradingError,
    ) -> String {
        warn!(error = %err, "grading call failed");
        let message = err.user_message();
        state.view.transient_message = Some(message.clone());
        self.emit(WidgetEvent::TransientMessageShown(message.clone()));
        self.set_submit_enabled(state, false);

        state.dismiss_generation += 1;
        let generation = state.dismiss_generation;
        let delay = self.settings.error_dismiss_after;
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = controller.inner.lock().await;
            if state.dismiss_generation != generation || state.view.transient_message.is_none() {
                return;
            }
            state.view.transient_message = None;
            controller.emit(WidgetEvent::TransientMessageCleared);
        });

        message
    }

    fn lock_submission(&self, state: &mut ControllerState) {
        self.set_submit_enabled(state, false);
        if !state.view.attempts.locked {
            state.view.attempts.locked = true;
            info!("submission locked");
            self.emit(WidgetEvent::Locked);
        }
    }

    fn set_submit_enabled(&self, state: &mut ControllerState, enabled: bool) {
        if state.view.submit_enabled != enabled {
            state.view.submit_enabled = enabled;
            self.emit(WidgetEvent::SubmitEnabledChanged(enabled));
        }
    }

    fn set_indicator(&self, state: &mut ControllerState, indicator: Indicator) {
        if state.view.indicator != Some(indicator) {
            state.view.indicator = Some(indicator);
            self.emit(WidgetEvent::IndicatorChanged(Some(indicator)));
        }
    }

    fn emit(&self, event: WidgetEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
