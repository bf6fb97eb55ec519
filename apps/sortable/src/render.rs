//! Plain-text rendering of the widget for the terminal host.

use std::fmt::Write as _;

use client_core::{Tone, WidgetEvent, WidgetView};
use shared::domain::Indicator;

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

pub fn render_view(view: &WidgetView) -> String {
    let mut out = String::new();
    for (index, item) in view.list.items().iter().enumerate() {
        let marker = if item.is_marked_incorrect() {
            "  [incorrect]"
        } else {
            ""
        };
        let _ = writeln!(out, "{index:>3}. {}{marker}", item.text());
    }

    let _ = writeln!(
        out,
        "submit: {} | reorder: {} | remaining attempts: {}{}",
        on_off(view.submit_enabled),
        on_off(view.reorder_enabled),
        view.attempts.remaining,
        if view.submission_pending {
            " | grading..."
        } else {
            ""
        }
    );

    if view.notification.visible {
        let tone = match view.notification.tone {
            Some(Tone::Success) => "correct",
            Some(Tone::Error) => "incorrect",
            None => "info",
        };
        let _ = writeln!(
            out,
            "[{tone}] {} (attempts: {})",
            view.notification.message, view.notification.attempts
        );
    }

    match view.indicator {
        Some(Indicator::Success) => out.push_str("indicator: success\n"),
        Some(Indicator::Error) => out.push_str("indicator: error\n"),
        None => {}
    }

    if let Some(message) = &view.transient_message {
        let _ = writeln!(out, "! {message}");
    }
    out
}

pub fn describe_event(event: &WidgetEvent) -> String {
    match event {
        WidgetEvent::ItemsChanged(list) => {
            let marked = list.marks().iter().filter(|marked| **marked).count();
            format!("items: {} ({marked} marked incorrect)", list.texts().join(", "))
        }
        WidgetEvent::SubmitEnabledChanged(enabled) => format!("submit {}", on_off(*enabled)),
        WidgetEvent::ReorderEnabledChanged(enabled) => format!("reorder {}", on_off(*enabled)),
        WidgetEvent::NotificationShown(notification) => format!(
            "{} (attempts: {})",
            notification.message, notification.attempts
        ),
        WidgetEvent::IndicatorChanged(Some(Indicator::Success)) => "indicator: success".into(),
        WidgetEvent::IndicatorChanged(Some(Indicator::Error)) => "indicator: error".into(),
        WidgetEvent::IndicatorChanged(None) => "indicator hidden".into(),
        WidgetEvent::TransientMessageShown(message) => format!("! {message}"),
        WidgetEvent::TransientMessageCleared => "message dismissed".into(),
        WidgetEvent::Locked => "submission locked".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::{AttemptState, Item, ListState, Notification};

    fn sample_view() -> WidgetView {
        WidgetView {
            list: ListState::new(vec![
                Item::with_mark("Green", false),
                Item::with_mark("Red", true),
            ]),
            submit_enabled: true,
            reorder_enabled: true,
            notification: Notification::error("Incorrect (0.5/1.0)", "1"),
            indicator: Some(Indicator::Error),
            transient_message: None,
            attempts: AttemptState {
                remaining: 1,
                locked: false,
            },
            submission_pending: false,
        }
    }

    #[test]
    fn renders_items_marks_and_feedback() {
        let rendered = render_view(&sample_view());
        assert!(rendered.contains("  0. Green\n"));
        assert!(rendered.contains("  1. Red  [incorrect]\n"));
        assert!(rendered.contains("submit: enabled | reorder: enabled | remaining attempts: 1"));
        assert!(rendered.contains("[incorrect] Incorrect (0.5/1.0) (attempts: 1)"));
        assert!(rendered.contains("indicator: error"));
    }

    #[test]
    fn renders_transient_message() {
        let mut view = sample_view();
        view.transient_message = Some("Network error".to_string());
        assert!(render_view(&view).ends_with("! Network error\n"));
    }

    #[test]
    fn describes_item_changes() {
        let list = ListState::from_texts(["A", "B"]);
        assert_eq!(
            describe_event(&WidgetEvent::ItemsChanged(list)),
            "items: A, B (0 marked incorrect)"
        );
    }
}
