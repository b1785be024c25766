//! Tests for NotificationManager lifecycle
//!
//! Verifies that:
//! - Toasts are built, attached and numbered correctly
//! - Timers fade and remove toasts, hover pauses and restarts them
//! - Topics replace earlier toasts without tearing down the container
//! - The container follows dialogs opening and closing

use std::time::Duration;

use crate::entry::{ToastBody, ToastPhase};
use crate::event::{TimerEvent, ToastEvent, Transition};
use crate::host::{Document, HeadlessHost, NodeId};
use crate::{NotificationManager, Severity, ToastConfig, ToastOptions};

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn manager() -> NotificationManager<HeadlessHost> {
    NotificationManager::new(HeadlessHost::new(), ToastConfig::default())
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn opts() -> ToastOptions {
    ToastOptions::default()
}

/// The `div.toast-content` wrapper of a toast
fn content_of(manager: &NotificationManager<HeadlessHost>, id: u32) -> NodeId {
    let node = *manager.get(id).expect("toast should be visible").node();
    manager.host().children(node)[0]
}

fn container_parent(manager: &NotificationManager<HeadlessHost>) -> Option<NodeId> {
    manager
        .container()
        .and_then(|container| manager.host().parent(*container))
}

// ═══════════════════════════════════════════════════════════════════════════
// Creation
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_ids_increase_for_distinct_topics() {
    let mut manager = manager();

    let a = manager.info("one", None, opts().topic("a")).unwrap();
    let b = manager.info("two", None, opts().topic("b")).unwrap();
    let c = manager.info("three", None, opts()).unwrap();

    assert_eq!((a, b, c), (0, 1, 2));
    assert_eq!(manager.visible_count(), 3);

    let container = *manager.container().expect("container should exist");
    assert!(manager.host().has_class(container, "toast-root"));
    assert_eq!(manager.host().parent(container), Some(manager.host().body()));
    for entry in manager.entries() {
        assert_eq!(manager.host().parent(*entry.node()), Some(container));
    }
}

#[test]
fn test_toast_markup() {
    let mut manager = manager();
    let id = manager.success("Saved", Some("Done"), opts()).unwrap();

    let host = manager.host();
    let node = *manager.get(id).unwrap().node();
    assert_eq!(host.tag(node), Some("div"));
    assert_eq!(host.classes(node), ["toast", "success"]);

    let content = content_of(&manager, id);
    assert!(host.has_class(content, "toast-content"));

    let children = host.children(content);
    assert_eq!(children.len(), 2);
    assert_eq!(host.tag(children[0]), Some("h3"));
    assert_eq!(host.text(children[0]), Some("Done"));
    assert_eq!(host.tag(children[1]), Some("p"));
    assert_eq!(host.text(children[1]), Some("Saved"));
}

#[test]
fn test_empty_or_missing_title_is_omitted() {
    let mut manager = manager();
    let empty = manager.warning("careful", Some(""), opts()).unwrap();
    let missing = manager.warning("careful", None, opts()).unwrap();

    for id in [empty, missing] {
        let content = content_of(&manager, id);
        let children = manager.host().children(content);
        assert_eq!(children.len(), 1);
        assert_eq!(manager.host().tag(children[0]), Some("p"));
    }
    assert_eq!(manager.get(empty).unwrap().title(), None);
}

#[test]
fn test_severity_entry_points() {
    let mut manager = manager();
    manager.success("s", None, opts()).unwrap();
    manager.info("i", None, opts()).unwrap();
    manager.warning("w", None, opts()).unwrap();
    manager.error("e", None, opts()).unwrap();

    let severities: Vec<Severity> = manager.entries().map(|entry| entry.severity()).collect();
    assert_eq!(severities, Severity::ALL);
    for entry in manager.entries() {
        assert!(
            manager
                .host()
                .has_class(*entry.node(), entry.severity().class_name())
        );
    }
}

#[test]
fn test_template_content_is_unwrapped() {
    let mut manager = manager();
    let host = manager.host_mut();
    let template = host.create_element("template").unwrap();
    let link = host.create_element("a").unwrap();
    host.append_child(&template, &link).unwrap();

    let id = manager
        .info(ToastBody::Content(template), Some("Update"), opts())
        .unwrap();

    let content = content_of(&manager, id);
    let children = manager.host().children(content);
    assert_eq!(manager.host().tag(children[1]), Some("a"));
    assert!(manager.host().children(template).is_empty());
    assert!(!manager.host().is_attached(template));
    assert_eq!(manager.get(id).unwrap().text(), None);
}

#[test]
fn test_plain_node_content_is_moved_in() {
    let mut manager = manager();
    let custom = manager.host_mut().create_element("section").unwrap();

    let id = manager
        .info(ToastBody::Content(custom), None, opts())
        .unwrap();

    let content = content_of(&manager, id);
    assert_eq!(manager.host().children(content), &[custom]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Topics
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_same_topic_replaces_previous_toast() {
    let mut manager = manager();
    let timing = opts().display_time_ms(3000).fade_time_ms(2000).topic("alert");

    let first = manager.error("first", None, timing.clone()).unwrap();
    let first_node = *manager.get(first).unwrap().node();
    let container = *manager.container().unwrap();

    let second = manager.error("second", None, timing).unwrap();

    assert_eq!(manager.visible_count(), 1);
    assert_eq!(second, 1, "eviction must not reset the id counter");
    assert_eq!(manager.by_topic("alert", None).map(|e| e.id()), Some(second));
    assert!(!manager.host().is_attached(first_node));
    assert_eq!(manager.container(), Some(&container));
    assert!(manager.host().is_attached(container));
}

#[test]
fn test_config_topic_applies_to_every_toast() {
    let config = ToastConfig {
        topic: Some("status".into()),
        ..ToastConfig::default()
    };
    let mut manager = NotificationManager::new(HeadlessHost::new(), config);

    manager.info("saving", None, opts()).unwrap();
    let latest = manager.success("saved", None, opts()).unwrap();

    assert_eq!(manager.visible_count(), 1);
    assert_eq!(manager.entries().next().map(|e| e.id()), Some(latest));
    assert_eq!(manager.get(latest).unwrap().text(), Some("saved"));
}

#[test]
fn test_no_topic_opts_out_of_config_topic() {
    let config = ToastConfig {
        topic: Some("status".into()),
        ..ToastConfig::default()
    };
    let mut manager = NotificationManager::new(HeadlessHost::new(), config);

    let first = manager.info("one", None, opts().no_topic()).unwrap();
    let second = manager.info("two", None, opts().no_topic()).unwrap();

    assert_eq!(manager.visible_count(), 2);
    assert_eq!(manager.get(first).unwrap().topic(), None);
    assert_eq!(manager.get(second).unwrap().topic(), None);

    // Toasts without an override still share the manager topic
    manager.info("three", None, opts()).unwrap();
    let latest = manager.info("four", None, opts()).unwrap();
    assert_eq!(manager.visible_count(), 3);
    assert_eq!(manager.by_topic("status", None).map(|e| e.id()), Some(latest));
}

#[test]
fn test_refused_binding_keeps_earlier_topic_toast() {
    let mut manager = manager();
    let first = manager.info("first", None, opts().topic("alert")).unwrap();
    let first_node = *manager.get(first).unwrap().node();

    manager.host_mut().refuse_bindings(true);
    let result = manager.info("second", None, opts().topic("alert"));

    assert!(result.is_err());
    assert_eq!(manager.visible_count(), 1);
    assert_eq!(manager.by_topic("alert", None).map(|e| e.id()), Some(first));
    assert!(manager.host().is_attached(first_node));
    assert_eq!(manager.host().query_class("toast").len(), 1);

    manager.host_mut().refuse_bindings(false);
    manager.advance(ms(5000));
    assert_eq!(manager.visible_count(), 0);
}

#[test]
fn test_refused_binding_on_first_toast_tears_down() {
    let mut manager = manager();
    manager.host_mut().refuse_bindings(true);

    assert!(manager.success("nope", None, opts()).is_err());
    assert_eq!(manager.visible_count(), 0);
    assert!(manager.container().is_none());
    assert!(!manager.is_watching());
}

#[test]
fn test_by_topic_skips_excluded_id() {
    let mut manager = manager();
    let id = manager.info("x", None, opts().topic("t")).unwrap();

    assert_eq!(manager.by_topic("t", None).map(|e| e.id()), Some(id));
    assert!(manager.by_topic("t", Some(id)).is_none());
    assert!(manager.by_topic("other", None).is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// Timers
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_fade_then_remove_timeline() {
    let mut manager = manager();
    let id = manager.info("hello", None, opts()).unwrap();
    let node = *manager.get(id).unwrap().node();

    manager.advance(ms(2999));
    assert_eq!(manager.get(id).unwrap().phase(), ToastPhase::Visible);
    assert_eq!(manager.host().style(node), Some(""));

    manager.advance(ms(1));
    assert_eq!(manager.get(id).unwrap().phase(), ToastPhase::Fading);
    assert_eq!(
        manager.host().style(node),
        Some("opacity: 0; transition-duration: 2s")
    );

    manager.advance(ms(1999));
    assert!(manager.get(id).is_some());

    manager.advance(ms(1));
    assert!(manager.get(id).is_none());
    assert!(!manager.host().is_attached(node));
    assert!(manager.container().is_none());
    assert!(manager.host().query_class("toast-root").is_empty());
    assert_eq!(manager.host().pending_timers(), 0);
}

#[test]
fn test_next_id_is_zero_after_container_teardown() {
    let mut manager = manager();
    manager.info("a", None, opts()).unwrap();
    manager.info("b", None, opts()).unwrap();

    manager.advance(ms(5000));
    assert_eq!(manager.visible_count(), 0);

    let id = manager.info("c", None, opts()).unwrap();
    assert_eq!(id, 0);
}

#[test]
fn test_ids_keep_counting_while_toasts_remain() {
    let mut manager = manager();
    manager.info("short", None, opts()).unwrap();
    manager.info("sticky", None, opts().persistent()).unwrap();

    manager.advance(ms(5000));
    assert_eq!(manager.visible_count(), 1);

    let id = manager.info("next", None, opts()).unwrap();
    assert_eq!(id, 2);
}

#[test]
fn test_per_call_timing_overrides() {
    let mut manager = manager();
    let id = manager
        .success("quick", None, opts().display_time_ms(100).fade_time_ms(50))
        .unwrap();
    let entry = manager.get(id).unwrap();
    assert_eq!(entry.display_time(), ms(100));
    assert_eq!(entry.fade_time(), ms(50));
    let node = *entry.node();

    manager.advance(ms(100));
    assert_eq!(
        manager.host().style(node),
        Some("opacity: 0; transition-duration: 0.05s")
    );

    manager.advance(ms(50));
    assert!(manager.get(id).is_none());
}

#[test]
fn test_persistent_toast_never_expires() {
    let mut manager = manager();
    let id = manager.error("sticky", None, opts().persistent()).unwrap();

    assert_eq!(manager.host().pending_timers(), 0);
    assert!(!manager.pointer_enter(id), "no hover tracking without timers");

    manager.advance(Duration::from_secs(3600));
    assert_eq!(manager.get(id).unwrap().phase(), ToastPhase::Visible);

    assert!(manager.click(id, true));
    assert!(manager.get(id).is_none());
}

#[test]
fn test_stale_timer_is_ignored() {
    let mut manager = manager();
    let id = manager.info("old", None, opts()).unwrap();
    let old_key = manager.get(id).unwrap().key();
    manager.dismiss(id);

    let reused = manager.info("new", None, opts()).unwrap();
    assert_eq!(reused, id);

    manager.handle(ToastEvent::Timer(TimerEvent {
        key: old_key,
        transition: Transition::Remove,
    }));
    manager.handle(ToastEvent::Click {
        key: old_key,
        trusted: true,
    });

    let entry = manager.get(reused).expect("new toast must survive stale events");
    assert_ne!(entry.key(), old_key);
    assert_eq!(entry.text(), Some("new"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Clicks and hover
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_trusted_click_removes_immediately() {
    let mut manager = manager();
    let id = manager.info("click me", None, opts()).unwrap();

    manager.advance(ms(1000));
    assert!(manager.click(id, true));

    assert!(manager.get(id).is_none());
    assert_eq!(manager.host().pending_timers(), 0);
    assert!(manager.container().is_none());
}

#[test]
fn test_synthetic_click_is_ignored() {
    let mut manager = manager();
    let id = manager.info("robot", None, opts()).unwrap();

    assert!(manager.click(id, false));
    assert!(manager.get(id).is_some());

    manager.advance(ms(5000));
    assert!(manager.get(id).is_none());
}

#[test]
fn test_hover_pauses_and_leave_restarts_window() {
    let mut manager = manager();
    let id = manager.info("hover", None, opts()).unwrap();

    manager.advance(ms(2500));
    assert!(manager.pointer_enter(id));
    assert_eq!(manager.host().pending_timers(), 0);

    manager.advance(ms(10_000));
    assert_eq!(manager.get(id).unwrap().phase(), ToastPhase::Visible);

    assert!(manager.pointer_leave(id));
    manager.advance(ms(2999));
    assert_eq!(manager.get(id).unwrap().phase(), ToastPhase::Visible);
    manager.advance(ms(1));
    assert_eq!(manager.get(id).unwrap().phase(), ToastPhase::Fading);
    manager.advance(ms(1999));
    assert!(manager.get(id).is_some());
    manager.advance(ms(1));
    assert!(manager.get(id).is_none());
}

#[test]
fn test_hover_reverts_running_fade() {
    let mut manager = manager();
    let id = manager.warning("fading", None, opts()).unwrap();
    let node = *manager.get(id).unwrap().node();

    manager.advance(ms(3500));
    assert_eq!(manager.get(id).unwrap().phase(), ToastPhase::Fading);

    manager.pointer_enter(id);
    assert_eq!(manager.get(id).unwrap().phase(), ToastPhase::Visible);
    assert_eq!(manager.host().style(node), Some(""));
    assert!(!manager.get(id).unwrap().has_pending_timers());
}

#[test]
fn test_leave_without_enter_keeps_single_timer_pair() {
    let mut manager = manager();
    let id = manager.info("twice", None, opts()).unwrap();

    manager.pointer_leave(id);
    manager.pointer_leave(id);

    assert_eq!(manager.host().pending_timers(), 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// Container placement
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_container_follows_dialog_open_and_close() {
    let mut manager = manager();
    manager.info("hi", None, opts()).unwrap();
    let body = manager.host().body();
    assert_eq!(container_parent(&manager), Some(body));

    let dialog = manager.host_mut().show_modal();
    manager.settle();
    assert_eq!(container_parent(&manager), Some(dialog));
    assert_eq!(manager.host().query_class("toast-root").len(), 1);

    manager.host_mut().close_modal(dialog);
    manager.settle();
    assert_eq!(container_parent(&manager), Some(body));
    assert_eq!(manager.host().query_class("toast-root").len(), 1);
}

#[test]
fn test_show_inside_open_dialog() {
    let mut manager = manager();
    let dialog = manager.host_mut().show_modal();

    manager.info("modal", None, opts()).unwrap();

    assert_eq!(container_parent(&manager), Some(dialog));
}

#[test]
fn test_show_relocates_container_to_new_dialog() {
    let mut manager = manager();
    manager.info("before", None, opts()).unwrap();
    let first = *manager.container().unwrap();

    let dialog = manager.host_mut().show_modal();
    manager.info("after", None, opts()).unwrap();

    assert_eq!(manager.container(), Some(&first));
    assert_eq!(container_parent(&manager), Some(dialog));
    assert_eq!(manager.host().query_class("toast-root").len(), 1);

    manager.settle();
    assert_eq!(container_parent(&manager), Some(dialog));
}

#[test]
fn test_closing_unrelated_dialog_keeps_container() {
    let mut manager = manager();
    let lower = manager.host_mut().show_modal();
    manager.info("hi", None, opts()).unwrap();
    let upper = manager.host_mut().show_modal();
    manager.settle();
    assert_eq!(container_parent(&manager), Some(upper));

    manager.host_mut().close_modal(upper);
    manager.settle();
    assert_eq!(container_parent(&manager), Some(lower));

    let stray = manager.host_mut().show_modal();
    manager.host_mut().remove_attribute(stray, "open").unwrap();
    manager.host_mut().close_modal(stray);
    manager.settle();
    assert_eq!(container_parent(&manager), Some(lower));
}

#[test]
fn test_custom_attachment_point() {
    let mut host = HeadlessHost::new();
    let body = host.body();
    let corner = host.create_element("aside").unwrap();
    host.append_child(&body, &corner).unwrap();
    let mut manager =
        NotificationManager::new(host, ToastConfig::default()).with_attachment(corner);

    manager.info("hi", None, opts()).unwrap();
    assert_eq!(container_parent(&manager), Some(corner));

    let dialog = manager.host_mut().show_modal();
    manager.settle();
    assert_eq!(container_parent(&manager), Some(dialog));

    manager.host_mut().close_modal(dialog);
    manager.settle();
    assert_eq!(container_parent(&manager), Some(corner));
}

#[test]
fn test_watcher_stops_when_last_toast_leaves() {
    let mut manager = manager();
    let id = manager.info("watch", None, opts()).unwrap();
    assert!(manager.is_watching());
    assert!(manager.host().is_observing());

    manager.dismiss(id);
    assert!(!manager.is_watching());
    assert!(!manager.host().is_observing());

    manager.info("again", None, opts()).unwrap();
    assert!(manager.is_watching());
}

#[test]
fn test_clear_removes_everything() {
    let mut manager = manager();
    for i in 0..4 {
        manager.info(format!("toast-{i}"), None, opts()).unwrap();
    }

    manager.clear();

    assert_eq!(manager.visible_count(), 0);
    assert!(manager.container().is_none());
    assert!(manager.host().query_class("toast").is_empty());
    assert_eq!(manager.host().pending_timers(), 0);
    assert!(!manager.dismiss(0));
}
