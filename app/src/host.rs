//! Browser host
//!
//! Implements the toast-core host traits on top of the real DOM:
//! - nodes are `web_sys::Element`s
//! - timers are `gloo_timers` timeouts (dropping one cancels it)
//! - the structure watch is a `MutationObserver` on `document.body`
//! - clicks and hover come from `click` / `mouseenter` / `mouseleave` listeners
//!
//! Every callback goes through a [`Dispatcher`] holding a weak reference to
//! the shared manager.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use gloo_timers::callback::Timeout;
use toast_core::{
    Document, EntryKey, HostError, Interaction, Mutation, NotificationManager, Scheduler,
    StructureWatch, TimerEvent, ToastEvent,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, HtmlTemplateElement, MouseEvent, MutationObserver, MutationObserverInit,
    MutationRecord, NodeList,
};

pub(crate) type SharedManager = Rc<RefCell<NotificationManager<WebHost>>>;

// ─────────────────────────────────────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────────────────────────────────────

/// Routes browser callbacks back into the manager
#[derive(Clone, Default)]
pub(crate) struct Dispatcher(Rc<RefCell<Weak<RefCell<NotificationManager<WebHost>>>>>);

impl Dispatcher {
    pub(crate) fn connect(&self, manager: &SharedManager) {
        *self.0.borrow_mut() = Rc::downgrade(manager);
    }

    fn dispatch(&self, event: ToastEvent<Element>) {
        let Some(manager) = self.0.borrow().upgrade() else {
            return;
        };
        // Use try_borrow_mut so an event raised while the manager is mid-update is dropped, not a panic
        match manager.try_borrow_mut() {
            Ok(mut manager) => manager.handle(event),
            Err(_) => tracing::warn!(?event, "Dropped toast event while manager was busy"),
        }
    }
}

fn dom_error(op: &'static str) -> impl FnOnce(JsValue) -> HostError {
    move |err| HostError::Dom {
        op,
        message: format!("{err:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Listener bookkeeping
// ─────────────────────────────────────────────────────────────────────────────

/// Event listeners registered on one toast. Removed from the element on drop.
struct Listeners {
    target: Element,
    handlers: Vec<(&'static str, Closure<dyn FnMut(MouseEvent)>)>,
}

impl Listeners {
    fn add(
        &mut self,
        kind: &'static str,
        handler: impl FnMut(MouseEvent) + 'static,
    ) -> Result<(), HostError> {
        let closure = Closure::<dyn FnMut(MouseEvent)>::new(handler);
        self.target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(dom_error("addEventListener"))?;
        self.handlers.push((kind, closure));
        Ok(())
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        for (kind, closure) in &self.handlers {
            let _ = self
                .target
                .remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        }
    }
}

struct Watch {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

/// Flatten childList records into added/removed elements
fn collect_mutations(records: &js_sys::Array) -> Vec<Mutation<Element>> {
    fn elements(list: &NodeList) -> impl Iterator<Item = Element> + '_ {
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
    }

    let mut mutations = Vec::new();
    for record in records.iter() {
        let Ok(record) = record.dyn_into::<MutationRecord>() else {
            continue;
        };
        if record.type_() != "childList" {
            continue;
        }
        mutations.extend(elements(&record.removed_nodes()).map(Mutation::Removed));
        mutations.extend(elements(&record.added_nodes()).map(Mutation::Added));
    }
    mutations
}

/// Longest delay `setTimeout` accepts; larger values wrap negative and fire at once
const MAX_TIMEOUT_MS: u32 = i32::MAX as u32;

fn timeout_millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis())
        .unwrap_or(u32::MAX)
        .min(MAX_TIMEOUT_MS)
}

// ─────────────────────────────────────────────────────────────────────────────
// WebHost
// ─────────────────────────────────────────────────────────────────────────────

/// DOM-backed host for [`NotificationManager`]
pub struct WebHost {
    dispatcher: Dispatcher,
    listeners: HashMap<EntryKey, Listeners>,
    watch: Option<Watch>,
}

impl WebHost {
    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            listeners: HashMap::new(),
            watch: None,
        }
    }

    fn document() -> Result<web_sys::Document, HostError> {
        web_sys::window()
            .and_then(|window| window.document())
            .ok_or(HostError::NoDocument)
    }
}

impl Document for WebHost {
    type Node = Element;

    fn root(&self) -> Result<Element, HostError> {
        Self::document()?
            .body()
            .map(Element::from)
            .ok_or(HostError::NoDocument)
    }

    fn active_dialog(&self) -> Result<Option<Element>, HostError> {
        let open = Self::document()?
            .query_selector_all("dialog[open]")
            .map_err(dom_error("querySelectorAll"))?;
        Ok(open
            .length()
            .checked_sub(1)
            .and_then(|last| open.item(last))
            .and_then(|node| node.dyn_into::<Element>().ok()))
    }

    fn is_dialog(&self, node: &Element) -> bool {
        node.tag_name().eq_ignore_ascii_case("dialog")
    }

    fn is_open(&self, node: &Element) -> bool {
        node.has_attribute("open")
    }

    fn create_element(&mut self, tag: &str) -> Result<Element, HostError> {
        Self::document()?
            .create_element(tag)
            .map_err(dom_error("createElement"))
    }

    fn add_class(&mut self, node: &Element, class: &str) -> Result<(), HostError> {
        node.class_list()
            .add_1(class)
            .map_err(dom_error("classList.add"))
    }

    fn set_text(&mut self, node: &Element, text: &str) -> Result<(), HostError> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn set_style(&mut self, node: &Element, css: &str) -> Result<(), HostError> {
        if css.is_empty() {
            node.remove_attribute("style")
        } else {
            node.set_attribute("style", css)
        }
        .map_err(dom_error("style"))
    }

    fn append_child(&mut self, parent: &Element, child: &Element) -> Result<(), HostError> {
        parent
            .append_child(child)
            .map(|_| ())
            .map_err(dom_error("appendChild"))
    }

    fn append_content(&mut self, parent: &Element, content: &Element) -> Result<(), HostError> {
        let appended = match content.dyn_ref::<HtmlTemplateElement>() {
            Some(template) => parent.append_child(&template.content()),
            None => parent.append_child(content),
        };
        appended.map(|_| ()).map_err(dom_error("appendChild"))
    }

    fn detach(&mut self, node: &Element) {
        node.remove();
    }
}

impl Scheduler for WebHost {
    type Timer = Timeout;

    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> Timeout {
        let dispatcher = self.dispatcher.clone();
        Timeout::new(timeout_millis(delay), move || {
            dispatcher.dispatch(ToastEvent::Timer(event))
        })
    }

    fn cancel(&mut self, timer: Timeout) {
        drop(timer);
    }
}

impl StructureWatch for WebHost {
    fn observe(&mut self, root: &Element) -> Result<(), HostError> {
        self.disconnect();

        let dispatcher = self.dispatcher.clone();
        let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |records: js_sys::Array, _observer: MutationObserver| {
                let mutations = collect_mutations(&records);
                if !mutations.is_empty() {
                    dispatcher.dispatch(ToastEvent::Mutations(mutations));
                }
            },
        );
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(dom_error("MutationObserver"))?;

        let init = MutationObserverInit::new();
        init.set_child_list(true);
        observer
            .observe_with_options(root, &init)
            .map_err(dom_error("MutationObserver.observe"))?;

        self.watch = Some(Watch {
            observer,
            _callback: callback,
        });
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(watch) = self.watch.take() {
            watch.observer.disconnect();
        }
    }
}

impl Interaction for WebHost {
    fn bind(&mut self, node: &Element, key: EntryKey, hover: bool) -> Result<(), HostError> {
        let mut listeners = Listeners {
            target: node.clone(),
            handlers: Vec::new(),
        };

        let dispatcher = self.dispatcher.clone();
        listeners.add("click", move |event: MouseEvent| {
            dispatcher.dispatch(ToastEvent::Click {
                key,
                trusted: event.is_trusted(),
            })
        })?;

        if hover {
            let dispatcher = self.dispatcher.clone();
            listeners.add("mouseenter", move |_| {
                dispatcher.dispatch(ToastEvent::PointerEnter(key))
            })?;
            let dispatcher = self.dispatcher.clone();
            listeners.add("mouseleave", move |_| {
                dispatcher.dispatch(ToastEvent::PointerLeave(key))
            })?;
        }

        self.listeners.insert(key, listeners);
        Ok(())
    }

    fn unbind(&mut self, _node: &Element, key: EntryKey) {
        self.listeners.remove(&key);
    }
}
