//! Notification lifecycle management
//!
//! The `NotificationManager` owns every visible toast, the single shared
//! container they live in, and the timers that fade and remove them.
//!
//! # Container placement
//!
//! The container is created under the topmost open dialog, or under the
//! attachment point (the document root by default) when no dialog is open.
//! While toasts are visible the manager watches the root for dialogs being
//! added or removed and moves the container along with them.

use std::collections::BTreeMap;

use toast_types::{Severity, ToastConfig, ToastOptions};
use tracing::{debug, trace, warn};

use crate::entry::{EntryKey, ToastBody, ToastEntry, ToastId, ToastPhase};
use crate::error::HostError;
use crate::event::{Mutation, TimerEvent, ToastEvent, Transition};
use crate::host::Host;

/// The shared wrapper element and where it currently hangs
#[derive(Debug)]
struct Container<N> {
    node: N,
    parent: N,
}

/// Creates, times and removes toasts on a [`Host`].
pub struct NotificationManager<H: Host> {
    host: H,
    config: ToastConfig,
    /// Overrides the document root as the default parent of the container
    attachment: Option<H::Node>,
    entries: BTreeMap<ToastId, ToastEntry<H>>,
    next_id: ToastId,
    next_serial: u64,
    container: Option<Container<H::Node>>,
    watching: bool,
}

impl<H: Host> NotificationManager<H> {
    pub fn new(host: H, config: ToastConfig) -> Self {
        Self {
            host,
            config,
            attachment: None,
            entries: BTreeMap::new(),
            next_id: 0,
            next_serial: 0,
            container: None,
            watching: false,
        }
    }

    /// Use `node` instead of the document root when no dialog is open.
    pub fn with_attachment(mut self, node: H::Node) -> Self {
        self.attachment = Some(node);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Public API
    // ─────────────────────────────────────────────────────────────────────────

    pub fn success(
        &mut self,
        message: impl Into<ToastBody<H::Node>>,
        title: Option<&str>,
        options: ToastOptions,
    ) -> Result<ToastId, HostError> {
        self.show(Severity::Success, message.into(), title, options)
    }

    pub fn info(
        &mut self,
        message: impl Into<ToastBody<H::Node>>,
        title: Option<&str>,
        options: ToastOptions,
    ) -> Result<ToastId, HostError> {
        self.show(Severity::Info, message.into(), title, options)
    }

    pub fn warning(
        &mut self,
        message: impl Into<ToastBody<H::Node>>,
        title: Option<&str>,
        options: ToastOptions,
    ) -> Result<ToastId, HostError> {
        self.show(Severity::Warning, message.into(), title, options)
    }

    pub fn error(
        &mut self,
        message: impl Into<ToastBody<H::Node>>,
        title: Option<&str>,
        options: ToastOptions,
    ) -> Result<ToastId, HostError> {
        self.show(Severity::Error, message.into(), title, options)
    }

    /// Show a toast.
    ///
    /// An existing toast with the same topic is removed before the new one is
    /// attached. The new toast is registered first, so the eviction never
    /// empties the table and the container survives it.
    ///
    /// Listeners are bound before the eviction, so a refused binding leaves
    /// the earlier toast in place. Only a failed final append, after the
    /// eviction, loses both.
    pub fn show(
        &mut self,
        severity: Severity,
        message: ToastBody<H::Node>,
        title: Option<&str>,
        options: ToastOptions,
    ) -> Result<ToastId, HostError> {
        let options = self.config.resolve(&options);
        let auto_dismiss = options.auto_dismiss();
        let title = title.filter(|title| !title.is_empty());

        let node = self.build_node(severity, &message, title)?;
        let parent = self.attachment_target()?;
        let container = self.ensure_container(&parent)?;

        let key = self.allocate_key();
        let text = match message {
            ToastBody::Text(text) => Some(text),
            ToastBody::Content(_) => None,
        };
        let entry = ToastEntry::new(
            key,
            severity,
            title.map(str::to_string),
            text,
            options,
            node.clone(),
        );
        let topic = entry.topic.clone();
        self.entries.insert(key.id, entry);
        debug!(id = key.id, %severity, topic = ?topic, "Showing toast");

        if let Err(err) = self.host.bind(&node, key, auto_dismiss) {
            self.remove(key.id);
            return Err(err);
        }

        if let Some(topic) = topic.as_deref()
            && let Some(previous) = self.by_topic(topic, Some(key.id)).map(ToastEntry::id)
        {
            debug!(id = previous, topic, "Replacing toast with the same topic");
            self.remove(previous);
        }

        if let Err(err) = self.host.append_child(&container, &node) {
            self.remove(key.id);
            return Err(err);
        }

        if auto_dismiss {
            self.arm(key);
        }
        Ok(key.id)
    }

    /// Remove a toast immediately. Returns false if it is not visible.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        self.remove(id)
    }

    /// Remove every toast
    pub fn clear(&mut self) {
        let ids: Vec<ToastId> = self.entries.keys().copied().collect();
        for id in ids {
            self.remove(id);
        }
    }

    /// Apply an event reported by the host.
    ///
    /// Events for toasts that are gone (or whose id now belongs to a newer
    /// toast) are ignored.
    pub fn handle(&mut self, event: ToastEvent<H::Node>) {
        match event {
            ToastEvent::Timer(timer) => self.on_timer(timer),
            ToastEvent::Click { key, trusted } => self.on_click(key, trusted),
            ToastEvent::PointerEnter(key) => self.on_pointer_enter(key),
            ToastEvent::PointerLeave(key) => self.on_pointer_leave(key),
            ToastEvent::Mutations(mutations) => self.on_mutations(mutations),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// First visible toast with `topic`, skipping `except`
    pub fn by_topic(&self, topic: &str, except: Option<ToastId>) -> Option<&ToastEntry<H>> {
        self.entries
            .values()
            .find(|entry| entry.topic() == Some(topic) && Some(entry.id()) != except)
    }

    pub fn visible_count(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, id: ToastId) -> Option<&ToastEntry<H>> {
        self.entries.get(&id)
    }

    /// Visible toasts in id order
    pub fn entries(&self) -> impl Iterator<Item = &ToastEntry<H>> {
        self.entries.values()
    }

    /// The shared container node, while any toast is visible
    pub fn container(&self) -> Option<&H::Node> {
        self.container.as_ref().map(|container| &container.node)
    }

    /// Whether the structure watcher is subscribed
    pub fn is_watching(&self) -> bool {
        self.watching
    }

    pub fn config(&self) -> &ToastConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Building and placement
    // ─────────────────────────────────────────────────────────────────────────

    fn allocate_key(&mut self) -> EntryKey {
        let key = EntryKey {
            id: self.next_id,
            serial: self.next_serial,
        };
        self.next_id += 1;
        self.next_serial += 1;
        key
    }

    /// `div.toast.<severity> > div.<content_class> > [h3] (p | content)`
    fn build_node(
        &mut self,
        severity: Severity,
        message: &ToastBody<H::Node>,
        title: Option<&str>,
    ) -> Result<H::Node, HostError> {
        let host = &mut self.host;

        let toast = host.create_element("div")?;
        host.add_class(&toast, "toast")?;
        host.add_class(&toast, severity.class_name())?;

        let content = host.create_element("div")?;
        host.add_class(&content, &self.config.content_class)?;
        host.append_child(&toast, &content)?;

        if let Some(title) = title {
            let heading = host.create_element("h3")?;
            host.set_text(&heading, title)?;
            host.append_child(&content, &heading)?;
        }

        match message {
            ToastBody::Text(text) => {
                let paragraph = host.create_element("p")?;
                host.set_text(&paragraph, text)?;
                host.append_child(&content, &paragraph)?;
            }
            ToastBody::Content(node) => host.append_content(&content, node)?,
        }

        Ok(toast)
    }

    /// Configured attachment point, or the document root
    fn attachment_point(&self) -> Result<H::Node, HostError> {
        match &self.attachment {
            Some(node) => Ok(node.clone()),
            None => self.host.root(),
        }
    }

    /// Topmost open dialog, or the attachment point
    fn attachment_target(&self) -> Result<H::Node, HostError> {
        match self.host.active_dialog()? {
            Some(dialog) => Ok(dialog),
            None => self.attachment_point(),
        }
    }

    fn ensure_container(&mut self, parent: &H::Node) -> Result<H::Node, HostError> {
        if let Some(container) = &mut self.container {
            if container.parent != *parent {
                self.host.append_child(parent, &container.node)?;
                container.parent = parent.clone();
                debug!(parent = ?parent, "Moved toast container");
            }
            return Ok(container.node.clone());
        }

        let node = self.host.create_element("div")?;
        self.host.add_class(&node, &self.config.root_class)?;
        self.host.append_child(parent, &node)?;
        self.container = Some(Container {
            node: node.clone(),
            parent: parent.clone(),
        });
        debug!(parent = ?parent, "Created toast container");

        if !self.watching {
            match self.host.root().and_then(|root| self.host.observe(&root)) {
                Ok(()) => self.watching = true,
                Err(err) => warn!(error = %err, "Failed to watch document for dialogs"),
            }
        }

        Ok(node)
    }

    fn move_container(&mut self, target: H::Node) {
        let Some(container) = self.container.as_mut() else {
            return;
        };
        if container.parent == target {
            return;
        }
        match self.host.append_child(&target, &container.node) {
            Ok(()) => {
                debug!(parent = ?target, "Relocated toast container");
                container.parent = target;
            }
            Err(err) => warn!(error = %err, "Failed to relocate toast container"),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Timers and removal
    // ─────────────────────────────────────────────────────────────────────────

    fn live_entry(&mut self, key: EntryKey) -> Option<&mut ToastEntry<H>> {
        self.entries
            .get_mut(&key.id)
            .filter(|entry| entry.key == key)
    }

    /// Start the fade/remove pair from zero
    fn arm(&mut self, key: EntryKey) {
        let Some(entry) = self.entries.get_mut(&key.id) else {
            return;
        };
        let fade = TimerEvent {
            key,
            transition: Transition::Fade,
        };
        let remove = TimerEvent {
            key,
            transition: Transition::Remove,
        };
        let display = entry.display_time();
        entry.fade_timer = Some(self.host.schedule(display, fade));
        entry.remove_timer = Some(
            self.host
                .schedule(display + entry.fade_time(), remove),
        );
    }

    fn disarm(host: &mut H, entry: &mut ToastEntry<H>) {
        if let Some(timer) = entry.fade_timer.take() {
            host.cancel(timer);
        }
        if let Some(timer) = entry.remove_timer.take() {
            host.cancel(timer);
        }
    }

    fn remove(&mut self, id: ToastId) -> bool {
        let Some(mut entry) = self.entries.remove(&id) else {
            return false;
        };
        Self::disarm(&mut self.host, &mut entry);
        self.host.unbind(&entry.node, entry.key);
        self.host.detach(&entry.node);
        debug!(id, "Removed toast");

        if self.entries.is_empty() {
            self.teardown();
        }
        true
    }

    /// Last toast gone: drop the container, stop watching, restart ids
    fn teardown(&mut self) {
        if let Some(container) = self.container.take() {
            self.host.detach(&container.node);
            debug!("Removed toast container");
        }
        self.stop_watching();
        self.next_id = 0;
    }

    fn stop_watching(&mut self) {
        if self.watching {
            self.host.disconnect();
            self.watching = false;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Event handlers
    // ─────────────────────────────────────────────────────────────────────────

    fn on_timer(&mut self, event: TimerEvent) {
        let Some(entry) = self.live_entry(event.key) else {
            trace!(key = ?event.key, "Ignoring timer for removed toast");
            return;
        };

        match event.transition {
            Transition::Fade => {
                entry.fade_timer = None;
                entry.phase = ToastPhase::Fading;
                let style = entry.fade_style();
                let node = entry.node.clone();
                if let Err(err) = self.host.set_style(&node, &style) {
                    warn!(id = event.key.id, error = %err, "Failed to start fade");
                }
            }
            Transition::Remove => {
                entry.remove_timer = None;
                self.remove(event.key.id);
            }
        }
    }

    fn on_click(&mut self, key: EntryKey, trusted: bool) {
        if !trusted {
            trace!(id = key.id, "Ignoring synthetic click");
            return;
        }
        if self.live_entry(key).is_some() {
            self.remove(key.id);
        }
    }

    /// Pause: cancel both timers and undo a running fade
    fn on_pointer_enter(&mut self, key: EntryKey) {
        let Some(entry) = self.entries.get_mut(&key.id).filter(|e| e.key == key) else {
            return;
        };
        if !entry.auto_dismiss() {
            return;
        }
        Self::disarm(&mut self.host, entry);
        entry.phase = ToastPhase::Visible;
        if let Err(err) = self.host.set_style(&entry.node, "") {
            warn!(id = key.id, error = %err, "Failed to reset fade");
        }
    }

    /// Resume: restart the full display + fade window
    fn on_pointer_leave(&mut self, key: EntryKey) {
        let Some(entry) = self.entries.get_mut(&key.id).filter(|e| e.key == key) else {
            return;
        };
        if !entry.auto_dismiss() {
            return;
        }
        Self::disarm(&mut self.host, entry);
        self.arm(key);
    }

    fn on_mutations(&mut self, mutations: Vec<Mutation<H::Node>>) {
        if self.entries.is_empty() {
            self.stop_watching();
            return;
        }

        for mutation in mutations {
            match mutation {
                Mutation::Added(node) => {
                    if self.host.is_dialog(&node) && self.host.is_open(&node) {
                        self.move_container(node);
                    }
                }
                Mutation::Removed(node) => {
                    let held_container = self
                        .container
                        .as_ref()
                        .is_some_and(|container| container.parent == node);
                    if held_container && self.host.is_dialog(&node) {
                        match self.attachment_target() {
                            Ok(target) => self.move_container(target),
                            Err(err) => {
                                warn!(error = %err, "Failed to find a parent for the toast container")
                            }
                        }
                    }
                }
            }
        }
    }
}
