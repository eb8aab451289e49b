//! In-memory host surface and scripted editor for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use easel_bridge::channel::{EditorChannel, EditorPayload, MessageHub};
use easel_bridge::codec::encode_to_text_safe;
use easel_bridge::surface::{
    DisconnectGuard, ElementRef, FileCollection, HostSurface, MutationKind, MutationRecord,
    MutationSubscription, NamedFile, ObserveOptions, SyntheticEvent,
};
use easel_bridge::CommandString;
use easel_common::{BridgeError, Dimensions, HostError};
use tokio::sync::mpsc;

/// What the host saw, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Global(String),
    Click(String),
    Assign(String, Vec<NamedFile>),
    Dispatch(String, SyntheticEvent),
    Observe(String),
    Disconnect(String),
}

/// Side effect of a global call or click.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Child-list mutation on the node.
    Mutate(String),
    /// Change the node's `display: none` state (an attribute mutation).
    SetHidden(String, bool),
}

#[derive(Debug, Clone, Default)]
struct Node {
    id: String,
    parent: Option<String>,
    selectors: Vec<String>,
    text: String,
    hidden: bool,
    size: Option<Dimensions>,
    source: Option<String>,
}

struct Observer {
    root: String,
    tx: mpsc::UnboundedSender<MutationRecord>,
}

#[derive(Default)]
struct State {
    nodes: Vec<Node>,
    calls: Vec<Call>,
    observers: HashMap<u64, Observer>,
    next_observer: u64,
    global_effects: HashMap<String, Vec<Effect>>,
    click_effects: HashMap<String, Vec<Effect>>,
}

impl State {
    fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    fn is_within(&self, id: &str, ancestor: &str) -> bool {
        let mut current = Some(id.to_string());
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.node(&node_id).and_then(|n| n.parent.clone());
        }
        false
    }

    fn notify(&mut self, target: &str, kind: MutationKind) {
        let hits: Vec<u64> = self
            .observers
            .iter()
            .filter(|(_, o)| self.is_within(target, &o.root))
            .map(|(id, _)| *id)
            .collect();
        for id in hits {
            if let Some(observer) = self.observers.get(&id) {
                let _ = observer.tx.send(MutationRecord {
                    kind,
                    attribute_name: (kind == MutationKind::Attributes).then(|| "style".into()),
                });
            }
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Mutate(id) => self.notify(&id, MutationKind::ChildList),
                Effect::SetHidden(id, hidden) => {
                    if let Some(node) = self.node_mut(&id) {
                        node.hidden = hidden;
                    }
                    self.notify(&id, MutationKind::Attributes);
                }
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeHost {
    state: Arc<Mutex<State>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node in document order.
    pub fn add(&self, id: &str, parent: Option<&str>, selectors: &[&str]) -> &Self {
        self.state.lock().unwrap().nodes.push(Node {
            id: id.into(),
            parent: parent.map(str::to_string),
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        });
        self
    }

    pub fn set_text(&self, id: &str, text: &str) -> &Self {
        if let Some(node) = self.state.lock().unwrap().node_mut(id) {
            node.text = text.into();
        }
        self
    }

    pub fn set_hidden(&self, id: &str, hidden: bool) -> &Self {
        if let Some(node) = self.state.lock().unwrap().node_mut(id) {
            node.hidden = hidden;
        }
        self
    }

    pub fn set_image(&self, id: &str, size: Dimensions, source: &str) -> &Self {
        if let Some(node) = self.state.lock().unwrap().node_mut(id) {
            node.size = Some(size);
            node.source = Some(source.into());
        }
        self
    }

    pub fn is_hidden_now(&self, id: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .node(id)
            .map(|n| n.hidden)
            .unwrap_or(false)
    }

    pub fn on_global(&self, name: &str, effect: Effect) -> &Self {
        self.state
            .lock()
            .unwrap()
            .global_effects
            .entry(name.into())
            .or_default()
            .push(effect);
        self
    }

    pub fn on_click(&self, id: &str, effect: Effect) -> &Self {
        self.state
            .lock()
            .unwrap()
            .click_effects
            .entry(id.into())
            .or_default()
            .push(effect);
        self
    }

    /// Simulate a host-initiated mutation under `id`.
    pub fn mutate(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .notify(id, MutationKind::ChildList);
    }

    /// Drop every observer, as a page reload would.
    pub fn drop_observers(&self) {
        self.state.lock().unwrap().observers.clear();
    }

    pub fn observer_count(&self) -> usize {
        self.state.lock().unwrap().observers.len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Files assigned to inputs, in order.
    pub fn assignments(&self) -> Vec<(String, Vec<NamedFile>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Assign(id, files) => Some((id, files)),
                _ => None,
            })
            .collect()
    }

    pub fn position(&self, wanted: &Call) -> Option<usize> {
        self.calls().iter().position(|call| call == wanted)
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn existing(&self, element: &ElementRef) -> Result<Node, HostError> {
        self.state
            .lock()
            .unwrap()
            .node(element.id())
            .cloned()
            .ok_or_else(|| HostError::Script(format!("stale element {element}")))
    }
}

#[async_trait]
impl HostSurface for FakeHost {
    async fn call_global(&self, name: &str) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Global(name.into()));
        let effects = state.global_effects.get(name).cloned().unwrap_or_default();
        state.apply(effects);
        Ok(())
    }

    async fn query(
        &self,
        scope: Option<&ElementRef>,
        selector: &str,
    ) -> Result<Vec<ElementRef>, HostError> {
        if let Some(scope) = scope {
            self.existing(scope)?;
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .nodes
            .iter()
            .filter(|n| n.selectors.iter().any(|s| s == selector))
            .filter(|n| match scope {
                Some(scope) => n.id != scope.id() && state.is_within(&n.id, scope.id()),
                None => true,
            })
            .map(|n| ElementRef::new(n.id.clone()))
            .collect())
    }

    async fn children(&self, element: &ElementRef) -> Result<Vec<ElementRef>, HostError> {
        self.existing(element)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .nodes
            .iter()
            .filter(|n| n.parent.as_deref() == Some(element.id()))
            .map(|n| ElementRef::new(n.id.clone()))
            .collect())
    }

    async fn contains(
        &self,
        ancestor: &ElementRef,
        descendant: &ElementRef,
    ) -> Result<bool, HostError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .is_within(descendant.id(), ancestor.id()))
    }

    async fn is_hidden(&self, element: &ElementRef) -> Result<bool, HostError> {
        Ok(self.existing(element)?.hidden)
    }

    async fn text_content(&self, element: &ElementRef) -> Result<String, HostError> {
        Ok(self.existing(element)?.text)
    }

    async fn click(&self, element: &ElementRef) -> Result<(), HostError> {
        self.existing(element)?;
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Click(element.id().into()));
        let effects = state
            .click_effects
            .get(element.id())
            .cloned()
            .unwrap_or_default();
        state.apply(effects);
        Ok(())
    }

    async fn assign_files(
        &self,
        input: &ElementRef,
        files: &FileCollection,
    ) -> Result<(), HostError> {
        self.existing(input)?;
        self.record(Call::Assign(input.id().into(), files.files.clone()));
        Ok(())
    }

    async fn dispatch_event(
        &self,
        element: &ElementRef,
        event: &SyntheticEvent,
    ) -> Result<(), HostError> {
        self.existing(element)?;
        self.record(Call::Dispatch(element.id().into(), event.clone()));
        Ok(())
    }

    async fn observe(
        &self,
        element: &ElementRef,
        _options: ObserveOptions,
    ) -> Result<MutationSubscription, HostError> {
        self.existing(element)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut state = self.state.lock().unwrap();
            let id = state.next_observer;
            state.next_observer += 1;
            state.observers.insert(
                id,
                Observer {
                    root: element.id().into(),
                    tx,
                },
            );
            state.calls.push(Call::Observe(element.id().into()));
            id
        };
        let state = Arc::clone(&self.state);
        let root = element.id().to_string();
        let guard = DisconnectGuard::new(move || {
            let mut state = state.lock().unwrap();
            state.observers.remove(&id);
            state.calls.push(Call::Disconnect(root));
        });
        Ok(MutationSubscription::new(rx, guard))
    }

    async fn natural_size(&self, image: &ElementRef) -> Result<Dimensions, HostError> {
        self.existing(image)?
            .size
            .ok_or_else(|| HostError::InvalidReply("not an image".into()))
    }

    async fn image_source(&self, image: &ElementRef) -> Result<String, HostError> {
        self.existing(image)?
            .source
            .ok_or_else(|| HostError::InvalidReply("not an image".into()))
    }
}

pub const TAB_BUTTONS: &str = "div.tab-nav > button";
pub const FILE_INPUT: &str = "input[type='file']";

/// A routing container with `units` routing units and two file inputs per
/// unit, ids `{prefix}_input_{n}`.
pub fn add_routing_container(host: &FakeHost, prefix: &str, selector: &str, units: usize) {
    let container = format!("{prefix}_cn");
    let header = format!("{prefix}_cn_header");
    let expand = format!("{prefix}_cn_expand");
    let content = format!("{prefix}_cn_content");
    host.add(&container, None, &[selector]);
    host.add(&header, Some(container.as_str()), &[]);
    host.add(&expand, Some(header.as_str()), &["span.icon"]);
    host.add(&content, Some(container.as_str()), &[]);
    host.add(&format!("{prefix}_cn_iframe"), Some(content.as_str()), &["iframe"]);
    for unit in 0..units {
        let id = format!("{prefix}_unit_{unit}");
        host.add(&id, Some(content.as_str()), &[TAB_BUTTONS]);
        host.set_text(&id, &format!("ControlNet Unit {unit}"));
    }
    for n in 0..units * 2 {
        host.add(&format!("{prefix}_input_{n}"), Some(content.as_str()), &[FILE_INPUT]);
    }
    host.on_click(&expand, Effect::SetHidden(content, false));
}

/// A host laid out like the default widget map expects.
pub fn standard_host() -> FakeHost {
    let host = FakeHost::new();

    host.add("tabs", None, &["#tabs"]);
    host.add("tab_btn_send", Some("tabs"), &["button"]);
    host.set_text("tab_btn_send", "Send to PS");
    host.add("tab_btn_ps", Some("tabs"), &["button"]);
    host.set_text("tab_btn_ps", "PS ");

    host.add("txt2img_gallery", None, &["#txt2img_gallery"]);
    host.add("gallery_img", Some("txt2img_gallery"), &["img"]);
    host.set_image(
        "gallery_img",
        Dimensions::new(600, 400),
        &format!("data:image/png;base64,{}", encode_to_text_safe(GALLERY_BYTES)),
    );

    for tab in ["txt2img", "img2img", "extras"] {
        let root = format!("mode_{tab}");
        host.add(&root, None, &[format!("#mode_{tab}").as_str()]);
        host.add(&format!("{tab}_input"), Some(root.as_str()), &[FILE_INPUT]);
    }
    host.add("i2i_subtab_img2img", Some("mode_img2img"), &[TAB_BUTTONS]);
    host.set_text("i2i_subtab_img2img", "img2img");
    host.add("i2i_subtab_inpaint", Some("mode_img2img"), &[TAB_BUTTONS]);
    host.set_text("i2i_subtab_inpaint", "Inpaint upload ");
    host.add("mask_input", Some("mode_img2img"), &["#img_inpaint_mask input"]);
    host.add("base_input", Some("mode_img2img"), &["#img_inpaint_base input"]);
    host.on_global("switch_to_img2img", Effect::Mutate("mode_img2img".into()));

    add_routing_container(&host, "t2i", "#txt2img_script_container #controlnet", 3);
    add_routing_container(&host, "i2i", "#img2img_script_container #controlnet", 1);
    host
}

pub const GALLERY_BYTES: &[u8] = b"\x89PNG\r\n\x1a\ngallery";
pub const EXPORT_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nexport";
pub const MASK_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nmask";

/// Editor that answers from fixed state, synchronously inside `post`.
pub struct FakeEditor {
    hub: MessageHub,
    pub document_size: String,
    pub selection: bool,
    pub export: String,
    pub mask: String,
    /// When false nothing is published, not even the sentinel.
    pub replies: bool,
    posted: Mutex<Vec<String>>,
}

impl FakeEditor {
    pub fn new(hub: MessageHub) -> Self {
        Self {
            hub,
            document_size: "500,500".into(),
            selection: true,
            export: encode_to_text_safe(EXPORT_BYTES),
            mask: encode_to_text_safe(MASK_BYTES),
            replies: true,
            posted: Mutex::new(Vec::new()),
        }
    }

    pub fn posted(&self) -> Vec<String> {
        self.posted.lock().unwrap().clone()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.posted().iter().filter(|c| c.contains(needle)).count()
    }

    fn respond(&self, command: &str) -> Vec<EditorPayload> {
        if command.contains("createMaskFromSelection();") {
            vec![EditorPayload::Buffer(self.mask.clone())]
        } else if command.contains("getActiveDocumentSize();") {
            vec![EditorPayload::Text(self.document_size.clone())]
        } else if command.contains("selectionExists();") {
            vec![EditorPayload::Bool(self.selection)]
        } else if command.contains("saveToOE(") {
            vec![EditorPayload::Buffer(self.export.clone())]
        } else {
            Vec::new()
        }
    }
}

impl EditorChannel for FakeEditor {
    fn post(&self, command: &CommandString) -> Result<(), BridgeError> {
        self.posted.lock().unwrap().push(command.to_string());
        if !self.replies {
            return Ok(());
        }
        for payload in self.respond(command.as_str()) {
            self.hub.publish(payload);
        }
        self.hub.publish(EditorPayload::Text("done".into()));
        Ok(())
    }
}
