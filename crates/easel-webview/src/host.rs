//! [`HostSurface`] backed by the host webview's page runtime.
//!
//! Every primitive is a script call tagged with a fresh id. The runtime
//! answers with a `host_reply` envelope carrying that id, which the event
//! loop feeds back through [`WebViewHost::handle_reply`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use easel_bridge::ipc::{HostReply, MutationNotice};
use easel_bridge::surface::{
    DisconnectGuard, ElementRef, FileCollection, HostSurface, MutationRecord,
    MutationSubscription, ObserveOptions, SyntheticEvent,
};
use easel_common::{new_id, Dimensions, HostError};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};

use crate::ipc::js_call;
use crate::queue::ScriptQueue;

const RUN_FN: &str = "window.easel.host.run";

type PendingReplies = HashMap<String, oneshot::Sender<Result<Value, HostError>>>;
type Subscriptions = HashMap<String, mpsc::UnboundedSender<MutationRecord>>;

pub struct WebViewHost {
    queue: ScriptQueue,
    pending: Mutex<PendingReplies>,
    subscriptions: Arc<Mutex<Subscriptions>>,
    attached: AtomicBool,
}

impl WebViewHost {
    pub fn new(queue: ScriptQueue) -> Self {
        Self {
            queue,
            pending: Mutex::new(HashMap::new()),
            subscriptions: Arc::new(Mutex::new(HashMap::new())),
            attached: AtomicBool::new(true),
        }
    }

    /// Resolve the primitive waiting on `reply.id`.
    pub fn handle_reply(&self, reply: HostReply) {
        let sender = self
            .pending
            .lock()
            .ok()
            .and_then(|mut pending| pending.remove(&reply.id));
        match sender {
            Some(tx) => {
                let _ = tx.send(reply.into_result());
            }
            None => tracing::debug!(id = %reply.id, "host reply with no waiter"),
        }
    }

    /// Route observed mutations to their subscription.
    pub fn handle_mutation(&self, notice: MutationNotice) {
        if let Ok(subs) = self.subscriptions.lock() {
            if let Some(tx) = subs.get(&notice.subscription) {
                for record in notice.records {
                    let _ = tx.send(record);
                }
            }
        }
    }

    /// The page went away: fail every waiting primitive and end every
    /// observation. Later calls fail with [`HostError::Detached`].
    pub fn detach(&self) {
        self.attached.store(false, Ordering::Release);
        if let Ok(mut pending) = self.pending.lock() {
            pending.clear();
        }
        if let Ok(mut subs) = self.subscriptions.lock() {
            subs.clear();
        }
    }

    /// Accept primitives again after the page reloaded.
    pub fn reattach(&self) {
        self.attached.store(true, Ordering::Release);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    async fn invoke(&self, op: &str, args: Value) -> Result<Value, HostError> {
        if !self.attached.load(Ordering::Acquire) {
            return Err(HostError::Detached);
        }
        let id = new_id();
        let (tx, rx) = oneshot::channel();
        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(id.clone(), tx);
        }
        let waiter = Waiter {
            pending: &self.pending,
            id,
        };
        self.queue.push(js_call(RUN_FN, &[json!(waiter.id), json!(op), args]));
        rx.await.map_err(|_| HostError::ReplyDropped)?
    }

    async fn invoke_as<T: DeserializeOwned>(&self, op: &str, args: Value) -> Result<T, HostError> {
        let value = self.invoke(op, args).await?;
        serde_json::from_value(value).map_err(|e| HostError::InvalidReply(format!("{op}: {e}")))
    }

    async fn invoke_unit(&self, op: &str, args: Value) -> Result<(), HostError> {
        self.invoke(op, args).await.map(|_| ())
    }
}

/// Removes a primitive's reply slot when its caller stops waiting.
struct Waiter<'a> {
    pending: &'a Mutex<PendingReplies>,
    id: String,
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.remove(&self.id);
        }
    }
}

#[async_trait]
impl HostSurface for WebViewHost {
    async fn call_global(&self, name: &str) -> Result<(), HostError> {
        self.invoke_unit("callGlobal", json!({ "name": name })).await
    }

    async fn query(
        &self,
        scope: Option<&ElementRef>,
        selector: &str,
    ) -> Result<Vec<ElementRef>, HostError> {
        self.invoke_as("query", json!({ "scope": scope, "selector": selector }))
            .await
    }

    async fn children(&self, element: &ElementRef) -> Result<Vec<ElementRef>, HostError> {
        self.invoke_as("children", json!({ "element": element })).await
    }

    async fn contains(
        &self,
        ancestor: &ElementRef,
        descendant: &ElementRef,
    ) -> Result<bool, HostError> {
        self.invoke_as(
            "contains",
            json!({ "ancestor": ancestor, "descendant": descendant }),
        )
        .await
    }

    async fn is_hidden(&self, element: &ElementRef) -> Result<bool, HostError> {
        self.invoke_as("isHidden", json!({ "element": element })).await
    }

    async fn text_content(&self, element: &ElementRef) -> Result<String, HostError> {
        let text: Option<String> = self
            .invoke_as("textContent", json!({ "element": element }))
            .await?;
        Ok(text.unwrap_or_default())
    }

    async fn click(&self, element: &ElementRef) -> Result<(), HostError> {
        self.invoke_unit("click", json!({ "element": element })).await
    }

    async fn assign_files(
        &self,
        input: &ElementRef,
        files: &FileCollection,
    ) -> Result<(), HostError> {
        self.invoke_unit(
            "assignFiles",
            json!({ "element": input, "files": files.files }),
        )
        .await
    }

    async fn dispatch_event(
        &self,
        element: &ElementRef,
        event: &SyntheticEvent,
    ) -> Result<(), HostError> {
        self.invoke_unit("dispatchEvent", json!({ "element": element, "event": event }))
            .await
    }

    async fn observe(
        &self,
        element: &ElementRef,
        options: ObserveOptions,
    ) -> Result<MutationSubscription, HostError> {
        let subscription = new_id();
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut subs) = self.subscriptions.lock() {
            subs.insert(subscription.clone(), tx);
        }

        let started = self
            .invoke_unit(
                "observe",
                json!({ "element": element, "options": options, "subscription": subscription }),
            )
            .await;
        if let Err(e) = started {
            if let Ok(mut subs) = self.subscriptions.lock() {
                subs.remove(&subscription);
            }
            return Err(e);
        }

        let subs = Arc::clone(&self.subscriptions);
        let queue = self.queue.clone();
        let guard = DisconnectGuard::new(move || {
            if let Ok(mut subs) = subs.lock() {
                subs.remove(&subscription);
            }
            let id = new_id();
            queue.push(js_call(
                RUN_FN,
                &[json!(id), json!("disconnect"), json!({ "subscription": subscription })],
            ));
        });
        Ok(MutationSubscription::new(rx, guard))
    }

    async fn natural_size(&self, image: &ElementRef) -> Result<Dimensions, HostError> {
        self.invoke_as("naturalSize", json!({ "element": image })).await
    }

    async fn image_source(&self, image: &ElementRef) -> Result<String, HostError> {
        self.invoke_as("imageSource", json!({ "element": image })).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn reply(id: &str, value: Value) -> HostReply {
        HostReply {
            id: id.into(),
            value,
            error: None,
        }
    }

    /// Pull the correlation id out of a queued `run` script.
    fn script_id(script: &str) -> String {
        let start = script.find('"').unwrap() + 1;
        let end = start + script[start..].find('"').unwrap();
        script[start..end].to_string()
    }

    #[tokio::test]
    async fn query_resolves_from_reply() {
        let queue = ScriptQueue::new();
        let host = Arc::new(WebViewHost::new(queue.clone()));

        let task = {
            let host = Arc::clone(&host);
            tokio::spawn(async move { host.query(None, "#tabs").await })
        };
        while queue.is_empty() {
            tokio::task::yield_now().await;
        }
        let scripts = queue.drain();
        assert!(scripts[0].starts_with("window.easel.host.run("));
        assert!(scripts[0].contains(r##""selector":"#tabs""##));

        host.handle_reply(reply(&script_id(&scripts[0]), json!(["e1", "e2"])));
        let refs = task.await.unwrap().unwrap();
        assert_eq!(refs, vec![ElementRef::new("e1"), ElementRef::new("e2")]);
        assert_eq!(host.pending_count(), 0);
    }

    #[tokio::test]
    async fn script_error_becomes_host_error() {
        let queue = ScriptQueue::new();
        let host = Arc::new(WebViewHost::new(queue.clone()));
        let task = {
            let host = Arc::clone(&host);
            tokio::spawn(async move { host.click(&ElementRef::new("e9")).await })
        };
        while queue.is_empty() {
            tokio::task::yield_now().await;
        }
        let id = script_id(&queue.drain()[0]);
        host.handle_reply(HostReply {
            id,
            value: Value::Null,
            error: Some("stale element e9".into()),
        });
        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, HostError::Script(ref m) if m == "stale element e9"));
    }

    #[tokio::test]
    async fn malformed_reply_is_invalid_reply() {
        let queue = ScriptQueue::new();
        let host = Arc::new(WebViewHost::new(queue.clone()));
        let task = {
            let host = Arc::clone(&host);
            tokio::spawn(async move { host.natural_size(&ElementRef::new("e1")).await })
        };
        while queue.is_empty() {
            tokio::task::yield_now().await;
        }
        host.handle_reply(reply(&script_id(&queue.drain()[0]), json!("wide")));
        assert!(matches!(
            task.await.unwrap(),
            Err(HostError::InvalidReply(_))
        ));
    }

    #[tokio::test]
    async fn detach_drops_waiters_and_rejects_new_calls() {
        let queue = ScriptQueue::new();
        let host = Arc::new(WebViewHost::new(queue.clone()));
        let task = {
            let host = Arc::clone(&host);
            tokio::spawn(async move { host.is_hidden(&ElementRef::new("e1")).await })
        };
        while queue.is_empty() {
            tokio::task::yield_now().await;
        }
        host.detach();
        assert!(matches!(
            task.await.unwrap(),
            Err(HostError::ReplyDropped)
        ));
        assert!(matches!(
            host.call_global("switch_to_txt2img").await,
            Err(HostError::Detached)
        ));

        host.reattach();
        let again = {
            let host = Arc::clone(&host);
            tokio::spawn(async move { host.call_global("switch_to_txt2img").await })
        };
        while queue.len() < 2 {
            tokio::task::yield_now().await;
        }
        let scripts = queue.drain();
        host.handle_reply(reply(&script_id(scripts.last().unwrap()), Value::Null));
        again.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn abandoned_primitive_releases_its_reply_slot() {
        let queue = ScriptQueue::new();
        let host = WebViewHost::new(queue.clone());

        let waited =
            tokio::time::timeout(std::time::Duration::from_millis(20), host.query(None, "#x"))
                .await;
        assert!(waited.is_err());
        assert_eq!(queue.len(), 1);
        assert_eq!(host.pending_count(), 0);

        // A late reply finds no waiter and is ignored.
        let id = script_id(&queue.drain()[0]);
        host.handle_reply(reply(&id, json!(["e1"])));
        assert_eq!(host.pending_count(), 0);
    }

    #[tokio::test]
    async fn observe_routes_mutations_and_disconnects() {
        let queue = ScriptQueue::new();
        let host = Arc::new(WebViewHost::new(queue.clone()));
        let task = {
            let host = Arc::clone(&host);
            tokio::spawn(async move {
                host.observe(&ElementRef::new("e1"), ObserveOptions::structural())
                    .await
            })
        };
        while queue.is_empty() {
            tokio::task::yield_now().await;
        }
        let script = queue.drain().remove(0);
        let value: Value = {
            let args = &script[script.find('{').unwrap()..script.rfind(')').unwrap()];
            serde_json::from_str(args).unwrap()
        };
        let subscription = value["subscription"].as_str().unwrap().to_string();
        host.handle_reply(reply(&script_id(&script), Value::Null));
        let mut sub = task.await.unwrap().unwrap();

        host.handle_mutation(
            serde_json::from_value(json!({
                "subscription": subscription,
                "records": [{"type": "childList"}]
            }))
            .unwrap(),
        );
        assert!(sub.next().await.is_some());

        sub.disconnect();
        let scripts = queue.drain();
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].contains(r#""disconnect""#));
        assert!(scripts[0].contains(&subscription));
    }
}
