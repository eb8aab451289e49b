//! JavaScript side of the IPC protocol.
//!
//! Messages flow in both directions:
//! - **JS -> Rust**: the page runtime calls `window.easel.ipc.send(kind, payload)`,
//!   which posts a JSON envelope to the `ipc_handler` registered on the WebView.
//! - **Rust -> JS**: Rust evaluates scripts built by [`js_call`] in the page.
//!
//! The envelope format itself lives in [`easel_bridge::ipc`].

/// JavaScript snippet that sets up the IPC bridge on the JS side.
/// Injected as an initialization script before any page script runs.
pub const IPC_INIT_SCRIPT: &str = r#"
(function() {
    window.easel = window.easel || {};
    window.easel.ipc = {
        send: function(kind, payload) {
            window.ipc.postMessage(JSON.stringify({
                kind: kind,
                payload: payload === undefined ? null : payload
            }));
        }
    };
})();
"#;

/// Build a script calling `function` with JSON-encoded `args`.
///
/// Every argument goes through `serde_json`, so strings carrying quotes,
/// newlines or `</script>` cannot break out of the call.
pub fn js_call(function: &str, args: &[serde_json::Value]) -> String {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    format!("{}({});", function, args.join(", "))
}
