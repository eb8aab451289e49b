//! Page runtime injected into the host UI.
//!
//! The runtime relays the editor frame's messages over IPC, mounts the
//! editor iframe when the host page lacks one, adds "send to editor"
//! buttons to galleries, and implements the DOM primitives behind
//! [`WebViewHost`](crate::WebViewHost).

use easel_config::EaselConfig;
use serde::Serialize;

/// Settings the page runtime needs, serialized into its start call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    pub iframe_id: String,
    pub editor_url: String,
    pub mount_selector: String,
    pub width: String,
    pub height: u32,
    pub gallery_buttons: Vec<GalleryButtonConfig>,
    pub button_label: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryButtonConfig {
    pub buttons_id: String,
    pub gallery_id: String,
}

impl RuntimeConfig {
    pub fn from_config(config: &EaselConfig) -> Self {
        Self {
            iframe_id: config.editor.iframe_id.clone(),
            editor_url: config.editor.editor_url(),
            mount_selector: config.editor.mount_selector.clone(),
            width: config.editor.width.clone(),
            height: config.editor.height,
            gallery_buttons: config
                .host
                .gallery_buttons
                .iter()
                .map(|b| GalleryButtonConfig {
                    buttons_id: b.buttons_id.clone(),
                    gallery_id: b.gallery_id.clone(),
                })
                .collect(),
            button_label: config.widgets.editor_tab_label.trim().to_string(),
        }
    }
}

const RUNTIME_JS: &str = r#"
(function() {
    if (window.easel && window.easel.host) { return; }
    window.easel = window.easel || {};
    var ipc = function(kind, payload) { window.easel.ipc.send(kind, payload); };
    var cfg = null;

    var REQUEST_TYPES = [
        'getAndSendImageToWebUITab',
        'sendImageWithMaskSelectionToWebUi',
        'sendGalleryImageToEditor'
    ];

    function appRoot() {
        var app = document.querySelector('gradio-app');
        return (app && app.shadowRoot) ? app.shadowRoot : document;
    }

    function editorFrame() {
        return cfg ? appRoot().querySelector('#' + cfg.iframeId) : null;
    }

    // -- element handles ------------------------------------------------------

    var refs = new Map();
    var nextRef = 1;

    function refOf(el) {
        if (el.__easelRef && refs.get(el.__easelRef) === el) { return el.__easelRef; }
        var id = 'e' + (nextRef++);
        el.__easelRef = id;
        refs.set(id, el);
        return id;
    }

    function deref(id) {
        var el = refs.get(id);
        if (!el || !el.isConnected) {
            refs.delete(id);
            throw new Error('stale element ' + id);
        }
        return el;
    }

    // -- encoding -------------------------------------------------------------

    function bufferToBase64(buffer) {
        var bytes = new Uint8Array(buffer);
        var chunks = [];
        for (var i = 0; i < bytes.length; i += 0x8000) {
            chunks.push(String.fromCharCode.apply(null, bytes.subarray(i, i + 0x8000)));
        }
        return btoa(chunks.join(''));
    }

    function base64ToFile(file) {
        var raw = atob(file.data);
        var bytes = new Uint8Array(raw.length);
        for (var i = 0; i < raw.length; i++) { bytes[i] = raw.charCodeAt(i); }
        return new File([new Blob([bytes], { type: file.mime })], file.name, { type: file.mime });
    }

    function blobToDataUrl(blob) {
        return new Promise(function(resolve, reject) {
            var reader = new FileReader();
            reader.onload = function() { resolve(reader.result); };
            reader.onerror = function() { reject(reader.error); };
            reader.readAsDataURL(blob);
        });
    }

    // -- host primitives ------------------------------------------------------

    var observers = new Map();

    var ops = {
        callGlobal: function(a) {
            var fn = window[a.name];
            if (typeof fn !== 'function') { throw new Error('no global function ' + a.name); }
            fn();
            return null;
        },
        query: function(a) {
            var scope = a.scope ? deref(a.scope) : appRoot();
            return Array.prototype.map.call(scope.querySelectorAll(a.selector), refOf);
        },
        children: function(a) {
            return Array.prototype.map.call(deref(a.element).children, refOf);
        },
        contains: function(a) {
            return deref(a.ancestor).contains(deref(a.descendant));
        },
        isHidden: function(a) {
            return deref(a.element).style.display === 'none';
        },
        textContent: function(a) {
            return deref(a.element).textContent;
        },
        click: function(a) {
            deref(a.element).click();
            return null;
        },
        assignFiles: function(a) {
            var dt = new DataTransfer();
            a.files.forEach(function(f) { dt.items.add(base64ToFile(f)); });
            deref(a.element).files = dt.files;
            return null;
        },
        dispatchEvent: function(a) {
            var ev = new Event(a.event.type, { bubbles: a.event.bubbles, composed: a.event.composed });
            deref(a.element).dispatchEvent(ev);
            return null;
        },
        observe: function(a) {
            var observer = new MutationObserver(function(records) {
                ipc('mutation', {
                    subscription: a.subscription,
                    records: records.map(function(r) {
                        return { type: r.type, attributeName: r.attributeName };
                    })
                });
            });
            observer.observe(deref(a.element), a.options);
            observers.set(a.subscription, observer);
            return null;
        },
        disconnect: function(a) {
            var observer = observers.get(a.subscription);
            if (observer) {
                observer.disconnect();
                observers.delete(a.subscription);
            }
            return null;
        },
        naturalSize: function(a) {
            var img = deref(a.element);
            return { width: img.naturalWidth, height: img.naturalHeight };
        },
        imageSource: function(a) {
            var img = deref(a.element);
            var src = img.currentSrc || img.src;
            if (src.indexOf('blob:') === 0) {
                return fetch(src).then(function(r) { return r.blob(); }).then(blobToDataUrl);
            }
            return src;
        }
    };

    function run(id, op, args) {
        Promise.resolve()
            .then(function() {
                var impl = ops[op];
                if (!impl) { throw new Error('unknown host op ' + op); }
                return impl(args || {});
            })
            .then(function(value) {
                ipc('host_reply', { id: id, value: value === undefined ? null : value });
            }, function(err) {
                ipc('host_reply', { id: id, error: String(err && err.message ? err.message : err) });
            });
    }

    // -- editor frame ---------------------------------------------------------

    function postToEditor(command) {
        var frame = editorFrame();
        if (!frame || !frame.contentWindow) {
            console.warn('easel: editor frame missing, command dropped');
            return;
        }
        frame.contentWindow.postMessage(command, '*');
    }

    function relayMessage(event) {
        var data = event.data;
        if (data && typeof data === 'object' && REQUEST_TYPES.indexOf(data.type) >= 0) {
            ipc('transfer_request', data);
            return;
        }
        var frame = editorFrame();
        if (!frame || event.source !== frame.contentWindow) { return; }
        if (data instanceof ArrayBuffer) {
            ipc('editor_message', { type: 'buffer', data: bufferToBase64(data) });
        } else if (typeof data === 'boolean') {
            ipc('editor_message', { type: 'bool', data: data });
        } else {
            ipc('editor_message', { type: 'text', data: String(data) });
        }
    }

    function addGalleryButtons() {
        cfg.galleryButtons.forEach(function(b) {
            var root = appRoot();
            if (root.querySelector('#' + b.buttonsId + '_open_in_editor')) { return; }
            var existing = root.querySelector('#' + b.buttonsId + ' button');
            if (!existing) { return; }
            var button = existing.cloneNode(true);
            button.style.display = 'flex';
            button.id = b.buttonsId + '_open_in_editor';
            button.title = 'Send to editor';
            button.textContent = cfg.buttonLabel;
            button.addEventListener('click', function() {
                ipc('transfer_request', { type: 'sendGalleryImageToEditor', gallery: b.galleryId });
            });
            existing.parentNode.appendChild(button);
        });
    }

    function attachFrame(frame) {
        if (frame.__easelAttached) { return; }
        frame.__easelAttached = true;
        frame.addEventListener('load', function() {
            addGalleryButtons();
            ipc('editor_loaded', { iframeId: cfg.iframeId });
        });
    }

    function ensureFrame() {
        var frame = editorFrame();
        if (!frame && cfg.mountSelector) {
            var mount = appRoot().querySelector(cfg.mountSelector);
            if (mount) {
                frame = document.createElement('iframe');
                frame.id = cfg.iframeId;
                frame.style.width = cfg.width;
                frame.style.height = cfg.height + 'px';
                frame.style.border = '0';
                attachFrame(frame);
                frame.src = cfg.editorUrl;
                mount.appendChild(frame);
            }
        }
        if (frame) { attachFrame(frame); }
        return frame;
    }

    window.easel.host = { run: run };
    window.easel.editor = { post: postToEditor };
    window.easel.start = function(config) {
        cfg = config;
        window.addEventListener('message', relayMessage);
        window.addEventListener('beforeunload', function() { ipc('editor_unloaded', null); });
        var seen = false;
        setInterval(function() {
            var present = !!ensureFrame();
            if (seen && !present) { ipc('editor_unloaded', null); }
            seen = present;
        }, 500);
    };
})();
"#;

/// Full runtime script for `config`, ready for `with_initialization_script`.
pub fn runtime_script(config: &EaselConfig) -> String {
    let runtime = RuntimeConfig::from_config(config);
    let json = serde_json::to_string(&runtime).unwrap_or_else(|_| "null".to_string());
    format!(
        "{RUNTIME_JS}\nwindow.addEventListener('DOMContentLoaded', function() {{ window.easel.start({json}); }});\n"
    )
}
