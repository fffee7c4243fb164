/// Background page runtime: feeds browser events to the controller and
/// carries out the effects it returns

use crate::controller::{Controller, Effect, Msg, Notification, NotificationContent};
use crate::endpoint::{EndpointError, ServiceEndpoint};
use crate::events::{EventError, PlatformEvent};
use crate::preferences::Preferences;
use crate::shorten::{self, HttpResponse, HttpTransport, TransportError};
use crate::storage::HostStore;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

// Import JS bridge functions
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    fn listenPlatformEvents(callback: &js_sys::Function);

    fn listenNavigation(url_pattern: &str, callback: &js_sys::Function);

    #[wasm_bindgen(catch)]
    async fn hasInterceptPermission() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn httpGet(url: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sleep(ms: u32) -> Result<(), JsValue>;

    fn createContextMenu(id: &str, title: &str, context: &str);

    fn showPageAction(tab_id: i32);

    fn setPageActionIcon(tab_id: i32, path: &str, title: &str);

    #[wasm_bindgen(catch)]
    fn copyToClipboard(text: &str) -> Result<(), JsValue>;

    fn showNotification(id: &str, icon: &str, title: &str, message: &str);

    fn clearNotification(id: &str);

    fn getMessage(key: &str) -> String;
}

#[derive(Debug, Error)]
pub enum BackgroundError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

/// Request client transport going through the bridge's `httpGet`
struct BridgeTransport;

impl HttpTransport for BridgeTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        let response = httpGet(url.as_str())
            .await
            .map_err(|e| TransportError(format!("{:?}", e)))?;
        serde_wasm_bindgen::from_value(response).map_err(|e| TransportError(e.to_string()))
    }
}

struct Runtime {
    endpoint: ServiceEndpoint,
    controller: RefCell<Controller>,
    store: RefCell<HostStore>,
}

impl Runtime {
    /// Preferences are re-read for every message so option changes apply at once
    fn preferences(&self) -> Preferences {
        Preferences::load(&*self.store.borrow())
    }
}

/// Start the background page: subscribe to browser events and initialize
pub fn start() -> Result<(), BackgroundError> {
    let endpoint = ServiceEndpoint::urly()?;

    let mut store = HostStore::open();
    if let Err(e) = Preferences::load_or_init(&mut store) {
        log::warn!("Failed to write default preferences: {}", e);
    }

    let runtime = Rc::new(Runtime {
        controller: RefCell::new(Controller::new(endpoint.clone())),
        endpoint,
        store: RefCell::new(store),
    });

    let events_runtime = runtime.clone();
    let on_event = Closure::wrap(Box::new(move |payload: JsValue| {
        match decode_event(payload) {
            Ok(event) => {
                if let Some(msg) = event.into_msg() {
                    dispatch(&events_runtime, msg);
                }
            }
            Err(e) => log::warn!("Dropping browser event: {}", e),
        }
    }) as Box<dyn FnMut(JsValue)>);
    listenPlatformEvents(on_event.as_ref().unchecked_ref());
    on_event.forget();

    log::info!("Background runtime started for {}", runtime.endpoint.base());
    dispatch(&runtime, Msg::Started);
    Ok(())
}

fn decode_event(payload: JsValue) -> Result<PlatformEvent, EventError> {
    serde_wasm_bindgen::from_value(payload).map_err(|e| EventError::Js(e.to_string()))
}

fn dispatch(runtime: &Rc<Runtime>, msg: Msg) {
    let prefs = runtime.preferences();
    let effects = runtime.controller.borrow_mut().update(msg, &prefs);
    for effect in effects {
        execute(runtime, effect);
    }
}

fn execute(runtime: &Rc<Runtime>, effect: Effect) {
    match effect {
        Effect::RegisterMenu(context) => {
            createContextMenu(context.name(), &localized(context.label_key()), context.name());
        }
        Effect::CheckPermission => {
            let runtime = runtime.clone();
            spawn_local(async move {
                let granted = match hasInterceptPermission().await {
                    Ok(value) => value.as_bool().unwrap_or(false),
                    Err(e) => {
                        log::warn!("Permission check failed: {:?}", e);
                        false
                    }
                };
                dispatch(&runtime, Msg::PermissionChecked(granted));
            });
        }
        Effect::EnableInterception => enable_interception(runtime),
        Effect::ShowPageAction(tab) => showPageAction(tab),
        Effect::SetIcon { tab, icon } => {
            setPageActionIcon(tab, icon.icon_path(), &localized(icon.title_key()));
        }
        Effect::Shorten { tab, request } => {
            let runtime = runtime.clone();
            spawn_local(async move {
                let result = shorten::shorten(&BridgeTransport, &runtime.endpoint, &request).await;
                dispatch(
                    &runtime,
                    Msg::ShortenCompleted {
                        tab,
                        original: request.url,
                        result,
                    },
                );
            });
        }
        Effect::CopyToClipboard(text) => {
            if let Err(e) = copyToClipboard(&text) {
                log::warn!("Failed to copy {} to clipboard: {:?}", text, e);
            }
        }
        Effect::ShowNotification(notification) => show_notification(&notification),
        Effect::CancelNotification(id) => clearNotification(&id),
        Effect::After { delay, msg } => {
            let runtime = runtime.clone();
            spawn_local(async move {
                if let Err(e) = sleep(millis(delay)).await {
                    log::warn!("Timer failed: {:?}", e);
                }
                dispatch(&runtime, *msg);
            });
        }
    }
}

fn enable_interception(runtime: &Rc<Runtime>) {
    let nav_runtime = runtime.clone();
    let on_navigation = Closure::wrap(Box::new(move |tab_id: i32, url: String| -> JsValue {
        let prefs = nav_runtime.preferences();
        match nav_runtime
            .controller
            .borrow_mut()
            .check_navigation(&prefs, tab_id, &url)
        {
            Some(redirect) => JsValue::from_str(&redirect),
            None => JsValue::NULL,
        }
    }) as Box<dyn FnMut(i32, String) -> JsValue>);

    let pattern = format!("{}*", runtime.endpoint.base());
    listenNavigation(&pattern, on_navigation.as_ref().unchecked_ref());
    on_navigation.forget();
}

fn show_notification(notification: &Notification) {
    match &notification.content {
        NotificationContent::Shortened { code, original, link } => {
            let title = format!("{} {}", localized("NotificationShortened"), code);
            let message = format!("{}\n{}", link, original);
            showNotification(&notification.id, "graphics/48.png", &title, &message);
        }
        NotificationContent::Failed(kind) => {
            showNotification(
                &notification.id,
                "graphics/stop.png",
                &localized("UrlyFailed"),
                &localized(kind.message_key()),
            );
        }
    }
}

/// Locale message for `key`, or the key itself when the catalog lacks it
fn localized(key: &str) -> String {
    let message = getMessage(key);
    if message.is_empty() {
        key.to_string()
    } else {
        message
    }
}

fn millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)
}
