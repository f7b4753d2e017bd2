//! Offline cache shell, compiled to its own wasm module and loaded as the
//! page's service worker.

use finance_binder::shell::{
    route, should_store, stale_caches, FetchRoute, ResponseKind, CACHE_NAME, NOTIFICATION_BODY,
    NOTIFICATION_CLICK_URL, NOTIFICATION_ICON, NOTIFICATION_TITLE, SHELL_ASSETS,
};
use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local, JsFuture};
use web_sys::{
    Cache, ExtendableEvent, FetchEvent, NotificationEvent, NotificationOptions, PushEvent, Request,
    Response, ResponseType, ServiceWorkerGlobalScope,
};

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));

    if let Err(err) = register_handlers() {
        log::error!("[ServiceWorker] setup failed: {:?}", err);
    }
}

fn scope() -> ServiceWorkerGlobalScope {
    js_sys::global().unchecked_into()
}

fn register_handlers() -> Result<(), JsValue> {
    listen("install", |event: ExtendableEvent| {
        event.wait_until(&future_to_promise(install()))
    })?;
    listen("activate", |event: ExtendableEvent| {
        event.wait_until(&future_to_promise(activate()))
    })?;
    listen("fetch", on_fetch)?;
    listen("push", on_push)?;
    listen("notificationclick", on_notification_click)?;
    Ok(())
}

fn listen<E, F>(name: &'static str, mut handler: F) -> Result<(), JsValue>
where
    E: JsCast + 'static,
    F: FnMut(E) -> Result<(), JsValue> + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        if let Err(err) = handler(event.unchecked_into()) {
            log::error!("[ServiceWorker] {} handler failed: {:?}", name, err);
        }
    });
    scope().add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

async fn open_cache() -> Result<Cache, JsValue> {
    let caches = scope().caches()?;
    JsFuture::from(caches.open(CACHE_NAME)).await?.dyn_into()
}

async fn install() -> Result<JsValue, JsValue> {
    log::info!("[ServiceWorker] Install");
    let cache = open_cache().await?;

    log::info!("[ServiceWorker] Caching app shell");
    let assets: Array = SHELL_ASSETS.iter().map(|url| JsValue::from_str(url)).collect();
    JsFuture::from(cache.add_all_with_str_sequence(&assets)).await?;

    log::info!("[ServiceWorker] Skip waiting on install");
    JsFuture::from(scope().skip_waiting()?).await
}

async fn activate() -> Result<JsValue, JsValue> {
    log::info!("[ServiceWorker] Activate");
    let scope = scope();
    let caches = scope.caches()?;

    let keys: Array = JsFuture::from(caches.keys()).await?.dyn_into()?;
    let names: Vec<String> = keys.iter().filter_map(|key| key.as_string()).collect();
    for name in stale_caches(names.iter().map(String::as_str)) {
        log::info!("[ServiceWorker] Removing old cache {}", name);
        JsFuture::from(caches.delete(&name)).await?;
    }

    JsFuture::from(scope.clients().claim()).await
}

fn on_fetch(event: FetchEvent) -> Result<(), JsValue> {
    let request = event.request();
    let url = request.url();
    let origin = scope().location().origin();
    log::debug!("[ServiceWorker] Fetch {}", url);

    match route(&url, &origin) {
        // not answering leaves the request to the browser
        FetchRoute::CrossOrigin | FetchRoute::Api => Ok(()),
        FetchRoute::CacheFirst => event.respond_with(&future_to_promise(cache_first(request))),
    }
}

async fn cache_first(request: Request) -> Result<JsValue, JsValue> {
    let scope = scope();
    let cached = JsFuture::from(scope.caches()?.match_with_request(&request)).await?;
    if !cached.is_undefined() {
        log::debug!("[ServiceWorker] Found in cache {}", request.url());
        return Ok(cached);
    }

    let response: Response = JsFuture::from(scope.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    let kind = match response.type_() {
        ResponseType::Basic => ResponseKind::Basic,
        _ => ResponseKind::Other,
    };

    if should_store(response.status(), kind) {
        let copy = response.clone()?;
        spawn_local(async move {
            if let Err(err) = store(&request, &copy).await {
                log::warn!("[ServiceWorker] Caching {} failed: {:?}", request.url(), err);
            }
        });
    }

    Ok(response.into())
}

async fn store(request: &Request, response: &Response) -> Result<(), JsValue> {
    let cache = open_cache().await?;
    JsFuture::from(cache.put_with_request(request, response)).await?;
    Ok(())
}

fn on_push(event: PushEvent) -> Result<(), JsValue> {
    log::info!("[ServiceWorker] Push received");

    let options = NotificationOptions::new();
    options.set_body(NOTIFICATION_BODY);
    options.set_icon(NOTIFICATION_ICON);
    options.set_badge(NOTIFICATION_ICON);

    let shown = scope()
        .registration()
        .show_notification_with_options(NOTIFICATION_TITLE, &options)?;
    event.wait_until(&shown)
}

fn on_notification_click(event: NotificationEvent) -> Result<(), JsValue> {
    log::info!("[ServiceWorker] Notification click received");
    event.notification().close();
    event.wait_until(&scope().clients().open_window(NOTIFICATION_CLICK_URL))
}
