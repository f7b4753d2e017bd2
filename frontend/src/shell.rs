//! Decisions of the offline cache shell. The worker entry point in
//! `bin/service_worker.rs` wires them to the browser's cache and fetch APIs.

/// Bump when the asset list changes; older caches are dropped on activation.
pub const CACHE_NAME: &str = "finance-binder-v1";

pub const SHELL_ASSETS: &[&str] = &[
    "/",
    "/login",
    "/dashboard",
    "/static/css/style.css",
    "/static/js/app.js",
    "/static/js/chart.js",
    "/static/manifest.json",
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0-alpha1/dist/css/bootstrap.min.css",
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0-alpha1/dist/js/bootstrap.bundle.min.js",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0/css/all.min.css",
    "https://cdn.jsdelivr.net/npm/chart.js",
];

pub const NOTIFICATION_TITLE: &str = "Finance Binder";
pub const NOTIFICATION_BODY: &str = "Promemoria per aggiornare le tue finanze";
pub const NOTIFICATION_ICON: &str =
    "https://cdn.jsdelivr.net/npm/@fortawesome/fontawesome-free@6.0.0/svgs/solid/wallet.svg";
pub const NOTIFICATION_CLICK_URL: &str = "/";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchRoute {
    /// Another origin: the browser handles it as if no worker were installed.
    CrossOrigin,
    /// Server API call: always the network, never the cache.
    Api,
    /// Same-origin asset or page: cache first, then network.
    CacheFirst,
}

pub fn route(request_url: &str, origin: &str) -> FetchRoute {
    if !same_origin(request_url, origin) {
        FetchRoute::CrossOrigin
    } else if request_url.contains("/api/") {
        FetchRoute::Api
    } else {
        FetchRoute::CacheFirst
    }
}

fn same_origin(request_url: &str, origin: &str) -> bool {
    match request_url.strip_prefix(origin) {
        Some(rest) => rest.is_empty() || rest.starts_with(['/', '?', '#']),
        None => false,
    }
}

/// Whether a network response may be copied into the cache: only complete,
/// same-origin responses are.
pub fn should_store(status: u16, response_type: ResponseKind) -> bool {
    status == 200 && response_type == ResponseKind::Basic
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseKind {
    Basic,
    Other,
}

/// Caches left behind by earlier versions of the shell.
pub fn stale_caches<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter(|name| *name != CACHE_NAME)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://binder.example";

    #[test]
    fn api_calls_skip_the_cache() {
        assert_eq!(
            route("https://binder.example/api/binder/Casa/data", ORIGIN),
            FetchRoute::Api
        );
        assert_eq!(
            route("https://binder.example/dashboard?next=/api/x", ORIGIN),
            FetchRoute::Api
        );
    }

    #[test]
    fn other_origins_pass_through() {
        assert_eq!(
            route("https://cdn.jsdelivr.net/npm/chart.js", ORIGIN),
            FetchRoute::CrossOrigin
        );
        assert_eq!(
            route("https://evil.example/api/binder", ORIGIN),
            FetchRoute::CrossOrigin
        );
        assert_eq!(
            route("https://binder.example.evil.example/", ORIGIN),
            FetchRoute::CrossOrigin
        );
    }

    #[test]
    fn pages_and_assets_are_cache_first() {
        assert_eq!(route("https://binder.example/", ORIGIN), FetchRoute::CacheFirst);
        assert_eq!(
            route("https://binder.example/static/css/style.css", ORIGIN),
            FetchRoute::CacheFirst
        );
    }

    #[test]
    fn stores_only_ok_basic_responses() {
        assert!(should_store(200, ResponseKind::Basic));
        assert!(!should_store(200, ResponseKind::Other));
        assert!(!should_store(404, ResponseKind::Basic));
        assert!(!should_store(304, ResponseKind::Basic));
    }

    #[test]
    fn activation_drops_old_versions() {
        let stale = stale_caches(["finance-binder-v0", CACHE_NAME, "other"]);
        assert_eq!(stale, vec!["finance-binder-v0", "other"]);
        assert!(stale_caches([CACHE_NAME]).is_empty());
    }

    #[test]
    fn manifest_covers_shell() {
        assert!(SHELL_ASSETS.contains(&"/"));
        assert!(SHELL_ASSETS.contains(&"/static/manifest.json"));
        assert!(SHELL_ASSETS.iter().all(|a| !a.contains("/api/")));
    }
}
