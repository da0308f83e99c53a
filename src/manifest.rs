//! Static Asset Manifest
//!
//! Resources that must be in the static namespace before the site works
//! offline. The list is fixed at build time.

use std::collections::HashSet;

use url::Url;

use crate::error::{Result, WorkerError};
use crate::net::cache_key;

/// Files cached on install. Relative paths resolve against the site origin.
pub const STATIC_FILES: &[&str] = &[
    "/",
    "/index.html",
    "/css/style.css",
    "/css/scrollbar.css",
    "/js/main.js",
    "/assets/logo.svg",
    "/site.webmanifest",
    "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700;800&family=JetBrains+Mono:wght@400;500;600&display=swap",
    "https://cdnjs.cloudflare.com/ajax/libs/three.js/r128/three.min.js",
    "https://cdnjs.cloudflare.com/ajax/libs/gsap/3.12.2/gsap.min.js",
    "https://cdnjs.cloudflare.com/ajax/libs/gsap/3.12.2/ScrollTrigger.min.js",
];

/// Document served to HTML requests when the network is unreachable.
pub const OFFLINE_FALLBACK_PATH: &str = "/index.html";

// == Static Asset Manifest ==
/// Ordered, de-duplicated list of resolved asset URLs.
///
/// Membership is exact: a URL belongs to the manifest only if it equals a
/// resolved entry once fragments are stripped.
#[derive(Debug, Clone)]
pub struct StaticAssetManifest {
    origin: Url,
    entries: Vec<Url>,
    keys: HashSet<String>,
}

impl StaticAssetManifest {
    /// Resolves `locators` against `origin`.
    pub fn resolve(origin: &Url, locators: &[&str]) -> Result<Self> {
        let mut entries = Vec::with_capacity(locators.len());
        let mut keys = HashSet::with_capacity(locators.len());

        for locator in locators {
            let url = origin.join(locator).map_err(|e| {
                WorkerError::InvalidRequest(format!("Invalid manifest entry '{}': {}", locator, e))
            })?;
            if keys.insert(cache_key(&url)) {
                entries.push(url);
            }
        }

        Ok(Self {
            origin: origin.clone(),
            entries,
            keys,
        })
    }

    /// The built-in manifest resolved against `origin`.
    pub fn for_origin(origin: &Url) -> Result<Self> {
        Self::resolve(origin, STATIC_FILES)
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn entries(&self) -> &[Url] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if `url` is one of the manifest entries.
    pub fn contains(&self, url: &Url) -> bool {
        self.keys.contains(&cache_key(url))
    }

    /// Cache key of the offline fallback document.
    pub fn fallback_key(&self) -> String {
        self.origin
            .join(OFFLINE_FALLBACK_PATH)
            .map(|url| cache_key(&url))
            .unwrap_or_else(|_| OFFLINE_FALLBACK_PATH.to_string())
    }
}
