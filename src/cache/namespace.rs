//! Cache Namespace Module
//!
//! Namespace identifiers of the form `<app>-<role>-<version>`.

use std::fmt;

use serde::Serialize;

use crate::config::Config;

// == Cache Role ==
/// Logical role of a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheRole {
    /// Pre-populated from the static asset manifest
    Static,
    /// Filled opportunistically from network responses
    Dynamic,
}

impl CacheRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheRole::Static => "static",
            CacheRole::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for CacheRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Cache Namespace ==
/// A named, isolated store of cached responses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheNamespace {
    role: CacheRole,
    version: String,
    id: String,
}

impl CacheNamespace {
    pub fn new(app: &str, role: CacheRole, version: &str) -> Self {
        Self {
            role,
            version: version.to_string(),
            id: format!("{}-{}-{}", app, role, version),
        }
    }

    /// The identifier the storage knows this namespace by.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> CacheRole {
        self.role
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

// == Namespace Set ==
/// The current static and dynamic namespaces, derived from one version tag.
///
/// Bumping the version is the only way to invalidate previously cached static
/// content: every namespace outside this set is stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceSet {
    app: String,
    static_ns: CacheNamespace,
    dynamic_ns: CacheNamespace,
}

impl NamespaceSet {
    pub fn new(app: &str, version: &str) -> Self {
        Self {
            app: app.to_string(),
            static_ns: CacheNamespace::new(app, CacheRole::Static, version),
            dynamic_ns: CacheNamespace::new(app, CacheRole::Dynamic, version),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.app_name, &config.cache_version)
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn static_ns(&self) -> &CacheNamespace {
        &self.static_ns
    }

    pub fn dynamic_ns(&self) -> &CacheNamespace {
        &self.dynamic_ns
    }

    pub fn for_role(&self, role: CacheRole) -> &CacheNamespace {
        match role {
            CacheRole::Static => &self.static_ns,
            CacheRole::Dynamic => &self.dynamic_ns,
        }
    }

    /// True if `id` names one of the two current namespaces.
    pub fn is_current(&self, id: &str) -> bool {
        id == self.static_ns.id() || id == self.dynamic_ns.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_id_format() {
        let ns = CacheNamespace::new("quantivision", CacheRole::Static, "v1.0.0");
        assert_eq!(ns.id(), "quantivision-static-v1.0.0");
        assert_eq!(ns.to_string(), "quantivision-static-v1.0.0");
        assert_eq!(ns.role(), CacheRole::Static);
        assert_eq!(ns.version(), "v1.0.0");
    }

    #[test]
    fn test_namespace_set() {
        let set = NamespaceSet::new("quantivision", "v2");
        assert_eq!(set.static_ns().id(), "quantivision-static-v2");
        assert_eq!(set.dynamic_ns().id(), "quantivision-dynamic-v2");
        assert_eq!(set.for_role(CacheRole::Dynamic), set.dynamic_ns());
    }

    #[test]
    fn test_is_current() {
        let set = NamespaceSet::new("quantivision", "v2");
        assert!(set.is_current("quantivision-static-v2"));
        assert!(set.is_current("quantivision-dynamic-v2"));
        assert!(!set.is_current("quantivision-static-v1"));
        assert!(!set.is_current("quantivision-v2"));
        assert!(!set.is_current("other-static-v2"));
    }

    #[test]
    fn test_from_config() {
        let set = NamespaceSet::from_config(&Config::default());
        assert_eq!(set.static_ns().id(), "quantivision-static-v1.0.0");
        assert_eq!(set.app(), "quantivision");
    }
}
