//! Namespace-qualified XML element names
//!
//! Sitemap generators disagree on which namespace URI they declare, so the
//! active namespace is read off the root element as resolved by the XML
//! reader. Names display in Clark notation, `{namespace-uri}localname`.

use std::fmt;

/// An element name split into its namespace URI and local part
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Namespace URI, if the element is bound to one
    pub namespace: Option<String>,

    /// Local element name without prefix
    pub local: String,
}

impl QualifiedName {
    /// Creates a qualified name from its parts
    ///
    /// An empty namespace URI is treated as no namespace.
    ///
    /// # Example
    ///
    /// ```
    /// use warmupcache::sitemap::QualifiedName;
    ///
    /// let name = QualifiedName::new(Some("urn:example"), "urlset");
    /// assert!(name.is("urn:example", "urlset"));
    /// assert_eq!(name.to_string(), "{urn:example}urlset");
    /// ```
    pub fn new(namespace: Option<&str>, local: &str) -> Self {
        Self {
            namespace: namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
            local: local.to_string(),
        }
    }

    /// Returns true if this name is `local` within `namespace`
    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local == local
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{{{}}}{}", namespace, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}
