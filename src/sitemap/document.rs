//! Sitemap XML parsing
//!
//! Walks the document with a namespace-aware `quick-xml` reader and collects
//! the text of every `url/loc` element in the namespace declared by the root
//! element. `sitemap/loc` entries (sitemap indexes) are only counted.

use crate::sitemap::qname::QualifiedName;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

/// The parsed view of one sitemap payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapDocument {
    /// Qualified name of the root element
    pub root: QualifiedName,

    /// Page locations from `url/loc`, in document order
    pub locations: Vec<String>,

    /// Number of `sitemap/loc` entries (nested sitemap references)
    pub index_entries: usize,
}

/// Which kind of `loc` element is currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocKind {
    Page,
    Index,
}

impl SitemapDocument {
    /// Parses a sitemap document
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when the payload is not
    /// well-formed XML or the root element is not bound to a namespace.
    ///
    /// # Example
    ///
    /// ```
    /// use warmupcache::sitemap::SitemapDocument;
    ///
    /// let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
    ///   <url><loc>https://example.com/</loc></url>
    /// </urlset>"#;
    /// let document = SitemapDocument::parse(xml).unwrap();
    /// assert_eq!(document.locations, vec!["https://example.com/"]);
    /// ```
    pub fn parse(xml: &str) -> Result<Self, String> {
        let mut reader = NsReader::from_str(xml.trim_start_matches('\u{feff}'));
        reader.config_mut().trim_text(true);

        let mut root: Option<QualifiedName> = None;
        let mut namespace = String::new();
        let mut root_closed = false;
        let mut stack: Vec<QualifiedName> = Vec::new();
        let mut open_loc: Option<(LocKind, String)> = None;
        let mut locations = Vec::new();
        let mut index_entries = 0;

        loop {
            let (resolved, event) = match reader.read_resolved_event() {
                Ok(pair) => pair,
                Err(e) => return Err(format!("malformed XML: {}", e)),
            };
            let bound = bound_namespace(&resolved)?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    if root_closed {
                        return Err("multiple root elements".to_string());
                    }

                    let name = element_name(bound.as_deref(), e);
                    if root.is_none() {
                        namespace = name.namespace.clone().ok_or_else(|| {
                            format!("root element <{}> declares no namespace", name.local)
                        })?;
                        tracing::debug!("Sitemap root element: {}", name);
                        root = Some(name.clone());
                    }

                    let is_empty = matches!(event, Event::Empty(_));
                    if is_empty {
                        if stack.is_empty() {
                            root_closed = true;
                        }
                        continue;
                    }

                    if name.is(&namespace, "loc") {
                        open_loc = match stack.last() {
                            Some(parent) if parent.is(&namespace, "url") => {
                                Some((LocKind::Page, String::new()))
                            }
                            Some(parent) if parent.is(&namespace, "sitemap") => {
                                Some((LocKind::Index, String::new()))
                            }
                            _ => None,
                        };
                    }
                    stack.push(name);
                }
                Event::End(_) => {
                    let closed = stack
                        .pop()
                        .ok_or_else(|| "unexpected closing tag".to_string())?;

                    if closed.is(&namespace, "loc") {
                        match open_loc.take() {
                            Some((LocKind::Page, text)) => {
                                let text = text.trim();
                                if !text.is_empty() {
                                    locations.push(text.to_string());
                                }
                            }
                            Some((LocKind::Index, _)) => index_entries += 1,
                            None => {}
                        }
                    }

                    if stack.is_empty() {
                        root_closed = true;
                    }
                }
                Event::Text(ref t) => {
                    if stack.is_empty() {
                        return Err("text outside the root element".to_string());
                    }
                    if let Some((_, buffer)) = open_loc.as_mut() {
                        let text = t
                            .unescape()
                            .map_err(|e| format!("invalid text in <loc>: {}", e))?;
                        buffer.push_str(&text);
                    }
                }
                Event::CData(ref c) => {
                    if stack.is_empty() {
                        return Err("CDATA outside the root element".to_string());
                    }
                    if let Some((_, buffer)) = open_loc.as_mut() {
                        buffer.push_str(&String::from_utf8_lossy(c));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let root = root.ok_or_else(|| "document has no root element".to_string())?;
        if let Some(unclosed) = stack.last() {
            return Err(format!("unclosed element <{}>", unclosed.local));
        }

        Ok(Self {
            root,
            locations,
            index_entries,
        })
    }

    /// Namespace URI declared by the root element
    pub fn namespace(&self) -> &str {
        self.root.namespace.as_deref().unwrap_or_default()
    }

    /// True when the document lists nested sitemaps but no pages
    pub fn is_index(&self) -> bool {
        self.locations.is_empty() && self.index_entries > 0
    }
}

/// Converts a resolved namespace into an owned URI
fn bound_namespace(resolved: &ResolveResult<'_>) -> Result<Option<String>, String> {
    match resolved {
        ResolveResult::Bound(Namespace(ns)) => Ok(Some(String::from_utf8_lossy(ns).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(format!(
            "unknown namespace prefix '{}'",
            String::from_utf8_lossy(prefix)
        )),
    }
}

fn element_name(namespace: Option<&str>, element: &BytesStart<'_>) -> QualifiedName {
    let local = element.local_name();
    QualifiedName::new(namespace, &String::from_utf8_lossy(local.as_ref()))
}
