//! Namespace maps, per-node namespace state and prefix handling.
//!
//! Element and attribute names may embed a namespace prefix as a leading
//! `prefix_` token, e.g. `wsa_Action`. A token only counts as a prefix if it
//! is declared in the owning node's [`NsMap`]; otherwise the underscore is
//! part of the plain name.

use std::collections::BTreeMap;

/// Upper bound for the prefix scan: ten characters of prefix plus the
/// separator itself.
pub const NS_PREFIX_MAX_LEN: usize = 11;

const SEPARATOR: char = '_';

/// Mapping from namespace prefix to namespace URI.
///
/// Merges are additive; a later entry overwrites an earlier one with the
/// same prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NsMap {
    map: BTreeMap<String, String>,
}

impl NsMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one or more prefix/URI pairs into the map
    pub fn merge<K, V, I>(&mut self, pairs: I)
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (prefix, uri) in pairs {
            self.map.insert(prefix.into(), uri.into());
        }
    }

    /// URI declared for a prefix, if any
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.map.get(prefix).map(String::as_str)
    }

    /// Whether the prefix is declared
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.map.contains_key(prefix)
    }

    /// First declared prefix bound to the given URI, in prefix order
    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.map
            .iter()
            .find(|(_, v)| v.as_str() == uri)
            .map(|(k, _)| k.as_str())
    }

    /// Iterate over (prefix, URI) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of declared prefixes
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map has no declarations
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NsMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = NsMap::new();
        map.merge(iter);
        map
    }
}

/// Per-node namespace state: the resolved URI, the prefix to render it
/// with, and whether it acts as the default namespace that unprefixed
/// descendant elements inherit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NsInfo {
    /// Resolved namespace URI. `Some("")` means "explicitly no namespace"
    /// and still blocks inheritance from ancestors.
    pub uri: Option<String>,
    /// Prefix the URI renders with, declared or synthesized
    pub prefix: Option<String>,
    /// Whether unprefixed child elements inherit this namespace
    pub is_default: bool,
}

impl NsInfo {
    /// Whether a namespace is attached at all
    pub fn is_set(&self) -> bool {
        self.uri.is_some()
    }

    /// Whether the URI names an actual namespace (set and non-empty)
    pub fn has_uri(&self) -> bool {
        self.uri.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Split a raw name into its declared prefix and local part.
///
/// The separator is looked for within the first [`NS_PREFIX_MAX_LEN`]
/// characters only; the candidate before it must be declared in `map`.
pub fn split_prefix<'a>(name: &'a str, map: &NsMap) -> Option<(&'a str, &'a str)> {
    let sep_idx = name
        .char_indices()
        .take(NS_PREFIX_MAX_LEN)
        .find(|&(_, c)| c == SEPARATOR)
        .map(|(i, _)| i)?;
    if sep_idx == 0 {
        return None;
    }
    let prefix = &name[..sep_idx];
    if map.contains_prefix(prefix) {
        Some((prefix, &name[sep_idx + 1..]))
    } else {
        None
    }
}

/// Local part of a raw name, with any declared prefix stripped
pub fn local_name<'a>(name: &'a str, map: &NsMap) -> &'a str {
    match split_prefix(name, map) {
        Some((_, local)) => local,
        None => name,
    }
}

/// Display form of a raw name: `prefix:local` when a declared prefix is
/// embedded, the name itself otherwise
pub fn qualified_name(name: &str, map: &NsMap) -> String {
    match split_prefix(name, map) {
        Some((prefix, local)) => format!("{}:{}", prefix, local),
        None => name.to_string(),
    }
}

/// Well-known namespace (prefix, URI) pairs, consumable by [`NsMap::merge`].
pub mod well_known {
    /// XML decryption
    pub const DECR: (&str, &str) = ("decr", "http://www.w3.org/2002/07/decrypt#");
    /// XML digital signatures
    pub const DSIG: (&str, &str) = ("dsig", "http://www.w3.org/2000/09/xmldsig#");
    /// XSL formatting objects
    pub const FO: (&str, &str) = ("fo", "http://www.w3.org/1999/XSL/Format");
    /// HL7 v3
    pub const HL7: (&str, &str) = ("hl7", "urn:hl7-org:v3");
    /// XHTML
    pub const HTML: (&str, &str) = ("html", "http://www.w3.org/1999/xhtml");
    /// SOAP 1.1 envelope
    pub const S11: (&str, &str) = ("s11", "http://schemas.xmlsoap.org/soap/envelope/");
    /// SOAP 1.2 envelope
    pub const S12: (&str, &str) = ("s12", "http://www.w3.org/2003/05/soap-envelope");
    /// WS-Addressing
    pub const WSA: (&str, &str) = ("wsa", "http://www.w3.org/2005/08/addressing");
    /// WSDL 1.1
    pub const WSDL11: (&str, &str) = ("wsdl11", "http://schemas.xmlsoap.org/wsdl/");
    /// WSDL 2.0
    pub const WSDL20: (&str, &str) = ("wsdl20", "http://www.w3.org/ns/wsdl");
    /// XML encryption
    pub const XENC: (&str, &str) = ("xenc", "http://www.w3.org/2001/04/xmlenc#");
    /// XInclude
    pub const XI: (&str, &str) = ("xi", "http://www.w3.org/2001/XInclude");
    /// XML key management
    pub const XKMS: (&str, &str) = ("xkms", "http://www.w3.org/2002/03/xkms#");
    /// The xml: namespace
    pub const XML: (&str, &str) = ("xml", "http://www.w3.org/XML/1998/namespace");
    /// XML-binary optimized packaging
    pub const XOP: (&str, &str) = ("xop", "http://www.w3.org/2004/08/xop/include");
    /// XML Schema
    pub const XS: (&str, &str) = ("xs", "http://www.w3.org/2001/XMLSchema");
    /// XSL transformations
    pub const XSL: (&str, &str) = ("xsl", "http://www.w3.org/1999/XSL/Transform");
}
