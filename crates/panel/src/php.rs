//! PHP version catalog.
//!
//! The remote identifies PHP installations by an opaque numeric id
//! (`server_php_id`) that differs per server and per handler type. Users
//! think in version labels (`"8.2"`). A [`PhpCatalog`] is the bidirectional
//! mapping for one (server, handler) pair, built from the descriptors the
//! remote returns for `server_get_php_versions`.
//!
//! Descriptors look like `"PHP 8.4:/usr/bin/php8.4:…"`; only the name segment
//! before the first colon is used, with the `PHP ` prefix removed.

use std::collections::BTreeMap;

use crate::errors::{PanelError, PanelResult};
use crate::identifiers::{Identifier, PhpId, ServerId};

/// Method that lists PHP installations of a server.
pub const DISCOVERY_METHOD: &str = "server_get_php_versions";

const LABEL_PREFIX: &str = "php ";

// ---------------------------------------------------------------------------
// PhpHandler
// ---------------------------------------------------------------------------

/// PHP handler type of a hosting domain (`php-fpm`, `fast-cgi`, `hhvm`, …).
///
/// Stored verbatim; the remote validates the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhpHandler(String);

impl PhpHandler {
    /// Handler used when a domain does not name one.
    pub const DEFAULT: &'static str = "php-fpm";

    pub fn new(handler: impl Into<String>) -> Self {
        Self(handler.into())
    }

    /// Returns the given handler, or [`Self::DEFAULT`] when `None` or blank.
    pub fn or_default(handler: Option<&str>) -> Self {
        match handler.map(str::trim) {
            Some(h) if !h.is_empty() => Self::new(h),
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PhpHandler {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl std::fmt::Display for PhpHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Descriptor parsing
// ---------------------------------------------------------------------------

/// Extracts the version label from a remote descriptor.
///
/// `"PHP 8.4:/usr/bin/php-cgi8.4:…"` yields `"8.4"`. The prefix match is
/// case-insensitive. A descriptor without the prefix, or with nothing after
/// it, is a [`PanelError::Decoding`] error.
pub fn parse_descriptor(descriptor: &str) -> PanelResult<String> {
    let name = descriptor.split(':').next().unwrap_or_default().trim();
    let has_prefix = name
        .get(..LABEL_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(LABEL_PREFIX));
    if !has_prefix {
        return Err(PanelError::decoding(
            DISCOVERY_METHOD,
            format!("PHP descriptor without 'PHP ' prefix: {descriptor:?}"),
        ));
    }
    let label = name[LABEL_PREFIX.len()..].trim();
    if label.is_empty() {
        return Err(PanelError::decoding(
            DISCOVERY_METHOD,
            format!("PHP descriptor without a version label: {descriptor:?}"),
        ));
    }
    Ok(label.to_string())
}

// ---------------------------------------------------------------------------
// PhpCatalog
// ---------------------------------------------------------------------------

/// Label ↔ id mapping of the PHP installations for one (server, handler).
///
/// Immutable once built. When two ids carry the same label the first one
/// inserted keeps the label.
///
/// Ids are whatever discovery supplied: the remote's own keys for a keyed
/// response, or 1-based positions for a plain list. Id `0` never appears;
/// the record layer decodes it as "unset".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhpCatalog {
    server: ServerId,
    handler: PhpHandler,
    by_label: BTreeMap<String, PhpId>,
    by_id: BTreeMap<PhpId, String>,
}

impl PhpCatalog {
    /// Builds a catalog from `(id, descriptor)` pairs.
    ///
    /// Any malformed descriptor, or an id of `0`, fails the whole catalog.
    pub fn from_descriptors<I, S>(
        server: ServerId,
        handler: PhpHandler,
        descriptors: I,
    ) -> PanelResult<Self>
    where
        I: IntoIterator<Item = (PhpId, S)>,
        S: AsRef<str>,
    {
        let mut catalog = Self {
            server,
            handler,
            by_label: BTreeMap::new(),
            by_id: BTreeMap::new(),
        };
        for (id, descriptor) in descriptors {
            if id.is_unset() {
                return Err(PanelError::decoding(
                    DISCOVERY_METHOD,
                    format!("PHP installation {:?} has id 0", descriptor.as_ref()),
                ));
            }
            let label = parse_descriptor(descriptor.as_ref())?;
            catalog.by_label.entry(label.clone()).or_insert(id);
            catalog.by_id.insert(id, label);
        }
        Ok(catalog)
    }

    pub fn server(&self) -> ServerId {
        self.server
    }

    pub fn handler(&self) -> &PhpHandler {
        &self.handler
    }

    /// Whether this catalog was built for `(server, handler)`.
    pub fn matches(&self, server: ServerId, handler: &PhpHandler) -> bool {
        self.server == server && &self.handler == handler
    }

    /// Known labels, sorted.
    pub fn labels(&self) -> Vec<&str> {
        self.by_label.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Resolves a version label to its id.
    ///
    /// An unknown label is a [`PanelError::Validation`] error listing every
    /// available label.
    pub fn to_id(&self, label: &str) -> PanelResult<PhpId> {
        self.by_label.get(label.trim()).copied().ok_or_else(|| {
            let available = if self.by_label.is_empty() {
                "none".to_string()
            } else {
                self.labels().join(", ")
            };
            PanelError::validation(format!(
                "PHP version {label:?} is not available on server {} for handler {}; available: {available}",
                self.server, self.handler
            ))
        })
    }

    /// Resolves an id back to its label. `None` when unknown.
    pub fn to_label(&self, id: PhpId) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog() -> PhpCatalog {
        PhpCatalog::from_descriptors(
            ServerId::new(1),
            PhpHandler::default(),
            [
                (PhpId::new(11), "PHP 8.4:/usr/bin/php-cgi8.4:/etc/php/8.4/cgi"),
                (PhpId::new(3), "PHP 7.4:/usr/bin/php-cgi7.4"),
                (PhpId::new(7), "php 8.2"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn parses_descriptor_label() {
        assert_eq!(parse_descriptor("PHP 8.4:/usr/bin/php8.4:x").unwrap(), "8.4");
        assert_eq!(parse_descriptor("  Php 8.1 :a").unwrap(), "8.1");
    }

    #[test]
    fn rejects_descriptor_without_prefix_or_label() {
        for bad in ["8.4:/usr/bin/php", "PHP :x", "PHP", "", "Python 3"] {
            let err = parse_descriptor(bad).unwrap_err();
            assert!(matches!(err, PanelError::Decoding { .. }), "{bad:?}");
        }
    }

    #[test]
    fn maps_in_both_directions() {
        let catalog = catalog();
        assert_eq!(catalog.to_id("8.4").unwrap(), PhpId::new(11));
        assert_eq!(catalog.to_label(PhpId::new(3)), Some("7.4"));
        assert_eq!(catalog.to_label(PhpId::new(99)), None);
        assert_eq!(catalog.labels(), vec!["7.4", "8.2", "8.4"]);
    }

    #[test]
    fn unknown_label_lists_available_versions() {
        let err = catalog().to_id("5.6").unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, PanelError::Validation { .. }));
        assert!(message.contains("\"5.6\""), "{message}");
        assert!(message.contains("7.4, 8.2, 8.4"), "{message}");
    }

    #[test]
    fn first_duplicate_label_wins() {
        let catalog = PhpCatalog::from_descriptors(
            ServerId::new(1),
            PhpHandler::default(),
            [(PhpId::new(4), "PHP 8.2"), (PhpId::new(9), "PHP 8.2:alt")],
        )
        .unwrap();
        assert_eq!(catalog.to_id("8.2").unwrap(), PhpId::new(4));
        assert_eq!(catalog.to_label(PhpId::new(9)), Some("8.2"));
    }

    #[test]
    fn rejects_zero_id() {
        let err = PhpCatalog::from_descriptors(
            ServerId::new(1),
            PhpHandler::default(),
            [(PhpId::new(0), "PHP 7.4"), (PhpId::new(1), "PHP 8.2")],
        )
        .unwrap_err();
        assert!(matches!(err, PanelError::Decoding { .. }));
    }

    #[test]
    fn every_label_round_trips_through_its_id() {
        let catalog = catalog();
        for label in catalog.labels() {
            let id = catalog.to_id(label).unwrap();
            assert_eq!(catalog.to_label(id), Some(label));
        }
    }

    #[test]
    fn handler_defaults_to_fpm() {
        assert_eq!(PhpHandler::or_default(None).as_str(), "php-fpm");
        assert_eq!(PhpHandler::or_default(Some(" ")).as_str(), "php-fpm");
        assert_eq!(PhpHandler::or_default(Some("fast-cgi")).as_str(), "fast-cgi");
    }

    #[test]
    fn matches_server_and_handler() {
        let catalog = catalog();
        assert!(catalog.matches(ServerId::new(1), &PhpHandler::default()));
        assert!(!catalog.matches(ServerId::new(2), &PhpHandler::default()));
        assert!(!catalog.matches(ServerId::new(1), &PhpHandler::new("fast-cgi")));
    }
}
