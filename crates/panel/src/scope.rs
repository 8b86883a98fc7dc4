//! Default resolution chain for scope fields.
//!
//! Some settings (the owning client, the target server) can be given on the
//! record itself, inherited from a parent record, or fall back to a
//! provider-wide default. [`ScopeChain`] evaluates those candidates in that
//! order and picks the first one that is set. Zero identifiers count as unset,
//! matching the remote's own sentinel.
//!
//! ```
//! use panel::identifiers::ServerId;
//! use panel::scope::{ScopeChain, ScopeField};
//!
//! let server = ScopeChain::new(ScopeField::ServerId)
//!     .resource(None)
//!     .parent(Some(ServerId::new(0)))
//!     .global(Some(ServerId::new(3)))
//!     .require()
//!     .unwrap();
//! assert_eq!(server, ServerId::new(3));
//! ```

use crate::errors::{PanelError, PanelResult};
use crate::identifiers::{ClientId, Identifier, ServerId};

/// Scope fields that participate in default resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeField {
    ClientId,
    ServerId,
}

impl ScopeField {
    /// Name of the field on the wire and in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClientId => "client_id",
            Self::ServerId => "server_id",
        }
    }

    fn env_var(self) -> &'static str {
        match self {
            Self::ClientId => "ISPCONFIG_CLIENT_ID",
            Self::ServerId => "ISPCONFIG_SERVER_ID",
        }
    }
}

impl std::fmt::Display for ScopeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-wide fallback values, the last level of every chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderDefaults {
    pub client_id: Option<ClientId>,
    pub server_id: Option<ServerId>,
}

/// Ordered candidates for one scope field: resource, parent, global.
#[derive(Debug, Clone, Copy)]
pub struct ScopeChain<T: Identifier> {
    field: ScopeField,
    resource: Option<T>,
    parent: Option<T>,
    global: Option<T>,
}

impl<T: Identifier> ScopeChain<T> {
    pub fn new(field: ScopeField) -> Self {
        Self {
            field,
            resource: None,
            parent: None,
            global: None,
        }
    }

    /// Value set on the record itself.
    pub fn resource(mut self, value: Option<T>) -> Self {
        self.resource = value;
        self
    }

    /// Value inherited from the parent record.
    pub fn parent(mut self, value: Option<T>) -> Self {
        self.parent = value;
        self
    }

    /// Provider-wide default.
    pub fn global(mut self, value: Option<T>) -> Self {
        self.global = value;
        self
    }

    /// Whether the parent level would be consulted.
    ///
    /// Callers use this to skip fetching the parent record when the resource
    /// level already answers.
    pub fn needs_parent(&self) -> bool {
        set(self.resource).is_none()
    }

    /// First set candidate, if any.
    pub fn resolve(&self) -> Option<T> {
        set(self.resource)
            .or_else(|| set(self.parent))
            .or_else(|| set(self.global))
    }

    /// First set candidate, or [`PanelError::Configuration`] naming the field.
    pub fn require(&self) -> PanelResult<T> {
        self.resolve().ok_or_else(|| PanelError::Configuration {
            field: self.field.as_str().to_string(),
            message: format!(
                "{} is not set on the resource, its parent or the provider (set {})",
                self.field,
                self.field.env_var()
            ),
        })
    }
}

fn set<T: Identifier>(value: Option<T>) -> Option<T> {
    value.filter(|v| !v.is_unset())
}
