//! Persisted-state upgrader.
//!
//! Older state stored boolean attributes in the remote's `"y"`/`"n"` wire
//! form. Current state stores native booleans. Each resource declares an
//! ordered list of [`StateUpgrade`] steps; [`upgrade_state`] applies every
//! step from the stored schema version onward.

use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::{PanelError, PanelResult};

/// Rewrites a wire-form boolean at `field` to a native boolean.
///
/// | Stored value | Result |
/// |--------------|--------|
/// | absent, `null` | `default` |
/// | `"y"`, `"Y"` | `true` |
/// | `"n"`, `"N"` | `false` |
/// | any other string, including `""` | `default` |
/// | native boolean | unchanged |
/// | anything else | [`PanelError::Migration`] |
///
/// The `""` row differs from the remote's own reading, where only `"y"` is
/// true and every other string, `""` included, is false. An empty stored
/// value means the attribute was never set, so it takes the schema default
/// here rather than silently turning a default-on flag off.
pub fn upgrade_wire_bool(state: &mut Map<String, Value>, field: &str, default: bool) -> PanelResult<()> {
    let upgraded = match state.get(field) {
        None | Some(Value::Null) => default,
        Some(Value::Bool(_)) => return Ok(()),
        Some(Value::String(s)) => match s.as_str() {
            "y" | "Y" => true,
            "n" | "N" => false,
            _ => default,
        },
        Some(other) => {
            return Err(PanelError::Migration {
                field: field.to_string(),
                message: format!("expected a wire boolean, found {other}"),
            })
        }
    };
    state.insert(field.to_string(), Value::Bool(upgraded));
    Ok(())
}

/// One boolean field rewritten by an upgrade step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolFieldUpgrade {
    pub field: &'static str,
    pub default: bool,
}

/// Migration of a resource's state from `from_version` to `from_version + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateUpgrade {
    pub from_version: u32,
    pub bool_fields: &'static [BoolFieldUpgrade],
}

impl StateUpgrade {
    fn apply(&self, state: &mut Map<String, Value>) -> PanelResult<()> {
        for upgrade in self.bool_fields {
            upgrade_wire_bool(state, upgrade.field, upgrade.default)?;
        }
        Ok(())
    }
}

/// Applies every step in `upgrades` whose version is at or after
/// `from_version`, in order, and returns the resulting schema version.
///
/// State already at the latest version is returned untouched.
pub fn upgrade_state(
    upgrades: &[StateUpgrade],
    from_version: u32,
    state: &mut Map<String, Value>,
) -> PanelResult<u32> {
    let mut version = from_version;
    let mut steps: Vec<&StateUpgrade> = upgrades
        .iter()
        .filter(|step| step.from_version >= from_version)
        .collect();
    steps.sort_by_key(|step| step.from_version);
    for step in steps {
        debug!(from = step.from_version, to = step.from_version + 1, "Upgrading stored state");
        step.apply(state)?;
        version = step.from_version + 1;
    }
    Ok(version)
}
