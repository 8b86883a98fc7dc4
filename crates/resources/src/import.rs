//! Import identifiers.

use panel::{Identifier, PanelError, PanelResult};

/// Parses an import identifier (the remote's numeric record id).
///
/// Surrounding whitespace is ignored. Anything other than a positive integer
/// is a [`PanelError::Validation`] error.
pub fn import_id<T: Identifier>(raw: &str) -> PanelResult<T> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(T::from(id)),
        _ => Err(PanelError::validation(format!(
            "import identifier must be a positive integer, got {raw:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel::WebDomainId;

    #[test]
    fn parses_numeric_ids() {
        assert_eq!(import_id::<WebDomainId>(" 42 ").unwrap(), WebDomainId::new(42));
    }

    #[test]
    fn rejects_everything_else() {
        for bad in ["", "0", "-1", "abc", "4.2", "example.com"] {
            assert!(import_id::<WebDomainId>(bad).is_err(), "{bad:?}");
        }
    }
}
