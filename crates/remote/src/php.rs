//! PHP version discovery.

use panel::php::DISCOVERY_METHOD;
use panel::{Identifier, Params, PanelError, PanelResult, PhpCatalog, PhpHandler, PhpId, RemoteApi, ServerId};
use serde_json::Value;
use tracing::debug;

/// Fetches the PHP installations of `server` for `handler` and builds a
/// catalog.
///
/// The remote answers either with an object keyed by numeric id
/// (`{"11": "PHP 8.4:…"}`) or with a plain list. List entries get positional
/// ids counted from 1, since `0` is the remote's "no value" sentinel for
/// `server_php_id`.
pub async fn discover_php_versions(
    api: &dyn RemoteApi,
    server: ServerId,
    handler: &PhpHandler,
) -> PanelResult<PhpCatalog> {
    let mut params = Params::new();
    params.insert("server_id".into(), Value::from(server.get()));
    params.insert("php".into(), Value::String(handler.as_str().to_string()));

    let response = api.call(DISCOVERY_METHOD, params).await?;
    let descriptors = descriptors(response)?;
    let catalog = PhpCatalog::from_descriptors(server, handler.clone(), descriptors)?;
    debug!(
        server = %server,
        handler = %handler,
        versions = ?catalog.labels(),
        "Discovered PHP versions"
    );
    Ok(catalog)
}

fn descriptors(response: Value) -> PanelResult<Vec<(PhpId, String)>> {
    match response {
        Value::Null | Value::Bool(false) => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| -> PanelResult<(PhpId, String)> {
                Ok((PhpId::new(index as u64 + 1), descriptor(item)?))
            })
            .collect(),
        Value::Object(map) => map
            .into_iter()
            .map(|(key, item)| -> PanelResult<(PhpId, String)> {
                let id = key.trim().parse::<u64>().map_err(|_| {
                    PanelError::decoding(DISCOVERY_METHOD, format!("non-numeric PHP id {key:?}"))
                })?;
                Ok((PhpId::new(id), descriptor(item)?))
            })
            .collect(),
        other => Err(PanelError::decoding(
            DISCOVERY_METHOD,
            format!("expected a list of PHP versions, got {other}"),
        )),
    }
}

fn descriptor(item: Value) -> PanelResult<String> {
    match item {
        Value::String(s) => Ok(s),
        other => Err(PanelError::decoding(
            DISCOVERY_METHOD,
            format!("expected a PHP descriptor string, got {other}"),
        )),
    }
}
