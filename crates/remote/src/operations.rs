//! Typed add / get / update / delete over one method family.
//!
//! [`Operations<E>`] turns the loosely typed RPC surface into typed calls for
//! entity kind `E`:
//!
//! | Call | Method | Parameters |
//! |------|--------|------------|
//! | [`Operations::add`] | `<prefix>_add` | `{client_id, params}` |
//! | [`Operations::get`] | `<prefix>_get` | `{<id param>}` |
//! | [`Operations::update`] | `<prefix>_update` | `{client_id, <id param>, params}` |
//! | [`Operations::delete`] | `<prefix>_delete` | `{<id param>}` |
//! | [`Operations::list`] | `<prefix>_get_all` | `{}` |
//!
//! Every failure is wrapped in [`PanelError::Operation`] with the action,
//! the entity kind and the id.

use std::marker::PhantomData;
use std::sync::Arc;

use panel::wire::flex::decode_flex_int;
use panel::{ClientId, Entity, Identifier, ManagedEntity, Params, PanelError, PanelResult, RemoteApi};
use serde_json::Value;
use tracing::debug;

/// Operation set for entity kind `E`.
pub struct Operations<E> {
    api: Arc<dyn RemoteApi>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Operations<E> {
    fn clone(&self) -> Self {
        Self::new(self.api.clone())
    }
}

impl<E> Operations<E> {
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self {
            api,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Operations<E> {
    /// Reads one record.
    ///
    /// An empty payload (`[]`, `{}`, `false`, `null`) is
    /// [`PanelError::NotFound`]. For families that wrap the record in a
    /// one-element array the wrapper is removed.
    pub async fn get(&self, id: E::Id) -> PanelResult<E> {
        self.fetch(id)
            .await
            .map_err(|e| e.in_operation("get", E::KIND, Some(id.get())))
    }

    /// Reads every record of this family visible to the session.
    pub async fn list(&self) -> PanelResult<Vec<E>> {
        self.fetch_all()
            .await
            .map_err(|e| e.in_operation("list", E::KIND, None))
    }

    async fn fetch(&self, id: E::Id) -> PanelResult<E> {
        let method = E::method("get");
        let response = self.api.call(&method, id_params::<E>(id)).await?;
        decode_record::<E>(&method, id, response)
    }

    async fn fetch_all(&self) -> PanelResult<Vec<E>> {
        let method = E::method("get_all");
        match self.api.call(&method, Params::new()).await? {
            Value::Null | Value::Bool(false) => Ok(Vec::new()),
            Value::Array(items) => items
                .into_iter()
                .map(|item| decode::<E>(&method, item))
                .collect(),
            Value::Object(map) => map
                .into_iter()
                .map(|(_, item)| decode::<E>(&method, item))
                .collect(),
            other => Err(PanelError::decoding(
                &method,
                format!("expected a list of records, got {other}"),
            )),
        }
    }
}

impl<E: ManagedEntity> Operations<E> {
    /// Creates a record owned by `client_id` and returns the remote-assigned id.
    pub async fn add(&self, record: &E, client_id: ClientId) -> PanelResult<E::Id> {
        let id = self
            .create(record, client_id)
            .await
            .map_err(|e| e.in_operation("add", E::KIND, None))?;
        debug!(kind = %E::KIND, %id, "Record created");
        Ok(id)
    }

    /// Replaces the fields present in `record`.
    pub async fn update(&self, id: E::Id, client_id: ClientId, record: &E) -> PanelResult<()> {
        self.replace(id, client_id, record)
            .await
            .map_err(|e| e.in_operation("update", E::KIND, Some(id.get())))
    }

    /// Deletes a record. A missing record surfaces as the remote's error.
    pub async fn delete(&self, id: E::Id) -> PanelResult<()> {
        let method = E::method("delete");
        self.api
            .call(&method, id_params::<E>(id))
            .await
            .map(|_| ())
            .map_err(|e| e.in_operation("delete", E::KIND, Some(id.get())))
    }

    async fn create(&self, record: &E, client_id: ClientId) -> PanelResult<E::Id> {
        let method = E::method("add");
        let mut params = Params::new();
        params.insert("client_id".into(), Value::from(client_id.get()));
        params.insert("params".into(), encode(&method, record)?);
        let response = self.api.call(&method, params).await?;
        decode_new_id::<E>(&method, &response)
    }

    async fn replace(&self, id: E::Id, client_id: ClientId, record: &E) -> PanelResult<()> {
        let method = E::method("update");
        let mut params = id_params::<E>(id);
        params.insert("client_id".into(), Value::from(client_id.get()));
        params.insert("params".into(), encode(&method, record)?);
        self.api.call(&method, params).await.map(|_| ())
    }
}

fn id_params<E: Entity>(id: E::Id) -> Params {
    let mut params = Params::new();
    params.insert(E::ID_PARAM.into(), Value::from(id.get()));
    params
}

fn encode<E: ManagedEntity>(method: &str, record: &E) -> PanelResult<Value> {
    serde_json::to_value(record)
        .map_err(|e| PanelError::decoding(method, format!("cannot encode record: {e}")))
}

fn decode<E: Entity>(method: &str, value: Value) -> PanelResult<E> {
    serde_json::from_value(value).map_err(|e| PanelError::decoding(method, e.to_string()))
}

fn decode_record<E: Entity>(method: &str, id: E::Id, response: Value) -> PanelResult<E> {
    let not_found = || PanelError::NotFound {
        kind: E::KIND,
        id: id.get(),
    };
    match response {
        Value::Null | Value::Bool(false) => Err(not_found()),
        Value::Object(map) if map.is_empty() => Err(not_found()),
        Value::Object(map) => decode(method, Value::Object(map)),
        Value::Array(items) if items.is_empty() => Err(not_found()),
        Value::Array(mut items) if E::WRAPPED_GET && items.len() == 1 => {
            decode(method, items.remove(0))
        }
        Value::Array(items) => Err(PanelError::decoding(
            method,
            format!("expected a single record, got an array of {}", items.len()),
        )),
        other => Err(PanelError::decoding(
            method,
            format!("expected a record, got {other}"),
        )),
    }
}

fn decode_new_id<E: Entity>(method: &str, response: &Value) -> PanelResult<E::Id> {
    let raw = decode_flex_int(response)
        .map_err(|e| PanelError::decoding(method, format!("invalid identifier: {e}")))?;
    match u64::try_from(raw) {
        Ok(id) if id > 0 => Ok(E::Id::from(id)),
        _ => Err(PanelError::decoding(
            method,
            format!("remote returned a non-positive identifier: {raw}"),
        )),
    }
}
