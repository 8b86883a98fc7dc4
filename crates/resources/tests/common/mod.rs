//! Scripted in-memory [`RemoteApi`] shared by the reconciler tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use panel::{ClientId, Params, PanelError, PanelResult, ProviderDefaults, RemoteApi, ServerId};
use resources::ResourceContext;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
enum Reply {
    Ok(Value),
    Fault(String),
}

/// Answers each method from its own queue. The last queued reply repeats.
#[derive(Debug, Default)]
pub struct FakeApi {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<(String, Params)>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues a successful `response` for `method`.
    pub fn respond(&self, method: &str, response: Value) -> &Self {
        self.push(method, Reply::Ok(response))
    }

    /// Queues a remote fault for `method`.
    pub fn fail(&self, method: &str, message: &str) -> &Self {
        self.push(method, Reply::Fault(message.to_string()))
    }

    /// Params of every call made to `method`, in order.
    pub fn calls_to(&self, method: &str) -> Vec<Params> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }

    /// Method names in call order.
    pub fn methods(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }

    fn push(&self, method: &str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(reply);
        self
    }
}

#[async_trait]
impl RemoteApi for FakeApi {
    async fn call(&self, method: &str, params: Params) -> PanelResult<Value> {
        self.calls.lock().unwrap().push((method.to_string(), params));

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            let queue = replies.get_mut(method);
            match queue {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Ok(value)) => Ok(value),
            Some(Reply::Fault(message)) => Err(PanelError::Protocol {
                method: method.to_string(),
                code: "remote_fault".into(),
                message,
            }),
            None => Err(PanelError::Protocol {
                method: method.to_string(),
                code: "remote_fault".into(),
                message: format!("no scripted reply for {method}"),
            }),
        }
    }
}

/// Context with provider defaults `client_id = 2`, `server_id = 1`.
pub fn context(api: &Arc<FakeApi>) -> ResourceContext {
    context_with(api, Some(2), Some(1))
}

pub fn context_with(api: &Arc<FakeApi>, client: Option<u64>, server: Option<u64>) -> ResourceContext {
    ResourceContext::new(
        api.clone(),
        ProviderDefaults {
            client_id: client.map(ClientId::new),
            server_id: server.map(ServerId::new),
        },
    )
}

/// A hosting domain as `sites_web_domain_get` returns it.
pub fn web_domain(id: u64, server: u64, document_root: &str) -> Value {
    json!({
        "domain_id": id.to_string(),
        "server_id": server.to_string(),
        "domain": "example.com",
        "type": "vhost",
        "document_root": document_root,
        "system_user": format!("web{id}"),
        "system_group": "client2",
        "active": "y",
        "cgi": "n",
        "ssi": "n",
        "perl": "n",
        "ruby": "n",
        "python": "n",
        "suexec": "y",
        "ssl": "n",
        "php": "php-fpm",
        "server_php_id": "0",
        "parent_domain_id": "0",
        "disable_symlinknotowner": "n"
    })
}
