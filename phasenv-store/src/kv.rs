//! Vault KV v2 client.
//!
//! # Endpoint mapping
//!
//! | Operation   | Request                                              |
//! |-------------|------------------------------------------------------|
//! | read        | `GET  <addr>/v1/<mount>/data/<project>/<phase>`      |
//! | write       | `POST <addr>/v1/<mount>/data/<project>/<phase>`      |
//! | list phases | `GET  <addr>/v1/<mount>/metadata/<project>?list=true`|
//!
//! Authentication is a bare `X-Vault-Token` header. A missing secret (404)
//! is a normal condition, not an error — a phase legitimately may have no
//! overrides yet.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::Value;

use phasenv_core::{filter_empty, EnvMap, InheritanceGraph, Phase};

use crate::error::StoreError;
use crate::{SecretStore, INHERITANCE_PATH};

/// Blocking HTTP client for a Vault KV v2 mount, scoped to one project.
pub struct VaultStore {
    agent: ureq::Agent,
    addr: String,
    token: String,
    mount: String,
    project: String,
}

#[derive(Debug, Deserialize)]
struct KvReadResponse {
    data: KvReadData,
}

#[derive(Debug, Deserialize)]
struct KvReadData {
    data: Value,
}

#[derive(Debug, Deserialize)]
struct KvListResponse {
    data: KvListData,
}

#[derive(Debug, Deserialize)]
struct KvListData {
    keys: Vec<String>,
}

impl VaultStore {
    pub fn new(addr: &str, token: &str, mount: &str, project: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            addr: addr.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
            mount: mount.to_owned(),
            project: project.to_owned(),
        }
    }

    fn data_url(&self, path: &str) -> String {
        format!("{}/v1/{}/data/{}", self.addr, self.mount, path)
    }

    fn metadata_list_url(&self) -> String {
        format!(
            "{}/v1/{}/metadata/{}?list=true",
            self.addr, self.mount, self.project
        )
    }

    /// Fetch the secret payload at `<project>/<leaf>`. `Ok(None)` means the
    /// secret does not exist.
    fn read_secret(&self, leaf: &str) -> Result<Option<Value>, StoreError> {
        let url = self.data_url(&format!("{}/{}", self.project, leaf));
        match self.agent.get(&url).set("X-Vault-Token", &self.token).call() {
            Ok(resp) => {
                let body: KvReadResponse = resp.into_json()?;
                Ok(Some(body.data.data))
            }
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(ureq::Error::Status(status, _)) => Err(StoreError::Status { status, url }),
            Err(err) => Err(StoreError::Transport(err.to_string())),
        }
    }
}

/// Flatten a KV payload into string values.
///
/// Values written by phasenv are always strings; anything else (hand-written
/// via the Vault UI, say) is kept as its compact JSON form.
fn coerce_env(value: Value) -> EnvMap {
    let Value::Object(fields) = value else {
        return EnvMap::new();
    };
    fields
        .into_iter()
        .map(|(k, v)| match v {
            Value::String(s) => (k, s),
            other => (k, other.to_string()),
        })
        .collect()
}

impl SecretStore for VaultStore {
    fn read(&self, phase: &Phase) -> EnvMap {
        match self.read_secret(phase.as_str()) {
            Ok(Some(value)) => coerce_env(value),
            Ok(None) => {
                log::debug!("no secret stored for phase '{phase}'");
                EnvMap::new()
            }
            Err(err) => {
                log::warn!("read failed for phase '{phase}': {err}; treating as empty");
                EnvMap::new()
            }
        }
    }

    fn write(&self, phase: &Phase, table: &EnvMap) -> Result<(), StoreError> {
        let data = filter_empty(table);
        let url = self.data_url(&format!("{}/{}", self.project, phase));
        let body = serde_json::json!({ "data": data });
        match self
            .agent
            .post(&url)
            .set("X-Vault-Token", &self.token)
            .send_json(body)
        {
            Ok(_) => {
                log::info!("wrote {} keys to phase '{phase}'", data.len());
                Ok(())
            }
            Err(ureq::Error::Status(status, _)) => Err(StoreError::Status { status, url }),
            Err(err) => Err(StoreError::Transport(err.to_string())),
        }
    }

    fn list_phases(&self) -> BTreeSet<String> {
        let url = self.metadata_list_url();
        let keys = match self.agent.get(&url).set("X-Vault-Token", &self.token).call() {
            Ok(resp) => match resp.into_json::<KvListResponse>() {
                Ok(body) => body.data.keys,
                Err(err) => {
                    log::warn!("phase listing decode failed: {err}");
                    return BTreeSet::new();
                }
            },
            Err(ureq::Error::Status(404, _)) => return BTreeSet::new(),
            Err(err) => {
                log::warn!("phase listing failed: {err}");
                return BTreeSet::new();
            }
        };
        keys.into_iter()
            .filter(|k| !k.ends_with('/') && k != INHERITANCE_PATH)
            .collect()
    }

    fn inheritance_graph(&self) -> InheritanceGraph {
        match self.read_secret(INHERITANCE_PATH) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(graph) => graph,
                Err(err) => {
                    log::warn!("inheritance graph parse failed: {err}; using empty graph");
                    InheritanceGraph::new()
                }
            },
            Ok(None) => InheritanceGraph::new(),
            Err(err) => {
                log::warn!("inheritance graph read failed: {err}; using empty graph");
                InheritanceGraph::new()
            }
        }
    }
}
