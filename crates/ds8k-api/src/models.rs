// DS8000 REST payload types
//
// Each resource struct lists exactly the attributes worth surfacing.
// Anything else the array sends (`link` objects, nested sub-collection
// links, placeholder empty strings) is dropped during deserialization,
// so these structs double as the per-kind output schema.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Envelope ────────────────────────────────────────────────────────

/// The `server` block present on every response, and the shape of a
/// per-item result inside batch responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub status: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl ServerStatus {
    pub fn is_failed(&self) -> bool {
        self.status.eq_ignore_ascii_case("failed")
    }
}

/// `{"request": {"params": {...}}}` wrapper used by every write call.
#[derive(Debug, Serialize)]
pub(crate) struct RequestBody<'a, P: Serialize> {
    pub request: RequestParams<'a, P>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestParams<'a, P: Serialize> {
    pub params: &'a P,
}

impl<'a, P: Serialize> RequestBody<'a, P> {
    pub(crate) fn new(params: &'a P) -> Self {
        Self {
            request: RequestParams { params },
        }
    }
}

/// One element of a batch create response.
///
/// The array answers a multi-object request with a success status even
/// when individual objects failed; failed objects come back as a bare
/// status block in place of the representation.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BatchItem<T> {
    Status(ServerStatus),
    Object(T),
}

impl<T> BatchItem<T> {
    /// The failure block, if this item failed.
    pub fn failure(&self) -> Option<&ServerStatus> {
        match self {
            Self::Status(s) if s.is_failed() => Some(s),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<T> {
        match self {
            Self::Object(obj) => Some(obj),
            Self::Status(_) => None,
        }
    }
}

// ── Field helpers ───────────────────────────────────────────────────

/// Empty strings are the array's way of saying "unset". Scalars that
/// some firmware levels send unquoted are kept as their text.
fn opt_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Some(v.to_string()),
        _ => None,
    })
}

/// Nested references arrive either as a plain id/name string or as an
/// object such as `{"id": "P1", "link": {...}}` / `{"name": "h1", ...}`.
fn opt_ref<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RefRepr {
        Plain(String),
        Object {
            #[serde(default)]
            id: Option<String>,
            #[serde(default)]
            name: Option<String>,
        },
    }

    let raw = Option::<RefRepr>::deserialize(de)?;
    Ok(match raw {
        Some(RefRepr::Plain(s)) => Some(s),
        Some(RefRepr::Object { id, name }) => id.or(name),
        None => None,
    }
    .filter(|s| !s.is_empty()))
}

/// Session lists arrive as a JSON array, a comma-separated string, or "".
fn string_list<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListRepr {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Option::<ListRepr>::deserialize(de)? {
        Some(ListRepr::List(items)) => items,
        Some(ListRepr::Joined(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        None => Vec::new(),
    })
}

// ── Resources ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub name: String,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub hosttype: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub addrmode: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub addrdiscovery: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub lbs: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPort {
    pub wwpn: String,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "opt_ref", skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub hosttype: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub addrdiscovery: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub lbs: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub wwnn: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub login_type: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub logical_path_established: Option<String>,
}

impl HostPort {
    /// `true` when the port has never been bound to a host.
    pub fn is_unconfigured(&self) -> bool {
        self.state
            .as_deref()
            .is_some_and(|s| s.to_ascii_lowercase().contains("unconfigured"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub datastate: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub configstate: Option<String>,
    #[serde(
        rename = "deviceMTM",
        default,
        deserialize_with = "opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub device_mtm: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub volser: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub stgtype: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub cap: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub allocmethod: Option<String>,
    #[serde(default, deserialize_with = "opt_ref", skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
    #[serde(default, deserialize_with = "opt_ref", skip_serializing_if = "Option::is_none")]
    pub lss: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub stgtype: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub cap: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub capalloc: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub capavail: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub overprovisioned: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub easytier: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub tieralloc: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub threshold: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub real_capacity_allocated_on_ese: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub virtual_capacity_allocated_on_ese: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lss {
    pub id: String,
    #[serde(rename = "type", default)]
    pub lss_type: String,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub addrgrp: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub sub_system_identifier: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub ckd_base_cu_type: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub configvols: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroup {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub cs_global: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub pass_global: Option<String>,
    #[serde(default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub gm_masters: Vec<String>,
    #[serde(default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub gm_sessions: Vec<String>,
}

/// A managed (RAID) array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marray {
    pub id: String,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub disk_class: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub raidtype: Option<String>,
    #[serde(
        rename = "DA_pair",
        default,
        deserialize_with = "opt_ref",
        skip_serializing_if = "Option::is_none"
    )]
    pub da_pair: Option<String>,
    #[serde(default, deserialize_with = "opt_ref", skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
}

/// A volume-to-host mapping as listed under `/hosts/{name}/mappings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub lunid: String,
    #[serde(default, deserialize_with = "opt_ref", skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
}

// ── Request params ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct CreateHost {
    pub name: String,
    pub hosttype: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateHostPort {
    pub wwpn: String,
    pub host: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateHostPort {
    pub host: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateVolumes {
    pub name: String,
    pub cap: String,
    pub captype: String,
    pub stgtype: String,
    pub pool: String,
    pub tp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<String>,
}

/// Alias allocation request for one CKD base volume.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAliases {
    pub alias_id: String,
    pub quantity: u32,
    pub order: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapVolumes {
    pub volumes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateLss {
    pub id: String,
    #[serde(rename = "type")]
    pub lss_type: String,
    pub sub_system_identifier: String,
    pub ckd_base_cu_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateResourceGroup {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateResourceGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cs_global: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_global: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gm_masters: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gm_sessions: Option<Vec<String>>,
}

impl UpdateResourceGroup {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unquoted_scalars_become_text() {
        let lss: Lss = serde_json::from_value(json!({
            "id": "10",
            "type": "ckd",
            "configvols": 4,
        }))
        .unwrap();
        assert_eq!(lss.configvols.as_deref(), Some("4"));
    }

    #[test]
    fn host_port_drops_links_and_flattens_host() {
        let port: HostPort = serde_json::from_value(json!({
            "wwpn": "10000000C9A1BAB2",
            "link": {"rel": "self", "href": "https://hmc/api/v1/host_ports/10000000C9A1BAB2"},
            "state": "logged in",
            "hosttype": "",
            "host": {"name": "h2", "link": {"rel": "self", "href": "x"}},
        }))
        .unwrap();

        assert_eq!(port.host.as_deref(), Some("h2"));
        assert_eq!(port.hosttype, None);
        assert!(!port.is_unconfigured());
        let out = serde_json::to_value(&port).unwrap();
        assert!(out.get("link").is_none());
    }

    #[test]
    fn unbound_host_port_has_no_host() {
        let port: HostPort = serde_json::from_value(json!({
            "wwpn": "10000000C9A1BAB2",
            "state": "unconfigured",
            "host": "",
        }))
        .unwrap();
        assert_eq!(port.host, None);
        assert!(port.is_unconfigured());
    }

    #[test]
    fn volume_refs_accept_objects() {
        let vol: Volume = serde_json::from_value(json!({
            "id": "1000",
            "name": "db",
            "deviceMTM": "2107-900",
            "pool": {"id": "P1", "link": {}},
            "lss": {"id": "10", "link": {}},
            "volumes": {"link": {}},
        }))
        .unwrap();
        assert_eq!(vol.pool.as_deref(), Some("P1"));
        assert_eq!(vol.lss.as_deref(), Some("10"));
        assert_eq!(vol.device_mtm.as_deref(), Some("2107-900"));
    }

    #[test]
    fn resource_group_lists_accept_joined_strings() {
        let rg: ResourceGroup = serde_json::from_value(json!({
            "id": "RG1",
            "label": "prod",
            "gm_masters": "01, 02",
            "gm_sessions": ["10"],
            "pass_global": "",
        }))
        .unwrap();
        assert_eq!(rg.gm_masters, vec!["01", "02"]);
        assert_eq!(rg.gm_sessions, vec!["10"]);
        assert_eq!(rg.pass_global, None);
    }

    #[test]
    fn batch_item_distinguishes_failures() {
        let items: Vec<BatchItem<Volume>> = serde_json::from_value(json!([
            {"id": "1000", "name": "a"},
            {"status": "failed", "code": "BE7A0029", "message": "pool full"},
        ]))
        .unwrap();

        assert!(items[0].failure().is_none());
        let failure = items[1].failure().unwrap();
        assert_eq!(failure.code, "BE7A0029");
    }

    #[test]
    fn request_body_wraps_params() {
        let params = CreateHost {
            name: "h1".into(),
            hosttype: "Linuxrhel".into(),
        };
        let body = serde_json::to_value(RequestBody::new(&params)).unwrap();
        assert_eq!(
            body,
            json!({"request": {"params": {"name": "h1", "hosttype": "Linuxrhel"}}})
        );
    }
}
