//! In-memory DS8000 used by the reconciliation tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use ds8k_api::Error;
use ds8k_api::models::{
    BatchItem, CreateAliases, CreateHost, CreateHostPort, CreateLss, CreateResourceGroup,
    CreateVolumes, Host, HostPort, Lss, MapVolumes, Mapping, Marray, Pool, ResourceGroup,
    ServerStatus, UpdateHostPort, UpdateResourceGroup, Volume,
};
use ds8k_core::backend::{
    ApiResult, HostApi, HostPortApi, LssApi, MappingApi, MarrayApi, PoolApi, ResourceGroupApi,
    VolumeApi,
};
use serde_json::json;

// ── Builders ────────────────────────────────────────────────────────

pub fn host(name: &str) -> Host {
    serde_json::from_value(json!({"name": name, "hosttype": "Linuxrhel", "state": "online"}))
        .unwrap()
}

pub fn port(wwpn: &str, host: Option<&str>) -> HostPort {
    serde_json::from_value(json!({
        "wwpn": wwpn,
        "state": if host.is_some() { "logged in" } else { "unconfigured" },
        "host": host.map_or_else(|| json!(""), |h| json!({"name": h})),
    }))
    .unwrap()
}

pub fn pool(id: &str, stgtype: &str) -> Pool {
    serde_json::from_value(json!({"id": id, "name": format!("pool_{id}"), "stgtype": stgtype}))
        .unwrap()
}

pub fn volume(id: &str, name: &str, pool: &str, stgtype: &str) -> Volume {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "pool": {"id": pool},
        "stgtype": stgtype,
        "cap": "10",
    }))
    .unwrap()
}

pub fn lss(id: &str, lss_type: &str, ssid: &str, cu_type: &str) -> Lss {
    serde_json::from_value(json!({
        "id": id,
        "type": lss_type,
        "sub_system_identifier": ssid,
        "ckd_base_cu_type": cu_type,
    }))
    .unwrap()
}

pub fn group(id: &str, label: &str) -> ResourceGroup {
    serde_json::from_value(json!({"id": id, "label": label})).unwrap()
}

pub fn marray(id: &str) -> Marray {
    serde_json::from_value(json!({"id": id, "raidtype": "6", "state": "assigned"})).unwrap()
}

fn not_found(what: &str) -> Error {
    Error::NotFound {
        message: format!("{what} not found"),
    }
}

fn failed(code: &str, message: &str) -> ServerStatus {
    ServerStatus {
        status: "failed".into(),
        code: code.into(),
        message: message.into(),
    }
}

// ── State ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct State {
    pub hosts: Vec<Host>,
    pub ports: Vec<HostPort>,
    pub pools: Vec<Pool>,
    pub volumes: Vec<Volume>,
    /// host name -> (lunid, volume id)
    pub mappings: BTreeMap<String, Vec<(String, String)>>,
    pub lss: Vec<Lss>,
    pub groups: Vec<ResourceGroup>,
    pub marrays: Vec<Marray>,
    /// Volume ids whose creation the array rejects.
    pub reject_volume_ids: HashSet<String>,
    /// Every mutating call, in order.
    pub mutations: Vec<String>,
    next_volume: u16,
    next_group: u32,
}

#[derive(Default)]
pub struct FakeArray {
    state: Mutex<State>,
}

impl FakeArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F: FnOnce(&mut State)>(self, setup: F) -> Self {
        setup(&mut self.state.lock().unwrap());
        self
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn mutations(&self) -> Vec<String> {
        self.state().mutations.clone()
    }

    pub fn volume_ids(&self) -> Vec<String> {
        self.state().volumes.iter().map(|v| v.id.clone()).collect()
    }
}

impl State {
    fn record(&mut self, call: String) {
        self.mutations.push(call);
    }

    fn allocate_volume_id(&mut self) -> String {
        loop {
            let id = format!("{:04X}", 0x1000 + self.next_volume);
            self.next_volume += 1;
            if !self.volumes.iter().any(|v| v.id == id) {
                return id;
            }
        }
    }
}

// ── Capabilities ────────────────────────────────────────────────────

impl HostApi for FakeArray {
    async fn list_hosts(&self) -> ApiResult<Vec<Host>> {
        Ok(self.state().hosts.clone())
    }

    async fn get_host(&self, name: &str) -> ApiResult<Host> {
        let state = self.state();
        state
            .hosts
            .iter()
            .find(|h| h.name == name)
            .cloned()
            .ok_or_else(|| not_found("host"))
    }

    async fn create_host(&self, params: &CreateHost) -> ApiResult<Option<Host>> {
        let mut state = self.state();
        state.record(format!("create_host {}", params.name));
        let mut created = host(&params.name);
        created.hosttype = Some(params.hosttype.clone());
        state.hosts.push(created.clone());
        Ok(Some(created))
    }

    async fn delete_host(&self, name: &str) -> ApiResult<()> {
        let mut state = self.state();
        state.record(format!("delete_host {name}"));
        state.hosts.retain(|h| h.name != name);
        Ok(())
    }

    async fn list_host_volumes(&self, name: &str) -> ApiResult<Vec<Volume>> {
        let state = self.state();
        let mapped: Vec<&String> = state
            .mappings
            .get(name)
            .map(|m| m.iter().map(|(_, id)| id).collect())
            .unwrap_or_default();
        Ok(state
            .volumes
            .iter()
            .filter(|v| mapped.contains(&&v.id))
            .cloned()
            .collect())
    }
}

impl HostPortApi for FakeArray {
    async fn list_host_ports(&self) -> ApiResult<Vec<HostPort>> {
        Ok(self.state().ports.clone())
    }

    async fn list_ports_for_host(&self, host: &str) -> ApiResult<Vec<HostPort>> {
        Ok(self
            .state()
            .ports
            .iter()
            .filter(|p| p.host.as_deref() == Some(host))
            .cloned()
            .collect())
    }

    async fn get_host_port(&self, wwpn: &str) -> ApiResult<HostPort> {
        let state = self.state();
        state
            .ports
            .iter()
            .find(|p| p.wwpn.eq_ignore_ascii_case(wwpn))
            .cloned()
            .ok_or_else(|| not_found("host port"))
    }

    async fn create_host_port(&self, params: &CreateHostPort) -> ApiResult<()> {
        let mut state = self.state();
        state.record(format!("create_host_port {} {}", params.wwpn, params.host));
        state.ports.push(port(&params.wwpn, Some(&params.host)));
        Ok(())
    }

    async fn update_host_port(&self, wwpn: &str, params: &UpdateHostPort) -> ApiResult<()> {
        let mut state = self.state();
        state.record(format!("update_host_port {wwpn} {}", params.host));
        match state.ports.iter_mut().find(|p| p.wwpn == wwpn) {
            Some(port) => {
                port.host = Some(params.host.clone());
                Ok(())
            }
            None => Err(Error::BadRequest {
                code: "BE7A001F".into(),
                message: "The specified host port does not exist".into(),
            }),
        }
    }

    async fn delete_host_port(&self, wwpn: &str) -> ApiResult<()> {
        let mut state = self.state();
        state.record(format!("delete_host_port {wwpn}"));
        state.ports.retain(|p| p.wwpn != wwpn);
        Ok(())
    }
}

impl PoolApi for FakeArray {
    async fn list_pools(&self) -> ApiResult<Vec<Pool>> {
        Ok(self.state().pools.clone())
    }

    async fn get_pool(&self, id: &str) -> ApiResult<Pool> {
        let state = self.state();
        state
            .pools
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found("pool"))
    }
}

impl VolumeApi for FakeArray {
    async fn list_pool_volumes(&self, pool: &str) -> ApiResult<Vec<Volume>> {
        Ok(self
            .state()
            .volumes
            .iter()
            .filter(|v| v.pool.as_deref() == Some(pool))
            .cloned()
            .collect())
    }

    async fn get_volume(&self, id: &str) -> ApiResult<Volume> {
        let state = self.state();
        state
            .volumes
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(|| not_found("volume"))
    }

    async fn create_volumes(&self, params: &CreateVolumes) -> ApiResult<Vec<BatchItem<Volume>>> {
        let mut state = self.state();
        state.record(format!("create_volumes {}", params.name));

        let ids: Vec<String> = if params.ids.is_empty() {
            (0..params.qty.unwrap_or(1))
                .map(|_| state.allocate_volume_id())
                .collect()
        } else {
            params.ids.clone()
        };

        let mut items = Vec::with_capacity(ids.len());
        for id in ids {
            if state.reject_volume_ids.contains(&id) || state.volumes.iter().any(|v| v.id == id) {
                items.push(BatchItem::Status(failed(
                    "BE586005",
                    &format!("The volume {id} could not be created"),
                )));
                continue;
            }
            let created = volume(&id, &params.name, &params.pool, &params.stgtype);
            state.volumes.push(created.clone());
            items.push(BatchItem::Object(created));
        }
        Ok(items)
    }

    async fn delete_volume(&self, id: &str) -> ApiResult<()> {
        let mut state = self.state();
        state.record(format!("delete_volume {id}"));
        state.volumes.retain(|v| v.id != id);
        Ok(())
    }

    async fn create_aliases(
        &self,
        base: &str,
        params: &CreateAliases,
    ) -> ApiResult<Vec<BatchItem<Volume>>> {
        let mut state = self.state();
        state.record(format!(
            "create_aliases {base} {} {} {}",
            params.alias_id, params.quantity, params.order
        ));
        let start = u16::from_str_radix(&params.alias_id, 16).unwrap();
        let pool = state
            .volumes
            .iter()
            .find(|v| v.id == base)
            .and_then(|v| v.pool.clone())
            .unwrap_or_default();

        let mut items = Vec::new();
        for j in 0..u16::try_from(params.quantity).unwrap() {
            let value = if params.order == "increment" {
                start + j
            } else {
                start - j
            };
            let alias = volume(&format!("{value:04X}"), "alias", &pool, "ckd");
            state.volumes.push(alias.clone());
            items.push(BatchItem::Object(alias));
        }
        Ok(items)
    }
}

impl MappingApi for FakeArray {
    async fn list_host_mappings(&self, host: &str) -> ApiResult<Vec<Mapping>> {
        let state = self.state();
        let mappings = state.mappings.get(host).cloned().unwrap_or_default();
        Ok(mappings
            .into_iter()
            .map(|(lunid, volume)| {
                serde_json::from_value(json!({"lunid": lunid, "volume": {"id": volume}})).unwrap()
            })
            .collect())
    }

    async fn map_volumes(&self, host: &str, params: &MapVolumes) -> ApiResult<()> {
        let mut state = self.state();
        state.record(format!("map_volumes {host} {}", params.volumes.join(",")));
        let entries = state.mappings.entry(host.to_owned()).or_default();
        for id in &params.volumes {
            let lunid = format!("{:02X}", entries.len());
            entries.push((lunid, id.clone()));
        }
        Ok(())
    }

    async fn unmap_volume(&self, host: &str, lunid: &str) -> ApiResult<()> {
        let mut state = self.state();
        state.record(format!("unmap_volume {host} {lunid}"));
        if let Some(entries) = state.mappings.get_mut(host) {
            entries.retain(|(l, _)| l != lunid);
        }
        Ok(())
    }
}

impl LssApi for FakeArray {
    async fn list_lss(&self, lss_type: Option<&str>) -> ApiResult<Vec<Lss>> {
        Ok(self
            .state()
            .lss
            .iter()
            .filter(|l| lss_type.is_none_or(|t| l.lss_type == t))
            .cloned()
            .collect())
    }

    async fn get_lss(&self, id: &str) -> ApiResult<Lss> {
        let state = self.state();
        state
            .lss
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| not_found("lss"))
    }

    async fn create_lss(&self, params: &CreateLss) -> ApiResult<()> {
        let mut state = self.state();
        state.record(format!("create_lss {}", params.id));
        state.lss.push(lss(
            &params.id,
            &params.lss_type,
            &params.sub_system_identifier,
            &params.ckd_base_cu_type,
        ));
        Ok(())
    }

    async fn delete_lss(&self, id: &str) -> ApiResult<()> {
        let mut state = self.state();
        state.record(format!("delete_lss {id}"));
        state.lss.retain(|l| l.id != id);
        Ok(())
    }
}

impl ResourceGroupApi for FakeArray {
    async fn list_resource_groups(&self) -> ApiResult<Vec<ResourceGroup>> {
        Ok(self.state().groups.clone())
    }

    async fn get_resource_group(&self, id: &str) -> ApiResult<ResourceGroup> {
        let state = self.state();
        state
            .groups
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or_else(|| not_found("resource group"))
    }

    async fn create_resource_group(
        &self,
        params: &CreateResourceGroup,
    ) -> ApiResult<Option<ResourceGroup>> {
        let mut state = self.state();
        state.record(format!("create_resource_group {}", params.label));
        let id = params.id.clone().unwrap_or_else(|| {
            state.next_group += 1;
            format!("RG{}", state.next_group)
        });
        let mut created = group(&id, &params.label);
        created.name.clone_from(&params.name);
        state.groups.push(created.clone());
        Ok(Some(created))
    }

    async fn update_resource_group(&self, id: &str, params: &UpdateResourceGroup) -> ApiResult<()> {
        let mut state = self.state();
        state.record(format!("update_resource_group {id}"));
        let group = state
            .groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| not_found("resource group"))?;
        if let Some(label) = &params.label {
            group.label.clone_from(label);
        }
        if params.name.is_some() {
            group.name.clone_from(&params.name);
        }
        if params.cs_global.is_some() {
            group.cs_global.clone_from(&params.cs_global);
        }
        if params.pass_global.is_some() {
            group.pass_global.clone_from(&params.pass_global);
        }
        if let Some(masters) = &params.gm_masters {
            group.gm_masters.clone_from(masters);
        }
        if let Some(sessions) = &params.gm_sessions {
            group.gm_sessions.clone_from(sessions);
        }
        Ok(())
    }

    async fn delete_resource_group(&self, id: &str) -> ApiResult<()> {
        let mut state = self.state();
        state.record(format!("delete_resource_group {id}"));
        state.groups.retain(|g| g.id != id);
        Ok(())
    }
}

impl MarrayApi for FakeArray {
    async fn list_marrays(&self) -> ApiResult<Vec<Marray>> {
        Ok(self.state().marrays.clone())
    }

    async fn get_marray(&self, id: &str) -> ApiResult<Marray> {
        let state = self.state();
        state
            .marrays
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| not_found("marray"))
    }
}
