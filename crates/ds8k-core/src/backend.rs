// ── Array capabilities ──
//
// One trait per resource kind, covering exactly the calls the managers
// and collectors make. `Ds8kClient` implements all of them; tests swap
// in an in-memory array.

use std::future::Future;

use ds8k_api::Ds8kClient;
use ds8k_api::models::{
    BatchItem, CreateAliases, CreateHost, CreateHostPort, CreateLss, CreateResourceGroup,
    CreateVolumes, Host, HostPort, Lss, MapVolumes, Mapping, Marray, Pool, ResourceGroup,
    UpdateHostPort, UpdateResourceGroup, Volume,
};

pub type ApiResult<T> = Result<T, ds8k_api::Error>;

pub trait HostApi: Sync {
    fn list_hosts(&self) -> impl Future<Output = ApiResult<Vec<Host>>> + Send;
    fn get_host(&self, name: &str) -> impl Future<Output = ApiResult<Host>> + Send;
    fn create_host(&self, params: &CreateHost)
    -> impl Future<Output = ApiResult<Option<Host>>> + Send;
    fn delete_host(&self, name: &str) -> impl Future<Output = ApiResult<()>> + Send;
    fn list_host_volumes(&self, name: &str) -> impl Future<Output = ApiResult<Vec<Volume>>> + Send;
}

pub trait HostPortApi: Sync {
    fn list_host_ports(&self) -> impl Future<Output = ApiResult<Vec<HostPort>>> + Send;
    fn list_ports_for_host(
        &self,
        host: &str,
    ) -> impl Future<Output = ApiResult<Vec<HostPort>>> + Send;
    fn get_host_port(&self, wwpn: &str) -> impl Future<Output = ApiResult<HostPort>> + Send;
    fn create_host_port(&self, params: &CreateHostPort)
    -> impl Future<Output = ApiResult<()>> + Send;
    fn update_host_port(
        &self,
        wwpn: &str,
        params: &UpdateHostPort,
    ) -> impl Future<Output = ApiResult<()>> + Send;
    fn delete_host_port(&self, wwpn: &str) -> impl Future<Output = ApiResult<()>> + Send;
}

pub trait PoolApi: Sync {
    fn list_pools(&self) -> impl Future<Output = ApiResult<Vec<Pool>>> + Send;
    fn get_pool(&self, id: &str) -> impl Future<Output = ApiResult<Pool>> + Send;
}

pub trait VolumeApi: Sync {
    fn list_pool_volumes(&self, pool: &str) -> impl Future<Output = ApiResult<Vec<Volume>>> + Send;
    fn get_volume(&self, id: &str) -> impl Future<Output = ApiResult<Volume>> + Send;
    fn create_volumes(
        &self,
        params: &CreateVolumes,
    ) -> impl Future<Output = ApiResult<Vec<BatchItem<Volume>>>> + Send;
    fn delete_volume(&self, id: &str) -> impl Future<Output = ApiResult<()>> + Send;
    fn create_aliases(
        &self,
        base: &str,
        params: &CreateAliases,
    ) -> impl Future<Output = ApiResult<Vec<BatchItem<Volume>>>> + Send;
}

pub trait MappingApi: Sync {
    fn list_host_mappings(&self, host: &str)
    -> impl Future<Output = ApiResult<Vec<Mapping>>> + Send;
    fn map_volumes(
        &self,
        host: &str,
        params: &MapVolumes,
    ) -> impl Future<Output = ApiResult<()>> + Send;
    fn unmap_volume(&self, host: &str, lunid: &str) -> impl Future<Output = ApiResult<()>> + Send;
}

pub trait LssApi: Sync {
    fn list_lss(&self, lss_type: Option<&str>) -> impl Future<Output = ApiResult<Vec<Lss>>> + Send;
    fn get_lss(&self, id: &str) -> impl Future<Output = ApiResult<Lss>> + Send;
    fn create_lss(&self, params: &CreateLss) -> impl Future<Output = ApiResult<()>> + Send;
    fn delete_lss(&self, id: &str) -> impl Future<Output = ApiResult<()>> + Send;
}

pub trait ResourceGroupApi: Sync {
    fn list_resource_groups(&self) -> impl Future<Output = ApiResult<Vec<ResourceGroup>>> + Send;
    fn get_resource_group(&self, id: &str) -> impl Future<Output = ApiResult<ResourceGroup>> + Send;
    fn create_resource_group(
        &self,
        params: &CreateResourceGroup,
    ) -> impl Future<Output = ApiResult<Option<ResourceGroup>>> + Send;
    fn update_resource_group(
        &self,
        id: &str,
        params: &UpdateResourceGroup,
    ) -> impl Future<Output = ApiResult<()>> + Send;
    fn delete_resource_group(&self, id: &str) -> impl Future<Output = ApiResult<()>> + Send;
}

pub trait MarrayApi: Sync {
    fn list_marrays(&self) -> impl Future<Output = ApiResult<Vec<Marray>>> + Send;
    fn get_marray(&self, id: &str) -> impl Future<Output = ApiResult<Marray>> + Send;
}

/// Everything an array can do.
pub trait ArrayApi:
    HostApi
    + HostPortApi
    + PoolApi
    + VolumeApi
    + MappingApi
    + LssApi
    + ResourceGroupApi
    + MarrayApi
{
}

impl<T> ArrayApi for T where
    T: HostApi
        + HostPortApi
        + PoolApi
        + VolumeApi
        + MappingApi
        + LssApi
        + ResourceGroupApi
        + MarrayApi
{
}

// ── REST client ─────────────────────────────────────────────────────

impl HostApi for Ds8kClient {
    async fn list_hosts(&self) -> ApiResult<Vec<Host>> {
        Ds8kClient::list_hosts(self).await
    }
    async fn get_host(&self, name: &str) -> ApiResult<Host> {
        Ds8kClient::get_host(self, name).await
    }
    async fn create_host(&self, params: &CreateHost) -> ApiResult<Option<Host>> {
        Ds8kClient::create_host(self, params).await
    }
    async fn delete_host(&self, name: &str) -> ApiResult<()> {
        Ds8kClient::delete_host(self, name).await
    }
    async fn list_host_volumes(&self, name: &str) -> ApiResult<Vec<Volume>> {
        Ds8kClient::list_host_volumes(self, name).await
    }
}

impl HostPortApi for Ds8kClient {
    async fn list_host_ports(&self) -> ApiResult<Vec<HostPort>> {
        Ds8kClient::list_host_ports(self).await
    }
    async fn list_ports_for_host(&self, host: &str) -> ApiResult<Vec<HostPort>> {
        Ds8kClient::list_ports_for_host(self, host).await
    }
    async fn get_host_port(&self, wwpn: &str) -> ApiResult<HostPort> {
        Ds8kClient::get_host_port(self, wwpn).await
    }
    async fn create_host_port(&self, params: &CreateHostPort) -> ApiResult<()> {
        Ds8kClient::create_host_port(self, params).await
    }
    async fn update_host_port(&self, wwpn: &str, params: &UpdateHostPort) -> ApiResult<()> {
        Ds8kClient::update_host_port(self, wwpn, params).await
    }
    async fn delete_host_port(&self, wwpn: &str) -> ApiResult<()> {
        Ds8kClient::delete_host_port(self, wwpn).await
    }
}

impl PoolApi for Ds8kClient {
    async fn list_pools(&self) -> ApiResult<Vec<Pool>> {
        Ds8kClient::list_pools(self).await
    }
    async fn get_pool(&self, id: &str) -> ApiResult<Pool> {
        Ds8kClient::get_pool(self, id).await
    }
}

impl VolumeApi for Ds8kClient {
    async fn list_pool_volumes(&self, pool: &str) -> ApiResult<Vec<Volume>> {
        Ds8kClient::list_pool_volumes(self, pool).await
    }
    async fn get_volume(&self, id: &str) -> ApiResult<Volume> {
        Ds8kClient::get_volume(self, id).await
    }
    async fn create_volumes(&self, params: &CreateVolumes) -> ApiResult<Vec<BatchItem<Volume>>> {
        Ds8kClient::create_volumes(self, params).await
    }
    async fn delete_volume(&self, id: &str) -> ApiResult<()> {
        Ds8kClient::delete_volume(self, id).await
    }
    async fn create_aliases(
        &self,
        base: &str,
        params: &CreateAliases,
    ) -> ApiResult<Vec<BatchItem<Volume>>> {
        Ds8kClient::create_aliases(self, base, params).await
    }
}

impl MappingApi for Ds8kClient {
    async fn list_host_mappings(&self, host: &str) -> ApiResult<Vec<Mapping>> {
        Ds8kClient::list_host_mappings(self, host).await
    }
    async fn map_volumes(&self, host: &str, params: &MapVolumes) -> ApiResult<()> {
        Ds8kClient::map_volumes(self, host, params).await
    }
    async fn unmap_volume(&self, host: &str, lunid: &str) -> ApiResult<()> {
        Ds8kClient::unmap_volume(self, host, lunid).await
    }
}

impl LssApi for Ds8kClient {
    async fn list_lss(&self, lss_type: Option<&str>) -> ApiResult<Vec<Lss>> {
        Ds8kClient::list_lss(self, lss_type).await
    }
    async fn get_lss(&self, id: &str) -> ApiResult<Lss> {
        Ds8kClient::get_lss(self, id).await
    }
    async fn create_lss(&self, params: &CreateLss) -> ApiResult<()> {
        Ds8kClient::create_lss(self, params).await
    }
    async fn delete_lss(&self, id: &str) -> ApiResult<()> {
        Ds8kClient::delete_lss(self, id).await
    }
}

impl ResourceGroupApi for Ds8kClient {
    async fn list_resource_groups(&self) -> ApiResult<Vec<ResourceGroup>> {
        Ds8kClient::list_resource_groups(self).await
    }
    async fn get_resource_group(&self, id: &str) -> ApiResult<ResourceGroup> {
        Ds8kClient::get_resource_group(self, id).await
    }
    async fn create_resource_group(
        &self,
        params: &CreateResourceGroup,
    ) -> ApiResult<Option<ResourceGroup>> {
        Ds8kClient::create_resource_group(self, params).await
    }
    async fn update_resource_group(&self, id: &str, params: &UpdateResourceGroup) -> ApiResult<()> {
        Ds8kClient::update_resource_group(self, id, params).await
    }
    async fn delete_resource_group(&self, id: &str) -> ApiResult<()> {
        Ds8kClient::delete_resource_group(self, id).await
    }
}

impl MarrayApi for Ds8kClient {
    async fn list_marrays(&self) -> ApiResult<Vec<Marray>> {
        Ds8kClient::list_marrays(self).await
    }
    async fn get_marray(&self, id: &str) -> ApiResult<Marray> {
        Ds8kClient::get_marray(self, id).await
    }
}
