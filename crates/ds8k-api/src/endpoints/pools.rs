use crate::client::Ds8kClient;
use crate::error::Error;
use crate::models::Pool;

impl Ds8kClient {
    /// `GET /pools`
    pub async fn list_pools(&self) -> Result<Vec<Pool>, Error> {
        self.get_kind(self.url(&["pools"])?, "pools").await
    }

    /// `GET /pools/{id}`
    pub async fn get_pool(&self, id: &str) -> Result<Pool, Error> {
        self.get_one(self.url(&["pools", id])?, "pools").await
    }
}
