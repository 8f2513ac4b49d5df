use crate::client::Ds8kClient;
use crate::error::Error;
use crate::models::Marray;

impl Ds8kClient {
    /// `GET /marrays`
    pub async fn list_marrays(&self) -> Result<Vec<Marray>, Error> {
        self.get_kind(self.url(&["marrays"])?, "marrays").await
    }

    /// `GET /marrays/{id}`
    pub async fn get_marray(&self, id: &str) -> Result<Marray, Error> {
        self.get_one(self.url(&["marrays", id])?, "marrays").await
    }
}
