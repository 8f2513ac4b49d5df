// ── Existence checks ──
//
// "Not found" is an answer, not an error. Everything else the array
// says while we look something up is fatal.

use std::future::Future;

use tracing::trace;

use crate::backend::ApiResult;
use crate::error::CoreError;

/// Run a fetch, mapping `NotFound` to `Ok(None)`.
pub async fn lookup<T, F>(fetch: F) -> Result<Option<T>, CoreError>
where
    F: Future<Output = ApiResult<T>>,
{
    match fetch.await {
        Ok(found) => Ok(Some(found)),
        Err(e) if e.is_not_found() => {
            trace!("lookup: not found");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Like [`lookup`], but a missing object is a user-facing error naming it.
pub async fn verify<T, F>(kind: &str, locator: &str, fetch: F) -> Result<T, CoreError>
where
    F: Future<Output = ApiResult<T>>,
{
    lookup(fetch)
        .await?
        .ok_or_else(|| CoreError::not_found(kind, locator))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn missing() -> ApiResult<u8> {
        Err(ds8k_api::Error::NotFound {
            message: "nope".into(),
        })
    }

    async fn broken() -> ApiResult<u8> {
        Err(ds8k_api::Error::Api {
            status: 500,
            code: "BE000000".into(),
            message: "internal".into(),
        })
    }

    #[tokio::test]
    async fn not_found_is_none() {
        assert_eq!(lookup(missing()).await.unwrap(), None);
        assert_eq!(lookup(async { Ok(7) }).await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn other_errors_are_fatal() {
        assert!(matches!(
            lookup(broken()).await,
            Err(CoreError::Api { status: Some(500), .. })
        ));
    }

    #[tokio::test]
    async fn verify_names_the_missing_object() {
        let err = verify("host", "h1", missing()).await.unwrap_err();
        assert_eq!(err.to_string(), "The host h1 does not exist on the DS8000");
    }
}
