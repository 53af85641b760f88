use std::future::Future;

use crate::error::Result;

/// Awaits a list fetch, degrading to an empty list on failure.
///
/// The failure is logged with `resource` and never surfaced. Only list views
/// use this; single-resource reads and mutations propagate their errors.
pub async fn fetch_or_empty<T, F>(resource: &str, fetch: F) -> Vec<T>
where
    F: Future<Output = Result<Vec<T>>>,
{
    match fetch.await {
        Ok(items) => items,
        Err(error) => {
            tracing::warn!(%error, resource, "fetch failed, showing empty list");
            metrics::counter!("fetch_failures", "resource" => resource.to_string()).increment(1);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    #[tokio::test]
    async fn test_success_passes_items_through() {
        let items = fetch_or_empty("numbers", async { Ok(vec![1, 2, 3]) }).await;
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failure_yields_empty() {
        let items: Vec<u8> = fetch_or_empty("numbers", async {
            Err(ClientError::Unavailable("down".to_string()))
        })
        .await;
        assert!(items.is_empty());
    }
}
