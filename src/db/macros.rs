/// Serves a value from the cache, computing and storing it on a miss.
///
/// A failed cache read is logged and treated as a miss, so a cache outage
/// never fails the request.
///
/// # Arguments
/// * `$cache`: The [`Cache`](crate::db::Cache) to read from and write to.
/// * `$key`: The [`CacheKey`](crate::db::CacheKey) for the value.
/// * `$ttl`: The time-to-live for the stored value in seconds.
/// * `$block`: A future producing `AppResult<T>`, awaited only on a miss.
///
/// # Example
/// ```rust,ignore
/// let cards: Vec<MovieCard> = cached!(self.cache, key, self.cache_ttl, async move {
///     fetch_cards().await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %$key, "Cache hit");
                Ok(cached)
            }
            lookup => {
                if let Err(e) = lookup {
                    tracing::warn!(key = %$key, error = %e, "Cache read failed, fetching");
                } else {
                    tracing::debug!(key = %$key, "Cache miss");
                }
                match $block.await {
                    Ok(value) => {
                        $cache.store(&$key, &value, $ttl).await;
                        Ok(value)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }};
}
