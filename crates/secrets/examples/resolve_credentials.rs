//! Credential resolution example
//!
//! Demonstrates the core flow a connector goes through when loading its
//! credentials:
//! - Plain values pass through unchanged
//! - URI references are dispatched to a provider and cached
//! - A second resolve within the TTL never touches the backend

use std::collections::HashMap;
use std::sync::Arc;
use toolbridge_secrets::prelude::*;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // 1. A backend with one secret in it. Connectors in production would use
    //    SsmProvider instead; the flow is identical.
    let provider = Arc::new(MemoryProvider::new());
    provider.insert("/github/token", "ghp_resolved-from-backend");

    let resolver = SecretResolver::builder()
        .with_provider(Arc::clone(&provider) as Arc<dyn SecretProvider>)
        .build()?;

    // 2. A connector credential map, as it would appear in configuration:
    //    one literal value, one secret reference.
    let credentials = HashMap::from([
        ("api_key".to_string(), "literal-api-key".to_string()),
        ("token".to_string(), "mem:///github/token?ttl=60".to_string()),
    ]);

    let resolved = resolver.resolve_map(&credentials).await?;
    println!("api_key = {}", resolved["api_key"]);
    println!("token   = {}", resolved["token"]);

    // 3. Resolving again is served from the cache.
    let _ = resolver.resolve("mem:///github/token?ttl=60").await?;
    println!("backend calls: {} (second resolve was a cache hit)", provider.resolve_calls());

    // 4. Release the cache's background sweep before shutdown.
    resolver.destroy();
    Ok(())
}
