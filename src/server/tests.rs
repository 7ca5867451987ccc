//! Server Module Tests
//!
//! End-to-end checks against the real router, served on an ephemeral local port and driven
//! with `reqwest`.
//!
//! ## Test Scopes
//! - **Routes**: Status codes and JSON bodies of every endpoint.
//! - **Validation**: Missing, empty and repeated query parameters.
//! - **Admission**: Burst exhaustion, 429 body, refill after a real delay.
//! - **Startup**: Bind failures surface as errors.

#[cfg(test)]
mod tests {
    use crate::config::{RateLimitConfig, ServerConfig};
    use crate::server::{build_limiter, serve, serve_on};
    use crate::store::memory::KvStore;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio::task::JoinHandle;

    struct TestServer {
        base: String,
        store: Arc<KvStore>,
        shutdown: Option<oneshot::Sender<()>>,
        handle: JoinHandle<anyhow::Result<()>>,
    }

    impl TestServer {
        async fn start(rate_limit: Option<RateLimitConfig>) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let config = ServerConfig {
                bind_addr: addr,
                rate_limit,
                ..ServerConfig::default()
            };
            let store = Arc::new(KvStore::new());
            let (tx, rx) = oneshot::channel::<()>();

            let handle = tokio::spawn(serve_on(listener, config, store.clone(), async move {
                let _ = rx.await;
            }));

            Self {
                base: format!("http://{}", addr),
                store,
                shutdown: Some(tx),
                handle,
            }
        }

        async fn call(&self, path_and_query: &str) -> (u16, Value) {
            let resp = reqwest::get(format!("{}{}", self.base, path_and_query))
                .await
                .unwrap();
            let status = resp.status().as_u16();
            let body = resp.json::<Value>().await.unwrap_or(Value::Null);
            (status, body)
        }

        async fn stop(mut self) {
            if let Some(tx) = self.shutdown.take() {
                let _ = tx.send(());
            }
            self.handle.await.unwrap().unwrap();
        }
    }

    fn limit(capacity: u32, refill_per_sec: f64) -> Option<RateLimitConfig> {
        Some(RateLimitConfig {
            capacity,
            refill_per_sec,
        })
    }

    // ============================================================
    // ROUTES
    // ============================================================

    #[tokio::test]
    async fn test_set_get_delete_scenario() {
        let server = TestServer::start(None).await;

        let (status, body) = server.call("/set?key=foo&value=bar").await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"message": "key set successfully"}));

        let (status, body) = server.call("/get?key=foo").await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"value": "bar"}));

        let (status, body) = server.call("/delete?key=foo").await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"message": "key deleted successfully"}));

        let (status, body) = server.call("/get?key=foo").await;
        assert_eq!(status, 404);
        assert_eq!(body, json!({"error": "key not found"}));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_keys_and_health() {
        let server = TestServer::start(None).await;

        let (status, body) = server.call("/keys").await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"keys": []}));

        server.call("/set?key=A&value=1").await;
        server.call("/set?key=B&value=2").await;

        let (_, body) = server.call("/keys").await;
        let mut keys: Vec<String> = serde_json::from_value(body["keys"].clone()).unwrap();
        keys.sort();
        assert_eq!(keys, vec!["A", "B"]);

        let (status, body) = server.call("/health").await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"message": "OK"}));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_values_are_url_decoded() {
        let server = TestServer::start(None).await;

        let (status, _) = server.call("/set?key=greeting&value=hello%20world%26more").await;
        assert_eq!(status, 200);

        let (_, body) = server.call("/get?key=greeting").await;
        assert_eq!(body, json!({"value": "hello world&more"}));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_404() {
        let server = TestServer::start(None).await;

        let (status, body) = server.call("/delete?key=ghost").await;
        assert_eq!(status, 404);
        assert_eq!(body, json!({"error": "key not found"}));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let server = TestServer::start(None).await;

        let (status, _) = server.call("/nope").await;
        assert_eq!(status, 404);

        server.stop().await;
    }

    // ============================================================
    // VALIDATION
    // ============================================================

    #[tokio::test]
    async fn test_set_requires_key_and_value() {
        let server = TestServer::start(None).await;

        for query in [
            "/set?key=&value=bar",
            "/set?value=bar",
            "/set?key=foo",
            "/set?key=foo&value=",
            "/set",
        ] {
            let (status, body) = server.call(query).await;
            assert_eq!(status, 400, "query {}", query);
            assert_eq!(body, json!({"error": "key and value are required"}));
        }

        assert!(server.store.is_empty());
        server.stop().await;
    }

    #[tokio::test]
    async fn test_get_and_delete_require_key() {
        let server = TestServer::start(None).await;

        for query in ["/get", "/get?key=", "/delete", "/delete?key="] {
            let (status, body) = server.call(query).await;
            assert_eq!(status, 400, "query {}", query);
            assert_eq!(body, json!({"error": "key is required"}));
        }

        server.stop().await;
    }

    #[tokio::test]
    async fn test_repeated_params_use_first_value() {
        let server = TestServer::start(None).await;

        let (status, body) = server.call("/set?key=a&key=b&value=v").await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"message": "key set successfully"}));
        assert_eq!(server.store.keys(), vec!["a".to_string()]);

        let (status, body) = server.call("/get?key=a&key=b").await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"value": "v"}));

        // The first value wins even when it is empty
        let (status, body) = server.call("/get?key=&key=a").await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": "key is required"}));

        let (status, body) = server.call("/delete?key=b&key=a").await;
        assert_eq!(status, 404);
        assert_eq!(body, json!({"error": "key not found"}));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_concurrent_sets_over_http() {
        let server = TestServer::start(None).await;
        let client = reqwest::Client::new();
        let n = 50;

        let mut handles = Vec::with_capacity(n);
        for i in 0..n {
            let client = client.clone();
            let url = format!("{}/set?key=k{}&value=v{}", server.base, i, i);
            handles.push(tokio::spawn(async move {
                client.get(url).send().await.unwrap().status().as_u16()
            }));
        }
        for h in handles {
            assert_eq!(h.await.unwrap(), 200);
        }
        drop(client);

        let (_, body) = server.call("/keys").await;
        let keys: Vec<String> = serde_json::from_value(body["keys"].clone()).unwrap();
        let unique: std::collections::HashSet<&String> = keys.iter().collect();
        assert_eq!(keys.len(), n);
        assert_eq!(unique.len(), n);

        server.stop().await;
    }

    // ============================================================
    // ADMISSION
    // ============================================================

    #[tokio::test]
    async fn test_rate_limit_rejects_then_recovers() {
        // ARRANGE: capacity 5, 1 token/sec
        let server = TestServer::start(limit(5, 1.0)).await;

        // ACT: six requests without delay
        for _ in 0..5 {
            let (status, _) = server.call("/health").await;
            assert_eq!(status, 200);
        }
        let (status, body) = server.call("/health").await;

        // ASSERT: the sixth is rejected
        assert_eq!(status, 429);
        assert_eq!(body, json!({"error": "too many requests"}));

        // After a second, one more request is admitted
        tokio::time::sleep(Duration::from_millis(1100)).await;
        let (status, _) = server.call("/health").await;
        assert_eq!(status, 200);

        server.stop().await;
    }

    #[tokio::test]
    async fn test_rejected_request_does_not_touch_store() {
        let server = TestServer::start(limit(1, 0.001)).await;

        let (status, _) = server.call("/set?key=first&value=1").await;
        assert_eq!(status, 200);

        let (status, _) = server.call("/set?key=second&value=2").await;
        assert_eq!(status, 429);

        assert_eq!(server.store.keys(), vec!["first".to_string()]);
        server.stop().await;
    }

    #[tokio::test]
    async fn test_no_limiter_when_disabled() {
        let server = TestServer::start(None).await;

        for _ in 0..50 {
            let (status, _) = server.call("/health").await;
            assert_eq!(status, 200);
        }

        server.stop().await;
    }

    // ============================================================
    // STARTUP
    // ============================================================

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = ServerConfig {
            bind_addr: occupied.local_addr().unwrap(),
            ..ServerConfig::default()
        };

        let result = serve(config, Arc::new(KvStore::new())).await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("failed to bind"), "got: {err:#}");
    }

    #[test]
    fn test_build_limiter_follows_config() {
        let disabled = ServerConfig::default();
        assert!(build_limiter(&disabled).unwrap().is_none());

        let enabled = ServerConfig {
            rate_limit: limit(5, 1.0),
            ..ServerConfig::default()
        };
        let bucket = build_limiter(&enabled).unwrap().unwrap();
        assert_eq!(bucket.capacity(), 5.0);

        let invalid = ServerConfig {
            rate_limit: limit(0, 1.0),
            ..ServerConfig::default()
        };
        assert!(build_limiter(&invalid).is_err());
    }
}
