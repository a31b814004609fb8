//! Integration tests for registry resolution and concurrent dispatch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::future::join_all;
use patchbay::prelude::*;

struct SleepyProvider {
    delay: Duration,
}

#[async_trait]
impl GenerateProvider for SleepyProvider {
    async fn generate(
        &self,
        prompt: &str,
        _model: Option<&str>,
        _options: &CallOptions,
    ) -> Result<String, ProviderError> {
        tokio::time::sleep(self.delay).await;
        Ok(prompt.to_string())
    }
}

#[tokio::test]
async fn test_default_election_survives_reregistration() {
    let registry = GenerateRegistry::new();
    registry
        .register(
            "first",
            Arc::new(GenerateFn::new(|_, _, _| Ok("v1".to_string()))),
        )
        .unwrap();
    registry
        .register(
            "second",
            Arc::new(GenerateFn::new(|_, _, _| Ok("other".to_string()))),
        )
        .unwrap();
    registry
        .register(
            "first",
            Arc::new(GenerateFn::new(|_, _, _| Ok("v2".to_string()))),
        )
        .unwrap();

    assert_eq!(registry.default_provider().as_deref(), Some("first"));
    // The default dispatches to the overwritten handle.
    let out = registry
        .generate("x", None, &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(out, "v2");
}

#[tokio::test]
async fn test_dispatch_error_taxonomy() {
    let registry = SearchRegistry::new();

    // Zero providers registered.
    let err = registry
        .search("q", None, &CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::NoProviderConfigured { .. }));
    assert!(err.to_string().contains("No providers registered"));

    registry
        .register("ddg", Arc::new(SearchFn::new(|_, _, _| Ok(vec![]))))
        .unwrap();

    // Empty provider part in the address.
    let err = registry
        .search("q", Some("/engine"), &CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::InvalidAddress { .. }));

    // Unknown provider enumerates what is registered.
    let err = registry
        .search("q", Some("brave/web"), &CallOptions::new())
        .await
        .unwrap_err();
    match &err {
        DispatchError::UnknownProvider { name, available } => {
            assert_eq!(name, "brave");
            assert_eq!(available, &vec!["ddg".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }

    // Cleared default with providers still registered.
    registry.clear_default();
    let err = registry
        .search("q", None, &CallOptions::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("No default provider set"));
    assert!(err.to_string().contains("ddg"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_dispatch_is_parallel() {
    const CALLS: usize = 8;
    let delay = Duration::from_millis(100);

    let registry = Arc::new(GenerateRegistry::new());
    registry
        .register("sleepy", Arc::new(SleepyProvider { delay }))
        .unwrap();

    let start = Instant::now();
    let results = join_all((0..CALLS).map(|i| {
        let registry = Arc::clone(&registry);
        async move {
            registry
                .generate(&format!("call-{i}"), None, &CallOptions::new())
                .await
        }
    }))
    .await;
    let elapsed = start.elapsed();

    for (i, result) in results.into_iter().enumerate() {
        assert_eq!(result.unwrap(), format!("call-{i}"));
    }
    // Serial execution would take CALLS * delay = 800ms. Generous bound to
    // absorb scheduler noise while still proving the lock is not held during
    // provider invocation.
    assert!(
        elapsed < delay * 4,
        "dispatch serialized: {CALLS} calls took {elapsed:?}"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_registrations_elect_exactly_one_default() {
    let registry = Arc::new(EmbeddingRegistry::new());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                registry
                    .register(
                        format!("provider-{i}"),
                        Arc::new(EmbeddingFn::new(|_, _, _| Ok(vec![0.0]))),
                    )
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(registry.len(), 16);
    // Which provider wins the race is unspecified; that exactly one does is not.
    let default = registry.default_provider().expect("a default was elected");
    assert!(registry.provider_names().contains(&default));
    assert!(
        registry
            .embed("text", None, &CallOptions::new())
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_registries_are_independent_per_domain() {
    let generate = GenerateRegistry::new();
    let search = SearchRegistry::new();
    generate
        .register(
            "only-generation",
            Arc::new(GenerateFn::new(|_, _, _| Ok("text".to_string()))),
        )
        .unwrap();

    assert_eq!(generate.len(), 1);
    assert!(search.is_empty());
    assert!(
        search
            .search("q", None, &CallOptions::new())
            .await
            .is_err()
    );
}
