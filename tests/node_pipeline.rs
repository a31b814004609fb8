//! End-to-end tests driving the template nodes against mock providers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use patchbay::prelude::*;
use serde_json::json;

fn echo_registry() -> Arc<GenerateRegistry> {
    let registry = GenerateRegistry::new();
    registry
        .register(
            "echo",
            Arc::new(GenerateFn::new(|prompt, model, _opts| {
                Ok(format!("{}:{}", model.unwrap_or("default"), prompt))
            })),
        )
        .unwrap();
    Arc::new(registry)
}

#[tokio::test]
async fn test_generation_end_to_end() {
    let node = LlmNode::new(echo_registry()).with_model("echo/m1");
    let mut shared = SharedStore::new();
    shared.insert("input".to_string(), json!("hi"));

    node.run(&mut shared).await.unwrap();
    assert_eq!(shared.get("output"), Some(&json!("m1:hi")));
}

#[tokio::test]
async fn test_generation_alias_rule_end_to_end() {
    let node = LlmNode::new(echo_registry())
        .with_input_key("question")
        .with_output_key("answer");
    let mut shared = SharedStore::new();
    shared.insert("question".to_string(), json!("what is rust?"));

    node.run(&mut shared).await.unwrap();
    assert_eq!(shared.get("answer"), Some(&json!("default:what is rust?")));
}

#[tokio::test]
async fn test_search_empty_query_formatted_yields_empty_string() {
    let invoked = Arc::new(AtomicU32::new(0));
    let registry = SearchRegistry::new();
    {
        let invoked = Arc::clone(&invoked);
        registry
            .register(
                "mock",
                Arc::new(SearchFn::new(move |_, _, _| {
                    invoked.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![])
                })),
            )
            .unwrap();
    }

    let node = SearchNode::new(Arc::new(registry)).with_formatted_results();
    let mut shared = SharedStore::new();

    node.run(&mut shared).await.unwrap();
    assert_eq!(shared.get("search_results"), Some(&json!("")));
    assert_eq!(invoked.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search_formatting_end_to_end() {
    let registry = SearchRegistry::new();
    registry
        .register(
            "mock",
            Arc::new(SearchFn::new(|_, _, _| {
                Ok(vec![
                    SearchRecord::new("First", "first snippet", "https://one.example"),
                    SearchRecord::new("Second", "second snippet", "https://two.example"),
                ])
            })),
        )
        .unwrap();

    let node = SearchNode::new(Arc::new(registry)).with_formatted_results();
    let mut shared = SharedStore::new();
    shared.insert("query".to_string(), json!("anything"));

    node.run(&mut shared).await.unwrap();
    assert_eq!(
        shared.get("search_results"),
        Some(&json!(
            "1. First\n   first snippet\n   URL: https://one.example\n\n\
             2. Second\n   second snippet\n   URL: https://two.example"
        ))
    );
}

#[tokio::test]
async fn test_no_results_formatting_end_to_end() {
    let registry = SearchRegistry::new();
    registry
        .register("mock", Arc::new(SearchFn::new(|_, _, _| Ok(vec![]))))
        .unwrap();

    let node = SearchNode::new(Arc::new(registry)).with_formatted_results();
    let mut shared = SharedStore::new();
    shared.insert("query".to_string(), json!("obscure"));

    node.run(&mut shared).await.unwrap();
    assert_eq!(shared.get("search_results"), Some(&json!("No results found.")));
}

#[tokio::test]
async fn test_node_retries_then_succeeds() {
    let attempts = Arc::new(AtomicU32::new(0));
    let registry = GenerateRegistry::new();
    {
        let attempts = Arc::clone(&attempts);
        registry
            .register(
                "flaky",
                Arc::new(GenerateFn::new(move |prompt, _, _| {
                    if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err("transient failure".into())
                    } else {
                        Ok(prompt.to_string())
                    }
                })),
            )
            .unwrap();
    }

    let node = LlmNode::new(Arc::new(registry)).with_retry(3, Duration::from_millis(1));
    let mut shared = SharedStore::new();
    shared.insert("input".to_string(), json!("eventually"));

    node.run(&mut shared).await.unwrap();
    assert_eq!(shared.get("output"), Some(&json!("eventually")));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_node_surfaces_provider_error_unchanged() {
    let registry = GenerateRegistry::new();
    registry
        .register(
            "broken",
            Arc::new(GenerateFn::new(|_, _, _| Err("quota exceeded".into()))),
        )
        .unwrap();

    let node = LlmNode::new(Arc::new(registry)).with_retry(2, Duration::from_millis(1));
    let mut shared = SharedStore::new();
    shared.insert("input".to_string(), json!("hi"));

    let err = node.run(&mut shared).await.unwrap_err();
    assert!(matches!(err, DispatchError::Provider(_)));
    assert_eq!(err.to_string(), "quota exceeded");
    assert!(!shared.contains_key("output"));
}

#[tokio::test]
async fn test_two_step_pipeline_through_shared_store() {
    // Step 1 rewrites the question into a search query; step 2 searches it.
    let generate = Arc::new(GenerateRegistry::new());
    generate
        .register(
            "rewriter",
            Arc::new(GenerateFn::new(|prompt, _, _| {
                Ok(format!("site:docs.rs {prompt}"))
            })),
        )
        .unwrap();

    let search = Arc::new(SearchRegistry::new());
    search
        .register(
            "mock",
            Arc::new(SearchFn::new(|query, _, _| {
                Ok(vec![SearchRecord::new(
                    format!("result for {query}"),
                    "snippet",
                    "https://docs.rs",
                )])
            })),
        )
        .unwrap();

    let rewrite = LlmNode::new(generate)
        .with_input_key("question")
        .with_output_key("query");
    let lookup = SearchNode::new(search).with_formatted_results();

    let mut shared = SharedStore::new();
    shared.insert("question".to_string(), json!("tokio mutex"));

    rewrite.run(&mut shared).await.unwrap();
    lookup.run(&mut shared).await.unwrap();

    assert_eq!(shared.get("query"), Some(&json!("site:docs.rs tokio mutex")));
    let formatted = shared.get("search_results").unwrap().as_str().unwrap();
    assert!(formatted.contains("result for site:docs.rs tokio mutex"));
}
