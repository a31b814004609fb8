//! A two-step pipeline: rewrite a question with a generation provider, then
//! search for it and print the formatted results.
//!
//! Both providers are local mocks; swap in real backends by implementing
//! `GenerateProvider` / `SearchProvider` over your HTTP client of choice.
//!
//! Run with: `cargo run --example pipeline`

use std::sync::Arc;

use patchbay::prelude::*;
use serde_json::json;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), DispatchError> {
    // ------------------------------------------------------------------
    // Initialization: register providers once, before any workflow runs.
    // ------------------------------------------------------------------
    let generate = Arc::new(GenerateRegistry::new());
    generate.register(
        "rewriter",
        Arc::new(GenerateFn::new(|prompt, model, _opts| {
            Ok(format!(
                "[{}] concise web query for: {prompt}",
                model.unwrap_or("default-model")
            ))
        })),
    )?;

    let search = Arc::new(SearchRegistry::new());
    search.register(
        "mocksearch",
        Arc::new(SearchFn::new(|query, _model, opts| {
            let n = opts.get_i64("num_results").unwrap_or(5);
            Ok((1..=n.min(3))
                .map(|i| {
                    SearchRecord::new(
                        format!("Result {i} for '{query}'"),
                        "A snippet describing the result.",
                        format!("https://example.com/{i}"),
                    )
                })
                .collect())
        })),
    )?;

    // ------------------------------------------------------------------
    // Wire two nodes over a shared store and run them in sequence.
    // ------------------------------------------------------------------
    let rewrite = LlmNode::new(Arc::clone(&generate))
        .with_input_key("question")
        .with_output_key("query")
        .with_template("{question}")
        .with_model("rewriter/fast");
    let lookup = SearchNode::new(Arc::clone(&search))
        .with_num_results(3)
        .with_formatted_results();

    let mut shared = SharedStore::new();
    shared.insert(
        "question".to_string(),
        json!("how does tokio schedule tasks?"),
    );

    rewrite.run(&mut shared).await?;
    lookup.run(&mut shared).await?;

    println!("Query:  {}", shared["query"].as_str().unwrap_or(""));
    println!();
    println!("{}", shared["search_results"].as_str().unwrap_or(""));

    Ok(())
}
