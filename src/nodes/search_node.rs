use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Map;

use crate::error::DispatchError;
use crate::options::{CallOptions, OptionValue};
use crate::providers::{SearchRegistry, format_results};

use super::template::{PromptTemplate, gather_context};
use super::{NodeLogic, NodeValue, RetryPolicy, SharedStore};

/// A workflow node that runs a web search through a registered provider.
///
/// The rendered query is dispatched with `num_results` merged into the
/// options; results land in the shared store either as a JSON array of
/// records or, with [`with_formatted_results`](SearchNode::with_formatted_results),
/// as one readable string. An empty query short-circuits to an empty result
/// without touching any provider.
#[derive(Clone)]
pub struct SearchNode {
    registry: Arc<SearchRegistry>,
    input_key: String,
    output_key: String,
    template: PromptTemplate,
    address: Option<String>,
    num_results: u32,
    format_results: bool,
    options: CallOptions,
    retry: RetryPolicy,
}

impl SearchNode {
    /// Creates a node with the defaults: input `"query"`, output
    /// `"search_results"`, template `"{input}"`, default provider, 5 results,
    /// raw (unformatted) output, 3 attempts with a 1s wait.
    pub fn new(registry: Arc<SearchRegistry>) -> Self {
        SearchNode {
            registry,
            input_key: "query".to_string(),
            output_key: "search_results".to_string(),
            template: PromptTemplate::default(),
            address: None,
            num_results: 5,
            format_results: false,
            options: CallOptions::new(),
            retry: RetryPolicy::default(),
        }
    }

    /// Sets the shared-store key the query is read from.
    pub fn with_input_key(mut self, key: impl Into<String>) -> Self {
        self.input_key = key.into();
        self
    }

    /// Sets the shared-store key the results are written to.
    pub fn with_output_key(mut self, key: impl Into<String>) -> Self {
        self.output_key = key.into();
        self
    }

    /// Sets the query template.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = PromptTemplate::new(template);
        self
    }

    /// Selects a provider by name, bypassing default election.
    pub fn with_provider(mut self, name: impl Into<String>) -> Self {
        self.address = Some(format!("{}/", name.into()));
        self
    }

    /// Sets the full `"provider/model"` address, for backends that expose
    /// multiple search indexes as models.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the number of results requested from the provider.
    pub fn with_num_results(mut self, num_results: u32) -> Self {
        self.num_results = num_results;
        self
    }

    /// Formats results as a readable string instead of a raw record array.
    pub fn with_formatted_results(mut self) -> Self {
        self.format_results = true;
        self
    }

    /// Adds a pass-through option forwarded to the provider.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key, value);
        self
    }

    /// Replaces the whole pass-through options bag.
    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the retry configuration applied by the caller.
    pub fn with_retry(mut self, max_retries: u32, wait: Duration) -> Self {
        self.retry = RetryPolicy { max_retries, wait };
        self
    }

    fn empty_result(&self) -> NodeValue {
        if self.format_results {
            NodeValue::String(String::new())
        } else {
            NodeValue::Array(vec![])
        }
    }
}

#[async_trait]
impl NodeLogic for SearchNode {
    fn clone_box(&self) -> Box<dyn NodeLogic> {
        Box::new(self.clone())
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Gathers every template value from the shared store.
    async fn prep(&self, shared: &SharedStore) -> NodeValue {
        NodeValue::Object(gather_context(&self.template, &self.input_key, shared))
    }

    /// Renders the query and dispatches the search, unless the query is empty.
    async fn exec(&self, input: NodeValue) -> Result<NodeValue, DispatchError> {
        let context = match input {
            NodeValue::Object(map) => map,
            _ => Map::new(),
        };
        let query = self.template.render(&context);
        if query.is_empty() {
            return Ok(self.empty_result());
        }

        // Node configuration wins over a caller-supplied num_results option.
        let mut options = self.options.clone();
        options.insert("num_results", self.num_results as i64);

        let records = self
            .registry
            .search(&query, self.address.as_deref(), &options)
            .await?;

        if self.format_results {
            Ok(NodeValue::String(format_results(&records)))
        } else {
            Ok(serde_json::to_value(records)?)
        }
    }

    /// Stores the results under the output key.
    async fn post(
        &self,
        shared: &mut SharedStore,
        _prep_res: NodeValue,
        exec_res: NodeValue,
    ) -> Option<String> {
        shared.insert(self.output_key.clone(), exec_res);
        None
    }
}
