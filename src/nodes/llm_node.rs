use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Map;

use crate::error::DispatchError;
use crate::options::{CallOptions, OptionValue};
use crate::providers::GenerateRegistry;

use super::template::{PromptTemplate, gather_context};
use super::{NodeLogic, NodeValue, RetryPolicy, SharedStore};

/// A workflow node that calls a text-generation provider with a templated
/// prompt.
///
/// The template may reference any `{placeholder}` key in the shared store;
/// `{input}` always resolves to the configured input key's value. The
/// generated text lands in the shared store under the output key.
///
/// # Example
/// ```rust,no_run
/// use patchbay::{GenerateRegistry, LlmNode};
/// use std::sync::Arc;
///
/// let registry = Arc::new(GenerateRegistry::new());
/// let node = LlmNode::new(Arc::clone(&registry))
///     .with_input_key("document")
///     .with_output_key("summary")
///     .with_template("Summarize this in 3 sentences:\n\n{document}")
///     .with_model("openai/gpt-4o");
/// ```
#[derive(Clone)]
pub struct LlmNode {
    registry: Arc<GenerateRegistry>,
    input_key: String,
    output_key: String,
    template: PromptTemplate,
    model: Option<String>,
    options: CallOptions,
    retry: RetryPolicy,
}

impl LlmNode {
    /// Creates a node with the defaults: input `"input"`, output `"output"`,
    /// template `"{input}"`, default provider, 3 attempts with a 1s wait.
    pub fn new(registry: Arc<GenerateRegistry>) -> Self {
        LlmNode {
            registry,
            input_key: "input".to_string(),
            output_key: "output".to_string(),
            template: PromptTemplate::default(),
            model: None,
            options: CallOptions::new(),
            retry: RetryPolicy::default(),
        }
    }

    /// Sets the shared-store key the primary input is read from.
    pub fn with_input_key(mut self, key: impl Into<String>) -> Self {
        self.input_key = key.into();
        self
    }

    /// Sets the shared-store key the response is written to.
    pub fn with_output_key(mut self, key: impl Into<String>) -> Self {
        self.output_key = key.into();
        self
    }

    /// Sets the prompt template.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = PromptTemplate::new(template);
        self
    }

    /// Sets the model address (`"provider/model"` or bare `"model"`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
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
}

#[async_trait]
impl NodeLogic for LlmNode {
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

    /// Renders the prompt and dispatches it through the registry.
    async fn exec(&self, input: NodeValue) -> Result<NodeValue, DispatchError> {
        let context = match input {
            NodeValue::Object(map) => map,
            _ => Map::new(),
        };
        let prompt = self.template.render(&context);
        let response = self
            .registry
            .generate(&prompt, self.model.as_deref(), &self.options)
            .await?;
        Ok(NodeValue::String(response))
    }

    /// Stores the response under the output key.
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
