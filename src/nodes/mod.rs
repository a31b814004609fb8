//! Workflow-step adapters consuming the provider registries.
//!
//! The orchestration framework owns graph traversal and scheduling; it drives
//! each step through the three-phase [`NodeLogic`] lifecycle (prep, exec,
//! post). This module defines that lifecycle surface plus the two
//! template-driven adapters, [`LlmNode`] and [`SearchNode`].

pub mod llm_node;
pub mod search_node;
pub mod template;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::DispatchError;

pub use llm_node::LlmNode;
pub use search_node::SearchNode;
pub use template::PromptTemplate;

/// A value stored in the shared workflow state.
pub type NodeValue = serde_json::Value;

/// The shared key-value state carrying data between workflow steps.
///
/// Owned by the orchestration framework; nodes read it in `prep` and write it
/// in `post`, never holding onto it between phases.
pub type SharedStore = HashMap<String, NodeValue>;

/// Retry configuration declared by a node and applied by its caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total number of exec attempts before the error surfaces.
    pub max_retries: u32,
    /// Delay between attempts.
    pub wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            wait: Duration::from_secs(1),
        }
    }
}

/// Defines the behavior of a workflow node.
///
/// Three-phase execution model:
/// 1. **Prep**: gather inputs from the shared state
/// 2. **Exec**: produce the result (the only fallible, retryable phase)
/// 3. **Post**: commit the result to the shared state, optionally returning
///    the next action for the surrounding flow
///
/// The provided [`run`](NodeLogic::run) drives one full lifecycle with the
/// node's [`RetryPolicy`]; orchestration frameworks with their own scheduling
/// may call the phases directly instead.
#[async_trait]
pub trait NodeLogic: Send + Sync + 'static {
    /// Create a boxed clone of this trait object.
    ///
    /// Required for cloning `Box<dyn NodeLogic>`.
    fn clone_box(&self) -> Box<dyn NodeLogic>;

    /// The retry configuration the caller should apply to
    /// [`exec`](NodeLogic::exec).
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
    }

    /// Gather inputs from the shared state.
    ///
    /// # Returns
    /// A [`NodeValue`] to be processed by [`exec`](NodeLogic::exec).
    async fn prep(&self, shared: &SharedStore) -> NodeValue;

    /// Produce the node's result from the gathered input.
    ///
    /// # Errors
    /// Any [`DispatchError`]; the caller retries per
    /// [`retry_policy`](NodeLogic::retry_policy) and surfaces the final
    /// failure unchanged.
    async fn exec(&self, input: NodeValue) -> Result<NodeValue, DispatchError>;

    /// Commit the result to the shared state.
    ///
    /// # Returns
    /// * `Some(action)` - the flow should follow this action to a successor
    /// * `None` - the flow should terminate
    async fn post(
        &self,
        shared: &mut SharedStore,
        prep_res: NodeValue,
        exec_res: NodeValue,
    ) -> Option<String>;

    /// Runs one full lifecycle: prep once, exec with retries, then post.
    ///
    /// Exec failures short of the attempt limit are logged at warn and retried
    /// after [`RetryPolicy::wait`]; the final failure is returned without
    /// running post.
    ///
    /// # Errors
    /// The last [`DispatchError`] from [`exec`](NodeLogic::exec) once all
    /// attempts are exhausted.
    async fn run(&self, shared: &mut SharedStore) -> Result<Option<String>, DispatchError> {
        let policy = self.retry_policy();
        let attempts = policy.max_retries.max(1);

        let prep_res = self.prep(shared).await;
        let mut attempt = 1;
        let exec_res = loop {
            match self.exec(prep_res.clone()).await {
                Ok(value) => break value,
                Err(err) if attempt < attempts => {
                    log::warn!(
                        "Node exec attempt {attempt}/{attempts} failed: {err}. Retrying in {:?}.",
                        policy.wait
                    );
                    attempt += 1;
                    tokio::time::sleep(policy.wait).await;
                }
                Err(err) => return Err(err),
            }
        };
        Ok(self.post(shared, prep_res, exec_res).await)
    }
}

impl Clone for Box<dyn NodeLogic> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
