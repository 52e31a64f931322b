//! Runtime context for agent execution

use crate::types::Usage;
use std::any::Any;
use std::sync::Arc;

type SharedData = Arc<dyn Any + Send + Sync>;

/// Runtime context wrapper for agent execution
///
/// The context holds user-provided state and usage statistics.
/// It is passed to tools, dynamic instructions and guardrails during execution.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    data: Option<SharedData>,
    usage: Usage,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a run context carrying user data
    pub fn with_context<T: Any + Send + Sync + 'static>(data: T) -> Self {
        Self {
            data: Some(Arc::new(data)),
            usage: Usage::default(),
        }
    }

    /// Fresh context that shares this context's user data but starts with empty usage
    ///
    /// Used for nested runs such as classifier guardrails.
    pub fn fork(&self) -> Self {
        Self {
            data: self.data.clone(),
            usage: Usage::default(),
        }
    }

    /// Get the user data, if present and of type `T`
    pub fn context<T: Any + Send + Sync + 'static>(&self) -> Option<&T> {
        self.data.as_ref().and_then(|c| c.downcast_ref::<T>())
    }

    pub fn has_context(&self) -> bool {
        self.data.is_some()
    }

    pub fn usage(&self) -> &Usage {
        &self.usage
    }

    /// Add usage from a model response
    pub fn add_usage(&mut self, usage: &Usage) {
        self.usage.add(usage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Profile {
        name: &'static str,
    }

    #[test]
    fn test_typed_context_lookup() {
        let ctx = RunContext::with_context(Profile { name: "serena" });
        assert_eq!(ctx.context::<Profile>(), Some(&Profile { name: "serena" }));
        assert!(ctx.context::<String>().is_none());
        assert!(!RunContext::new().has_context());
    }

    #[test]
    fn test_fork_shares_data_not_usage() {
        let mut ctx = RunContext::with_context(Profile { name: "pearl" });
        ctx.add_usage(&Usage {
            requests: 1,
            input_tokens: 10,
            output_tokens: 5,
            total_tokens: 15,
        });

        let forked = ctx.fork();
        assert_eq!(forked.context::<Profile>().map(|p| p.name), Some("pearl"));
        assert_eq!(forked.usage(), &Usage::default());
        assert_eq!(ctx.usage().total_tokens, 15);
    }
}
