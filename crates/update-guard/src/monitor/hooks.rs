use super::types::{HookAction, QueryContext, QueryHook};
use std::fmt;
use std::sync::Arc;

/// Runs hooks in registration order until one aborts.
///
/// Typically a [`TracingSqlHook`](super::TracingSqlHook) followed by the
/// [`FullUpdateGuard`](crate::FullUpdateGuard), so rejected statements are
/// still logged.
#[derive(Clone, Default)]
pub struct CompositeHook {
    chain: Vec<Arc<dyn QueryHook>>,
}

impl CompositeHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook to the chain.
    #[allow(clippy::should_implement_trait)]
    pub fn add<H: QueryHook + 'static>(self, hook: H) -> Self {
        self.add_arc(Arc::new(hook))
    }

    /// Append a hook that is shared with other owners.
    pub fn add_arc(mut self, hook: Arc<dyn QueryHook>) -> Self {
        self.chain.push(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl FromIterator<Arc<dyn QueryHook>> for CompositeHook {
    fn from_iter<I: IntoIterator<Item = Arc<dyn QueryHook>>>(iter: I) -> Self {
        Self {
            chain: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for CompositeHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeHook")
            .field("len", &self.chain.len())
            .finish()
    }
}

impl QueryHook for CompositeHook {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        self.chain
            .iter()
            .map(|hook| hook.before_query(ctx))
            .find(HookAction::is_abort)
            .unwrap_or(HookAction::Continue)
    }
}
