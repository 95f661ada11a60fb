//! Resolution traces.
//!
//! `CompiledRules::resolve` returns only the winner. When an operator wants to
//! know *why* a URL lands where it does, `CompiledRules::resolve_with_trace`
//! returns a [`ResolveTrace`] instead: how many indexed rules were considered,
//! which ones matched, the winner and the time spent.
//!
//! Traces are opt-in; the navigation path never allocates them.

use crate::Rule;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ResolveTrace<'a> {
    /// Host extracted from the URL, when domain rules needed it.
    pub host: Option<String>,
    /// Number of enabled rules pulled from the index for this URL.
    pub considered: usize,
    /// Rules whose pattern matched, in input order.
    pub matched: Vec<&'a Rule>,
    /// Rule selected by priority, then recency, then input order.
    pub winner: Option<&'a Rule>,
    pub elapsed: Duration,
}
