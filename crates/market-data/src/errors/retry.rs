/// Classification for retry policy.
///
/// Used by callers of a provider to decide how to react to a failed fetch.
///
/// | Class | Retry same provider? | Try another source? |
/// |-------|----------------------|---------------------|
/// | `Never` | No | No |
/// | `WithBackoff` | Yes, later | No |
/// | `NextProvider` | No | Yes |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// The request is invalid for this provider. Retrying won't help.
    Never,

    /// Transient failure (timeout, network). The next scheduled refresh may succeed.
    WithBackoff,

    /// The provider rejected or mangled the request. Other sources are unaffected.
    NextProvider,
}
