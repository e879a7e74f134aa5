//! VM-side errors: resource and program-shape failures the matcher
//! surfaces as a `thiserror` enum.

/// Resource or program-shape problems that abort a match outright — as
/// opposed to an ordinary parse failure, which `Matcher::exec` reports
/// via `MatchResult::error` instead (the two are deliberately distinct:
/// these are fatal for the match, `MatchFailed` carries a best-effort
/// partial tree alongside it). `FuelExhausted` stands in for spec.md's
/// "Interrupted" (an externally-bounded step budget rather than a signal
/// handler); `StackOverflow` is the backtrack stack's own hard cap.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RuntimeError {
    #[error("execution step limit exceeded")]
    FuelExhausted,
    #[error("call recursion limit exceeded")]
    RecursionLimitExceeded,
    #[error("backtrack stack overflow")]
    StackOverflow,
    #[error("program defines no entry rule")]
    NoEntryPoint,
}
