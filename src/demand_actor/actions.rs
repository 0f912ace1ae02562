#[derive(Debug, Clone)]
pub enum DemandAction {
    /// Flags the demand fulfilled. Answers `true` only for the call that
    /// performed the transition, so two racing resolvers never both claim it.
    MarkFulfilled,
}
