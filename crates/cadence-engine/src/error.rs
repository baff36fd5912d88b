use thiserror::Error;

/// Errors returned by listener registration.
///
/// Everything else in the engine normalizes bad input instead of failing;
/// a rejected registration means the call site itself is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A listener was registered against an event type with an empty name.
    #[error("cannot register a listener for an empty event type")]
    EmptyEventType,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
