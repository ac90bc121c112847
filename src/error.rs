use thiserror::Error;

/// Bookkeeping failures raised by the machine itself.  All of these are caller
/// mistakes detected before any mutation happens; none are transient.  User
/// callback errors are not represented here, they propagate through untouched.
#[derive(Error, Copy, Clone, PartialEq, Eq, Debug)]
pub enum MachineError {
    #[error("state is already registered with this machine")]
    StateAlreadyAdded,

    #[error("state was never registered with this machine")]
    StateNotAdded,

    #[error("source and target states already have a transition between them")]
    SourceAndTargetAlreadyConnected,
}
