use thiserror::Error;

/// Errors surfaced by the engine at construction time or during a run.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Rejected at construction: invalid domain, grid size, CFL, or theta.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The solution check found a non-positive depth; the run is aborted.
    #[error("solution diverged at cell ({ix}, {iy}): h = {value}")]
    Diverged { ix: usize, iy: usize, value: f64 },

    /// Propagated failure writing a rendered frame.
    #[error("render I/O error: {0}")]
    Io(#[from] std::io::Error),
}
