use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("frequency must be one of 1, 2, 3, 4, 6 or 12 payments per year, got {0}")]
    InvalidFrequency(u32),
    #[error("configure a positive safe withdrawal rate to compute a FIRE target")]
    UndefinedFireTarget,
}
