use crate::Fp;

/// Rejections from the validated shape constructors.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ShapeError {
    #[error("aabb size must not be negative, got ({0}, {1})")]
    NegativeSize(Fp, Fp),

    #[error("circle radius must not be negative, got {0}")]
    NegativeRadius(Fp),

    #[error("shape coordinates must be finite")]
    NonFinite,
}

pub type Result<T, E = ShapeError> = std::result::Result<T, E>;
