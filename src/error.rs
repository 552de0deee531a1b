use thiserror::Error;

pub type Result<T> = std::result::Result<T, OverfillError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverfillError {
    #[error("Field of view must be within (0, 180) degrees, got {0}")]
    InvalidFov(f32),
    #[error("Orientation error projects the {corner} corner to depth {depth}, behind or on the eye plane")]
    DegenerateOrientation { corner: &'static str, depth: f32 },
}
