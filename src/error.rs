use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Fixed sizes plus separators exceed the space along the layout axis, so
    /// auto-sized items would get a negative length.
    #[error(
        "layout is over-constrained: {fixed} fixed cells + {separators} separators exceed {space} available"
    )]
    Overconstrained {
        space: u16,
        fixed: u32,
        separators: u16,
    },
}
