/// Errors raised while building or publishing block shapes.
///
/// Nothing on the query path returns this type: an unresolved neighbor simply
/// fails the predicate that asked about it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("template error: {0}")]
    Template(String),
}

pub type Result<T> = std::result::Result<T, ShapeError>;
