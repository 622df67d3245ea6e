use policy_yields_protocol::{ArgumentError, CollectionType, DataId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("missing required argument: {name}")]
    MissingArgument { name: String },
    #[error("argument {name} is not a number: {value:?}")]
    InvalidNumber { name: String, value: String },
    #[error("unhandled modifier arguments: {arguments}")]
    UnhandledArguments { arguments: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown collection type: {0}")]
    UnknownCollectionType(String),
    #[error("unknown requirement set type: {0}")]
    UnknownRequirementSetType(String),
    #[error("current age {0:?} cannot be resolved")]
    UnknownEra(Option<DataId>),
    #[error("{0} requires a parent subject")]
    MissingParentSubject(CollectionType),
    #[error("requirement set {set_id} nested deeper than {max_depth} levels")]
    RequirementDepthExceeded { set_id: DataId, max_depth: usize },
}

impl From<ArgumentError> for EvalError {
    fn from(err: ArgumentError) -> Self {
        match err {
            ArgumentError::Missing { name } => EvalError::MissingArgument { name },
            ArgumentError::InvalidNumber { name, value } => {
                EvalError::InvalidNumber { name, value }
            }
        }
    }
}
