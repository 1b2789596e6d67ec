use crate::model::Identity;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("vertex properties must contain an `id` key")]
    MissingIdentity,

    #[error("vertex id `{id}` is not unique")]
    DuplicateIdentity { id: Identity },
}
