use thiserror::Error;

use crate::model::bank::BankError;
use crate::model::question::QuestionError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Bank(#[from] BankError),
}
