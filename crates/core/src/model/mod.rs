pub mod bank;
mod ids;
mod images;
pub mod question;

pub use bank::{BankError, QuestionBank};
pub use ids::{ImageKey, QuestionId};
pub use images::ImageStore;
pub use question::{Question, QuestionError};
