pub mod department;
pub mod question;

pub use department::{Department, DepartmentId, Section};
pub use question::{QuestionOption, QuestionSpec, QuestionType};
