#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkillError {
    #[error("duplicate skill {field} `{value}`")]
    DuplicateSkill { field: &'static str, value: String },

    #[error("skill validation error: {0}")]
    Validation(String),

    #[error("skill `{skill}` failed: {message}")]
    Action { skill: String, message: String },
}

pub type SkillResult<T> = Result<T, SkillError>;
