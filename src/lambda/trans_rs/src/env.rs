use crate::error::TransError;

pub const OUTPUT_BUCKET_VAR: &str = "OUTPUT_BUCKET_NAME";
pub const ROLE_ARN_VAR: &str = "MEDIACONVERT_ROLE_ARN";

/// Values the function reads from its environment at cold start.
#[derive(Debug, Clone)]
pub struct Settings {
    pub output_bucket: String,
    pub role_arn: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, TransError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TransError> {
        Ok(Settings {
            output_bucket: required_env_var(&lookup, OUTPUT_BUCKET_VAR)?,
            role_arn: required_env_var(&lookup, ROLE_ARN_VAR)?,
        })
    }
}

fn required_env_var(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<String, TransError> {
    match lookup(name) {
        Some(val) if !val.is_empty() => Ok(val),
        _ => Err(TransError::MissingEnv(name)),
    }
}
