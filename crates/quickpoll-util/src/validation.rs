use std::collections::HashSet;
use thiserror::Error;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 1_000;
pub const MAX_OPTION_LEN: usize = 200;
pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 20;
pub const MAX_VOTER_TOKEN_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Question is required and must be a non-empty string")]
    EmptyTitle,
    #[error("Question must be at most {MAX_TITLE_LEN} characters")]
    TitleTooLong,
    #[error("Description must be at most {MAX_DESCRIPTION_LEN} characters")]
    DescriptionTooLong,
    #[error("At least two options are required")]
    TooFewOptions,
    #[error("A poll can have at most {MAX_OPTIONS} options")]
    TooManyOptions,
    #[error("Each option must be a non-empty string")]
    EmptyOption,
    #[error("Each option must be at most {MAX_OPTION_LEN} characters")]
    OptionTooLong,
    #[error("Duplicate option: {0}")]
    DuplicateOption(String),
}

/// Returns the trimmed title.
pub fn validate_title(title: &str) -> Result<&str, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(title)
}

/// Returns the trimmed description, or `None` when absent or blank.
pub fn validate_description(description: Option<&str>) -> Result<Option<&str>, ValidationError> {
    let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(Some(description))
}

/// Returns the trimmed option texts in input order.
///
/// Texts that are equal after trimming are rejected rather than merged.
pub fn validate_options<S: AsRef<str>>(options: &[S]) -> Result<Vec<&str>, ValidationError> {
    if options.len() < MIN_OPTIONS {
        return Err(ValidationError::TooFewOptions);
    }
    if options.len() > MAX_OPTIONS {
        return Err(ValidationError::TooManyOptions);
    }

    let mut seen = HashSet::with_capacity(options.len());
    let mut out = Vec::with_capacity(options.len());
    for option in options {
        let text = option.as_ref().trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyOption);
        }
        if text.chars().count() > MAX_OPTION_LEN {
            return Err(ValidationError::OptionTooLong);
        }
        if !seen.insert(text) {
            return Err(ValidationError::DuplicateOption(text.to_string()));
        }
        out.push(text);
    }
    Ok(out)
}
