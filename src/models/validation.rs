use std::collections::BTreeMap;

use thiserror::Error;

/// Field name to human readable message mapping produced by rule
/// evaluation. A `BTreeMap` keeps serialization deterministic.
pub type ValidationErrors = BTreeMap<String, String>;

/// Raised when a rule itself is broken rather than the value it inspects:
/// a programming mistake or a failed collaborator, never user input. These
/// abort the request instead of being reported as validation errors.
#[derive(Debug, Error)]
#[error("validator internal error: {0}")]
pub struct InternalError(#[from] pub anyhow::Error);

/// The outcome of checking a single rule against a value.
#[derive(Debug)]
pub enum RuleError {
    /// The value failed the rule; the message is shown to the caller.
    Invalid(String),

    /// The rule could not be evaluated at all.
    Internal(InternalError),
}

type CustomCheck = Box<dyn Fn(&str) -> Result<(), RuleError> + Send + Sync>;

/// A single field-level validation rule. The set is closed: every rule a
/// field can carry is one of these variants, each answering the same
/// "check this value" question.
pub enum Rule {
    /// The value must not be blank.
    Required,

    /// The value must look like an email address.
    Email,

    /// The character length must fall within `min..=max`.
    Length { min: usize, max: usize },

    /// A caller supplied predicate, for rules that need context beyond the
    /// value itself (eg. a uniqueness lookup resolved before validation).
    Custom(CustomCheck),
}

impl Rule {
    /// Shorthand for a length rule.
    pub fn length(min: usize, max: usize) -> Self {
        Rule::Length { min, max }
    }

    /// Wraps a predicate as a rule.
    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&str) -> Result<(), RuleError> + Send + Sync + 'static,
    {
        Rule::Custom(Box::new(check))
    }

    fn check(&self, value: &str) -> Result<(), RuleError> {
        match self {
            Rule::Required => {
                if value.trim().is_empty() {
                    return Err(RuleError::Invalid("cannot be blank".to_string()));
                }
                Ok(())
            }
            Rule::Email => {
                if is_email(value) {
                    Ok(())
                } else {
                    Err(RuleError::Invalid(
                        "must be a valid email address".to_string(),
                    ))
                }
            }
            Rule::Length { min, max } => {
                let length = value.chars().count();
                if length < *min || length > *max {
                    return Err(RuleError::Invalid(format!(
                        "the length must be between {min} and {max}"
                    )));
                }
                Ok(())
            }
            Rule::Custom(check) => check(value),
        }
    }
}

/// Structural email check: one `@` separating a non-empty local part from a
/// dotted domain with non-empty labels.
fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

/// Composes a set of fields, each with an ordered rule list, and evaluates
/// them. Rules run in order per field and the first failure wins, so a
/// `Required` failure masks any later format rule for that field.
#[derive(Default)]
pub struct Validator {
    errors: ValidationErrors,
    internal: Option<InternalError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field and checks its rules immediately.
    pub fn field(mut self, name: &str, value: &str, rules: Vec<Rule>) -> Self {
        if self.internal.is_some() || self.errors.contains_key(name) {
            return self;
        }

        for rule in &rules {
            match rule.check(value) {
                Ok(()) => {}
                Err(RuleError::Invalid(message)) => {
                    self.errors.insert(name.to_string(), message);
                    break;
                }
                Err(RuleError::Internal(err)) => {
                    self.internal = Some(err);
                    break;
                }
            }
        }

        self
    }

    /// Returns the accumulated per-field errors, or the internal error if
    /// any rule failed to evaluate. An empty map means every field passed.
    pub fn finish(self) -> Result<ValidationErrors, InternalError> {
        match self.internal {
            Some(err) => Err(err),
            None => Ok(self.errors),
        }
    }
}
