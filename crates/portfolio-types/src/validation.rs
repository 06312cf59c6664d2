use std::collections::BTreeMap;

use regex::Regex;

use crate::api::ContactRequest;

/// Custom predicate attached to a rule. Returns `Ok(())` to pass or a
/// descriptive failure message.
pub type CustomCheck = Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

/// Per-field validation rule: required presence, length bounds, shape
/// pattern, and an optional custom predicate. Values are trimmed before
/// any rule is evaluated.
pub struct FieldRule {
    label: String,
    required: bool,
    min_len: Option<usize>,
    max_len: Option<usize>,
    pattern: Option<(Regex, String)>,
    custom: Option<CustomCheck>,
}

impl FieldRule {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            required: false,
            min_len: None,
            max_len: None,
            pattern: None,
            custom: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_len(mut self, n: usize) -> Self {
        self.min_len = Some(n);
        self
    }

    pub fn max_len(mut self, n: usize) -> Self {
        self.max_len = Some(n);
        self
    }

    pub fn pattern(mut self, regex: Regex, message: impl Into<String>) -> Self {
        self.pattern = Some((regex, message.into()));
        self
    }

    pub fn custom<F>(mut self, check: F) -> Self
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        self.custom = Some(Box::new(check));
        self
    }

    /// First failing rule wins; `None` means the value passes.
    /// Length, pattern, and custom checks are skipped for an empty
    /// optional field.
    fn check(&self, raw: &str) -> Option<String> {
        let value = raw.trim();

        if value.is_empty() {
            if self.required {
                return Some(format!("{} is required", self.label));
            }
            return None;
        }

        if let Some(min) = self.min_len {
            if value.chars().count() < min {
                return Some(format!(
                    "{} must be at least {} characters",
                    self.label, min
                ));
            }
        }

        if let Some(max) = self.max_len {
            if value.chars().count() > max {
                return Some(format!(
                    "{} must be at most {} characters",
                    self.label, max
                ));
            }
        }

        if let Some((regex, message)) = &self.pattern {
            if !regex.is_match(value) {
                return Some(message.clone());
            }
        }

        if let Some(check) = &self.custom {
            if let Err(message) = check(value) {
                return Some(message);
            }
        }

        None
    }
}

/// Result of validating a candidate submission. `Bot` must be
/// indistinguishable from success to the submitter; callers drop the
/// submission without surfacing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    /// Field name -> human-readable message.
    Invalid(BTreeMap<String, String>),
    Bot,
}

struct FieldSpec {
    key: &'static str,
    get: fn(&ContactRequest) -> &str,
    rule: FieldRule,
}

/// Validates contact form submissions against a fixed rule set.
pub struct ContactValidator {
    fields: Vec<FieldSpec>,
}

impl Default for ContactValidator {
    fn default() -> Self {
        let email_shape = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .expect("email pattern is a valid regex");

        Self {
            fields: vec![
                FieldSpec {
                    key: "name",
                    get: |f| &f.name,
                    rule: FieldRule::new("Name").required().min_len(2).max_len(100),
                },
                FieldSpec {
                    key: "email",
                    get: |f| &f.email,
                    rule: FieldRule::new("Email")
                        .required()
                        .pattern(email_shape, "Please enter a valid email address"),
                },
                FieldSpec {
                    key: "subject",
                    get: |f| &f.subject,
                    rule: FieldRule::new("Subject").max_len(200),
                },
                FieldSpec {
                    key: "message",
                    get: |f| &f.message,
                    rule: FieldRule::new("Message").required().min_len(10),
                },
            ],
        }
    }
}

impl ContactValidator {
    pub fn validate(&self, form: &ContactRequest) -> ValidationOutcome {
        // Honeypot first: a populated trap field short-circuits everything.
        if !form.honeypot.trim().is_empty() {
            return ValidationOutcome::Bot;
        }

        let mut errors = BTreeMap::new();
        for field in &self.fields {
            if let Some(message) = field.rule.check((field.get)(form)) {
                errors.insert(field.key.to_string(), message);
            }
        }

        if errors.is_empty() {
            ValidationOutcome::Valid
        } else {
            ValidationOutcome::Invalid(errors)
        }
    }
}
