use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::{AppError, Result};

/// Input validation for request payloads
///
/// `validator` collects every violation into a map; clients get exactly one
/// message, taken from the first violated field in declaration order.
pub trait OrderedValidation: Validate {
    /// Field paths in reporting order. Nested fields use `parent.child`.
    const FIELD_ORDER: &'static [&'static str];
}

/// Validate `input`, turning the first violation into `AppError::BadRequest`.
pub fn validate_request<T: OrderedValidation>(input: &T) -> Result<()> {
    match input.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(AppError::BadRequest(first_violation(&errors, T::FIELD_ORDER))),
    }
}

fn first_violation(errors: &ValidationErrors, order: &[&str]) -> String {
    order
        .iter()
        .find_map(|path| message_at(errors, path))
        .unwrap_or_else(|| "Invalid request".to_string())
}

fn message_at(errors: &ValidationErrors, path: &str) -> Option<String> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };

    match (errors.errors().get(head)?, rest) {
        (ValidationErrorsKind::Field(list), None) => list.first().map(|err| {
            err.message
                .as_ref()
                .map(|msg| msg.to_string())
                .unwrap_or_else(|| format!("Invalid {}", head))
        }),
        (ValidationErrorsKind::Struct(inner), Some(rest)) => message_at(inner, rest),
        _ => None,
    }
}
