//! Bridge between `validator` derives and [`CoreError`].

use validator::Validate;

use crate::error::CoreError;

/// Run a DTO's derived validation rules, folding failures into one
/// [`CoreError::Validation`] message (fields sorted for stable output).
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(|errors| {
        let mut problems: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let detail = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    format!("{field}: {detail}")
                })
            })
            .collect();
        problems.sort();
        CoreError::Validation(problems.join("; "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, max = 5, message = "must be 1-5 characters"))]
        name: String,
        #[validate(range(min = 0))]
        stock: i32,
    }

    #[test]
    fn valid_input_passes() {
        let sample = Sample {
            name: "bar".into(),
            stock: 0,
        };
        assert!(validate_input(&sample).is_ok());
    }

    #[test]
    fn failures_are_reported_per_field() {
        let sample = Sample {
            name: "too long".into(),
            stock: -1,
        };
        let err = validate_input(&sample).unwrap_err();
        let CoreError::Validation(msg) = err else {
            panic!("expected validation error");
        };
        assert_eq!(msg, "name: must be 1-5 characters; stock: range");
    }
}
