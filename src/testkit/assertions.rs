//! Assertion macros for evaluation results.
//!
//! - [`crate::assert_status!`] - Assert color and reason of a result
//! - [`crate::assert_result_err!`] - Assert a `Result` is `Err` and extract it
//!
//! # Example
//!
//! ```rust,ignore
//! use healthmap::assert_status;
//!
//! assert_status!(result, Gray, "No entities selected.");
//! assert_status!(result, Red, contains "2 out of 5");
//! ```

/// Assert the color of an `EvaluationResult` (or `Status`) and optionally its
/// reason, either exactly or by substring.
#[macro_export]
macro_rules! assert_status {
    ($result:expr, $color:ident) => {
        assert_eq!(
            $result.color,
            $crate::core::StatusColor::$color,
            "unexpected color, reason was: {:?}\n  at {}:{}",
            $result.reason,
            file!(),
            line!()
        );
    };
    ($result:expr, $color:ident, contains $needle:expr) => {
        $crate::assert_status!($result, $color);
        assert!(
            $result.reason.contains($needle),
            "reason {:?} does not contain {:?}",
            $result.reason,
            $needle
        );
    };
    ($result:expr, $color:ident, $reason:expr) => {
        $crate::assert_status!($result, $color);
        assert_eq!($result.reason, $reason);
    };
}

/// Assert that a Result is Err and extract the error.
#[macro_export]
macro_rules! assert_result_err {
    ($result:expr) => {
        match $result {
            Err(e) => e,
            Ok(value) => panic!(
                "Expected Err, got Ok: {:?}\n  at {}:{}:{}",
                value,
                file!(),
                line!(),
                column!()
            ),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Status, StatusColor};

    #[test]
    fn test_assert_status_forms() {
        let status = Status::new(StatusColor::Red, "2 out of 5 entities failed");
        crate::assert_status!(status, Red);
        crate::assert_status!(status, Red, contains "2 out of 5");
        crate::assert_status!(status, Red, "2 out of 5 entities failed");
    }

    #[test]
    fn test_assert_result_err_extracts() {
        let result: Result<(), &str> = Err("boom");
        assert_eq!(crate::assert_result_err!(result), "boom");
    }

    #[test]
    #[should_panic(expected = "Expected Err")]
    fn test_assert_result_err_panics_on_ok() {
        let result: Result<u8, &str> = Ok(1);
        crate::assert_result_err!(result);
    }
}
