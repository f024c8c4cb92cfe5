/// # Panics
/// Panics if the result is `Ok` (operation succeeded when error was expected).
pub fn assert_error_sqlstate<T: std::fmt::Debug>(
    result: crate::ViewResult<T>,
    expected_sqlstate: &str,
) {
    match result {
        Err(e) => {
            assert_eq!(
                e.sqlstate(),
                expected_sqlstate,
                "Expected SQLSTATE {expected_sqlstate}, got {}: {e}",
                e.sqlstate()
            );
        }
        Ok(v) => {
            panic!("Expected error with SQLSTATE {expected_sqlstate}, but operation succeeded with {v:?}");
        }
    }
}

/// # Panics
/// Panics if the result is `Ok` (operation succeeded when error was expected).
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: crate::ViewResult<T>,
    expected_substring: &str,
) {
    match result {
        Err(e) => {
            let message = e.to_string();
            assert!(
                message.contains(expected_substring),
                "Error message '{message}' does not contain '{expected_substring}'"
            );
        }
        Ok(v) => {
            panic!("Expected error containing '{expected_substring}', but operation succeeded with {v:?}");
        }
    }
}
