/// Assert that an `Outcome` was applied
#[macro_export]
macro_rules! assert_applied {
    ($outcome:expr) => {
        let outcome = $outcome;
        assert!(
            outcome.is_applied(),
            "Expected Outcome::Applied, got {:?}",
            outcome
        );
    };
}

/// Assert that an `Outcome` was rejected for the given reason
#[macro_export]
macro_rules! assert_rejected {
    ($outcome:expr, $reason:pat) => {
        let outcome = $outcome;
        assert!(
            matches!(outcome, tether_client::Outcome::Rejected($reason)),
            "Expected Outcome::Rejected({}), got {:?}",
            stringify!($reason),
            outcome
        );
    };
}

/// Assert that an `Outcome` was ignored for the given reason
#[macro_export]
macro_rules! assert_ignored {
    ($outcome:expr, $reason:pat) => {
        let outcome = $outcome;
        assert!(
            matches!(outcome, tether_client::Outcome::Ignored($reason)),
            "Expected Outcome::Ignored({}), got {:?}",
            stringify!($reason),
            outcome
        );
    };
}
