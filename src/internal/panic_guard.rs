//! Factory panic capture.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{DiError, DiResult};

/// Runs a factory, turning a panic into [`DiError::FactoryPanic`].
///
/// With `catch` unset the factory runs bare and a panic unwinds through the
/// caller. Either way nothing is cached for a failed call.
pub(crate) fn call_guarded<T, F>(service: &'static str, catch: bool, f: F) -> DiResult<T>
where
    F: FnOnce() -> DiResult<T>,
{
    if !catch {
        return f();
    }

    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(DiError::FactoryPanic {
            service,
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_results() {
        assert_eq!(call_guarded("svc", true, || Ok(5)).unwrap(), 5);

        let err = call_guarded::<(), _>("svc", true, || Err(DiError::NotFound("dep"))).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn captures_str_and_string_panics() {
        let err = call_guarded::<(), _>("svc", true, || panic!("static message")).unwrap_err();
        match err {
            DiError::FactoryPanic { service, message } => {
                assert_eq!(service, "svc");
                assert_eq!(message, "static message");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = call_guarded::<(), _>("svc", true, || panic!("code {}", 42)).unwrap_err();
        assert!(matches!(err, DiError::FactoryPanic { ref message, .. } if message == "code 42"));
    }

    #[test]
    fn uncaught_mode_lets_panic_unwind() {
        let outcome = std::panic::catch_unwind(|| {
            let _ = call_guarded::<(), _>("svc", false, || panic!("raw"));
        });
        assert!(outcome.is_err());
    }
}
