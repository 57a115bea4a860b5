//! Probe outcome classification.
//!
//! A probe either failed on the transport level or produced an HTTP status
//! code; both collapse into a two-valued [`LinkStatus`]. The accepted
//! "available" range is 200-399 (success or redirect), matching the widest
//! behavior of clients that follow redirects natively: a response in the
//! redirect class still proves the host is reachable and answering.

use crate::types::LinkStatus;
use reqwest::StatusCode;

/// Classify a completed network exchange.
///
/// Any transport error (connect failure, timeout, invalid scheme) is
/// `Unavailable`; a response is `Available` iff its status code is in
/// 200-399.
pub fn classify<E>(outcome: Result<StatusCode, E>) -> LinkStatus {
    match outcome {
        Ok(status) if is_available(status) => LinkStatus::Available,
        _ => LinkStatus::Unavailable,
    }
}

/// Whether a status code counts as "available" (200-399 inclusive).
pub fn is_available(status: StatusCode) -> bool {
    status.is_success() || status.is_redirection()
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_codes_available() {
        assert_eq!(
            classify::<()>(Ok(StatusCode::OK)),
            LinkStatus::Available
        );
        assert_eq!(
            classify::<()>(Ok(StatusCode::NO_CONTENT)),
            LinkStatus::Available
        );
    }

    #[test]
    fn test_redirect_boundary_available() {
        assert_eq!(
            classify::<()>(Ok(StatusCode::MOVED_PERMANENTLY)),
            LinkStatus::Available
        );
        // Upper edge of the accepted range
        assert_eq!(
            classify::<()>(Ok(StatusCode::from_u16(399).unwrap())),
            LinkStatus::Available
        );
    }

    #[test]
    fn test_client_error_boundary_unavailable() {
        // First code past the accepted range
        assert_eq!(
            classify::<()>(Ok(StatusCode::BAD_REQUEST)),
            LinkStatus::Unavailable
        );
        assert_eq!(
            classify::<()>(Ok(StatusCode::NOT_FOUND)),
            LinkStatus::Unavailable
        );
    }

    #[test]
    fn test_informational_below_range_unavailable() {
        assert_eq!(
            classify::<()>(Ok(StatusCode::CONTINUE)),
            LinkStatus::Unavailable
        );
    }

    #[test]
    fn test_server_error_unavailable() {
        assert_eq!(
            classify::<()>(Ok(StatusCode::INTERNAL_SERVER_ERROR)),
            LinkStatus::Unavailable
        );
    }

    #[test]
    fn test_transport_error_unavailable() {
        assert_eq!(
            classify::<&str>(Err("connection refused")),
            LinkStatus::Unavailable
        );
    }
}
