use alloy_transport::{RpcError, TransportError, TransportErrorKind};
use core::time::Duration;
use std::{error::Error as StdError, io};

/// A chain node request failed.
#[derive(Debug, thiserror::Error)]
pub enum ChainClientError {
    /// The JSON-RPC request failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The node did not answer in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// A transient failure persisted through every attempt.
    #[error("{method} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// RPC method that was called.
        method: &'static str,
        /// Attempts made.
        attempts: u32,
        /// Error of the last attempt.
        #[source]
        last: Box<ChainClientError>,
    },
    /// A call returned data that does not match the expected ABI.
    #[error("failed to decode {what}: {source}")]
    Decode {
        /// What was being decoded.
        what: &'static str,
        /// Underlying ABI error.
        #[source]
        source: alloy_sol_types::Error,
    },
    /// The node is temporarily unable to serve the request.
    #[error("node unavailable: {0}")]
    Unavailable(String),
    /// The node refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),
}

impl ChainClientError {
    /// Returns `true` if repeating the request may succeed.
    ///
    /// Broken connections, a stopped backend, timeouts, rate limiting and
    /// gateway errors are transient. JSON-RPC error responses are transient
    /// only when they signal rate limiting. Everything else, including
    /// responses that fail to deserialize, is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(RpcError::Transport(kind)) => match kind {
                TransportErrorKind::HttpError(err) => matches!(err.status, 408 | 429 | 500..=599),
                TransportErrorKind::BackendGone => true,
                // The HTTP client reports connection failures as custom errors.
                TransportErrorKind::Custom(err) => is_connection_error(&**err),
                _ => false,
            },
            Self::Transport(RpcError::ErrorResp(payload)) => payload.is_retry_err(),
            Self::Transport(_) => false,
            Self::Timeout(_) | Self::Unavailable(_) => true,
            Self::RetriesExhausted { .. } | Self::Decode { .. } | Self::Rejected(_) => false,
        }
    }
}

/// Returns `true` if an I/O error of a refused, dropped or stalled connection
/// is somewhere in the source chain of `err`.
fn is_connection_error(err: &(dyn StdError + 'static)) -> bool {
    let mut source = Some(err);
    while let Some(err) = source {
        if let Some(err) = err.downcast_ref::<io::Error>() {
            return matches!(
                err.kind(),
                io::ErrorKind::ConnectionRefused
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::NotConnected
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::TimedOut
                    | io::ErrorKind::UnexpectedEof
            );
        }
        source = err.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[derive(Debug, thiserror::Error)]
    #[error("error sending request")]
    struct RequestError(#[source] io::Error);

    #[test]
    fn classifies_local_failures() {
        let timeout = ChainClientError::Timeout(Duration::from_secs(1));
        assert!(timeout.is_transient());
        assert!(ChainClientError::Unavailable("reset".into()).is_transient());
        assert!(!ChainClientError::Rejected("bad address".into()).is_transient());
        let exhausted = ChainClientError::RetriesExhausted {
            method: "eth_chainId",
            attempts: 3,
            last: Box::new(timeout),
        };
        assert!(!exhausted.is_transient());
    }

    #[rstest]
    #[case::backend_gone(TransportErrorKind::backend_gone(), true)]
    #[case::rate_limited(TransportErrorKind::http_error(429, String::new()), true)]
    #[case::bad_gateway(TransportErrorKind::http_error(502, String::new()), true)]
    #[case::not_found(TransportErrorKind::http_error(404, String::new()), false)]
    #[case::pubsub(TransportErrorKind::pubsub_unavailable(), false)]
    #[case::custom(TransportErrorKind::custom_str("invalid url"), false)]
    fn classifies_transport_failures(#[case] err: TransportError, #[case] transient: bool) {
        assert_eq!(ChainClientError::Transport(err).is_transient(), transient);
    }

    #[rstest]
    #[case(io::ErrorKind::ConnectionRefused, true)]
    #[case(io::ErrorKind::ConnectionReset, true)]
    #[case(io::ErrorKind::PermissionDenied, false)]
    fn classifies_wrapped_io_failures(#[case] kind: io::ErrorKind, #[case] transient: bool) {
        let err = TransportErrorKind::custom(RequestError(io::Error::from(kind)));
        assert_eq!(ChainClientError::Transport(err).is_transient(), transient);
    }
}
