//! Maps weather client failures to weatherdash_core::AppError for consistent logging.

use weatherdash_core::{AppError, NetworkError, ReqwestErrorExt};
use weatherdash_weather::ClientError;

pub fn to_app_error(err: ClientError) -> AppError {
    match err {
        ClientError::Network(e) => AppError::Network(e.into_network_error()),
        ClientError::Status { status, body } => AppError::Network(NetworkError::ServerError {
            status,
            message: body,
        }),
        ClientError::Decode(msg) => AppError::Network(NetworkError::InvalidResponse(msg)),
    }
}

/// Log a failed remote call. The failure goes no further.
pub fn log_remote_failure(operation: &'static str, err: ClientError) {
    let status = err.status();
    let err = to_app_error(err);
    tracing::error!(
        operation,
        status,
        hint = err.user_message(),
        "Error {}: {}",
        operation,
        err
    );
}
