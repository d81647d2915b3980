use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use crate::errors::AppError;
use crate::request_id::RequestId;

/// Turns overruns and panics of the inner service into error envelopes.
///
/// A request still running after `limit` gets 408 `REQUEST_TIMEOUT`; a
/// panic gets 500 `INTERNAL_ERROR` with the panic text logged only. Sits
/// inside the request id layers so both envelopes carry the id.
pub async fn request_guard(
    State(limit): State<Duration>,
    mut request: Request,
    next: Next,
) -> Response {
    let headers = request.headers().clone();
    let request_id = RequestId::resolve(request.extensions_mut(), &headers);

    let guarded = AssertUnwindSafe(next.run(request)).catch_unwind();
    match tokio::time::timeout(limit, guarded).await {
        Ok(Ok(response)) => response,
        Ok(Err(panic)) => request_id
            .fail(AppError::InternalServerError(format!(
                "handler panicked: {}",
                panic_message(panic.as_ref())
            )))
            .into_response(),
        Err(_) => request_id.fail(AppError::RequestTimeout).into_response(),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload")
}
