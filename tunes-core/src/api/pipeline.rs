//! Executes endpoint descriptors over a [`Transport`].

use std::any::type_name_of_val;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::{debug, error, warn};

use super::endpoint::Endpoint;
use super::transport::{HttpRequest, Transport};
use crate::error::{NetworkError, Outcome};

/// Round-trip bound applied when callers have no better value.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(14);

/// Stateless, reentrant request pipeline.
///
/// Every [`execute`](Self::execute) performs exactly one transport call and
/// resolves to exactly one [`Outcome`]. Retrying is left to the caller.
#[derive(Clone)]
pub struct RequestPipeline {
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("transport", &type_name_of_val(self.transport.as_ref()))
            .finish()
    }
}

impl RequestPipeline {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Runs `endpoint`, bounding the whole round trip (decode included) by
    /// `timeout`.
    ///
    /// Dropping the returned future drops the in-flight transport call.
    pub async fn execute<E>(
        &self,
        endpoint: &E,
        timeout: Duration,
    ) -> Outcome<E::Response>
    where
        E: Endpoint + ?Sized,
    {
        let target = endpoint.target()?;
        debug!(target_url = %target, "dispatching request");
        let request = HttpRequest::new(endpoint.method(), target);

        match tokio::time::timeout(timeout, self.round_trip(endpoint, request))
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(?timeout, "request exceeded its deadline");
                Err(NetworkError::Timeout)
            }
        }
    }

    async fn round_trip<E>(
        &self,
        endpoint: &E,
        request: HttpRequest,
    ) -> Outcome<E::Response>
    where
        E: Endpoint + ?Sized,
    {
        let target = request.target.clone();
        let response = self.transport.send(request).await.map_err(|err| {
            warn!(target_url = %target, error = %err, "transport failure");
            NetworkError::from(err)
        })?;

        if !response.is_success() {
            warn!(target_url = %target, status = response.status, "non-success status");
            return Err(NetworkError::BadResponse {
                status: Some(response.status),
            });
        }
        let Some(body) = response.body else {
            warn!(target_url = %target, "response carried no body");
            return Err(NetworkError::BadResponse {
                status: Some(response.status),
            });
        };

        endpoint.decode(&body).map_err(|err| {
            error!(target_url = %target, error = %err, "response did not match expected shape");
            NetworkError::from(err)
        })
    }

    /// Callback form of [`execute`](Self::execute), run on the current Tokio
    /// runtime.
    ///
    /// `on_complete` runs at most once. Once [`RequestHandle::cancel`] has
    /// returned `true` it will never run.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn spawn<E, F>(
        &self,
        endpoint: E,
        timeout: Duration,
        on_complete: F,
    ) -> RequestHandle
    where
        E: Endpoint + 'static,
        F: FnOnce(Outcome<E::Response>) + Send + 'static,
    {
        let registration = Arc::new(Registration::new(on_complete));
        let pipeline = self.clone();
        let completion = Arc::clone(&registration);
        let task = tokio::spawn(async move {
            let outcome = pipeline.execute(&endpoint, timeout).await;
            completion.complete(outcome);
        });

        RequestHandle {
            task: task.abort_handle(),
            registration,
        }
    }
}

type Callback<T> = Box<dyn FnOnce(Outcome<T>) + Send>;

struct Registration<T> {
    callback: Mutex<Option<Callback<T>>>,
}

impl<T> Registration<T> {
    fn new<F>(callback: F) -> Self
    where
        F: FnOnce(Outcome<T>) + Send + 'static,
    {
        Self {
            callback: Mutex::new(Some(Box::new(callback))),
        }
    }

    // Whoever takes the callback out of the slot owns it: a `revoke` that
    // loses the race reports the request as already delivered. The lock is
    // released before the callback runs so it may use its own handle.
    fn complete(&self, outcome: Outcome<T>) {
        let callback = self
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(callback) = callback {
            callback(outcome);
        }
    }
}

trait Revoke: Send + Sync {
    fn revoke(&self) -> bool;
    fn is_pending(&self) -> bool;
}

impl<T> Revoke for Registration<T> {
    fn revoke(&self) -> bool {
        self.callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }

    fn is_pending(&self) -> bool {
        self.callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// Handle to a request started with [`RequestPipeline::spawn`].
///
/// Dropping the handle detaches the request; it does not cancel it.
pub struct RequestHandle {
    task: AbortHandle,
    registration: Arc<dyn Revoke>,
}

impl fmt::Debug for RequestHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandle")
            .field("finished", &self.task.is_finished())
            .field("pending", &self.registration.is_pending())
            .finish()
    }
}

impl RequestHandle {
    /// Abandons the request: the transport call is aborted and the callback
    /// is dropped without running.
    ///
    /// Returns `false` when the callback had already been handed the
    /// outcome.
    pub fn cancel(&self) -> bool {
        let revoked = self.registration.revoke();
        self.task.abort();
        revoked
    }

    /// True until the callback has run or the request was cancelled.
    pub fn is_pending(&self) -> bool {
        self.registration.is_pending()
    }
}
