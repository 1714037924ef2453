//! What a worker runs on every iteration
use std::{
    fmt,
    future::Future,
    panic,
    pin::Pin,
    sync::Arc,
    task::{ready, Context, Poll},
};
use tokio::task::JoinHandle;

/// A repeatable unit of work, invoked concurrently by every worker of a benchmark.
///
/// Implemented for any `Fn() -> impl Future<Output = Result<(), E>>`. Such workloads share the
/// caller's runtime, so they should await rather than block. Synchronous, blocking calls go
/// through [`Blocking`] instead.
pub trait Workload: Send + Sync + Clone + 'static {
    type Error: fmt::Display + Send + 'static;
    type Future: Future<Output = Result<(), Self::Error>> + Send + 'static;

    fn call(&self) -> Self::Future;
}

impl<T, F, E> Workload for T
where
    T: Fn() -> F + Send + Sync + Clone + 'static,
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    type Error = E;
    type Future = F;

    fn call(&self) -> F {
        self()
    }
}

/// A blocking workload. Every call runs on tokio's blocking thread pool, so `n` workers block in
/// parallel on `n` threads whatever runtime the benchmark is awaited on.
///
/// The pool is capped at 512 threads by default; more workers than that queue up.
pub struct Blocking<F>(Arc<F>);

impl<F> Blocking<F> {
    pub fn new(f: F) -> Self {
        Self(Arc::new(f))
    }
}

impl<F> Clone for Blocking<F> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<F, E> Workload for Blocking<F>
where
    F: Fn() -> Result<(), E> + Send + Sync + 'static,
    E: fmt::Display + Send + 'static,
{
    type Error = E;
    type Future = BlockingCall<E>;

    fn call(&self) -> BlockingCall<E> {
        let f = self.0.clone();
        BlockingCall(tokio::task::spawn_blocking(move || f()))
    }
}

/// A single in-flight call of a [`Blocking`] workload.
pub struct BlockingCall<E>(JoinHandle<Result<(), E>>);

impl<E> Future for BlockingCall<E> {
    type Output = Result<(), E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match ready!(Pin::new(&mut self.0).poll(cx)) {
            Ok(res) => Poll::Ready(res),
            // NOTE: Re-raised on the worker so it is counted like any other workload panic.
            Err(err) if err.is_panic() => panic::resume_unwind(err.into_panic()),
            Err(err) => panic!("Blocking workload did not complete: {err}"),
        }
    }
}
