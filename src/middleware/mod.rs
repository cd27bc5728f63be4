//! Outbound middleware pipeline: composable layers between the caller and the origin.
//!
//! This module defines the core types for building an ordered middleware stack
//! in front of a [`Transport`]. Each middleware wraps the next layer, enabling
//! request inspection, short-circuit responses, and response decoration without
//! coupling callers to infrastructure concerns such as caching.
//!
//! ## Core types
//!
//! - [`Middleware`]: trait implemented by all middleware.
//! - [`Next`]: cursor into the remaining middleware chain; call [`Next::run`] to
//!   advance to the next layer, and eventually to the transport.
//! - [`MiddlewareHandler`]: type-erased, cheaply-cloneable middleware function.
//! - [`Transport`]: the final hop that talks to the origin.
//! - [`Pipeline`]: an ordered stack plus its transport.
//! - [`LoggerMiddleware`]: built-in request/response logger.

use std::{future::Future, pin::Pin, sync::Arc};
use tokio::time::Instant;

use crate::{Error, Request, Response};

/// The future every layer of the pipeline returns.
pub type ResponseFuture = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send>>;

/// The final hop of the pipeline: delivers the request to the origin.
///
/// Any `Fn(Request) -> impl Future<Output = Result<Response, Error>>` closure
/// is a transport.
///
/// # Examples
///
/// ```rust,no_run
/// use rttp_cache::{Error, Request, Response, StatusCode, middleware::Pipeline};
///
/// let pipeline = Pipeline::new(|_req: Request| async {
///     Ok::<_, Error>(Response::new(StatusCode::Ok).body("from origin"))
/// });
/// ```
pub trait Transport: Send + Sync {
    /// Sends `request` to the origin.
    fn send(&self, request: Request) -> ResponseFuture;
}

impl<F, Fut> Transport for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    fn send(&self, request: Request) -> ResponseFuture {
        Box::pin(self(request))
    }
}

/// A cursor into the remaining middleware chain for a single request.
///
/// `Next` is passed to each middleware's [`Middleware::handle`] implementation.
/// Calling [`Next::run`] advances the cursor by one position and invokes the next
/// middleware, or the [`Transport`] once the chain is exhausted.
///
/// `Next` is consumed on each call to [`run`](Self::run), so it cannot be called
/// more than once per middleware invocation.
///
/// # Examples
///
/// ```rust,no_run
/// use rttp_cache::{Request, middleware::{Middleware, Next, ResponseFuture}};
///
/// struct PassThrough;
///
/// impl Middleware for PassThrough {
///     fn handle(&self, request: Request, next: Next) -> ResponseFuture {
///         Box::pin(async move { next.run(request).await })
///     }
/// }
/// ```
pub struct Next {
    middlewares: Vec<MiddlewareHandler>,
    transport: Arc<dyn Transport>,
    // Tracks which middleware to invoke on the next `run` call.
    index: usize,
}

/// A type-erased, reference-counted middleware function.
///
/// Every entry in the middleware stack is stored as a `MiddlewareHandler`.
/// The [`Arc`] wrapper makes handlers cheap to clone so that [`Next`] can
/// advance through the chain without copying closures.
///
/// Construct one with [`from_middleware`] or by wrapping a closure directly:
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use rttp_cache::{Request, middleware::{MiddlewareHandler, Next, ResponseFuture}};
///
/// let handler: MiddlewareHandler = Arc::new(|request: Request, next: Next| -> ResponseFuture {
///     Box::pin(async move { next.run(request).await })
/// });
/// ```
pub type MiddlewareHandler = Arc<dyn Fn(Request, Next) -> ResponseFuture + Send + Sync + 'static>;

/// Converts a [`Middleware`] implementation into a [`MiddlewareHandler`].
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use rttp_cache::middleware::{LoggerMiddleware, from_middleware};
///
/// let handler = from_middleware(Arc::new(LoggerMiddleware));
/// ```
pub fn from_middleware<M>(middleware: Arc<M>) -> MiddlewareHandler
where
    M: Middleware + 'static,
{
    Arc::new(move |request: Request, next: Next| middleware.handle(request, next))
}

impl Next {
    /// Creates a new `Next` positioned at the start of the given middleware stack.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use std::sync::Arc;
    /// use rttp_cache::{Error, Request, Response, StatusCode, middleware::Next};
    ///
    /// let next = Next::new(Vec::new(), Arc::new(|_req: Request| async {
    ///     Ok::<_, Error>(Response::new(StatusCode::Ok))
    /// }));
    /// ```
    pub fn new(middlewares: Vec<MiddlewareHandler>, transport: Arc<dyn Transport>) -> Self {
        Self {
            middlewares,
            transport,
            index: 0,
        }
    }

    /// Invokes the next middleware in the chain and returns its response.
    ///
    /// Advances the internal cursor by one, clones the handler at the current
    /// position, and awaits it. Once every middleware has run, the request is
    /// handed to the transport.
    pub async fn run(mut self, request: Request) -> Result<Response, Error> {
        if self.index < self.middlewares.len() {
            let handler = self.middlewares[self.index].clone();
            self.index += 1;
            handler(request, self).await
        } else {
            self.transport.send(request).await
        }
    }
}

/// The core trait for all outbound middleware.
///
/// Implementors receive a [`Request`] and a [`Next`] cursor. They may:
///
/// - **Pass through**: call `next.run(request).await` without modification.
/// - **Short-circuit**: return a [`Response`] directly without calling `next`.
/// - **Decorate**: call `next.run(request).await`, inspect the response, and return
///   a modified copy.
///
/// # Contract
///
/// - Implementations **must** be `Send + Sync` because middleware is shared across
///   Tokio tasks.
/// - `handle` **must** return a pinned, `Send` future so it can be awaited across
///   `.await` points in multi-threaded runtimes.
/// - Errors from `next` **should** be propagated unchanged.
pub trait Middleware: Send + Sync {
    /// Handle the request and optionally delegate to the next middleware.
    fn handle(&self, request: Request, next: Next) -> ResponseFuture;
}

/// An ordered middleware stack in front of a transport.
///
/// Middleware runs in the order it was added; the first layer sees the request
/// first and the response last.
///
/// # Examples
///
/// ```rust,no_run
/// use rttp_cache::{Error, Request, Response, StatusCode};
/// use rttp_cache::middleware::{LoggerMiddleware, Pipeline};
///
/// # async fn demo() -> Result<(), Error> {
/// let pipeline = Pipeline::new(|_req: Request| async {
///     Ok::<_, Error>(Response::new(StatusCode::Ok))
/// })
/// .with(LoggerMiddleware);
///
/// let response = pipeline.send(Request::get("https://example.com/")).await?;
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    middlewares: Vec<MiddlewareHandler>,
    transport: Arc<dyn Transport>,
}

impl Pipeline {
    /// Creates a pipeline with no middleware.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            middlewares: Vec::new(),
            transport: Arc::new(transport),
        }
    }

    /// Appends a middleware to the stack.
    #[must_use]
    pub fn with<M>(mut self, middleware: M) -> Self
    where
        M: Middleware + 'static,
    {
        self.middlewares.push(from_middleware(Arc::new(middleware)));
        self
    }

    /// Appends an already type-erased handler to the stack.
    #[must_use]
    pub fn layer(mut self, handler: MiddlewareHandler) -> Self {
        self.middlewares.push(handler);
        self
    }

    /// Sends `request` through every layer and on to the transport.
    pub async fn send(&self, request: Request) -> Result<Response, Error> {
        Next::new(self.middlewares.clone(), Arc::clone(&self.transport))
            .run(request)
            .await
    }
}

/// Built-in middleware that logs each request's method, URI, status, and duration.
///
/// Emits a single `tracing::info!` line after the downstream layers complete,
/// in the format:
///
/// ```text
/// METHOD uri - STATUS (duration)
/// ```
///
/// Failures are logged at `warn` and returned unchanged.
pub struct LoggerMiddleware;

impl Middleware for LoggerMiddleware {
    fn handle(&self, request: Request, next: Next) -> ResponseFuture {
        Box::pin(async move {
            let start = Instant::now();
            let method = request.method().as_str().to_string();
            let uri = request.uri().to_string();

            let result = next.run(request).await;

            let duration = start.elapsed();
            match &result {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let cache = response.cache_status().map(|s| s.as_str()).unwrap_or("-");
                    tracing::info!("{} {} - {} {} ({:?})", method, uri, status, cache, duration);
                }
                Err(e) => tracing::warn!(error = %e, "{} {} failed ({:?})", method, uri, duration),
            }

            result
        })
    }
}
