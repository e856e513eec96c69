//! The OTLP gRPC receiver: one `tonic::transport::Server` serving the
//! trace/metrics/logs export services directly into the table set's
//! ring buffers. Grounded on `sideseat-sideseat/server/src/api/routes/
//! otlp_collector/grpc.rs` for the server/service-trait wiring and on
//! `original_source/src/otlp_receiver.cpp`'s `Start()`/`ServerThread()`
//! split for the lifecycle: `attach()` is a synchronous, in-process
//! call, so the receiver owns a dedicated background OS thread running
//! its own tokio runtime rather than requiring the host to already be
//! inside one.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Runtime;
use tokio::sync::{oneshot, watch};
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server as TonicServer;
use tonic::{Request, Response, Status};

use opentelemetry_proto::tonic::collector::{
    logs::v1::{
        logs_service_server::{LogsService, LogsServiceServer},
        ExportLogsServiceRequest, ExportLogsServiceResponse,
    },
    metrics::v1::{
        metrics_service_server::{MetricsService, MetricsServiceServer},
        ExportMetricsServiceRequest, ExportMetricsServiceResponse,
    },
    trace::v1::{
        trace_service_server::{TraceService, TraceServiceServer},
        ExportTraceServiceRequest, ExportTraceServiceResponse,
    },
};

use crate::decode::{protobuf, validate_metrics, MetricAppenders};
use crate::error::ReceiverError;
use crate::schema::TableKind;
use crate::tables::Tables;

/// spec.md §4.4: a receiver that hasn't reported ready within this
/// window is treated as failed to start, not left starting forever.
const STARTUP_DEADLINE: Duration = Duration::from_secs(5);

/// The receiver's lifecycle states (spec.md §4.4): `New` before the
/// first `start()`, `Starting` while the background thread is binding,
/// `Running` once requests are being served, `Stopping` from the first
/// `stop()` call until the server task has actually exited, `Stopped`
/// after that — a state `start()` can be called from again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverState {
    New,
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// Owns the receiver's background thread and its shutdown handle. Not
/// `Clone` — exactly one `Receiver` exists per attach, held by
/// [`crate::lifecycle::AttachHandle`].
pub struct Receiver {
    addr: SocketAddr,
    tables: Arc<Tables>,
    state: Mutex<ReceiverState>,
    shutdown: Mutex<Option<watch::Sender<bool>>>,
    thread: Mutex<Option<std::thread::JoinHandle<()>>>,
    bound_addr: Mutex<Option<SocketAddr>>,
}

impl Receiver {
    pub fn new(addr: SocketAddr, tables: Arc<Tables>) -> Self {
        Self {
            addr,
            tables,
            state: Mutex::new(ReceiverState::New),
            shutdown: Mutex::new(None),
            thread: Mutex::new(None),
            bound_addr: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ReceiverState {
        *self.state.lock()
    }

    /// The actual address the listener bound to, once `start()` has
    /// succeeded — distinct from the requested `addr` when that request
    /// used the `:0` ephemeral-port convention.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.bound_addr.lock()
    }

    /// Spawns the dedicated receiver thread and blocks the calling
    /// thread until the listener is bound and serving, the bind fails,
    /// or [`STARTUP_DEADLINE`] elapses. The one-shot rendezvous
    /// (`tokio::sync::oneshot` + `tokio::time::timeout`) replaces the
    /// sleep-poll loop `original_source`'s `Start()` uses to wait on its
    /// server thread.
    pub fn start(&self) -> Result<(), ReceiverError> {
        *self.state.lock() = ReceiverState::Starting;
        let (ready_tx, ready_rx) = oneshot::channel::<Result<SocketAddr, ReceiverError>>();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let addr = self.addr;
        let tables = self.tables.clone();

        let handle = std::thread::Builder::new()
            .name("otlp-embed-receiver".to_string())
            .spawn(move || run_server(addr, tables, ready_tx, shutdown_rx))
            .expect("failed to spawn otlp-embed-receiver thread");

        // A short-lived runtime exists only to drive this one rendezvous
        // future; the server itself runs on the background thread's own
        // runtime, not this one.
        let rendezvous = Runtime::new().expect("failed to build startup rendezvous runtime");
        let outcome = rendezvous.block_on(tokio::time::timeout(STARTUP_DEADLINE, ready_rx));

        match outcome {
            Ok(Ok(Ok(bound))) => {
                *self.state.lock() = ReceiverState::Running;
                *self.shutdown.lock() = Some(shutdown_tx);
                *self.thread.lock() = Some(handle);
                *self.bound_addr.lock() = Some(bound);
                Ok(())
            }
            Ok(Ok(Err(e))) => {
                *self.state.lock() = ReceiverState::Stopped;
                let _ = handle.join();
                Err(e)
            }
            Ok(Err(_)) => {
                *self.state.lock() = ReceiverState::Stopped;
                let _ = handle.join();
                Err(ReceiverError::TaskJoin(
                    "receiver thread ended before signaling readiness".to_string(),
                ))
            }
            Err(_) => {
                *self.state.lock() = ReceiverState::Stopped;
                Err(ReceiverError::StartupTimeout)
            }
        }
    }

    /// Signals the server task to stop accepting connections and waits
    /// for the background thread to exit. Idempotent: calling `stop()`
    /// on a receiver that never started, or one already stopped, is a
    /// no-op.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if matches!(*state, ReceiverState::New | ReceiverState::Stopped) {
            return;
        }
        *state = ReceiverState::Stopping;
        drop(state);

        if let Some(tx) = self.shutdown.lock().take() {
            let _ = tx.send(true);
        }
        if let Some(handle) = self.thread.lock().take() {
            let _ = handle.join();
        }
        *self.state.lock() = ReceiverState::Stopped;
    }
}

impl Drop for Receiver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_server(
    addr: SocketAddr,
    tables: Arc<Tables>,
    ready_tx: oneshot::Sender<Result<SocketAddr, ReceiverError>>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            let _ = ready_tx.send(Err(ReceiverError::TaskJoin(e.to_string())));
            return;
        }
    };
    rt.block_on(async move {
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(l) => l,
            Err(source) => {
                let _ = ready_tx.send(Err(ReceiverError::Bind { addr: addr.to_string(), source }));
                return;
            }
        };
        let bound_addr = listener.local_addr().unwrap_or(addr);
        let incoming = TcpListenerStream::new(listener);
        // The listener is bound; every future failure is a transport-level
        // concern the caller of `start()` has already moved past.
        let _ = ready_tx.send(Ok(bound_addr));

        tracing::debug!(%addr, "otlp receiver listening");

        let server = TonicServer::builder()
            .add_service(TraceServiceServer::new(OtlpTraceService { tables: tables.clone() }))
            .add_service(MetricsServiceServer::new(OtlpMetricsService { tables: tables.clone() }))
            .add_service(LogsServiceServer::new(OtlpLogsService { tables }))
            .serve_with_incoming_shutdown(incoming, async move {
                let _ = shutdown_rx.wait_for(|&v| v).await;
                tracing::debug!("otlp receiver shutting down");
            });

        if let Err(e) = server.await {
            tracing::warn!(error = %e, "otlp receiver transport ended with error");
        }
    });
}

struct OtlpTraceService {
    tables: Arc<Tables>,
}

#[tonic::async_trait]
impl TraceService for OtlpTraceService {
    async fn export(
        &self,
        request: Request<ExportTraceServiceRequest>,
    ) -> Result<Response<ExportTraceServiceResponse>, Status> {
        let req = request.into_inner();
        let mut app = self.tables.get(TableKind::Traces).appender();
        protobuf::append_traces(&req, &mut app)?;
        Ok(Response::new(ExportTraceServiceResponse { partial_success: None }))
    }
}

struct OtlpLogsService {
    tables: Arc<Tables>,
}

#[tonic::async_trait]
impl LogsService for OtlpLogsService {
    async fn export(
        &self,
        request: Request<ExportLogsServiceRequest>,
    ) -> Result<Response<ExportLogsServiceResponse>, Status> {
        let req = request.into_inner();
        let mut app = self.tables.get(TableKind::Logs).appender();
        protobuf::append_logs(&req, &mut app)?;
        Ok(Response::new(ExportLogsServiceResponse { partial_success: None }))
    }
}

struct OtlpMetricsService {
    tables: Arc<Tables>,
}

#[tonic::async_trait]
impl MetricsService for OtlpMetricsService {
    async fn export(
        &self,
        request: Request<ExportMetricsServiceRequest>,
    ) -> Result<Response<ExportMetricsServiceResponse>, Status> {
        let req = request.into_inner();
        // Must run before any MetricAppenders is constructed — see
        // validate_metrics's doc comment for why there is no rollback.
        validate_metrics(&req)?;
        let mut appenders = MetricAppenders::new(&self.tables);
        protobuf::append_metrics(&req, &mut appenders)?;
        Ok(Response::new(ExportMetricsServiceResponse { partial_success: None }))
    }
}
