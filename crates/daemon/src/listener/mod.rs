// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request Dispatcher (C8, spec §4.8). Accepts TCP connections, framed
//! JSON in, framed JSON out (`vea-wire`). Each connection gets a reader
//! task dispatching requests and a writer task draining a single
//! outgoing queue shared with the connection's event forwarders, so
//! responses and server-pushed `state_changed`/`console_output` frames
//! never race each other on the socket.

use std::sync::Arc;

use serde::Serialize;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use vea_core::app::{AppId, AppKind};
use vea_core::clock::Clock;
use vea_core::dependency::DependencyDecl;
use vea_core::error::ClassifiedError;
use vea_core::event::RuntimeEvent;
use vea_core::signal::{SignalGateway, SignalSink};
use vea_engine::{Engine, InstallSpec, OutputPipeline};
use vea_storage::Catalog;
use vea_wire::{read_message, write_message, DependencySpec, ProtocolError, Request, Response, StreamEvent, WriteOutcome};

/// Shared daemon context for all request handlers.
pub struct DispatcherCtx {
    pub engine: Arc<Engine>,
    pub catalog: Catalog,
    pub pipeline: Arc<OutputPipeline>,
    pub signal_gateway: Arc<dyn SignalGateway>,
    pub clock: Arc<dyn Clock>,
    pub runtime_id: String,
    pub version: String,
}

/// Runs the TCP accept loop until the process exits. Each connection is
/// handled in its own spawned task.
pub async fn run(listener: TcpListener, ctx: Arc<DispatcherCtx>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let ctx = Arc::clone(&ctx);
                tokio::spawn(async move {
                    if let Err(err) = handle_connection(stream, ctx).await {
                        warn!(%peer, error = %err, "connection closed with error");
                    }
                });
            }
            Err(err) => error!(error = %err, "accept failed"),
        }
    }
}

/// Either half of what a connection can write back: a correlated
/// response or a server-pushed stream event. Both frame the same way
/// (a tagged JSON object), so they share one outgoing queue.
enum OutgoingFrame {
    Response(Response),
    Stream(StreamEvent),
}

impl Serialize for OutgoingFrame {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OutgoingFrame::Response(response) => response.serialize(serializer),
            OutgoingFrame::Stream(event) => event.serialize(serializer),
        }
    }
}

async fn handle_connection(stream: TcpStream, ctx: Arc<DispatcherCtx>) -> Result<(), ProtocolError> {
    stream.set_nodelay(true).ok();
    let (mut read_half, mut write_half) = stream.into_split();
    let (outgoing_tx, mut outgoing_rx) = mpsc::channel::<OutgoingFrame>(256);

    let writer_task = tokio::spawn(async move {
        while let Some(frame) = outgoing_rx.recv().await {
            if write_message(&mut write_half, &frame).await.is_err() {
                break;
            }
        }
    });

    let mut runtime_events = ctx.engine.subscribe_events();
    let events_tx = outgoing_tx.clone();
    let events_task = tokio::spawn(async move {
        loop {
            match runtime_events.recv().await {
                Ok(event) => {
                    if let Some(stream_event) = to_stream_event(event) {
                        if events_tx.send(OutgoingFrame::Stream(stream_event)).await.is_err() {
                            break;
                        }
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let result = loop {
        match read_message::<_, Request>(&mut read_half).await {
            Ok(request) => {
                let response = dispatch(&ctx, request, &outgoing_tx).await;
                if outgoing_tx.send(OutgoingFrame::Response(response)).await.is_err() {
                    break Ok(());
                }
            }
            Err(ProtocolError::Closed) => break Ok(()),
            Err(err) => break Err(err),
        }
    };

    drop(outgoing_tx);
    let _ = events_task.await;
    let _ = writer_task.await;
    result
}

fn to_stream_event(event: RuntimeEvent) -> Option<StreamEvent> {
    match event {
        RuntimeEvent::ApplicationStateChanged { app_id, status } => {
            Some(StreamEvent::StateChanged { app_id, state: status.to_string() })
        }
        RuntimeEvent::ConsoleOutput { record } => Some(StreamEvent::ConsoleOutput {
            app_id: record.app_id,
            execution_id: record.execution_id.map(|id| id.to_string()),
            stream: record.stream.to_string(),
            data: record.payload_str().into_owned(),
        }),
        RuntimeEvent::SignalUpdate { path, value } => Some(StreamEvent::SignalUpdate { path, value }),
    }
}

/// A `SignalSink` that forwards every update onto a connection's outgoing
/// queue as a `signal_update` stream event.
struct ConnectionSignalSink {
    outgoing: mpsc::Sender<OutgoingFrame>,
}

impl SignalSink for ConnectionSignalSink {
    fn on_update(&self, path: &str, value: &serde_json::Value) {
        let event = StreamEvent::SignalUpdate { path: path.to_string(), value: value.clone() };
        let _ = self.outgoing.try_send(OutgoingFrame::Stream(event));
    }
}

fn classified_error(id: &str, app_id: Option<AppId>, err: &impl ClassifiedError) -> Response {
    Response::error(id, err.to_string(), app_id)
}

async fn dispatch(ctx: &DispatcherCtx, request: Request, outgoing: &mpsc::Sender<OutgoingFrame>) -> Response {
    match request {
        Request::RegisterClient { id, client_info } => {
            info!(client = %client_info.name, version = %client_info.version, "client registered");
            Response::RegisterClientResponse {
                id,
                runtime_id: ctx.runtime_id.clone(),
                capabilities: capabilities(),
            }
        }

        Request::DeployRequest { id, app_id, code, language, entry_point, dependencies } => {
            deploy(ctx, id, app_id, code, language, entry_point, dependencies, outgoing).await
        }

        Request::RunApp { id, app_id } => {
            start(ctx, LifecycleKind::Run, id, app_id.to_string(), app_id, outgoing).await
        }

        Request::StopApp { id, subject } => {
            let app_id = ctx.engine.resolve(&subject).ok();
            match ctx.engine.stop(&subject).await {
                Ok(exit_code) => lifecycle_response(
                    LifecycleKind::Stop,
                    &id,
                    app_id.unwrap_or_else(|| app_id_from(&subject)),
                    "stopped",
                    format!("stopped (exit code {exit_code:?})"),
                    "stopped",
                    None,
                ),
                Err(err) => classified_error(&id, app_id, &err),
            }
        }

        Request::PauseApp { id, app_id } => match ctx.engine.pause(&app_id.to_string()).await {
            Ok(()) => lifecycle_response(LifecycleKind::Pause, &id, app_id, "ok", "paused", "paused", None),
            Err(err) => classified_error(&id, Some(app_id), &err),
        },

        Request::ResumeApp { id, app_id } => match ctx.engine.resume(&app_id.to_string()).await {
            Ok(()) => lifecycle_response(LifecycleKind::Resume, &id, app_id, "ok", "resumed", "running", None),
            Err(err) => classified_error(&id, Some(app_id), &err),
        },

        Request::UninstallApp { id, app_id } => match ctx.engine.uninstall(&app_id.to_string()).await {
            Ok(()) => lifecycle_response(LifecycleKind::Uninstall, &id, app_id, "ok", "uninstalled", "absent", None),
            Err(err) => classified_error(&id, Some(app_id), &err),
        },

        Request::ListDeployedApps { id } => {
            Response::ListDeployedAppsResponse { id, applications: ctx.catalog.list_applications() }
        }

        Request::GetSignalsValue { id, paths } => match ctx.signal_gateway.read(&paths).await {
            Ok(values) => Response::GetSignalsValueResponse { id, values },
            Err(err) => classified_error(&id, None, &err),
        },

        Request::WriteSignalsValue { id, values } => match ctx.signal_gateway.write(values).await {
            Ok(results) => {
                let results = results
                    .into_iter()
                    .map(|r| WriteOutcome { path: r.path, ok: r.result.is_ok(), error: r.result.err() })
                    .collect();
                Response::WriteSignalsValueResponse { id, results }
            }
            Err(err) => classified_error(&id, None, &err),
        },

        Request::SubscribeApis { id, paths } => {
            let sink = Arc::new(ConnectionSignalSink { outgoing: outgoing.clone() });
            match ctx.signal_gateway.subscribe(&paths, sink).await {
                Ok(subscription_id) => Response::SubscribeApisResponse { id, subscription_id: subscription_id.0 },
                Err(err) => classified_error(&id, None, &err),
            }
        }

        Request::GetRuntimeInfo { id } => Response::GetRuntimeInfoResponse {
            id,
            runtime_id: ctx.runtime_id.clone(),
            version: ctx.version.clone(),
            capabilities: capabilities(),
        },

        Request::Ping { id } => Response::PongResponse { id, server_time_ms: ctx.clock.epoch_ms() },
    }
}

fn capabilities() -> Vec<String> {
    vec!["script".to_string(), "binary".to_string()]
}

fn app_id_from(subject: &str) -> AppId {
    AppId::from_string(subject)
}

async fn start(
    ctx: &DispatcherCtx,
    kind: LifecycleKind,
    id: String,
    subject: String,
    app_id: AppId,
    outgoing: &mpsc::Sender<OutgoingFrame>,
) -> Response {
    match ctx.engine.start(&subject).await {
        Ok((execution_id, _handle)) => {
            subscribe_console_output(ctx, execution_id, outgoing.clone());
            lifecycle_response(kind, &id, app_id, "started", "started", "running", Some(execution_id.to_string()))
        }
        Err(err) => classified_error(&id, Some(app_id), &err),
    }
}

async fn deploy(
    ctx: &DispatcherCtx,
    id: String,
    app_id: AppId,
    code: String,
    language: String,
    entry_point: String,
    dependencies: Vec<DependencySpec>,
    outgoing: &mpsc::Sender<OutgoingFrame>,
) -> Response {
    if ctx.catalog.get_application(app_id).is_none() {
        let kind = if language.eq_ignore_ascii_case("binary") { AppKind::Binary } else { AppKind::Script };
        let spec = InstallSpec {
            app_id,
            name: app_id.to_string(),
            version: "0.0.0".to_string(),
            description: String::new(),
            kind,
            source: code.into_bytes(),
            entry_point,
            args: Vec::new(),
            env: Default::default(),
            cwd_hint: None,
            dependencies: dependencies.into_iter().map(to_dependency_decl).collect(),
            signal_interests: Vec::new(),
            resource_limits: None,
        };
        if let Err(err) = ctx.engine.install(spec).await {
            return classified_error(&id, Some(app_id), &err);
        }
    }

    start(ctx, LifecycleKind::Deploy, id, app_id.to_string(), app_id, outgoing).await
}

fn to_dependency_decl(spec: DependencySpec) -> DependencyDecl {
    DependencyDecl { ecosystem: spec.ecosystem, name: spec.name, version: spec.version }
}

/// Relays every chunk the pipeline delivers for `execution_id` onto this
/// connection's outgoing queue as a `console_output` stream event, until
/// the pipeline drops the sender (container exit unsubscribes it).
fn subscribe_console_output(ctx: &DispatcherCtx, execution_id: vea_core::execution::ExecutionId, outgoing: mpsc::Sender<OutgoingFrame>) {
    let mut receiver = ctx.pipeline.subscribe(execution_id);
    tokio::spawn(async move {
        while let Some(chunk) = receiver.recv().await {
            let event = StreamEvent::ConsoleOutput {
                app_id: chunk.app_id,
                execution_id: Some(chunk.execution_id.to_string()),
                stream: chunk.stream.to_string(),
                data: String::from_utf8_lossy(&chunk.data).into_owned(),
            };
            if outgoing.send(OutgoingFrame::Stream(event)).await.is_err() {
                break;
            }
        }
    });
}

/// Which lifecycle operation a response is for, so the wire tag can be
/// the request-specific `"<request-type>-response"` spec §4.8 requires
/// instead of one shared tag.
enum LifecycleKind {
    Deploy,
    Run,
    Stop,
    Pause,
    Resume,
    Uninstall,
}

fn lifecycle_response(
    kind: LifecycleKind,
    id: &str,
    app_id: AppId,
    status: &str,
    result: impl Into<String>,
    state: &str,
    execution_id: Option<String>,
) -> Response {
    let id = id.to_string();
    let status = status.to_string();
    let result = result.into();
    let state = state.to_string();
    match kind {
        LifecycleKind::Deploy => Response::DeployResponse { id, status, result, state, app_id, execution_id },
        LifecycleKind::Run => Response::RunResponse { id, status, result, state, app_id, execution_id },
        LifecycleKind::Stop => Response::StopResponse { id, status, result, state, app_id, execution_id },
        LifecycleKind::Pause => Response::PauseResponse { id, status, result, state, app_id, execution_id },
        LifecycleKind::Resume => Response::ResumeResponse { id, status, result, state, app_id, execution_id },
        LifecycleKind::Uninstall => Response::UninstallResponse { id, status, result, state, app_id, execution_id },
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
