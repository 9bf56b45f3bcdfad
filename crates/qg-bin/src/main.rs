//! quadgrid: four resizable panels in the terminal.
mod session;

use anyhow::Result;
use clap::Parser;
use core_actions::PanelTitles;
use core_config::{Config, load_from, load_strict};
use core_events::{
    ASYNC_INPUT_STARTS, CHANNEL_SEND_FAILURES, EVENT_CHANNEL_CAP, Event, EventSourceRegistry,
    InputEvent, KEYPRESS_TOTAL, MOUSE_EVENTS_TOTAL, POINTER_DOWNS, POINTER_MOVES, RESIZE_EVENTS,
    TickEventSource,
};
use core_layout::PanelSlot;
use core_render::panel::{PanelContent, PanelContents, TextPanel};
use core_render::render_engine::RenderEngine;
use core_render::scheduler::{Decision, RenderDelta};
use core_terminal::{CrosstermBackend, TerminalBackend};
use session::{LoopControl, Session};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE_NAME: &str = "quadgrid.log";
const TICK_INTERVAL: Duration = Duration::from_millis(250);
const OPEN_FAILED_TTL: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "quadgrid", version, about = "Four-panel resizable terminal layout")]
struct Args {
    /// Text file shown in the top-left panel (overrides `panels.top_left.source`).
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `quadgrid.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Validate the configuration file and exit.
    #[arg(long = "check-config")]
    pub check_config: bool,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

struct RuntimeContext<'a> {
    session: Session,
    terminal_guard: core_terminal::TerminalGuard<'a>,
}

/// Titles and contents for the four slots plus the sources that failed to open.
struct PanelBootstrap {
    titles: PanelTitles,
    contents: PanelContents,
    open_failures: Vec<PathBuf>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn run<'a>(&'a mut self, args: &Args) -> Result<RuntimeContext<'a>> {
        self.configure_logging()?;
        Self::install_panic_hook();

        info!(target: "runtime", "startup");
        let config = load_from(args.config.clone())?;
        let panels = load_panels(args.path.as_deref(), &config);

        self.backend.set_title("quadgrid")?;
        let viewport = self.backend.size()?;
        let guard = self.backend.enter_guard()?;

        let config_path = config.path.as_ref().map(|p| p.display().to_string());
        info!(
            target: "runtime.startup",
            config = config_path.as_deref(),
            config_override = args.config.is_some(),
            open_failures = panels.open_failures.len(),
            columns = viewport.0,
            rows = viewport.1,
            "bootstrap_complete"
        );

        let failures = panels.open_failures;
        let mut session = Session::new(config, panels.titles, panels.contents, viewport);
        if let Some(msg) = open_failed_message(&failures) {
            session.layout_mut().set_ephemeral(msg, OPEN_FAILED_TTL);
        }

        Ok(RuntimeContext {
            session,
            terminal_guard: guard,
        })
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE_NAME);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

/// Resolve per-slot titles and text sources. The CLI path wins over the
/// configured top-left source; an unreadable source leaves a placeholder.
fn load_panels(cli_path: Option<&Path>, config: &Config) -> PanelBootstrap {
    let mut titles = PanelTitles::default();
    let configured = config.file.panels.in_slot_order();
    for (slot, panel) in PanelSlot::ALL.into_iter().zip(configured) {
        if let Some(title) = &panel.title {
            titles.set(slot, title.clone());
        }
    }

    let mut open_failures = Vec::new();
    let contents = PanelSlot::ALL.map(|slot| {
        let source = match slot {
            PanelSlot::TopLeft => cli_path.or(configured[slot.index()].source.as_deref()),
            _ => configured[slot.index()].source.as_deref(),
        };
        let panel = match source {
            Some(path) => match TextPanel::from_file(path) {
                Ok(panel) => {
                    trace!(target: "runtime.startup", slot = slot.as_str(), lines = panel.line_count(), "panel_loaded");
                    panel
                }
                Err(err) => {
                    warn!(
                        target: "runtime.startup",
                        slot = slot.as_str(),
                        path = %path.display(),
                        error = %err,
                        "panel_open_failed"
                    );
                    open_failures.push(path.to_path_buf());
                    TextPanel::placeholder(titles.get(slot), slot)
                }
            },
            None => TextPanel::placeholder(titles.get(slot), slot),
        };
        Box::new(panel) as Box<dyn PanelContent>
    });

    PanelBootstrap {
        titles,
        contents: PanelContents::new(contents),
        open_failures,
    }
}

fn open_failed_message(failures: &[PathBuf]) -> Option<String> {
    let first = failures.first()?;
    let name = first
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| first.display().to_string());
    Some(match failures.len() {
        1 => format!("Open failed: {name}"),
        n => format!("Open failed: {name} (+{} more)", n - 1),
    })
}

fn check_config(path: Option<PathBuf>) -> Result<()> {
    let config = load_strict(path)?;
    let shown = config
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    println!("config ok: {shown}");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    CtrlC,
    ActionQuit,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CtrlC => "ctrl_c",
            ShutdownReason::ActionQuit => "action_quit",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the loop stops after `input`, if it does.
fn shutdown_reason_for(input: &InputEvent, control: LoopControl) -> Option<ShutdownReason> {
    match control {
        LoopControl::Continue => None,
        LoopControl::Quit if matches!(input, InputEvent::CtrlC) => Some(ShutdownReason::CtrlC),
        LoopControl::Quit => Some(ShutdownReason::ActionQuit),
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

fn log_shutdown_telemetry(session: &Session, engine: &RenderEngine) {
    let render = engine.metrics_snapshot();
    let deltas = session.scheduler().metrics_snapshot();
    info!(
        target: "runtime.shutdown",
        keypresses = KEYPRESS_TOTAL.load(Ordering::Relaxed),
        mouse_events = MOUSE_EVENTS_TOTAL.load(Ordering::Relaxed),
        pointer_downs = POINTER_DOWNS.load(Ordering::Relaxed),
        pointer_moves = POINTER_MOVES.load(Ordering::Relaxed),
        resizes = RESIZE_EVENTS.load(Ordering::Relaxed),
        input_starts = ASYNC_INPUT_STARTS.load(Ordering::Relaxed),
        send_failures = CHANNEL_SEND_FAILURES.load(Ordering::Relaxed),
        full_frames = render.full_frames,
        status_frames = render.status_frames,
        status_skipped = render.status_skipped,
        escalated = deltas.escalated,
        "telemetry"
    );
}

struct QuadRuntime<'a> {
    session: Session,
    render_engine: RenderEngine,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<tokio::task::JoinHandle<()>>,
    input_task: Option<tokio::task::JoinHandle<()>>,
    input_shutdown: Option<core_input::AsyncInputShutdown>,
    _terminal_guard: core_terminal::TerminalGuard<'a>,
}

impl<'a> QuadRuntime<'a> {
    fn new(
        context: RuntimeContext<'a>,
        tx: mpsc::Sender<Event>,
        rx: mpsc::Receiver<Event>,
        input_task: tokio::task::JoinHandle<()>,
        input_shutdown: core_input::AsyncInputShutdown,
        source_handles: Vec<tokio::task::JoinHandle<()>>,
    ) -> Self {
        let RuntimeContext {
            session,
            terminal_guard,
        } = context;
        Self {
            session,
            render_engine: RenderEngine::new(),
            rx,
            tx: Some(tx),
            source_handles,
            input_task: Some(input_task),
            input_shutdown: Some(input_shutdown),
            _terminal_guard: terminal_guard,
        }
    }

    async fn run(&mut self) -> Result<()> {
        self.render_pending();

        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter_loop = loop_span.enter();

        let mut shutdown_reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            let control = match &event {
                Event::Input(input) => self.handle_input_event(input),
                Event::Tick => {
                    self.session.handle_tick();
                    None
                }
            };
            if let Some(reason) = control {
                shutdown_reason = reason;
                break;
            }
            self.render_pending();
        }

        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        Ok(())
    }

    fn handle_input_event(&mut self, input: &InputEvent) -> Option<ShutdownReason> {
        if let InputEvent::Resize(..) = input {
            self.render_engine.invalidate_for_resize();
        }
        let control = self.session.handle_input(input);
        shutdown_reason_for(input, control)
    }

    fn render_pending(&mut self) {
        if let Some(decision) = self.session.take_decision() {
            self.render(&decision);
        }
    }

    fn render(&mut self, decision: &Decision) {
        let (w, h) = self.session.viewport();
        let span = tracing::debug_span!(
            target: "render.engine",
            "render_cycle",
            semantic = ?decision.semantic,
            effective = ?decision.effective,
            width = w,
            height = h
        );
        let _e = span.enter();
        let res = match decision.effective {
            RenderDelta::Full => {
                let (frame, status) = self.session.compose();
                self.render_engine.render_full(&frame, &status)
            }
            RenderDelta::StatusLine => {
                let status = self.session.status_line();
                self.render_engine.render_status(&status, w, h)
            }
        };
        if let Err(e) = res {
            error!(target: "render.engine", ?e, "render_error");
        }
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        if let Some(tx) = self.tx.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "dropping_runtime_sender"
            );
            drop(tx);
        }

        while let Some(handle) = self.source_handles.pop() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(_)) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_stopped"
                ),
                Ok(Err(err)) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_cancelled"
                ),
                Ok(Err(err)) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "event_source_task_error"
                ),
                Err(_) => warn!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_timeout"
                ),
            }
        }

        if let Some(shutdown) = self.input_shutdown.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "input_task_shutdown_signal"
            );
            shutdown.signal();
        }

        if let Some(handle) = self.input_task.take() {
            match handle.await {
                Ok(_) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_joined"
                ),
                Err(err) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_cancelled"
                ),
                Err(err) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "input_task_join_failed"
                ),
            }
        }

        log_shutdown_telemetry(&self.session, &self.render_engine);
        log_shutdown_stage(reason, "complete");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if args.check_config {
        return check_config(args.config);
    }

    let mut startup = AppStartup::new();
    let context = startup.run(&args)?;
    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone());
    let mut registry = EventSourceRegistry::new();
    registry.register(TickEventSource::new(TICK_INTERVAL));
    let source_handles = registry.spawn_all(&tx);

    let mut runtime =
        QuadRuntime::new(context, tx, rx, input_task, input_shutdown, source_handles);
    runtime.run().await
}
