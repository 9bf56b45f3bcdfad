use crate::mapping::{map_key_event, map_mouse_event};
use core_events::{
    ASYNC_INPUT_STARTS, ASYNC_INPUT_STOP_CHANNEL, ASYNC_INPUT_STOP_ERROR, ASYNC_INPUT_STOP_SIGNAL,
    ASYNC_INPUT_STOP_STREAM, CHANNEL_SEND_FAILURES, Event, InputEvent, KEYPRESS_TOTAL,
    MOUSE_EVENTS_TOTAL, MouseEventKind, RESIZE_EVENTS,
};
use crossterm::event::{
    Event as CEvent, EventStream, KeyCode as CKeyCode, KeyEvent as CKeyEvent,
    KeyModifiers as CKeyModifiers, MouseEvent as CMouseEvent,
};
use std::io;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{info, trace, warn};

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Spawn a Tokio task that forwards `EventStream` input into the event channel.
pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, listener) = ShutdownListener::new_pair();
    let handle = task::spawn(async move {
        let span = tracing::debug_span!(target: "input.thread", "input_async_task");
        let _enter = span.enter();
        let stream = EventStream::new();
        AsyncEventStreamTask::new(sender, stream, listener)
            .run()
            .await;
    });
    (handle, shutdown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    Running,
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::Running => "running",
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

fn mouse_kind_label(kind: &MouseEventKind) -> &'static str {
    match kind {
        MouseEventKind::Down(_) => "down",
        MouseEventKind::Up(_) => "up",
        MouseEventKind::Drag(_) => "drag",
        MouseEventKind::Moved => "moved",
        MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => "scroll",
    }
}

struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
    exit_reason: ExitReason,
    stream_error: Option<io::ErrorKind>,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: ShutdownListener) -> Self {
        Self {
            sender,
            stream,
            shutdown,
            exit_reason: ExitReason::Running,
            stream_error: None,
        }
    }

    pub async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        ASYNC_INPUT_STARTS.fetch_add(1, Ordering::Relaxed);
        self.exit_reason = ExitReason::StreamEnded;
        loop {
            let maybe_result = tokio::select! {
                biased;
                _ = self.shutdown.wait() => {
                    self.exit_reason = ExitReason::ShutdownSignal;
                    break;
                }
                result = self.stream.next() => result,
            };

            let Some(result) = maybe_result else {
                break;
            };

            let keep_going = match result {
                Ok(CEvent::Key(key)) => self.handle_key_event(key).await,
                Ok(CEvent::Mouse(mouse)) => self.handle_mouse_event(mouse).await,
                Ok(CEvent::Resize(w, h)) => {
                    trace!(target: "input.event", w, h, "resize");
                    RESIZE_EVENTS.fetch_add(1, Ordering::Relaxed);
                    self.send_event(Event::Input(InputEvent::Resize(w, h)))
                        .await
                }
                Ok(CEvent::FocusGained) => {
                    self.send_event(Event::Input(InputEvent::FocusGained))
                        .await
                }
                Ok(CEvent::FocusLost) => {
                    trace!(target: "input.event", "focus_lost");
                    self.send_event(Event::Input(InputEvent::FocusLost)).await
                }
                Ok(CEvent::Paste(_)) => true,
                Err(err) => {
                    self.exit_reason = ExitReason::StreamError;
                    self.stream_error = Some(err.kind());
                    break;
                }
            };
            if !keep_going {
                break;
            }
        }

        let reason = match self.exit_reason {
            ExitReason::Running => ExitReason::StreamEnded,
            other => other,
        };

        match reason {
            ExitReason::ShutdownSignal => {
                ASYNC_INPUT_STOP_SIGNAL.fetch_add(1, Ordering::Relaxed);
            }
            ExitReason::ChannelClosed => {
                ASYNC_INPUT_STOP_CHANNEL.fetch_add(1, Ordering::Relaxed);
            }
            ExitReason::StreamEnded => {
                ASYNC_INPUT_STOP_STREAM.fetch_add(1, Ordering::Relaxed);
            }
            ExitReason::StreamError => {
                ASYNC_INPUT_STOP_ERROR.fetch_add(1, Ordering::Relaxed);
            }
            ExitReason::Running => {}
        }

        if matches!(reason, ExitReason::StreamError) {
            if let Some(kind) = self.stream_error {
                warn!(target: "input.thread", error_kind = ?kind, "async_input_task_stream_error");
            } else {
                warn!(target: "input.thread", "async_input_task_stream_error");
            }
        }

        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    }

    async fn handle_key_event(&mut self, key: CKeyEvent) -> bool {
        if matches!(key.code, CKeyCode::Char('c')) && key.modifiers.contains(CKeyModifiers::CONTROL)
        {
            return self.send_event(Event::Input(InputEvent::CtrlC)).await;
        }

        let Some(mapped) = map_key_event(&key) else {
            return true;
        };
        trace!(target: "input.event", kind = "keypress", mods = ?mapped.mods, code = ?mapped.code);
        let sent = self.send_event(Event::Input(InputEvent::Key(mapped))).await;
        if sent {
            KEYPRESS_TOTAL.fetch_add(1, Ordering::Relaxed);
        }
        sent
    }

    // Every report is forwarded in order; coalescing moves would let a drag
    // skip the position it was released at.
    async fn handle_mouse_event(&mut self, mouse: CMouseEvent) -> bool {
        let Some(mapped) = map_mouse_event(&mouse) else {
            return true;
        };
        trace!(
            target: "input.event",
            kind = "mouse",
            mouse_kind = mouse_kind_label(&mapped.kind),
            column = mapped.column,
            row = mapped.row
        );
        let sent = self.send_event(Event::Input(InputEvent::Mouse(mapped))).await;
        if sent {
            MOUSE_EVENTS_TOTAL.fetch_add(1, Ordering::Relaxed);
        }
        sent
    }

    async fn send_event(&mut self, event: Event) -> bool {
        match self.sender.send(event).await {
            Ok(_) => true,
            Err(_) => {
                CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                if !matches!(self.exit_reason, ExitReason::ShutdownSignal) {
                    self.exit_reason = ExitReason::ChannelClosed;
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyCode, MouseButton};
    use crossterm::event::{MouseButton as CMouseButton, MouseEventKind as CMouseEventKind};
    use std::sync::Mutex;
    use tokio::sync::{Mutex as TokioMutex, mpsc};
    use tokio::time::{Duration, timeout};
    use tokio_stream::wrappers::UnboundedReceiverStream;
    use tracing::field::{Field, Visit};
    use tracing::{Metadata, Subscriber, subscriber::Interest};
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tracing_subscriber::registry::Registry;

    // Counter deltas and log capture are process-wide; serialize the tests that read them.
    static COUNTER_GUARD: TokioMutex<()> = TokioMutex::const_new(());

    #[derive(Clone, Default)]
    struct LogCapture {
        events: Arc<Mutex<Vec<CapturedLog>>>,
    }

    #[derive(Clone, Debug)]
    struct CapturedLog {
        target: String,
        fields: Vec<(String, String)>,
    }

    #[derive(Default)]
    struct LogVisitor {
        fields: Vec<(String, String)>,
    }

    impl Visit for LogVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            self.fields
                .push((field.name().to_string(), format!("{:?}", value)));
        }
    }

    impl<S> Layer<S> for LogCapture
    where
        S: Subscriber,
    {
        fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
            Interest::always()
        }

        fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
            metadata.target().starts_with("input.")
        }

        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = LogVisitor::default();
            event.record(&mut visitor);
            self.events.lock().unwrap().push(CapturedLog {
                target: event.metadata().target().to_string(),
                fields: visitor.fields,
            });
        }
    }

    fn mouse(kind: CMouseEventKind, column: u16, row: u16) -> CEvent {
        CEvent::Mouse(CMouseEvent {
            kind,
            column,
            row,
            modifiers: CKeyModifiers::NONE,
        })
    }

    async fn run_scenario(events: Vec<CEvent>) -> Vec<Event> {
        let (tx, mut rx) = mpsc::channel(64);
        let stream = tokio_stream::iter(events.into_iter().map(Ok));
        let (_shutdown, listener) = ShutdownListener::new_pair();
        AsyncEventStreamTask::new(tx, stream, listener).run().await;

        let mut outputs = Vec::new();
        while let Some(evt) = rx.recv().await {
            outputs.push(evt);
        }
        outputs
    }

    #[tokio::test]
    async fn forwards_key_and_counts() {
        let _guard = COUNTER_GUARD.lock().await;
        let base = KEYPRESS_TOTAL.load(Ordering::Relaxed);
        let outputs = run_scenario(vec![CEvent::Key(CKeyEvent::new(
            CKeyCode::Char('r'),
            CKeyModifiers::NONE,
        ))])
        .await;
        match outputs.as_slice() {
            [Event::Input(InputEvent::Key(key))] => assert_eq!(key.code, KeyCode::Char('r')),
            other => panic!("unexpected output sequence: {other:?}"),
        }
        assert_eq!(KEYPRESS_TOTAL.load(Ordering::Relaxed) - base, 1);
    }

    #[tokio::test]
    async fn forwards_ctrl_c() {
        let outputs = run_scenario(vec![CEvent::Key(CKeyEvent::new(
            CKeyCode::Char('c'),
            CKeyModifiers::CONTROL,
        ))])
        .await;
        assert!(matches!(
            outputs.as_slice(),
            [Event::Input(InputEvent::CtrlC)]
        ));
    }

    #[tokio::test]
    async fn forwards_resize_and_focus() {
        let outputs = run_scenario(vec![
            CEvent::Resize(120, 48),
            CEvent::FocusLost,
            CEvent::FocusGained,
        ])
        .await;
        assert!(matches!(
            outputs.as_slice(),
            [
                Event::Input(InputEvent::Resize(120, 48)),
                Event::Input(InputEvent::FocusLost),
                Event::Input(InputEvent::FocusGained)
            ]
        ));
    }

    #[tokio::test]
    async fn drag_sequence_arrives_in_order() {
        let _guard = COUNTER_GUARD.lock().await;
        let base = MOUSE_EVENTS_TOTAL.load(Ordering::Relaxed);
        let outputs = run_scenario(vec![
            mouse(CMouseEventKind::Down(CMouseButton::Left), 40, 10),
            mouse(CMouseEventKind::Drag(CMouseButton::Left), 41, 10),
            mouse(CMouseEventKind::Drag(CMouseButton::Left), 42, 10),
            mouse(CMouseEventKind::Up(CMouseButton::Left), 42, 10),
            mouse(CMouseEventKind::ScrollRight, 42, 10),
        ])
        .await;
        let kinds: Vec<(MouseEventKind, u16)> = outputs
            .iter()
            .filter_map(|e| match e {
                Event::Input(InputEvent::Mouse(m)) => Some((m.kind, m.column)),
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                (MouseEventKind::Down(MouseButton::Left), 40),
                (MouseEventKind::Drag(MouseButton::Left), 41),
                (MouseEventKind::Drag(MouseButton::Left), 42),
                (MouseEventKind::Up(MouseButton::Left), 42),
            ]
        );
        assert_eq!(MOUSE_EVENTS_TOTAL.load(Ordering::Relaxed) - base, 4);
    }

    #[tokio::test]
    async fn mouse_logging_uses_input_event_target() {
        let _guard = COUNTER_GUARD.lock().await;
        let capture = LogCapture::default();
        let events_handle = capture.events.clone();
        let subscriber = Registry::default().with(capture.with_filter(LevelFilter::TRACE));
        let dispatch = tracing::Dispatch::new(subscriber);
        let _dispatch_guard = tracing::dispatcher::set_default(&dispatch);

        run_scenario(vec![mouse(CMouseEventKind::Moved, 3, 4)]).await;

        let logs = events_handle.lock().unwrap();
        let entry = logs
            .iter()
            .find(|e| e.target == "input.event")
            .unwrap_or_else(|| panic!("missing input.event log, captured: {logs:?}"));
        assert!(
            entry
                .fields
                .iter()
                .any(|(k, v)| k == "mouse_kind" && v == "\"moved\"")
        );
        assert!(logs.iter().any(|e| e.target == "input.thread"));
    }

    #[tokio::test]
    async fn stops_on_shutdown_signal() {
        let _guard = COUNTER_GUARD.lock().await;
        let base = ASYNC_INPUT_STOP_SIGNAL.load(Ordering::Relaxed);
        let (tx, _rx) = mpsc::channel(8);
        let (_src_tx, src_rx) = mpsc::unbounded_channel::<io::Result<CEvent>>();
        let stream = UnboundedReceiverStream::new(src_rx);
        let (shutdown, listener) = ShutdownListener::new_pair();
        let handle = tokio::spawn(AsyncEventStreamTask::new(tx, stream, listener).run());
        shutdown.signal();
        timeout(Duration::from_millis(200), handle)
            .await
            .expect("task should stop after shutdown signal")
            .expect("task join");
        assert_eq!(ASYNC_INPUT_STOP_SIGNAL.load(Ordering::Relaxed) - base, 1);
    }

    #[tokio::test]
    async fn stops_when_channel_closes() {
        let _guard = COUNTER_GUARD.lock().await;
        let base = ASYNC_INPUT_STOP_CHANNEL.load(Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        let stream = tokio_stream::iter(vec![Ok(CEvent::Resize(10, 10))]);
        let (_shutdown, listener) = ShutdownListener::new_pair();
        AsyncEventStreamTask::new(tx, stream, listener).run().await;
        assert_eq!(ASYNC_INPUT_STOP_CHANNEL.load(Ordering::Relaxed) - base, 1);
    }
}
