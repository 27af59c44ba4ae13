use super::*;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<&'static str>>,
}

impl Recorder {
    fn record(&self, call: &'static str) {
        self.calls.lock().push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }
}

impl Managed for Recorder {
    fn lifecycle_start(&self) -> anyhow::Result<()> {
        self.record("lifecycle_start");
        Ok(())
    }

    fn lifecycle_stop(&self) -> anyhow::Result<()> {
        self.record("lifecycle_stop");
        Ok(())
    }
}

impl Closeable for Recorder {
    fn close(&self) -> anyhow::Result<()> {
        self.record("close");
        Ok(())
    }
}

impl StartClose for Recorder {
    fn start(&self) -> anyhow::Result<()> {
        self.record("start");
        Ok(())
    }
}

struct FailingResource;

impl Closeable for FailingResource {
    fn close(&self) -> anyhow::Result<()> {
        anyhow::bail!("close failed")
    }
}

impl StartClose for FailingResource {
    fn start(&self) -> anyhow::Result<()> {
        anyhow::bail!("start failed")
    }
}

#[test]
fn test_managed_trait_handler() {
    let recorder = Arc::new(Recorder::default());
    let handler = ManagedHandler::new(Arc::clone(&recorder));

    handler.start().unwrap();
    handler.stop().unwrap();

    assert_eq!(recorder.calls(), vec!["lifecycle_start", "lifecycle_stop"]);
}

#[test]
fn test_managed_builder_runs_actions_in_order() {
    let recorder = Arc::new(Recorder::default());
    let handler = ManagedHandler::builder(Arc::clone(&recorder))
        .on_start(|r: &Recorder| {
            r.record("open pool");
            Ok(())
        })
        .on_start_named("warm cache", |r: &Recorder| {
            r.record("warm cache");
            Ok(())
        })
        .on_stop(|r: &Recorder| {
            r.record("flush");
            Ok(())
        })
        .on_stop(|r: &Recorder| {
            r.record("close pool");
            Ok(())
        })
        .build();

    assert_eq!(handler.start_action_count(), 2);
    assert_eq!(handler.stop_action_count(), 2);

    handler.start().unwrap();
    handler.stop().unwrap();

    assert_eq!(
        recorder.calls(),
        vec!["open pool", "warm cache", "flush", "close pool"]
    );
}

#[test]
fn test_managed_without_actions_is_noop() {
    let recorder = Arc::new(Recorder::default());
    let handler = ManagedHandler::builder(Arc::clone(&recorder)).build();

    handler.start().unwrap();
    handler.stop().unwrap();

    assert!(recorder.calls().is_empty());
}

#[test]
fn test_managed_start_failure_aborts_remaining_actions() {
    let recorder = Arc::new(Recorder::default());
    let handler = ManagedHandler::builder(Arc::clone(&recorder))
        .on_start(|_: &Recorder| anyhow::bail!("no database"))
        .on_start(|r: &Recorder| {
            r.record("never");
            Ok(())
        })
        .build();

    let err = handler.start().unwrap_err();
    assert_eq!(err.to_string(), "no database");
    assert!(recorder.calls().is_empty());
}

#[test]
fn test_managed_stop_failure_is_swallowed() {
    let recorder = Arc::new(Recorder::default());
    let handler = ManagedHandler::builder(Arc::clone(&recorder))
        .on_stop(|_: &Recorder| anyhow::bail!("flush failed"))
        .on_stop(|r: &Recorder| {
            r.record("close pool");
            Ok(())
        })
        .build();

    assert!(handler.stop().is_ok());
    assert_eq!(recorder.calls(), vec!["close pool"]);
}

#[test]
fn test_start_close_handler() {
    let recorder = Arc::new(Recorder::default());
    let handler = StartCloseHandler::new(Arc::clone(&recorder));

    handler.start().unwrap();
    handler.stop().unwrap();

    assert_eq!(recorder.calls(), vec!["start", "close"]);
    assert!(handler.describe().contains("Recorder"));
}

#[test]
fn test_start_close_handler_failures() {
    let handler = StartCloseHandler::new(Arc::new(FailingResource));

    assert_eq!(handler.start().unwrap_err().to_string(), "start failed");
    assert!(handler.stop().is_ok());
}

#[test]
fn test_closeable_handler_only_closes() {
    let recorder = Arc::new(Recorder::default());
    let handler = CloseableHandler::new(Arc::clone(&recorder));

    handler.start().unwrap();
    assert!(recorder.calls().is_empty());

    handler.stop().unwrap();
    assert_eq!(recorder.calls(), vec!["close"]);

    let failing = CloseableHandler::new(Arc::new(FailingResource));
    assert!(failing.stop().is_ok());
}

#[test]
fn test_shared_handler_delegates() {
    let recorder = Arc::new(Recorder::default());
    let handler: Arc<dyn Handler> = Arc::new(StartCloseHandler::new(Arc::clone(&recorder)));
    let boxed: Box<dyn Handler> = Box::new(Arc::clone(&handler));

    boxed.start().unwrap();
    boxed.stop().unwrap();

    assert_eq!(recorder.calls(), vec!["start", "close"]);
    assert_eq!(boxed.describe(), handler.describe());
}

#[test]
fn test_short_type_name() {
    assert_eq!(short_type_name::<Recorder>(), "Recorder");
    assert!(short_type_name::<Vec<Recorder>>().starts_with("Vec<"));
}
