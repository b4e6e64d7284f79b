// End-to-end engine behaviour against an in-memory container runtime:
// label discovery, reconciliation, event handling, and failure containment.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use dockron_core::{
    ContainerRef, ContainerRuntime, EventAction, ExecOutput, LifecycleEvent, RuntimeError,
};
use dockron_engine::{initial_sync, run_event_loop, Executor, JobRunner, JobTable, Reconciler};

const FULL_ID: &str = "abcdef0123456789abcdef0123456789abcdef0123456789abcdef01234567";
const SHORT_ID: &str = "abcdef012345";

/// In-memory [`ContainerRuntime`] with scriptable containers and exec results.
#[derive(Default)]
struct FakeRuntime {
    /// Containers keyed by short id.
    containers: Mutex<HashMap<String, ContainerRef>>,
    /// Every `(short_id, command)` pair passed to exec.
    execs: Mutex<Vec<(String, String)>>,
    exit_code: i32,
    events: Mutex<Option<mpsc::Receiver<LifecycleEvent>>>,
}

impl FakeRuntime {
    fn with_exit_code(exit_code: i32) -> Self {
        Self {
            exit_code,
            ..Default::default()
        }
    }

    fn insert(&self, container: ContainerRef) {
        self.containers
            .lock()
            .unwrap()
            .insert(container.short_id.clone(), container);
    }

    fn set_events(&self, rx: mpsc::Receiver<LifecycleEvent>) {
        *self.events.lock().unwrap() = Some(rx);
    }

    fn exec_log(&self) -> Vec<(String, String)> {
        self.execs.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn ping(&self) -> Result<(), RuntimeError> {
        Ok(())
    }

    async fn list_running(&self) -> Result<Vec<ContainerRef>, RuntimeError> {
        Ok(self.containers.lock().unwrap().values().cloned().collect())
    }

    async fn container_by_short_id(&self, short_id: &str) -> Result<ContainerRef, RuntimeError> {
        self.containers
            .lock()
            .unwrap()
            .get(short_id)
            .cloned()
            .ok_or_else(|| RuntimeError::NotFound {
                id: short_id.to_string(),
            })
    }

    async fn subscribe_events(&self) -> Result<mpsc::Receiver<LifecycleEvent>, RuntimeError> {
        self.events
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| RuntimeError::Transport("no event channel scripted".to_string()))
    }

    async fn exec_in_container(
        &self,
        short_id: &str,
        shell_command: &str,
    ) -> Result<ExecOutput, RuntimeError> {
        if !self.containers.lock().unwrap().contains_key(short_id) {
            return Err(RuntimeError::NotFound {
                id: short_id.to_string(),
            });
        }
        self.execs
            .lock()
            .unwrap()
            .push((short_id.to_string(), shell_command.to_string()));
        Ok(ExecOutput {
            exit_code: self.exit_code,
            output: "fake output".to_string(),
        })
    }
}

fn labels(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn backup_labels() -> HashMap<String, String> {
    labels(&[
        ("scheduler.enable", "true"),
        ("scheduler.backup.schedule", "0 2 * * *"),
        ("scheduler.backup.command", "tar czf /b.tgz /data"),
    ])
}

fn engine(runtime: &Arc<FakeRuntime>) -> (Arc<JobTable>, Reconciler) {
    let runner = Arc::new(Executor::new(runtime.clone() as Arc<dyn ContainerRuntime>));
    let table = Arc::new(JobTable::new(runner));
    let reconciler = Reconciler::new(Arc::clone(&table));
    (table, reconciler)
}

#[tokio::test]
async fn backup_label_scenario_yields_exactly_one_job() {
    let runtime = Arc::new(FakeRuntime::default());
    let container = ContainerRef::new(FULL_ID, "web", backup_labels());
    let (table, reconciler) = engine(&runtime);

    reconciler.reconcile(&container).unwrap();

    assert_eq!(table.job_ids(), vec![format!("{SHORT_ID}_backup")]);
    let record = table.get("abcdef012345_backup").unwrap();
    assert_eq!(record.container_short_id, SHORT_ID);
    assert_eq!(record.schedule, "0 2 * * *");
    assert_eq!(record.command, "tar czf /b.tgz /data");
}

#[tokio::test]
async fn reconcile_is_idempotent() {
    let runtime = Arc::new(FakeRuntime::default());
    let container = ContainerRef::new(FULL_ID, "web", backup_labels());
    let (table, reconciler) = engine(&runtime);

    reconciler.reconcile(&container).unwrap();
    let first = table.job_ids();
    reconciler.reconcile(&container).unwrap();
    let second = table.job_ids();

    assert_eq!(first, second);
    assert_eq!(table.len(), 1);
}

#[tokio::test]
async fn enablement_gating_leaves_zero_jobs() {
    let runtime = Arc::new(FakeRuntime::default());
    let (table, reconciler) = engine(&runtime);

    // Start enabled so there is something to tear down.
    let enabled = ContainerRef::new(FULL_ID, "web", backup_labels());
    reconciler.reconcile(&enabled).unwrap();
    assert_eq!(table.len(), 1);

    for enable_value in [None, Some("false"), Some("TRUE ")] {
        let mut relabelled = backup_labels();
        match enable_value {
            Some(v) => {
                relabelled.insert("scheduler.enable".to_string(), v.to_string());
            }
            None => {
                relabelled.remove("scheduler.enable");
            }
        }
        let container = ContainerRef::new(FULL_ID, "web", relabelled);
        reconciler.reconcile(&container).unwrap();
        assert!(
            table.is_empty(),
            "expected zero jobs for enable={enable_value:?}"
        );
        // Re-enable between iterations to prove the disable did the removal.
        reconciler
            .reconcile(&ContainerRef::new(FULL_ID, "web", backup_labels()))
            .unwrap();
    }
}

#[tokio::test]
async fn invalid_and_incomplete_definitions_are_excluded() {
    let runtime = Arc::new(FakeRuntime::default());
    let (table, reconciler) = engine(&runtime);

    let container = ContainerRef::new(
        FULL_ID,
        "web",
        labels(&[
            ("scheduler.enable", "true"),
            ("scheduler.good.schedule", "*/5 * * * *"),
            ("scheduler.good.command", "echo ok"),
            ("scheduler.badcron.schedule", "not a cron"),
            ("scheduler.badcron.command", "echo never"),
            ("scheduler.halfdone.schedule", "0 4 * * *"),
        ]),
    );
    reconciler.reconcile(&container).unwrap();

    assert_eq!(table.job_ids(), vec![format!("{SHORT_ID}_good")]);
}

#[tokio::test]
async fn relabelling_replaces_the_record_wholesale() {
    let runtime = Arc::new(FakeRuntime::default());
    let (table, reconciler) = engine(&runtime);

    reconciler
        .reconcile(&ContainerRef::new(FULL_ID, "web", backup_labels()))
        .unwrap();

    let mut edited = backup_labels();
    edited.insert("scheduler.backup.schedule".to_string(), "30 3 * * *".to_string());
    edited.insert("scheduler.backup.command".to_string(), "rsync -a /data /mnt".to_string());
    reconciler
        .reconcile(&ContainerRef::new(FULL_ID, "web", edited))
        .unwrap();

    let record = table.get("abcdef012345_backup").unwrap();
    assert_eq!(record.schedule, "30 3 * * *");
    assert_eq!(record.command, "rsync -a /data /mnt");
    assert_eq!(table.len(), 1);
}

#[tokio::test]
async fn initial_sync_covers_the_whole_fleet() {
    let runtime = Arc::new(FakeRuntime::default());
    runtime.insert(ContainerRef::new(FULL_ID, "web", backup_labels()));
    runtime.insert(ContainerRef::new(
        "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcd",
        "db",
        labels(&[
            ("scheduler.enable", "true"),
            ("scheduler.vacuum.schedule", "0 5 * * *"),
            ("scheduler.vacuum.command", "vacuumdb --all"),
        ]),
    ));
    runtime.insert(ContainerRef::new(
        "feedfacecafefeedfacecafefeedfacecafefeedfacecafefeedfacecafe0000",
        "plain",
        labels(&[]),
    ));

    let (table, reconciler) = engine(&runtime);
    initial_sync(runtime.as_ref(), &reconciler).await.unwrap();

    let mut ids = table.job_ids();
    ids.sort();
    assert_eq!(ids, vec!["1234567890ab_vacuum", "abcdef012345_backup"]);
}

#[tokio::test]
async fn lifecycle_events_drive_the_table() {
    let runtime = Arc::new(FakeRuntime::default());
    let (tx, rx) = mpsc::channel(16);
    runtime.set_events(rx);
    runtime.insert(ContainerRef::new(FULL_ID, "web", backup_labels()));

    let (table, reconciler) = engine(&runtime);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let loop_handle = tokio::spawn(run_event_loop(
        runtime.clone() as Arc<dyn ContainerRuntime>,
        reconciler,
        shutdown_rx,
    ));

    // start → jobs appear
    tx.send(LifecycleEvent {
        action: EventAction::Start,
        container_id: FULL_ID.to_string(),
    })
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(table.job_ids(), vec![format!("{SHORT_ID}_backup")]);

    // die → jobs gone
    tx.send(LifecycleEvent {
        action: EventAction::Die,
        container_id: FULL_ID.to_string(),
    })
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(table.is_empty());

    // die for a container that never had jobs → harmless no-op
    tx.send(LifecycleEvent {
        action: EventAction::Die,
        container_id: "feedfacecafe000000000000".to_string(),
    })
    .await
    .unwrap();

    // start for a vanished container → logged no-op, loop keeps going
    tx.send(LifecycleEvent {
        action: EventAction::Start,
        container_id: "feedfacecafe000000000000".to_string(),
    })
    .await
    .unwrap();

    // rename and unknown actions are ignored
    tx.send(LifecycleEvent {
        action: EventAction::Rename,
        container_id: FULL_ID.to_string(),
    })
    .await
    .unwrap();
    tx.send(LifecycleEvent {
        action: EventAction::Other("exec_create".to_string()),
        container_id: FULL_ID.to_string(),
    })
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(table.is_empty());

    // update after re-enabling still works — the loop survived everything above
    tx.send(LifecycleEvent {
        action: EventAction::Update,
        container_id: FULL_ID.to_string(),
    })
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(table.len(), 1);

    shutdown_tx.send(true).unwrap();
    loop_handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn disable_then_update_event_clears_the_container() {
    let runtime = Arc::new(FakeRuntime::default());
    let (tx, rx) = mpsc::channel(16);
    runtime.set_events(rx);
    runtime.insert(ContainerRef::new(FULL_ID, "web", backup_labels()));

    let (table, reconciler) = engine(&runtime);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let loop_handle = tokio::spawn(run_event_loop(
        runtime.clone() as Arc<dyn ContainerRuntime>,
        reconciler,
        shutdown_rx,
    ));

    tx.send(LifecycleEvent {
        action: EventAction::Start,
        container_id: FULL_ID.to_string(),
    })
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(table.len(), 1);

    // Operator flips the enable label; the runtime delivers an update event.
    let mut disabled = backup_labels();
    disabled.insert("scheduler.enable".to_string(), "false".to_string());
    runtime.insert(ContainerRef::new(FULL_ID, "web", disabled));
    tx.send(LifecycleEvent {
        action: EventAction::Update,
        container_id: FULL_ID.to_string(),
    })
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(table.is_empty());

    shutdown_tx.send(true).unwrap();
    loop_handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn failing_job_is_contained_and_stays_scheduled() {
    let runtime = Arc::new(FakeRuntime::with_exit_code(137));
    runtime.insert(ContainerRef::new(FULL_ID, "web", backup_labels()));

    let (table, reconciler) = engine(&runtime);
    reconciler
        .reconcile(&ContainerRef::new(FULL_ID, "web", backup_labels()))
        .unwrap();
    let record = table.get("abcdef012345_backup").unwrap();

    // Fire the job by hand, exactly as a trigger task would.
    let executor = Executor::new(runtime.clone() as Arc<dyn ContainerRuntime>);
    executor.run(&record).await;

    assert_eq!(
        runtime.exec_log(),
        vec![(SHORT_ID.to_string(), "tar czf /b.tgz /data".to_string())]
    );
    // Exit 137 was logged, not propagated — the job remains scheduled.
    assert_eq!(table.job_ids(), vec![format!("{SHORT_ID}_backup")]);
}

#[tokio::test]
async fn executor_survives_a_vanished_container() {
    let runtime = Arc::new(FakeRuntime::default());
    let (table, reconciler) = engine(&runtime);
    reconciler
        .reconcile(&ContainerRef::new(FULL_ID, "web", backup_labels()))
        .unwrap();
    let record = table.get("abcdef012345_backup").unwrap();

    // Container torn down between registration and fire time.
    let executor = Executor::new(runtime.clone() as Arc<dyn ContainerRuntime>);
    executor.run(&record).await;

    assert!(runtime.exec_log().is_empty());
    assert_eq!(table.len(), 1);
}
