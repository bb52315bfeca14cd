//! End-to-end pipeline tests: normalize -> match -> resolve -> dispatch
//! against a temp registry, with handlers stubbed at the capability
//! boundary.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use launchkit_core::{ActionVerb, ExecutionMode, ResourceKind};
use launchkit_engine::{
    interpret, resolve, ActionHandler, ActionPlan, ActionRequest, CommandOutcome, Dispatcher,
    Error, HandlerOutcome, HandlerSet, ModeController, ResolveOptions, ResolvedCommand, Result,
};
use launchkit_lang::builtin_table;
use launchkit_registry::{ProjectStore, ResourceHandles};

/// Records executions; reports back the handles it is given
struct StubHandler {
    calls: Arc<AtomicUsize>,
    handles: ResourceHandles,
}

#[async_trait]
impl ActionHandler for StubHandler {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn validate(&self, request: &ActionRequest) -> Result<()> {
        if let Some(replicas) = request.slots.get_int("replicas") {
            if replicas < 0 {
                return Err(Error::validation("replicas", "must be non-negative"));
            }
        }
        Ok(())
    }

    fn plan(&self, request: &ActionRequest) -> ActionPlan {
        ActionPlan::new(request.describe(), vec![])
    }

    async fn execute(&self, _request: &ActionRequest) -> Result<HandlerOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(HandlerOutcome::message("done").with_handles(self.handles.clone()))
    }
}

struct Harness {
    dispatcher: Dispatcher,
    calls: Arc<AtomicUsize>,
    _dir: TempDir,
}

fn harness(verb: ActionVerb, kind: ResourceKind, handles: ResourceHandles) -> Harness {
    let dir = TempDir::new().unwrap();
    let store = ProjectStore::new(dir.path().join("projects.json"));
    let calls = Arc::new(AtomicUsize::new(0));
    let mut set = HandlerSet::new();
    set.register(
        verb,
        kind,
        Box::new(StubHandler {
            calls: calls.clone(),
            handles,
        }),
    );
    Harness {
        dispatcher: Dispatcher::new(set, store),
        calls,
        _dir: dir,
    }
}

fn resolve_line(
    dispatcher: &Dispatcher,
    line: &str,
    options: ResolveOptions,
) -> launchkit_engine::Result<ResolvedCommand> {
    let candidate = interpret(builtin_table(), line)?;
    resolve(&candidate, dispatcher.store(), options)
}

#[tokio::test]
async fn scale_down_to_one_instance_scenario() {
    // One active deployment-bearing project; a verb-only phrase must find it
    let h = harness(
        ActionVerb::Scale,
        ResourceKind::Deployment,
        ResourceHandles {
            replicas: Some(1),
            ..Default::default()
        },
    );
    h.dispatcher
        .store()
        .register(
            "webapp",
            "mern",
            ResourceHandles {
                deployments: vec!["webapp".into()],
                replicas: Some(3),
                ..Default::default()
            },
        )
        .unwrap();

    let resolved = resolve_line(
        &h.dispatcher,
        "Scale down to 1 instance",
        ResolveOptions::default(),
    )
    .unwrap();

    let request = match resolved {
        ResolvedCommand::Action(request) => request,
        other => panic!("expected Action, got {other:?}"),
    };
    assert_eq!(request.verb, ActionVerb::Scale);
    assert_eq!(request.slots.get_int("replicas"), Some(1));
    assert_eq!(request.target_name(), Some("webapp"));

    h.dispatcher.dispatch(&request).await.unwrap();
    assert_eq!(h.calls.load(Ordering::SeqCst), 1);

    let record = h.dispatcher.store().get("webapp").unwrap().unwrap();
    assert_eq!(record.handles.replicas, Some(1));
}

#[tokio::test]
async fn negative_replicas_fail_validation_before_handler() {
    let h = harness(
        ActionVerb::Scale,
        ResourceKind::Deployment,
        ResourceHandles::default(),
    );
    h.dispatcher
        .store()
        .register(
            "webapp",
            "mern",
            ResourceHandles {
                deployments: vec!["webapp".into()],
                ..Default::default()
            },
        )
        .unwrap();

    let resolved = resolve_line(
        &h.dispatcher,
        "scale webapp to -1 replicas",
        ResolveOptions::default(),
    )
    .unwrap();
    let request = match resolved {
        ResolvedCommand::Action(request) => request,
        other => panic!("expected Action, got {other:?}"),
    };

    let err = h.dispatcher.dispatch(&request).await;
    assert!(matches!(err, Err(Error::Validation { slot, .. }) if slot == "replicas"));
    assert_eq!(h.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn ambiguous_delete_leaves_records_unchanged() {
    // Two active projects and no name slot: the engine must not guess
    let h = harness(
        ActionVerb::Delete,
        ResourceKind::Project,
        ResourceHandles::default(),
    );
    h.dispatcher
        .store()
        .register("abc", "mern", ResourceHandles::default())
        .unwrap();
    h.dispatcher
        .store()
        .register("xyz", "node", ResourceHandles::default())
        .unwrap();

    let resolved = resolve_line(
        &h.dispatcher,
        "DELETE PROJECT",
        ResolveOptions {
            assume_yes: true,
            ..Default::default()
        },
    )
    .unwrap();

    match resolved {
        ResolvedCommand::NeedsSelection { names } => {
            assert_eq!(names, vec!["abc".to_string(), "xyz".to_string()]);
        }
        other => panic!("expected NeedsSelection, got {other:?}"),
    }

    // Selecting neither: both records remain, no handler ran
    assert_eq!(h.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.dispatcher.store().list().unwrap().len(), 2);
}

#[tokio::test]
async fn explain_mode_never_mutates_the_registry() {
    let h = harness(
        ActionVerb::Delete,
        ResourceKind::Project,
        ResourceHandles::default(),
    );
    h.dispatcher
        .store()
        .register("abc", "mern", ResourceHandles::default())
        .unwrap();

    let resolved = resolve_line(
        &h.dispatcher,
        "delete project abc",
        ResolveOptions {
            assume_yes: true,
            mode: ExecutionMode::Explain,
        },
    )
    .unwrap();
    let request = match resolved {
        ResolvedCommand::Action(request) => request,
        other => panic!("expected Action, got {other:?}"),
    };

    let controller = ModeController::new(ExecutionMode::Explain);
    let outcome = controller.run(&h.dispatcher, &request).await.unwrap();

    assert!(matches!(outcome, CommandOutcome::Explained(_)));
    assert_eq!(h.calls.load(Ordering::SeqCst), 0);
    let record = h.dispatcher.store().get("abc").unwrap().unwrap();
    assert_eq!(record.state, launchkit_registry::LifecycleState::Active);
}

#[tokio::test]
async fn create_then_delete_roundtrip() {
    let dir = TempDir::new().unwrap();
    let store = ProjectStore::new(dir.path().join("projects.json"));
    let calls = Arc::new(AtomicUsize::new(0));

    let mut set = HandlerSet::new();
    set.register(
        ActionVerb::Create,
        ResourceKind::Project,
        Box::new(StubHandler {
            calls: calls.clone(),
            handles: ResourceHandles::default(),
        }),
    );
    set.register(
        ActionVerb::Delete,
        ResourceKind::Project,
        Box::new(StubHandler {
            calls: calls.clone(),
            handles: ResourceHandles::default(),
        }),
    );
    let dispatcher = Dispatcher::new(set, store);

    // create
    let resolved =
        resolve_line(&dispatcher, "create mern project shop", ResolveOptions::default()).unwrap();
    let request = match resolved {
        ResolvedCommand::Action(request) => request,
        other => panic!("expected Action, got {other:?}"),
    };
    dispatcher.dispatch(&request).await.unwrap();
    let record = dispatcher.store().get("shop").unwrap().unwrap();
    assert_eq!(record.stack, "mern");

    // duplicate create is refused before any handler call
    let calls_before = calls.load(Ordering::SeqCst);
    let err = resolve_line(&dispatcher, "create project shop", ResolveOptions::default());
    assert!(matches!(
        err,
        Err(Error::Registry(launchkit_registry::Error::DuplicateProject { .. }))
    ));
    assert_eq!(calls.load(Ordering::SeqCst), calls_before);

    // delete
    let resolved = resolve_line(
        &dispatcher,
        "tear down project shop",
        ResolveOptions {
            assume_yes: true,
            ..Default::default()
        },
    )
    .unwrap();
    let request = match resolved {
        ResolvedCommand::Action(request) => request,
        other => panic!("expected Action, got {other:?}"),
    };
    dispatcher.dispatch(&request).await.unwrap();

    assert!(dispatcher.store().find("shop").unwrap().is_empty());
}
