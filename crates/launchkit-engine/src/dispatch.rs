//! Action dispatcher
//!
//! Maps a resolved request to its handler, enforces the
//! validate-before-execute contract, and applies the registry effect of a
//! successful execution. Handler failures are recorded against the
//! target record and surfaced; retries are a new user command.

use launchkit_core::{ActionVerb, ResourceKind};
use launchkit_registry::{ProjectRecord, ProjectStore};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::handler::HandlerSet;
use crate::request::{ActionPlan, ActionRequest};

/// What a successful dispatch produced
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// Handler message
    pub message: String,

    /// The registry record after the effect was applied, if one remains
    pub record: Option<ProjectRecord>,
}

/// The dispatcher: handler table plus the registry it keeps consistent
pub struct Dispatcher {
    handlers: HandlerSet,
    store: ProjectStore,
}

impl Dispatcher {
    /// Create a dispatcher over a handler table and registry
    pub fn new(handlers: HandlerSet, store: ProjectStore) -> Self {
        Self { handlers, store }
    }

    /// The registry this dispatcher mutates
    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    /// Validate a request and render its plan without side effects
    pub fn explain(&self, request: &ActionRequest) -> Result<ActionPlan> {
        let handler = self.handlers.get(request.verb, request.resource)?;
        handler.validate(request)?;
        Ok(handler.plan(request))
    }

    /// Run a request through its handler and apply the registry effect
    pub async fn dispatch(&self, request: &ActionRequest) -> Result<ExecutionReport> {
        let handler = self.handlers.get(request.verb, request.resource)?;

        // Validation failures abort with no side effects
        handler.validate(request)?;

        // Persist the transition before the handler runs so an
        // interrupted execution is detectable on the next load
        let target_name = request.target.as_ref().map(|t| t.name.clone());
        if let Some(name) = &target_name {
            if request.verb == ActionVerb::Delete && request.resource == ResourceKind::Project {
                self.store.mark_deleting(name)?;
            } else {
                self.store.begin_action(name, &request.describe())?;
            }
        }

        info!(action = %request.describe(), handler = handler.name(), "dispatching");

        match handler.execute(request).await {
            Ok(outcome) => {
                let record = self.apply_effect(request, &outcome.handles)?;
                Ok(ExecutionReport {
                    message: outcome.message,
                    record,
                })
            }
            Err(err) => {
                // CREATE PROJECT has no record to mark; everything else
                // records the failure for an explicit retry
                if let Some(name) = &target_name {
                    warn!(project = %name, error = %err, "handler failed");
                    self.store.mark_failed(name, &err.to_string())?;
                }
                Err(err)
            }
        }
    }

    /// Registry effect of a successful execution, derived from the verb
    fn apply_effect(
        &self,
        request: &ActionRequest,
        handles: &launchkit_registry::ResourceHandles,
    ) -> Result<Option<ProjectRecord>> {
        let record = match (request.verb, request.resource) {
            (ActionVerb::Create, ResourceKind::Project) => {
                let name = request.require_name()?;
                let stack = request.slots.get_str("stack").unwrap_or("general");
                Some(self.store.register(name, stack, handles.clone())?)
            }
            (ActionVerb::Delete, ResourceKind::Project) => {
                let name = request.require_name()?;
                self.store.remove(name)?;
                None
            }
            (ActionVerb::Delete, kind) => {
                let name = request.require_name()?;
                Some(self.store.update(name, |record| {
                    // Per-class handles are cleared wholesale, never
                    // partially rewritten
                    match kind {
                        ResourceKind::Container => record.handles.containers.clear(),
                        ResourceKind::Deployment => {
                            record.handles.deployments.clear();
                            record.handles.replicas = None;
                        }
                        ResourceKind::Image => record.handles.images.clear(),
                        ResourceKind::Project => unreachable!("handled above"),
                    }
                    record.in_flight = None;
                })?)
            }
            _ => {
                let name = request.require_name()?;
                Some(self.store.update(name, |record| {
                    record.handles.merge(handles);
                    record.in_flight = None;
                })?)
            }
        };

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use launchkit_core::ExecutionMode;
    use launchkit_lang::SlotValues;
    use launchkit_registry::ResourceHandles;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    use crate::handler::ActionHandler;
    use crate::request::{ActionPlan, HandlerOutcome};

    /// Test double that counts executions and returns a canned outcome
    struct FakeHandler {
        calls: Arc<AtomicUsize>,
        outcome: std::result::Result<ResourceHandles, String>,
    }

    #[async_trait]
    impl ActionHandler for FakeHandler {
        fn name(&self) -> &'static str {
            "fake"
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
            match &self.outcome {
                Ok(handles) => Ok(HandlerOutcome::message("ok").with_handles(handles.clone())),
                Err(msg) => Err(Error::handler_failure(msg.clone())),
            }
        }
    }

    fn harness(
        verb: ActionVerb,
        kind: ResourceKind,
        outcome: std::result::Result<ResourceHandles, String>,
    ) -> (Dispatcher, Arc<AtomicUsize>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::new(dir.path().join("projects.json"));
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handlers = HandlerSet::new();
        handlers.register(
            verb,
            kind,
            Box::new(FakeHandler {
                calls: calls.clone(),
                outcome,
            }),
        );
        (Dispatcher::new(handlers, store), calls, dir)
    }

    fn request(
        verb: ActionVerb,
        kind: ResourceKind,
        slots: SlotValues,
        target: Option<ProjectRecord>,
    ) -> ActionRequest {
        ActionRequest {
            verb,
            resource: kind,
            slots,
            target,
            mode: ExecutionMode::Execute,
        }
    }

    fn name_slot(name: &str) -> SlotValues {
        let mut slots = SlotValues::default();
        slots.insert("name", launchkit_lang::SlotValue::Ident(name.into()));
        slots
    }

    #[tokio::test]
    async fn test_create_registers_record() {
        let (dispatcher, calls, _dir) = harness(
            ActionVerb::Create,
            ResourceKind::Project,
            Ok(ResourceHandles::default()),
        );

        let report = dispatcher
            .dispatch(&request(
                ActionVerb::Create,
                ResourceKind::Project,
                name_slot("abc"),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.record.unwrap().name, "abc");
        assert!(dispatcher.store().get("abc").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_create_leaves_no_record() {
        let (dispatcher, _calls, _dir) = harness(
            ActionVerb::Create,
            ResourceKind::Project,
            Err("scaffold blew up".into()),
        );

        let err = dispatcher
            .dispatch(&request(
                ActionVerb::Create,
                ResourceKind::Project,
                name_slot("abc"),
                None,
            ))
            .await;

        assert!(matches!(err, Err(Error::HandlerFailure { .. })));
        assert!(dispatcher.store().get("abc").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_validation_failure_aborts_before_execute() {
        let (dispatcher, calls, _dir) = harness(
            ActionVerb::Scale,
            ResourceKind::Deployment,
            Ok(ResourceHandles::default()),
        );
        dispatcher
            .store()
            .register("abc", "mern", ResourceHandles::default())
            .unwrap();

        let mut slots = name_slot("abc");
        slots.insert("replicas", launchkit_lang::SlotValue::Int(-2));
        let target = dispatcher.store().get("abc").unwrap();

        let err = dispatcher
            .dispatch(&request(
                ActionVerb::Scale,
                ResourceKind::Deployment,
                slots,
                target,
            ))
            .await;

        assert!(matches!(err, Err(Error::Validation { slot, .. }) if slot == "replicas"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        // No side effects: no in-flight marker, no failure recorded
        let record = dispatcher.store().get("abc").unwrap().unwrap();
        assert!(!record.was_interrupted());
        assert!(record.last_failure.is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let (dispatcher, _calls, _dir) = harness(
            ActionVerb::Delete,
            ResourceKind::Project,
            Ok(ResourceHandles::default()),
        );
        dispatcher
            .store()
            .register("abc", "mern", ResourceHandles::default())
            .unwrap();
        let target = dispatcher.store().get("abc").unwrap();

        dispatcher
            .dispatch(&request(
                ActionVerb::Delete,
                ResourceKind::Project,
                name_slot("abc"),
                target,
            ))
            .await
            .unwrap();

        assert!(dispatcher.store().find("abc").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_returns_to_active_with_failure() {
        let (dispatcher, _calls, _dir) = harness(
            ActionVerb::Delete,
            ResourceKind::Project,
            Err("kubectl delete failed".into()),
        );
        dispatcher
            .store()
            .register("abc", "mern", ResourceHandles::default())
            .unwrap();
        let target = dispatcher.store().get("abc").unwrap();

        let err = dispatcher
            .dispatch(&request(
                ActionVerb::Delete,
                ResourceKind::Project,
                name_slot("abc"),
                target,
            ))
            .await;
        assert!(err.is_err());

        let record = dispatcher.store().get("abc").unwrap().unwrap();
        assert_eq!(record.state, launchkit_registry::LifecycleState::Active);
        assert!(record.last_failure.unwrap().message.contains("kubectl"));
    }

    #[tokio::test]
    async fn test_scale_updates_replica_handle() {
        let (dispatcher, _calls, _dir) = harness(
            ActionVerb::Scale,
            ResourceKind::Deployment,
            Ok(ResourceHandles {
                replicas: Some(1),
                ..Default::default()
            }),
        );
        dispatcher
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
        let target = dispatcher.store().get("webapp").unwrap();

        let mut slots = name_slot("webapp");
        slots.insert("replicas", launchkit_lang::SlotValue::Int(1));

        dispatcher
            .dispatch(&request(
                ActionVerb::Scale,
                ResourceKind::Deployment,
                slots,
                target,
            ))
            .await
            .unwrap();

        let record = dispatcher.store().get("webapp").unwrap().unwrap();
        assert_eq!(record.handles.replicas, Some(1));
        assert_eq!(record.handles.deployments, vec!["webapp"]);
        assert!(!record.was_interrupted());
    }

    #[tokio::test]
    async fn test_delete_container_clears_class() {
        let (dispatcher, _calls, _dir) = harness(
            ActionVerb::Delete,
            ResourceKind::Container,
            Ok(ResourceHandles::default()),
        );
        dispatcher
            .store()
            .register(
                "abc",
                "mern",
                ResourceHandles {
                    containers: vec!["abc-app".into()],
                    images: vec!["abc:latest".into()],
                    ..Default::default()
                },
            )
            .unwrap();
        let target = dispatcher.store().get("abc").unwrap();

        dispatcher
            .dispatch(&request(
                ActionVerb::Delete,
                ResourceKind::Container,
                name_slot("abc"),
                target,
            ))
            .await
            .unwrap();

        let record = dispatcher.store().get("abc").unwrap().unwrap();
        assert!(record.handles.containers.is_empty());
        // Other handle classes are untouched
        assert_eq!(record.handles.images, vec!["abc:latest"]);
    }

    #[tokio::test]
    async fn test_explain_never_mutates() {
        let (dispatcher, calls, _dir) = harness(
            ActionVerb::Delete,
            ResourceKind::Project,
            Ok(ResourceHandles::default()),
        );
        dispatcher
            .store()
            .register("abc", "mern", ResourceHandles::default())
            .unwrap();
        let target = dispatcher.store().get("abc").unwrap();

        let plan = dispatcher
            .explain(&request(
                ActionVerb::Delete,
                ResourceKind::Project,
                name_slot("abc"),
                target,
            ))
            .unwrap();

        assert!(plan.summary.contains("delete"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let record = dispatcher.store().get("abc").unwrap().unwrap();
        assert_eq!(record.state, launchkit_registry::LifecycleState::Active);
        assert!(!record.was_interrupted());
    }
}
