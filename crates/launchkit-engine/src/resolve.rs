//! Target resolution and disambiguation
//!
//! Narrows a candidate match to a single project record, or returns a
//! pause-point value (selection or confirmation needed) for the caller to
//! resume with. Returning values instead of prompting keeps the engine
//! usable headless; interactive callers render the prompt and re-resolve.

use launchkit_core::{ActionVerb, ExecutionMode, ResourceKind};
use launchkit_lang::{match_input, CandidateMatch, GrammarTable};
use launchkit_registry::{ProjectRecord, ProjectStore};
use tracing::debug;

use crate::error::{Error, Result};
use crate::request::ActionRequest;

/// Caller-supplied policy for a resolution pass
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Treat destructive confirmations as already answered (--yes)
    pub assume_yes: bool,

    /// Execution mode to stamp on the resulting request
    pub mode: ExecutionMode,
}

/// Outcome of resolving one candidate against the registry
#[derive(Debug)]
pub enum ResolvedCommand {
    /// Ready to dispatch
    Action(ActionRequest),

    /// Destructive action awaiting an explicit affirmative
    NeedsConfirmation(ActionRequest),

    /// Multiple registry matches; the caller must pick one and re-resolve
    NeedsSelection { names: Vec<String> },

    /// Registry listing, rendered by the caller
    List {
        kind: ResourceKind,
        records: Vec<ProjectRecord>,
    },

    /// Single-record detail view, rendered by the caller
    Show(ProjectRecord),
}

/// Normalize and match an input line, returning the top candidate
///
/// An empty candidate list surfaces as `UnrecognizedCommand`, which is a
/// per-command error: the session stays usable.
pub fn interpret(table: &GrammarTable, input: &str) -> Result<CandidateMatch> {
    let tokens = table.normalizer().normalize(input);
    let candidates = match_input(table, &tokens);
    debug!(input, candidates = candidates.len(), "matched input");

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::unrecognized(input.trim()))
}

/// Resolve a candidate match against the registry
pub fn resolve(
    candidate: &CandidateMatch,
    store: &ProjectStore,
    options: ResolveOptions,
) -> Result<ResolvedCommand> {
    match candidate.verb {
        ActionVerb::List => Ok(ResolvedCommand::List {
            kind: candidate.resource,
            records: store.list()?,
        }),
        ActionVerb::Show => {
            let target = resolve_target(candidate, store)?;
            match target {
                Target::One(record) => Ok(ResolvedCommand::Show(record)),
                Target::Many(names) => Ok(ResolvedCommand::NeedsSelection { names }),
            }
        }
        ActionVerb::Create if candidate.resource == ResourceKind::Project => {
            // The duplicate check runs here so no handler is ever invoked
            // for a name that is already registered
            if let Some(name) = candidate.slots.get_str("name") {
                if store.get(name)?.is_some() {
                    return Err(launchkit_registry::Error::duplicate(name).into());
                }
            }
            Ok(ResolvedCommand::Action(build_request(candidate, None, options.mode)))
        }
        _ => {
            // Everything else operates on an existing registry target
            let target = resolve_target(candidate, store)?;
            match target {
                Target::Many(names) => Ok(ResolvedCommand::NeedsSelection { names }),
                Target::One(record) => {
                    let request = build_request(candidate, Some(record), options.mode);
                    if candidate.verb.is_destructive() && !options.assume_yes {
                        Ok(ResolvedCommand::NeedsConfirmation(request))
                    } else {
                        Ok(ResolvedCommand::Action(request))
                    }
                }
            }
        }
    }
}

enum Target {
    One(ProjectRecord),
    Many(Vec<String>),
}

/// Find the registry record(s) a candidate refers to
fn resolve_target(candidate: &CandidateMatch, store: &ProjectStore) -> Result<Target> {
    let pattern = candidate.slots.get_str("name").unwrap_or_default();
    let mut matches = store.find(pattern)?;

    // SCALE with no explicit name only makes sense against projects that
    // actually have something to scale
    if candidate.verb == ActionVerb::Scale && pattern.is_empty() {
        matches.retain(|r| !r.handles.deployments.is_empty() || r.handles.replicas.is_some());
    }

    // An exact name always beats substring neighbours
    if let Some(exact) = matches.iter().position(|r| r.name == pattern) {
        return Ok(Target::One(matches.swap_remove(exact)));
    }

    match matches.len() {
        0 => Err(Error::no_such_target(if pattern.is_empty() {
            candidate.resource.to_string()
        } else {
            pattern.to_string()
        })),
        1 => Ok(Target::One(matches.remove(0))),
        _ => {
            let mut names: Vec<String> = matches.into_iter().map(|r| r.name).collect();
            names.sort();
            Ok(Target::Many(names))
        }
    }
}

fn build_request(
    candidate: &CandidateMatch,
    target: Option<ProjectRecord>,
    mode: ExecutionMode,
) -> ActionRequest {
    ActionRequest {
        verb: candidate.verb,
        resource: candidate.resource,
        slots: candidate.slots.clone(),
        target,
        mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchkit_lang::builtin_table;
    use launchkit_registry::ResourceHandles;
    use tempfile::TempDir;

    fn test_store() -> (ProjectStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::new(dir.path().join("projects.json"));
        (store, dir)
    }

    fn candidate(input: &str) -> CandidateMatch {
        interpret(builtin_table(), input).unwrap()
    }

    #[test]
    fn test_unrecognized_input() {
        let err = interpret(builtin_table(), "make me a sandwich please now");
        assert!(matches!(err, Err(Error::UnrecognizedCommand { .. })));
    }

    #[test]
    fn test_create_duplicate_refused_before_any_handler() {
        let (store, _dir) = test_store();
        store.register("abc", "mern", ResourceHandles::default()).unwrap();

        let err = resolve(&candidate("create project abc"), &store, ResolveOptions::default());
        assert!(matches!(
            err,
            Err(Error::Registry(launchkit_registry::Error::DuplicateProject { .. }))
        ));
    }

    #[test]
    fn test_no_such_target() {
        let (store, _dir) = test_store();
        let err = resolve(&candidate("deploy ghost"), &store, ResolveOptions::default());
        assert!(matches!(err, Err(Error::NoSuchTarget { .. })));
    }

    #[test]
    fn test_single_match_proceeds() {
        let (store, _dir) = test_store();
        store.register("abc", "mern", ResourceHandles::default()).unwrap();

        let resolved = resolve(&candidate("deploy"), &store, ResolveOptions::default()).unwrap();
        match resolved {
            ResolvedCommand::Action(request) => {
                assert_eq!(request.verb, ActionVerb::Deploy);
                assert_eq!(request.target_name(), Some("abc"));
            }
            other => panic!("expected Action, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_matches_need_selection() {
        let (store, _dir) = test_store();
        store.register("abc", "mern", ResourceHandles::default()).unwrap();
        store.register("xyz", "node", ResourceHandles::default()).unwrap();

        let resolved = resolve(
            &candidate("DELETE PROJECT"),
            &store,
            ResolveOptions { assume_yes: true, ..Default::default() },
        )
        .unwrap();
        match resolved {
            ResolvedCommand::NeedsSelection { names } => {
                assert_eq!(names, vec!["abc".to_string(), "xyz".to_string()]);
            }
            other => panic!("expected NeedsSelection, got {other:?}"),
        }
        // Both records are untouched
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_requires_confirmation_even_with_one_match() {
        let (store, _dir) = test_store();
        store.register("abc", "mern", ResourceHandles::default()).unwrap();

        let resolved =
            resolve(&candidate("delete project abc"), &store, ResolveOptions::default()).unwrap();
        assert!(matches!(resolved, ResolvedCommand::NeedsConfirmation(_)));

        let resolved = resolve(
            &candidate("delete project abc"),
            &store,
            ResolveOptions { assume_yes: true, ..Default::default() },
        )
        .unwrap();
        assert!(matches!(resolved, ResolvedCommand::Action(_)));
    }

    #[test]
    fn test_exact_name_beats_substring() {
        let (store, _dir) = test_store();
        store.register("shop", "mern", ResourceHandles::default()).unwrap();
        store.register("shop-web", "node", ResourceHandles::default()).unwrap();

        let resolved = resolve(
            &candidate("deploy shop"),
            &store,
            ResolveOptions::default(),
        )
        .unwrap();
        match resolved {
            ResolvedCommand::Action(request) => assert_eq!(request.target_name(), Some("shop")),
            other => panic!("expected Action, got {other:?}"),
        }
    }

    #[test]
    fn test_scale_targets_deployment_bearing_project() {
        let (store, _dir) = test_store();
        store.register("plain", "node", ResourceHandles::default()).unwrap();
        store
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

        let resolved = resolve(
            &candidate("Scale down to 1 instance"),
            &store,
            ResolveOptions::default(),
        )
        .unwrap();
        match resolved {
            ResolvedCommand::Action(request) => {
                assert_eq!(request.verb, ActionVerb::Scale);
                assert_eq!(request.target_name(), Some("webapp"));
                assert_eq!(request.slots.get_int("replicas"), Some(1));
            }
            other => panic!("expected Action, got {other:?}"),
        }
    }

    #[test]
    fn test_list_resolves_without_target() {
        let (store, _dir) = test_store();
        let resolved =
            resolve(&candidate("list projects"), &store, ResolveOptions::default()).unwrap();
        match resolved {
            ResolvedCommand::List { kind, records } => {
                assert_eq!(kind, ResourceKind::Project);
                assert!(records.is_empty());
            }
            other => panic!("expected List, got {other:?}"),
        }
    }

    #[test]
    fn test_show_single_project() {
        let (store, _dir) = test_store();
        store.register("abc", "mern", ResourceHandles::default()).unwrap();

        let resolved =
            resolve(&candidate("show project abc"), &store, ResolveOptions::default()).unwrap();
        assert!(matches!(resolved, ResolvedCommand::Show(record) if record.name == "abc"));
    }
}
