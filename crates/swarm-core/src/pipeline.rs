//! The pipeline controller: drafting stages, the bounded review loop, and
//! the final bundle.
//!
//! A run moves through these states in fixed order:
//!
//!   Seed → Research → Plan → Draft(copy, channel) → Review loop → Finalize
//!
//! The seed envelope is the research stage's envelope. Every exchange is
//! logged as outbound envelope then inbound raw text, and every artifact an
//! agent returns is persisted as soon as it is parsed. Any error aborts the
//! run; whatever already reached the store or log stays there.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use swarm_contracts::{
    agent::{AgentRole, Party},
    artifact::Artifact,
    envelope::{Envelope, NextAction},
    error::{SwarmError, SwarmResult},
    log::{AgentResponse, LogEntry},
    run::{RunInputs, RunSummary, TaskId},
};

use crate::{
    bundle::{Bundle, Category},
    invoker::{AgentInvoker, AgentReply},
    registry::AgentRegistry,
    stage::{
        Stage, DRAFT_STAGES, REVIEW_ACTION, REVIEW_NOTE_NAME, REVIEW_PRIORITY, REVISE_ACTION,
        REVISE_PRIORITY,
    },
    traits::{ArtifactStore, RunLog},
};

/// File name of the concatenated final document.
pub const FINAL_BUNDLE_FILE: &str = "final_bundle.md";
/// File name of the machine-readable run summary.
pub const SUMMARY_FILE: &str = "summary.json";
/// File name of the run log.
pub const RUN_LOG_FILE: &str = "run.log.jsonl";

/// Output files the pipeline writes itself; agents may not claim them.
pub const RESERVED_NAMES: [&str; 3] = [FINAL_BUNDLE_FILE, SUMMARY_FILE, RUN_LOG_FILE];

const FINAL_BUNDLE_TITLE: &str = "# Final Marketing Bundle\n";

/// Whether `name` refers to one of [`RESERVED_NAMES`], ignoring `./`
/// segments.
pub fn is_reserved_name(name: &str) -> bool {
    let normalized: PathBuf = Path::new(name)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    RESERVED_NAMES.iter().any(|reserved| normalized == Path::new(reserved))
}

/// Whether a revision round follows the review pass that just completed.
///
/// `completed` counts review passes including the current one. With
/// `max_review_cycles = N` the analyst runs N+1 times and the reviser runs
/// after each of the first N passes.
pub fn revision_due(completed: u32, max_review_cycles: u32) -> bool {
    completed <= max_review_cycles
}

/// Everything one run needs that the pipeline does not own.
pub struct RunContext<'a> {
    pub task_id: &'a TaskId,
    pub inputs: &'a RunInputs,
    pub store: &'a dyn ArtifactStore,
    pub log: &'a dyn RunLog,
}

impl<'a> RunContext<'a> {
    pub fn new(
        task_id: &'a TaskId,
        inputs: &'a RunInputs,
        store: &'a dyn ArtifactStore,
        log: &'a dyn RunLog,
    ) -> Self {
        Self {
            task_id,
            inputs,
            store,
            log,
        }
    }
}

/// The result of the review loop.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// The bundle after the last revision round.
    pub bundle: Bundle,
    /// Every artifact the analyst produced, across all passes.
    pub reviews: Vec<Artifact>,
    /// Number of completed review passes.
    pub cycles: u32,
}

/// Drives the six agents through one run.
pub struct Pipeline {
    agents: AgentRegistry,
    invoker: AgentInvoker,
    max_review_cycles: u32,
}

impl Pipeline {
    pub fn new(agents: AgentRegistry, invoker: AgentInvoker, max_review_cycles: u32) -> Self {
        Self {
            agents,
            invoker,
            max_review_cycles,
        }
    }

    /// Execute a full run and return its summary.
    pub fn run(&self, ctx: &RunContext<'_>) -> SwarmResult<RunSummary> {
        info!(
            task_id = %ctx.task_id,
            max_review_cycles = self.max_review_cycles,
            "run starting"
        );

        let drafted = self.draft(ctx)?;
        let outcome = self.review(ctx, drafted)?;
        let summary = self.finalize(ctx, &outcome)?;

        info!(
            task_id = %ctx.task_id,
            review_cycles = summary.review_cycles,
            artifacts = summary.artifacts.len(),
            "run complete"
        );
        Ok(summary)
    }

    /// Run the drafting stages in order, starting from an empty bundle.
    pub fn draft(&self, ctx: &RunContext<'_>) -> SwarmResult<Bundle> {
        DRAFT_STAGES
            .iter()
            .try_fold(Bundle::default(), |bundle, stage| self.run_stage(ctx, bundle, stage))
    }

    fn run_stage(&self, ctx: &RunContext<'_>, bundle: Bundle, stage: &Stage) -> SwarmResult<Bundle> {
        let context = (stage.input)(&bundle);
        let next = NextAction::new(stage.agent, stage.action, stage.priority);
        let artifacts = self.call(ctx, stage.agent, context, next, None)?.artifacts;

        debug!(
            task_id = %ctx.task_id,
            agent = %stage.agent,
            category = stage.output.as_str(),
            produced = artifacts.len(),
            "stage complete"
        );
        Ok(bundle.with(stage.output, artifacts))
    }

    /// The bounded review loop.
    ///
    /// Each pass consumes the previous snapshot and yields a new one. The
    /// analyst's artifacts are persisted and collected but never enter the
    /// bundle. The review note is the content of the first raw entry the
    /// analyst returned, well-formed or not.
    pub fn review(&self, ctx: &RunContext<'_>, drafted: Bundle) -> SwarmResult<ReviewOutcome> {
        let mut snapshot = drafted;
        let mut reviews = Vec::new();
        let mut cycles = 0u32;

        loop {
            let next = NextAction::new(AgentRole::AnalystQa, REVIEW_ACTION, REVIEW_PRIORITY);
            let qa = self.call(ctx, AgentRole::AnalystQa, snapshot.concat(), next, None)?;
            cycles += 1;

            let note = qa.first_entry_content();
            reviews.extend(qa.artifacts);

            if !revision_due(cycles, self.max_review_cycles) {
                debug!(task_id = %ctx.task_id, cycle = cycles, "review budget exhausted");
                break;
            }

            info!(task_id = %ctx.task_id, cycle = cycles, "revising bundle");
            snapshot = self.revise(ctx, snapshot, &note)?;
        }

        Ok(ReviewOutcome {
            bundle: snapshot,
            reviews,
            cycles,
        })
    }

    /// One revision round: plan, then copy, then channel.
    ///
    /// Only each category's first artifact is sent and replaced. An empty
    /// category is skipped; an empty reviser reply leaves the category as it
    /// was.
    fn revise(&self, ctx: &RunContext<'_>, snapshot: Bundle, note: &str) -> SwarmResult<Bundle> {
        Category::REVISABLE
            .iter()
            .try_fold(snapshot, |bundle, &category| {
                let Some(target) = bundle.get(category).first().cloned() else {
                    debug!(
                        task_id = %ctx.task_id,
                        category = category.as_str(),
                        "nothing to revise"
                    );
                    return Ok(bundle);
                };

                let context = vec![Artifact::markdown(REVIEW_NOTE_NAME, note), target.clone()];
                let next = NextAction::new(AgentRole::Reviser, REVISE_ACTION, REVISE_PRIORITY);
                let revised =
                    self.call(ctx, AgentRole::Reviser, context, next, Some(&target.name))?;

                match revised.artifacts.into_iter().next() {
                    Some(first) => Ok(bundle.with(category, vec![first])),
                    None => {
                        debug!(
                            task_id = %ctx.task_id,
                            category = category.as_str(),
                            "reviser returned nothing; keeping current artifacts"
                        );
                        Ok(bundle)
                    }
                }
            })
    }

    /// Write `final_bundle.md` and `summary.json`.
    pub fn finalize(&self, ctx: &RunContext<'_>, outcome: &ReviewOutcome) -> SwarmResult<RunSummary> {
        let document = render_final_bundle(&outcome.bundle.concat());
        ctx.store.write_file(FINAL_BUNDLE_FILE, &document)?;

        let mut artifacts = outcome.bundle.names();
        artifacts.push(FINAL_BUNDLE_FILE.to_string());
        artifacts.push(RUN_LOG_FILE.to_string());

        let summary = RunSummary {
            task_id: ctx.task_id.clone(),
            goal: ctx.inputs.goal.clone(),
            artifacts,
            review_cycles: outcome.cycles,
        };
        let json = serde_json::to_string_pretty(&summary).map_err(|e| {
            SwarmError::ArtifactWriteError {
                reason: format!("failed to serialize run summary: {}", e),
            }
        })?;
        ctx.store.write_file(SUMMARY_FILE, &json)?;

        Ok(summary)
    }

    /// One agent exchange: build, log, send, log the raw reply, parse,
    /// persist.
    fn call(
        &self,
        ctx: &RunContext<'_>,
        to: AgentRole,
        artifacts: Vec<Artifact>,
        next: NextAction,
        target: Option<&str>,
    ) -> SwarmResult<AgentReply> {
        // ── Step 1: Build and log the outbound envelope ─────────────────────
        let envelope = Envelope::task(
            ctx.task_id.clone(),
            Party::Orchestrator,
            to,
            ctx.inputs.goal.clone(),
            ctx.inputs.inputs.clone(),
            ctx.inputs.constraints.clone(),
            artifacts,
            vec![next],
        );
        ctx.log.append(&LogEntry::Envelope(envelope.clone()))?;

        // ── Step 2: Exchange, logging the raw reply before parsing ──────────
        let raw = self.invoker.exchange(self.agents.get(to), &envelope)?;
        ctx.log.append(&LogEntry::Response(AgentResponse {
            from: to,
            task_id: ctx.task_id.clone(),
            raw: raw.clone(),
            target: target.map(str::to_string),
        }))?;

        // ── Step 3: Parse and persist ────────────────────────────────────────
        let reply = AgentReply::parse(&raw)?;
        if let Some(reserved) = reply.artifacts.iter().find(|a| is_reserved_name(&a.name)) {
            return Err(SwarmError::ArtifactWriteError {
                reason: format!(
                    "{} returned artifact '{}', which is a reserved output name",
                    to, reserved.name
                ),
            });
        }
        for artifact in &reply.artifacts {
            ctx.store.put(artifact)?;
        }
        Ok(reply)
    }
}

/// Render the final Markdown document: a title, then one `##` heading per
/// artifact followed by its content.
pub fn render_final_bundle(artifacts: &[Artifact]) -> String {
    let mut parts = vec![FINAL_BUNDLE_TITLE.to_string()];
    for artifact in artifacts {
        parts.push(format!("## {}\n", artifact.name));
        parts.push(artifact.content.clone());
        parts.push("\n".to_string());
    }
    parts.join("\n")
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use serde_json::{json, Value};

    use swarm_contracts::{
        chat::{ChatRequest, ChatResponse, ChatSettings},
        envelope::Envelope,
    };

    use crate::traits::ChatBackend;

    use super::*;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    /// Decides the raw reply text for each envelope.
    type Script = Box<dyn Fn(&Envelope) -> String + Send + Sync>;

    /// A backend that decodes the envelope from the user turn, records it,
    /// and answers according to a script.
    struct ScriptedBackend {
        calls: Arc<Mutex<Vec<Envelope>>>,
        script: Script,
    }

    impl ChatBackend for ScriptedBackend {
        fn chat(&self, request: &ChatRequest) -> SwarmResult<ChatResponse> {
            let envelope: Envelope = serde_json::from_str(&request.messages[1].content).unwrap();
            let text = (self.script)(&envelope);
            self.calls.lock().unwrap().push(envelope);
            Ok(ChatResponse { text, raw: Value::Null })
        }
    }

    /// A store that keeps files in memory, in write order.
    #[derive(Default)]
    struct MemStore {
        files: Mutex<BTreeMap<String, String>>,
        writes: Mutex<Vec<String>>,
    }

    impl ArtifactStore for MemStore {
        fn write_file(&self, name: &str, content: &str) -> SwarmResult<()> {
            self.files.lock().unwrap().insert(name.to_string(), content.to_string());
            self.writes.lock().unwrap().push(name.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemLog {
        entries: Mutex<Vec<LogEntry>>,
    }

    impl RunLog for MemLog {
        fn append(&self, entry: &LogEntry) -> SwarmResult<()> {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    fn reply(artifacts: &[(&str, &str)]) -> String {
        let list: Vec<Value> = artifacts
            .iter()
            .map(|(name, content)| json!({ "name": name, "format": "markdown", "content": content }))
            .collect();
        json!({ "artifacts": list }).to_string()
    }

    /// Every agent answers with one artifact; the reviser echoes a revised
    /// version of whatever it was asked to revise.
    fn standard_script() -> Script {
        Box::new(|env: &Envelope| match env.to {
            AgentRole::MarketResearcher => reply(&[("research.md", "R")]),
            AgentRole::StrategistPlanner => reply(&[("plan.md", "P")]),
            AgentRole::CopywriterExecutor => reply(&[("copy.md", "C")]),
            AgentRole::ChannelManager => reply(&[("channel.md", "CH")]),
            AgentRole::AnalystQa => reply(&[("qa.md", "tighten the headline")]),
            AgentRole::Reviser => {
                let target = &env.payload.artifacts[1];
                reply(&[(target.name.as_str(), format!("{} (revised)", target.content).as_str())])
            }
        })
    }

    fn pipeline(script: Script, max_review_cycles: u32) -> (Pipeline, Arc<Mutex<Vec<Envelope>>>) {
        let calls = Arc::new(Mutex::new(vec![]));
        let backend = ScriptedBackend { calls: calls.clone(), script };
        let settings = ChatSettings {
            model: "test".to_string(),
            temperature: 0.0,
            max_tokens: 64,
            timeout: Duration::from_secs(1),
        };
        let agents = AgentRegistry::load(|role| Ok(format!("You are {}.", role))).unwrap();
        let pipeline = Pipeline::new(agents, AgentInvoker::new(Box::new(backend), settings), max_review_cycles);
        (pipeline, calls)
    }

    fn recipients(calls: &Arc<Mutex<Vec<Envelope>>>) -> Vec<AgentRole> {
        calls.lock().unwrap().iter().map(|e| e.to).collect()
    }

    fn count(calls: &Arc<Mutex<Vec<Envelope>>>, role: AgentRole) -> usize {
        recipients(calls).into_iter().filter(|r| *r == role).count()
    }

    // ── Test cases ───────────────────────────────────────────────────────────

    #[test]
    fn revision_due_rule() {
        assert!(!revision_due(1, 0));
        assert!(revision_due(1, 1));
        assert!(!revision_due(2, 1));
        assert!(revision_due(2, 2));
        assert!(!revision_due(3, 2));
    }

    /// End-to-end with one review cycle: the exact call sequence, the final
    /// bundle and the summary.
    #[test]
    fn single_cycle_run_sequence() {
        let (pipeline, calls) = pipeline(standard_script(), 1);
        let store = MemStore::default();
        let log = MemLog::default();
        let task_id = TaskId::new();
        let inputs = RunInputs::new("Launch a newsletter");

        let summary = pipeline
            .run(&RunContext::new(&task_id, &inputs, &store, &log))
            .unwrap();

        use AgentRole::*;
        assert_eq!(
            recipients(&calls),
            vec![
                MarketResearcher,
                StrategistPlanner,
                CopywriterExecutor,
                ChannelManager,
                AnalystQa,
                Reviser,
                Reviser,
                Reviser,
                AnalystQa,
            ]
        );

        assert_eq!(summary.review_cycles, 2);
        assert_eq!(summary.goal, "Launch a newsletter");
        assert_eq!(
            summary.artifacts,
            vec!["research.md", "plan.md", "copy.md", "channel.md", "final_bundle.md", "run.log.jsonl"]
        );

        let files = store.files.lock().unwrap();
        assert_eq!(files["plan.md"], "P (revised)");
        assert_eq!(files["copy.md"], "C (revised)");
        assert_eq!(files["channel.md"], "CH (revised)");
        assert_eq!(files["qa.md"], "tighten the headline");

        let bundle = &files[FINAL_BUNDLE_FILE];
        assert!(bundle.starts_with("# Final Marketing Bundle"));
        let positions: Vec<usize> = ["## research.md", "## plan.md", "## copy.md", "## channel.md"]
            .iter()
            .map(|h| bundle.find(h).unwrap_or_else(|| panic!("missing heading {h}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "headings out of order");
        assert!(!bundle.contains("## qa.md"), "QA artifacts must not enter the final bundle");
        assert!(bundle.contains("CH (revised)"));

        let written: Value = serde_json::from_str(&files[SUMMARY_FILE]).unwrap();
        assert_eq!(written["review_cycles"], 2);
        assert_eq!(written["task_id"], json!(task_id.to_string()));
    }

    #[test]
    fn every_envelope_carries_the_run_task_id() {
        let (pipeline, calls) = pipeline(standard_script(), 2);
        let store = MemStore::default();
        let log = MemLog::default();
        let task_id = TaskId::new();
        let inputs = RunInputs::new("goal");

        pipeline.run(&RunContext::new(&task_id, &inputs, &store, &log)).unwrap();

        assert!(calls.lock().unwrap().iter().all(|e| e.task_id == task_id));
        assert!(log.entries.lock().unwrap().iter().all(|e| e.task_id() == &task_id));
    }

    #[test]
    fn call_counts_scale_with_review_budget() {
        for n in 0..4u32 {
            let (pipeline, calls) = pipeline(standard_script(), n);
            let store = MemStore::default();
            let log = MemLog::default();
            let task_id = TaskId::new();
            let inputs = RunInputs::new("goal");

            let summary = pipeline.run(&RunContext::new(&task_id, &inputs, &store, &log)).unwrap();

            assert_eq!(count(&calls, AgentRole::AnalystQa), (n + 1) as usize, "N = {n}");
            assert_eq!(count(&calls, AgentRole::Reviser), (3 * n) as usize, "N = {n}");
            assert_eq!(summary.review_cycles, n + 1);
        }
    }

    #[test]
    fn zero_budget_reviews_once_and_never_revises() {
        let (pipeline, calls) = pipeline(standard_script(), 0);
        let store = MemStore::default();
        let log = MemLog::default();
        let task_id = TaskId::new();
        let inputs = RunInputs::new("goal");

        pipeline.run(&RunContext::new(&task_id, &inputs, &store, &log)).unwrap();

        let seq = recipients(&calls);
        assert_eq!(seq.last(), Some(&AgentRole::AnalystQa));
        assert_eq!(count(&calls, AgentRole::AnalystQa), 1);
        assert_eq!(count(&calls, AgentRole::Reviser), 0);

        // Finalize ran right after the single review.
        let writes = store.writes.lock().unwrap();
        assert_eq!(writes[writes.len() - 2], FINAL_BUNDLE_FILE);
        assert_eq!(writes[writes.len() - 1], SUMMARY_FILE);
    }

    /// Log order: seed envelope, then envelope/response pairs in call order.
    #[test]
    fn log_interleaves_envelopes_and_raw_responses() {
        let (pipeline, _calls) = pipeline(standard_script(), 1);
        let store = MemStore::default();
        let log = MemLog::default();
        let task_id = TaskId::new();
        let inputs = RunInputs::new("goal");

        pipeline.run(&RunContext::new(&task_id, &inputs, &store, &log)).unwrap();

        let entries = log.entries.lock().unwrap();
        assert_eq!(entries.len(), 9 * 2);

        match &entries[0] {
            LogEntry::Envelope(seed) => {
                assert_eq!(seed.to, AgentRole::MarketResearcher);
                assert!(seed.payload.artifacts.is_empty());
                assert_eq!(seed.payload.next[0].description, "Produce research brief");
            }
            other => panic!("expected seed envelope, got {:?}", other),
        }

        for pair in entries.chunks(2) {
            match (&pair[0], &pair[1]) {
                (LogEntry::Envelope(env), LogEntry::Response(resp)) => {
                    assert_eq!(env.to, resp.from);
                }
                other => panic!("expected envelope/response pair, got {:?}", other),
            }
        }

        let targets: Vec<String> = entries
            .iter()
            .filter_map(|e| match e {
                LogEntry::Response(r) if r.from == AgentRole::Reviser => r.target.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(targets, vec!["plan.md", "copy.md", "channel.md"]);
    }

    #[test]
    fn drafting_inputs_follow_stage_selectors() {
        let (pipeline, calls) = pipeline(standard_script(), 0);
        let store = MemStore::default();
        let log = MemLog::default();
        let task_id = TaskId::new();
        let inputs = RunInputs::new("goal");

        pipeline.run(&RunContext::new(&task_id, &inputs, &store, &log)).unwrap();

        let calls = calls.lock().unwrap();
        let names = |i: usize| -> Vec<String> {
            calls[i].payload.artifacts.iter().map(|a| a.name.clone()).collect()
        };
        assert!(names(0).is_empty());
        assert_eq!(names(1), vec!["research.md"]);
        assert_eq!(names(2), vec!["plan.md"]);
        assert_eq!(names(3), vec!["plan.md"]);
        assert_eq!(names(4), vec!["research.md", "plan.md", "copy.md", "channel.md"]);
    }

    /// An analyst reply with no artifacts yields an empty review note, but
    /// every non-empty category still goes to the reviser.
    #[test]
    fn empty_review_still_revises_non_empty_categories() {
        let script: Script = Box::new(|env: &Envelope| match env.to {
            AgentRole::MarketResearcher => reply(&[("research.md", "R")]),
            AgentRole::StrategistPlanner => reply(&[("plan.md", "P")]),
            AgentRole::CopywriterExecutor => reply(&[]),
            AgentRole::ChannelManager => reply(&[("channel.md", "CH")]),
            AgentRole::AnalystQa => json!({ "summary": "looks fine" }).to_string(),
            AgentRole::Reviser => reply(&[]),
        });
        let (pipeline, calls) = pipeline(script, 1);
        let store = MemStore::default();
        let log = MemLog::default();
        let task_id = TaskId::new();
        let inputs = RunInputs::new("goal");

        let summary = pipeline.run(&RunContext::new(&task_id, &inputs, &store, &log)).unwrap();

        let calls = calls.lock().unwrap();
        let revisions: Vec<&Envelope> = calls.iter().filter(|e| e.to == AgentRole::Reviser).collect();
        // Copy is empty, so only plan and channel are revised.
        assert_eq!(revisions.len(), 2);
        for env in &revisions {
            assert_eq!(env.payload.artifacts.len(), 2);
            assert_eq!(env.payload.artifacts[0].name, REVIEW_NOTE_NAME);
            assert_eq!(env.payload.artifacts[0].content, "");
        }
        assert_eq!(revisions[0].payload.artifacts[1].name, "plan.md");
        assert_eq!(revisions[1].payload.artifacts[1].name, "channel.md");

        // Reviser returned nothing, so the held artifacts are unchanged.
        assert_eq!(summary.artifacts[..3], ["research.md", "plan.md", "channel.md"]);
        assert_eq!(store.files.lock().unwrap()["plan.md"], "P");
    }

    /// Only the first artifact of a category is revised; its replacement
    /// becomes the whole category.
    #[test]
    fn revision_replaces_category_with_first_returned_artifact() {
        let script: Script = Box::new(|env: &Envelope| match env.to {
            AgentRole::MarketResearcher => reply(&[("research.md", "R")]),
            AgentRole::StrategistPlanner => reply(&[("plan.md", "P"), ("budget.md", "B")]),
            AgentRole::CopywriterExecutor => reply(&[("copy.md", "C")]),
            AgentRole::ChannelManager => reply(&[("channel.md", "CH")]),
            AgentRole::AnalystQa => reply(&[("qa_1.md", "note one"), ("qa_2.md", "note two")]),
            AgentRole::Reviser => {
                let target = &env.payload.artifacts[1];
                reply(&[(format!("v2_{}", target.name).as_str(), "new"), ("extra.md", "ignored")])
            }
        });
        let (pipeline, calls) = pipeline(script, 1);
        let store = MemStore::default();
        let log = MemLog::default();
        let task_id = TaskId::new();
        let inputs = RunInputs::new("goal");

        let summary = pipeline.run(&RunContext::new(&task_id, &inputs, &store, &log)).unwrap();

        let calls = calls.lock().unwrap();
        let first_revision = calls.iter().find(|e| e.to == AgentRole::Reviser).unwrap();
        assert_eq!(first_revision.payload.artifacts[0].content, "note one");
        assert_eq!(first_revision.payload.artifacts[1].name, "plan.md");

        assert_eq!(
            summary.artifacts[..4],
            ["research.md", "v2_plan.md", "v2_copy.md", "v2_channel.md"]
        );
        assert!(!summary.artifacts.contains(&"budget.md".to_string()));
    }

    #[test]
    fn review_outcome_collects_every_analyst_artifact() {
        let (pipeline, _calls) = pipeline(standard_script(), 2);
        let store = MemStore::default();
        let log = MemLog::default();
        let task_id = TaskId::new();
        let inputs = RunInputs::new("goal");
        let ctx = RunContext::new(&task_id, &inputs, &store, &log);

        let drafted = pipeline.draft(&ctx).unwrap();
        let outcome = pipeline.review(&ctx, drafted).unwrap();

        assert_eq!(outcome.cycles, 3);
        assert_eq!(outcome.reviews.len(), 3);
        assert_eq!(outcome.bundle.get(Category::Plan)[0].content, "P (revised) (revised)");
        assert_eq!(outcome.bundle.get(Category::Research)[0].content, "R");
    }

    /// A reply that cannot be parsed aborts the run, but its raw text is
    /// already in the log.
    #[test]
    fn malformed_reply_aborts_after_logging_raw_text() {
        let script: Script = Box::new(|env: &Envelope| match env.to {
            AgentRole::MarketResearcher => reply(&[("research.md", "R")]),
            _ => "I'm sorry, I can't produce JSON right now.".to_string(),
        });
        let (pipeline, calls) = pipeline(script, 1);
        let store = MemStore::default();
        let log = MemLog::default();
        let task_id = TaskId::new();
        let inputs = RunInputs::new("goal");

        let err = pipeline
            .run(&RunContext::new(&task_id, &inputs, &store, &log))
            .unwrap_err();
        assert!(matches!(err, SwarmError::MalformedResponse { .. }));

        // Stopped at the planner.
        assert_eq!(recipients(&calls).len(), 2);

        let entries = log.entries.lock().unwrap();
        match entries.last().unwrap() {
            LogEntry::Response(resp) => {
                assert_eq!(resp.from, AgentRole::StrategistPlanner);
                assert!(resp.raw.contains("can't produce JSON"));
            }
            other => panic!("expected raw response last, got {:?}", other),
        }

        // Research artifacts written before the failure remain.
        let files = store.files.lock().unwrap();
        assert!(files.contains_key("research.md"));
        assert!(!files.contains_key(FINAL_BUNDLE_FILE));
    }

    #[test]
    fn duplicate_names_overwrite_and_final_bundle_uses_held_lists() {
        let script: Script = Box::new(|env: &Envelope| match env.to {
            AgentRole::MarketResearcher => reply(&[("notes.md", "research notes")]),
            AgentRole::StrategistPlanner => reply(&[("notes.md", "plan notes")]),
            AgentRole::CopywriterExecutor => reply(&[("copy.md", "C")]),
            AgentRole::ChannelManager => reply(&[("channel.md", "CH")]),
            AgentRole::AnalystQa => reply(&[("qa.md", "ok")]),
            AgentRole::Reviser => reply(&[]),
        });
        let (pipeline, _calls) = pipeline(script, 0);
        let store = MemStore::default();
        let log = MemLog::default();
        let task_id = TaskId::new();
        let inputs = RunInputs::new("goal");

        pipeline.run(&RunContext::new(&task_id, &inputs, &store, &log)).unwrap();

        let files = store.files.lock().unwrap();
        assert_eq!(files["notes.md"], "plan notes");
        let bundle = &files[FINAL_BUNDLE_FILE];
        assert!(bundle.contains("research notes"));
        assert!(bundle.contains("plan notes"));
    }

    /// The note comes from the analyst's first raw entry even when that
    /// entry is malformed and the second one parses.
    #[test]
    fn malformed_first_review_entry_gives_empty_note() {
        let script: Script = Box::new(|env: &Envelope| match env.to {
            AgentRole::AnalystQa => json!({
                "artifacts": [
                    { "name": "qa.md", "format": "markdown" },
                    { "name": "qa_2.md", "format": "markdown", "content": "second note" }
                ]
            })
            .to_string(),
            _ => standard_script()(env),
        });
        let (pipeline, calls) = pipeline(script, 1);
        let store = MemStore::default();
        let log = MemLog::default();
        let task_id = TaskId::new();
        let inputs = RunInputs::new("goal");

        pipeline.run(&RunContext::new(&task_id, &inputs, &store, &log)).unwrap();

        let calls = calls.lock().unwrap();
        let revisions: Vec<&Envelope> = calls.iter().filter(|e| e.to == AgentRole::Reviser).collect();
        assert_eq!(revisions.len(), 3);
        for env in revisions {
            assert_eq!(env.payload.artifacts[0].name, REVIEW_NOTE_NAME);
            assert_eq!(env.payload.artifacts[0].content, "");
        }
    }

    #[test]
    fn reserved_names_cover_pipeline_outputs() {
        for name in ["final_bundle.md", "summary.json", "run.log.jsonl", "./run.log.jsonl"] {
            assert!(is_reserved_name(name), "{name}");
        }
        for name in ["plan.md", "logs/run.log.jsonl", "summary.json.md"] {
            assert!(!is_reserved_name(name), "{name}");
        }
    }

    /// An agent claiming a pipeline output file aborts the run before any of
    /// its artifacts are written.
    #[test]
    fn agent_artifact_with_reserved_name_is_rejected() {
        let script: Script = Box::new(|env: &Envelope| match env.to {
            AgentRole::StrategistPlanner => {
                reply(&[("plan.md", "P"), ("run.log.jsonl", "not a log")])
            }
            _ => standard_script()(env),
        });
        let (pipeline, calls) = pipeline(script, 1);
        let store = MemStore::default();
        let log = MemLog::default();
        let task_id = TaskId::new();
        let inputs = RunInputs::new("goal");

        match pipeline.run(&RunContext::new(&task_id, &inputs, &store, &log)) {
            Err(SwarmError::ArtifactWriteError { reason }) => {
                assert!(reason.contains("run.log.jsonl"), "reason: {reason}");
                assert!(reason.contains("reserved"), "reason: {reason}");
            }
            other => panic!("expected ArtifactWriteError, got {:?}", other),
        }

        assert_eq!(recipients(&calls).len(), 2);
        let files = store.files.lock().unwrap();
        assert!(files.contains_key("research.md"));
        assert!(!files.contains_key("plan.md"));
        assert!(!files.contains_key(RUN_LOG_FILE));

        // The raw reply is still on record.
        assert!(matches!(log.entries.lock().unwrap().last(), Some(LogEntry::Response(_))));
    }

    #[test]
    fn render_final_bundle_layout() {
        let doc = render_final_bundle(&[
            Artifact::markdown("a.md", "alpha"),
            Artifact::markdown("b.md", "beta"),
        ]);
        assert_eq!(
            doc,
            "# Final Marketing Bundle\n\n## a.md\n\nalpha\n\n\n## b.md\n\nbeta\n\n"
        );
    }
}
