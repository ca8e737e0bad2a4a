//! Ordered stage chain and the install walk.

use std::time::Instant;

use crate::stages::{Stage, StageKind};

use super::hooks::RunHooks;
use super::report::{StageOutcome, StageReport};

/// What the walk does after a stage was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainControl {
    /// Go on with the next stage.
    Continue,
    /// Treat the chain as broken from here on.
    Stop,
}

/// Stages in prerequisite order: stage `i` must hold before stage `i + 1`
/// can be applied.
pub struct DependencyChain {
    stages: Vec<Box<dyn Stage>>,
}

impl DependencyChain {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stages in order.
    pub fn iter(&self) -> impl Iterator<Item = &(dyn Stage + 'static)> {
        self.stages.iter().map(Box::as_ref)
    }

    /// Position and stage for `kind`.
    pub fn find(&self, kind: StageKind) -> Option<(usize, &dyn Stage)> {
        self.iter().enumerate().find(|(_, s)| s.kind() == kind)
    }

    /// Walk the chain, applying every stage whose probe is unsatisfied.
    ///
    /// Once a stage fails (or `after_apply` returns [`ChainControl::Stop`])
    /// every later stage is reported as skipped without being probed.
    /// The walk always visits every stage so the report is complete.
    pub fn walk(
        &self,
        hooks: &mut dyn RunHooks,
        mut after_apply: impl FnMut(&dyn Stage, &mut dyn RunHooks) -> ChainControl,
    ) -> Vec<StageReport> {
        let total = self.len();
        let mut reports = Vec::with_capacity(total);
        let mut chain_broken = false;

        for (ordinal, stage) in self.iter().enumerate() {
            if chain_broken {
                let report =
                    StageReport::new(stage, ordinal, StageOutcome::SkippedUnmetDependency);
                tracing::info!("{}: skipped, prerequisite not met", report.name);
                hooks.stage_finished(&report);
                reports.push(report);
                continue;
            }

            let name = stage.name();
            hooks.stage_started(&name, stage.kind(), ordinal, total);
            let start = Instant::now();

            let probe = stage.probe();
            let (outcome, detail) = if probe.satisfied {
                tracing::info!("{}: already satisfied", name);
                (StageOutcome::AlreadySatisfied, probe.detail)
            } else {
                tracing::info!("{}: not satisfied, applying", name);
                match stage.apply() {
                    Ok(()) => {
                        tracing::info!("{}: applied", name);
                        if after_apply(stage, &mut *hooks) == ChainControl::Stop {
                            chain_broken = true;
                        }
                        (StageOutcome::Applied, probe.detail)
                    }
                    Err(e) => {
                        tracing::warn!("{}: failed: {}", name, e);
                        chain_broken = true;
                        (StageOutcome::from_error(&e), probe.detail)
                    }
                }
            };

            let report = StageReport::new(stage, ordinal, outcome)
                .with_detail(detail)
                .with_duration(start.elapsed());
            hooks.stage_finished(&report);
            reports.push(report);
        }

        reports
    }

    /// Probe every stage without changing anything.
    pub fn probe_all(&self, hooks: &mut dyn RunHooks) -> Vec<StageReport> {
        let total = self.len();
        self.iter()
            .enumerate()
            .map(|(ordinal, stage)| {
                let name = stage.name();
                hooks.stage_started(&name, stage.kind(), ordinal, total);
                let start = Instant::now();
                let probe = stage.probe();
                let outcome = if probe.satisfied {
                    StageOutcome::AlreadySatisfied
                } else {
                    StageOutcome::NotSatisfied
                };
                tracing::debug!("{}: {:?}", name, outcome);
                let report = StageReport::new(stage, ordinal, outcome)
                    .with_detail(probe.detail)
                    .with_duration(start.elapsed());
                hooks.stage_finished(&report);
                report
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, WslstrapError};
    use crate::runner::hooks::{NoHooks, RecordingHooks};
    use crate::runner::FailureKind;
    use crate::stages::ProbeResult;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counters {
        probes: AtomicUsize,
        applies: AtomicUsize,
    }

    struct FakeStage {
        kind: StageKind,
        present: AtomicBool,
        fail_apply: bool,
        counters: Arc<Counters>,
    }

    impl FakeStage {
        fn boxed(
            kind: StageKind,
            present: bool,
            fail_apply: bool,
            counters: &Arc<Counters>,
        ) -> Box<dyn Stage> {
            Box::new(Self {
                kind,
                present: AtomicBool::new(present),
                fail_apply,
                counters: counters.clone(),
            })
        }
    }

    impl Stage for FakeStage {
        fn kind(&self) -> StageKind {
            self.kind
        }

        fn probe(&self) -> ProbeResult {
            self.counters.probes.fetch_add(1, Ordering::SeqCst);
            if self.present.load(Ordering::SeqCst) {
                ProbeResult::satisfied(Some("present".to_string()))
            } else {
                ProbeResult::unsatisfied(None)
            }
        }

        fn apply(&self) -> Result<()> {
            self.counters.applies.fetch_add(1, Ordering::SeqCst);
            if self.fail_apply {
                return Err(WslstrapError::Timeout {
                    command: "fake".into(),
                    secs: 1,
                });
            }
            self.present.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    const KINDS: [StageKind; 4] = [
        StageKind::Virtualization,
        StageKind::Distribution,
        StageKind::Application,
        StageKind::ShellIntegration,
    ];

    fn chain(
        present: [bool; 4],
        failing: Option<usize>,
        counters: &Arc<Counters>,
    ) -> DependencyChain {
        DependencyChain::new(
            KINDS
                .iter()
                .enumerate()
                .map(|(i, &kind)| FakeStage::boxed(kind, present[i], failing == Some(i), counters))
                .collect(),
        )
    }

    fn outcomes(reports: &[StageReport]) -> Vec<StageOutcome> {
        reports.iter().map(|r| r.outcome.clone()).collect()
    }

    #[test]
    fn failure_skips_every_later_stage() {
        let counters = Arc::new(Counters::default());
        let chain = chain([true, false, false, false], Some(1), &counters);

        let reports = chain.walk(&mut NoHooks, |_, _| ChainControl::Continue);

        assert_eq!(reports[0].outcome, StageOutcome::AlreadySatisfied);
        assert_eq!(
            reports[1].outcome,
            StageOutcome::Failed {
                kind: FailureKind::Timeout,
                reason: "Command timed out after 1s: fake".into(),
            }
        );
        assert_eq!(reports[2].outcome, StageOutcome::SkippedUnmetDependency);
        assert_eq!(reports[3].outcome, StageOutcome::SkippedUnmetDependency);
        // Skipped stages are not even probed.
        assert_eq!(counters.probes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn satisfied_stages_are_never_applied() {
        let counters = Arc::new(Counters::default());
        let chain = chain([true, true, true, false], None, &counters);

        let reports = chain.walk(&mut NoHooks, |_, _| ChainControl::Continue);

        assert_eq!(
            outcomes(&reports),
            vec![
                StageOutcome::AlreadySatisfied,
                StageOutcome::AlreadySatisfied,
                StageOutcome::AlreadySatisfied,
                StageOutcome::Applied,
            ]
        );
        assert_eq!(counters.applies.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn second_walk_is_idempotent() {
        let counters = Arc::new(Counters::default());
        let chain = chain([false; 4], None, &counters);

        chain.walk(&mut NoHooks, |_, _| ChainControl::Continue);
        let second = chain.walk(&mut NoHooks, |_, _| ChainControl::Continue);

        assert!(second
            .iter()
            .all(|r| r.outcome == StageOutcome::AlreadySatisfied));
        assert_eq!(counters.applies.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn stop_after_apply_breaks_chain() {
        let counters = Arc::new(Counters::default());
        let chain = chain([false; 4], None, &counters);

        let reports = chain.walk(&mut NoHooks, |stage, _| {
            if stage.kind() == StageKind::Virtualization {
                ChainControl::Stop
            } else {
                ChainControl::Continue
            }
        });

        assert_eq!(reports[0].outcome, StageOutcome::Applied);
        assert!(reports[1..]
            .iter()
            .all(|r| r.outcome == StageOutcome::SkippedUnmetDependency));
    }

    #[test]
    fn hooks_see_every_stage() {
        let counters = Arc::new(Counters::default());
        let chain = chain([true, false, false, false], Some(2), &counters);
        let mut hooks = RecordingHooks::new();

        chain.walk(&mut hooks, |_, _| ChainControl::Continue);

        assert_eq!(hooks.started.len(), 3);
        assert_eq!(hooks.finished.len(), 4);
    }

    #[test]
    fn probe_all_applies_nothing() {
        let counters = Arc::new(Counters::default());
        let chain = chain([true, false, true, false], None, &counters);

        let reports = chain.probe_all(&mut NoHooks);

        assert_eq!(
            outcomes(&reports),
            vec![
                StageOutcome::AlreadySatisfied,
                StageOutcome::NotSatisfied,
                StageOutcome::AlreadySatisfied,
                StageOutcome::NotSatisfied,
            ]
        );
        assert_eq!(reports[0].detail.as_deref(), Some("present"));
        assert_eq!(counters.applies.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn find_returns_position() {
        let counters = Arc::new(Counters::default());
        let chain = chain([false; 4], None, &counters);

        let (position, stage) = chain.find(StageKind::Application).unwrap();
        assert_eq!(position, 2);
        assert_eq!(stage.kind(), StageKind::Application);
    }
}
