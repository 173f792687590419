use std::collections::BTreeSet;

/// Browsers report ratios a hair under the configured threshold at the
/// crossing frame.
pub const RATIO_TOLERANCE: f64 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetId(u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityReport {
    pub target: TargetId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

/// Bookkeeping for one "fire once when visible" pool. Each pool owns its own
/// targets; ids from another pool are never matched.
#[derive(Debug)]
pub struct VisibilityPool {
    threshold: f64,
    next_id: u32,
    pending: BTreeSet<TargetId>,
}

impl VisibilityPool {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            next_id: 0,
            pending: BTreeSet::new(),
        }
    }

    pub fn register(&mut self) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.pending.insert(id);
        id
    }

    #[cfg(test)]
    pub fn is_observing(&self, target: TargetId) -> bool {
        self.pending.contains(&target)
    }

    #[cfg(test)]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn qualifies(&self, report: &VisibilityReport) -> bool {
        report.is_intersecting && report.ratio + RATIO_TOLERANCE >= self.threshold
    }

    /// Processes one batch in report order and returns the targets that fire
    /// now. A fired target leaves the pool, so later reports for it (including
    /// duplicates in the same batch) are ignored.
    pub fn process(&mut self, reports: &[VisibilityReport]) -> Vec<TargetId> {
        let mut fired = Vec::new();

        for report in reports {
            if self.qualifies(report) && self.pending.remove(&report.target) {
                fired.push(report.target);
            }
        }

        fired
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(target: TargetId, ratio: f64) -> VisibilityReport {
        VisibilityReport {
            target,
            is_intersecting: ratio > 0.0,
            ratio,
        }
    }

    #[test]
    fn already_visible_target_fires_once() {
        let mut pool = VisibilityPool::new(0.5);
        let target = pool.register();

        assert_eq!(pool.process(&[report(target, 1.0)]), vec![target]);
        assert!(!pool.is_observing(target));
        assert!(pool.process(&[report(target, 1.0)]).is_empty());
    }

    #[test]
    fn below_threshold_keeps_waiting() {
        let mut pool = VisibilityPool::new(0.15);
        let target = pool.register();

        assert!(pool.process(&[report(target, 0.05)]).is_empty());
        assert!(pool.is_observing(target));
        assert_eq!(pool.process(&[report(target, 0.1495)]), vec![target]);
    }

    #[test]
    fn duplicate_reports_in_one_batch_fire_once() {
        let mut pool = VisibilityPool::new(0.1);
        let target = pool.register();

        let fired = pool.process(&[report(target, 0.2), report(target, 0.6)]);
        assert_eq!(fired, vec![target]);
    }

    #[test]
    fn fires_in_report_order() {
        let mut pool = VisibilityPool::new(0.1);
        let first = pool.register();
        let second = pool.register();
        let third = pool.register();

        let fired = pool.process(&[report(third, 0.5), report(first, 0.0), report(second, 0.9)]);
        assert_eq!(fired, vec![third, second]);
        assert_eq!(pool.pending_len(), 1);
    }

    #[test]
    fn independent_pools_do_not_cross_fire() {
        let mut reveal = VisibilityPool::new(0.15);
        let mut counters = VisibilityPool::new(0.5);
        let reveal_target = reveal.register();
        let counter_target = counters.register();

        assert_eq!(reveal.process(&[report(reveal_target, 0.3)]), vec![reveal_target]);
        assert!(counters.process(&[report(counter_target, 0.3)]).is_empty());
        assert!(counters.is_observing(counter_target));
    }
}
