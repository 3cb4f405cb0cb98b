//! Generic combination solver.
//!
//! Picks exactly one candidate from every group such that no pair of picks is
//! rejected, using backtracking with forward checking and conflict-directed
//! backjumping (FC-CBJ):
//!
//! - committing a candidate at position `i` immediately filters every later
//!   domain against it (forward checking), so a dead end is noticed as soon as
//!   some later domain empties;
//! - each position records which earlier positions were involved in its
//!   failures (its conflict set), and on a dead end the search jumps straight
//!   back to the deepest implicated position instead of the previous one.
//!
//! Candidates are tried strictly in priority order and the first consistent
//! one is kept, so the result is the best assignment reachable under that
//! ordering, not an optimum over all assignments.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;

use crate::compare::Prioritize;

/// Why a search stopped without an answer either way.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SolverError {
    /// The cursor moved past the last group.
    #[error("solver cursor {cursor} is past the last group ({groups} groups)")]
    #[diagnostic(code(ordo::solver::invalid_cursor), help("This is a solver bug, please report it"))]
    InvalidCursor { cursor: usize, groups: usize },

    /// Reduction or conflict bookkeeping no longer matches the search position.
    #[error("solver bookkeeping is inconsistent: {message}")]
    #[diagnostic(code(ordo::solver::invalid_state), help("This is a solver bug, please report it"))]
    InvalidState { message: String },

    #[error("search gave up after {limit} steps")]
    #[diagnostic(help("Raise `max-steps` under [resolver] in Ordo.toml, or pin more targets"))]
    StepLimitExceeded { limit: u64 },

    #[error("search was cancelled")]
    Cancelled,
}

/// FC-CBJ search driver. Holds configuration only; every call to
/// [`find_solution`](Self::find_solution) owns fresh scratch state.
#[derive(Debug, Clone, Default)]
pub struct CombinationSolver {
    max_steps: Option<u64>,
    cancel: Option<Arc<AtomicBool>>,
}

impl CombinationSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`SolverError::StepLimitExceeded`] after `limit` forward or backward moves.
    pub fn with_max_steps(mut self, limit: u64) -> Self {
        self.max_steps = Some(limit);
        self
    }

    /// Fail with [`SolverError::Cancelled`] once `flag` is set. Checked every move.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Pick one candidate per group, in group order.
    ///
    /// No two picks `a`, `b` from different groups satisfy `reject(a, b)`, in
    /// either argument order. Returns `Ok(None)` when no assignment avoids
    /// every rejected pair.
    pub fn find_solution<T, P, R>(
        &self,
        groups: Vec<Vec<T>>,
        priority: &P,
        reject: R,
    ) -> Result<Option<Vec<T>>, SolverError>
    where
        P: Prioritize<T> + ?Sized,
        R: Fn(&T, &T) -> bool,
    {
        let mut domains = groups;
        for domain in &mut domains {
            priority.sort(domain);
        }

        let picks = {
            let mut state = SearchState::new(&domains, &reject);
            let count = domains.len();
            let mut cursor = 0;
            let mut consistent = true;
            let mut steps: u64 = 0;

            while cursor < count {
                self.check_budget(steps)?;
                steps += 1;

                if consistent {
                    (cursor, consistent) = state.move_forward(cursor)?;
                } else {
                    match state.move_backward(cursor)? {
                        Some((target, still_consistent)) => {
                            cursor = target;
                            consistent = still_consistent;
                        }
                        None => {
                            tracing::debug!(steps, groups = count, "search exhausted");
                            return Ok(None);
                        }
                    }
                }

                if cursor > count {
                    return Err(SolverError::InvalidCursor {
                        cursor,
                        groups: count,
                    });
                }
            }

            tracing::debug!(steps, groups = count, "solution found");
            state.into_solution()?
        };

        Ok(Some(
            domains
                .into_iter()
                .zip(picks)
                .map(|(mut domain, rank)| domain.swap_remove(rank))
                .collect(),
        ))
    }

    fn check_budget(&self, steps: u64) -> Result<(), SolverError> {
        if let Some(flag) = &self.cancel {
            if flag.load(AtomicOrdering::Relaxed) {
                return Err(SolverError::Cancelled);
            }
        }
        if let Some(limit) = self.max_steps {
            if steps >= limit {
                return Err(SolverError::StepLimitExceeded { limit });
            }
        }
        Ok(())
    }
}

/// Candidates removed from one domain by one forward check.
#[derive(Debug)]
struct Reduction {
    /// Position whose assignment caused the removal.
    source: usize,
    removed: Vec<usize>,
}

/// Scratch state of one search. Every vector is indexed by position, and
/// candidates are referred to by their rank in the priority-sorted domain.
struct SearchState<'a, T, R> {
    domains: &'a [Vec<T>],
    reject: &'a R,
    /// Ranks still available at each position, ascending (best first).
    current: Vec<Vec<usize>>,
    conflict_set: Vec<BTreeSet<usize>>,
    /// Positions each position has reduced, in push order.
    future_fc: Vec<Vec<usize>>,
    /// Live reductions against each position, oldest first. Their sources are
    /// the position's past forward-checking set.
    reductions: Vec<Vec<Reduction>>,
    solution: Vec<Option<usize>>,
}

impl<'a, T, R> SearchState<'a, T, R>
where
    R: Fn(&T, &T) -> bool,
{
    fn new(domains: &'a [Vec<T>], reject: &'a R) -> Self {
        let count = domains.len();
        Self {
            domains,
            reject,
            current: domains.iter().map(|d| (0..d.len()).collect()).collect(),
            conflict_set: vec![BTreeSet::new(); count],
            future_fc: vec![Vec::new(); count],
            reductions: (0..count).map(|_| Vec::new()).collect(),
            solution: vec![None; count],
        }
    }

    /// Try the candidates at `i` best first. Returns the next cursor and
    /// whether an assignment survived forward checking.
    fn move_forward(&mut self, i: usize) -> Result<(usize, bool), SolverError> {
        let candidates = self.current[i].clone();
        for rank in candidates {
            self.solution[i] = Some(rank);

            let wiped_out = (i + 1..self.domains.len()).find(|&j| !self.check_forward(i, rank, j));
            let Some(j) = wiped_out else {
                return Ok((i + 1, true));
            };

            self.current[i].retain(|&r| r != rank);
            self.undo_reductions(i)?;
            // i's own reduction is gone; what is left on j is the earlier
            // positions that helped empty it.
            self.conflict_set[i].extend(self.reductions[j].iter().map(|r| r.source));
        }
        Ok((i, false))
    }

    /// Filter the domain at `j` against candidate `rank` at `i`, asking
    /// `reject` both ways round. Returns whether anything is left at `j`.
    fn check_forward(&mut self, i: usize, rank: usize, j: usize) -> bool {
        let picked = &self.domains[i][rank];
        let removed: Vec<usize> = self.current[j]
            .iter()
            .copied()
            .filter(|&r| {
                let candidate = &self.domains[j][r];
                (self.reject)(picked, candidate) || (self.reject)(candidate, picked)
            })
            .collect();

        if !removed.is_empty() {
            self.current[j].retain(|r| removed.binary_search(r).is_err());
            self.reductions[j].push(Reduction { source: i, removed });
            self.future_fc[i].push(j);
        }
        !self.current[j].is_empty()
    }

    /// Give back everything the assignment at `i` removed from later domains.
    fn undo_reductions(&mut self, i: usize) -> Result<(), SolverError> {
        for j in std::mem::take(&mut self.future_fc[i]) {
            match self.reductions[j].pop() {
                Some(reduction) if reduction.source == i => {
                    let current = &mut self.current[j];
                    current.extend(reduction.removed);
                    current.sort_unstable();
                }
                other => {
                    return Err(SolverError::InvalidState {
                        message: format!(
                            "expected a reduction from position {i} on top of position {j}, found {:?}",
                            other.map(|r| r.source)
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Reset the domain at `i` to everything not removed by a live reduction.
    fn update_current_domain(&mut self, i: usize) {
        let removed: BTreeSet<usize> = self.reductions[i]
            .iter()
            .flat_map(|r| r.removed.iter().copied())
            .collect();
        self.current[i] = (0..self.domains[i].len())
            .filter(|r| !removed.contains(r))
            .collect();
    }

    /// Jump back from the dead end at `i`. Returns `None` when the search
    /// space is exhausted, otherwise the new cursor and whether its domain
    /// still has candidates.
    fn move_backward(&mut self, i: usize) -> Result<Option<(usize, bool)>, SolverError> {
        if i == 0 {
            return Ok(None);
        }

        let mut implicated = self.conflict_set[i].clone();
        implicated.extend(self.reductions[i].iter().map(|r| r.source));
        let h = implicated.last().copied().unwrap_or(0);
        if h >= i {
            return Err(SolverError::InvalidState {
                message: format!("backjump target {h} is not before position {i}"),
            });
        }
        implicated.remove(&h);
        self.conflict_set[h].extend(implicated);

        for j in (h + 1..=i).rev() {
            self.conflict_set[j].clear();
            self.undo_reductions(j)?;
            self.update_current_domain(j);
        }

        self.undo_reductions(h)?;
        let Some(rank) = self.solution[h] else {
            return Err(SolverError::InvalidState {
                message: format!("backjump target {h} has no assignment"),
            });
        };
        self.current[h].retain(|&r| r != rank);

        tracing::trace!(from = i, to = h, remaining = self.current[h].len(), "backjump");
        Ok(Some((h, !self.current[h].is_empty())))
    }

    fn into_solution(self) -> Result<Vec<usize>, SolverError> {
        self.solution
            .into_iter()
            .enumerate()
            .map(|(i, rank)| {
                rank.ok_or_else(|| SolverError::InvalidState {
                    message: format!("position {i} has no assignment"),
                })
            })
            .collect()
    }
}
