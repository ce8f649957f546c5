//! Gate kinds and their lazy decision rules.
//!
//! A [`GateRule`] consumes child results one at a time, in whatever order
//! they arrive, and reports as soon as the gate's output no longer depends on
//! the children still outstanding. Results are keyed by the child's position,
//! never by arrival order.

use std::fmt;

/// Boolean gate kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// True iff every argument is true.
    And,
    /// True iff at least one argument is true.
    Or,
    /// Negation of the single argument.
    Not,
    /// `if args[0] { args[1] } else { args[2] }`.
    If,
    /// True iff strictly more than `t` arguments are true.
    Gt(i64),
    /// True iff strictly fewer than `t` arguments are true.
    Lt(i64),
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateKind::And => write!(f, "AND"),
            GateKind::Or => write!(f, "OR"),
            GateKind::Not => write!(f, "NOT"),
            GateKind::If => write!(f, "IF"),
            GateKind::Gt(t) => write!(f, "GT({t})"),
            GateKind::Lt(t) => write!(f, "LT({t})"),
        }
    }
}

impl GateKind {
    /// Required argument count, or `None` if any count is accepted.
    pub fn arity(self) -> Option<usize> {
        match self {
            GateKind::Not => Some(1),
            GateKind::If => Some(3),
            GateKind::And | GateKind::Or | GateKind::Gt(_) | GateKind::Lt(_) => None,
        }
    }

    /// Evaluate this gate on fully known argument values.
    ///
    /// Returns `None` if `values` does not match the gate's arity.
    pub fn apply(self, values: &[bool]) -> Option<bool> {
        let trues = || values.iter().filter(|&&v| v).count() as i64;
        match (self, values) {
            (GateKind::And, _) => Some(values.iter().all(|&v| v)),
            (GateKind::Or, _) => Some(values.iter().any(|&v| v)),
            (GateKind::Not, [v]) => Some(!v),
            (GateKind::If, [c, t, f]) => Some(if *c { *t } else { *f }),
            (GateKind::Gt(t), _) => Some(trues() > t),
            (GateKind::Lt(t), _) => Some(trues() < t),
            (GateKind::Not | GateKind::If, _) => None,
        }
    }
}

/// Outcome of starting a gate with a known number of arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Start {
    /// Output is fixed regardless of the arguments; schedule nothing.
    Decided(bool),
    /// Arguments must be evaluated; feed their results into the rule.
    Await(GateRule),
}

/// What to do after a child result has been accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Keep waiting.
    Undecided,
    /// The child at this index is no longer needed; cancel it and keep waiting.
    Abandon(usize),
    /// Output is determined; cancel every unfinished child and report it.
    Decided(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Greater,
    Less,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Not,
    And {
        pending: usize,
    },
    Or {
        pending: usize,
    },
    Threshold {
        comparison: Comparison,
        threshold: i64,
        trues: i64,
        pending: i64,
    },
    If {
        condition: Option<bool>,
        on_true: Option<bool>,
        on_false: Option<bool>,
        abandoned: bool,
    },
}

/// Incremental decision procedure for one gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRule {
    state: State,
}

/// Threshold outcome once it no longer depends on `pending` children.
///
/// GT and LT are mirror images: each is decided when the true count either
/// already satisfies the bound or can no longer reach it.
fn threshold_outcome(
    comparison: Comparison,
    threshold: i64,
    trues: i64,
    pending: i64,
) -> Option<bool> {
    match comparison {
        Comparison::Greater if trues > threshold => Some(true),
        Comparison::Greater if trues + pending <= threshold => Some(false),
        Comparison::Less if trues + pending < threshold => Some(true),
        Comparison::Less if trues >= threshold => Some(false),
        _ => None,
    }
}

impl GateRule {
    /// Begin evaluating a gate of `kind` with `arity` arguments.
    pub fn start(kind: GateKind, arity: usize) -> Start {
        let state = match kind {
            GateKind::Not => State::Not,
            GateKind::And if arity == 0 => return Start::Decided(true),
            GateKind::And => State::And { pending: arity },
            GateKind::Or if arity == 0 => return Start::Decided(false),
            GateKind::Or => State::Or { pending: arity },
            GateKind::Gt(threshold) | GateKind::Lt(threshold) => {
                let comparison = match kind {
                    GateKind::Gt(_) => Comparison::Greater,
                    _ => Comparison::Less,
                };
                let pending = arity as i64;
                if let Some(value) = threshold_outcome(comparison, threshold, 0, pending) {
                    return Start::Decided(value);
                }
                State::Threshold {
                    comparison,
                    threshold,
                    trues: 0,
                    pending,
                }
            }
            GateKind::If => State::If {
                condition: None,
                on_true: None,
                on_false: None,
                abandoned: false,
            },
        };
        Start::Await(GateRule { state })
    }

    /// Record the result of the child at `index`.
    pub fn accept(&mut self, index: usize, value: bool) -> Verdict {
        match &mut self.state {
            State::Not => Verdict::Decided(!value),
            State::And { pending } => {
                *pending = pending.saturating_sub(1);
                if !value {
                    Verdict::Decided(false)
                } else if *pending == 0 {
                    Verdict::Decided(true)
                } else {
                    Verdict::Undecided
                }
            }
            State::Or { pending } => {
                *pending = pending.saturating_sub(1);
                if value {
                    Verdict::Decided(true)
                } else if *pending == 0 {
                    Verdict::Decided(false)
                } else {
                    Verdict::Undecided
                }
            }
            State::Threshold {
                comparison,
                threshold,
                trues,
                pending,
            } => {
                *pending = pending.saturating_sub(1);
                if value {
                    *trues += 1;
                }
                match threshold_outcome(*comparison, *threshold, *trues, *pending) {
                    Some(value) => Verdict::Decided(value),
                    None => Verdict::Undecided,
                }
            }
            State::If {
                condition,
                on_true,
                on_false,
                abandoned,
            } => {
                match index {
                    0 => *condition = Some(value),
                    1 => *on_true = Some(value),
                    2 => *on_false = Some(value),
                    _ => return Verdict::Undecided,
                }

                if let Some(c) = *condition {
                    let (selected, unselected) = if c { (*on_true, 2) } else { (*on_false, 1) };
                    if let Some(value) = selected {
                        return Verdict::Decided(value);
                    }
                    if !*abandoned {
                        *abandoned = true;
                        return Verdict::Abandon(unselected);
                    }
                    return Verdict::Undecided;
                }

                // Both branches agree: the condition is irrelevant.
                match (*on_true, *on_false) {
                    (Some(t), Some(f)) if t == f => Verdict::Decided(t),
                    _ => Verdict::Undecided,
                }
            }
        }
    }
}
