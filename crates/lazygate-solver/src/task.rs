//! Recursive evaluation task.
//!
//! Each task is bound to one node. A gate task schedules one child task per
//! argument, collects their results from its own channel in arrival order,
//! and lets the gate's [`GateRule`] decide when the output is known. Every
//! task posts exactly one [`ChildMessage`] to its parent.

use std::sync::Arc;

use crossbeam_channel::{select, Receiver};
use lazygate_core::{CancelToken, Cancelled, Gate, GateRule, Node, Start, Verdict};
use tracing::trace;

use crate::message::{result_channel, ChildMessage, Reply};
use crate::pool::WorkerPool;

pub(crate) struct EvalTask {
    node: Arc<Node>,
    reply: Reply,
    token: CancelToken,
    pool: Arc<WorkerPool>,
}

impl EvalTask {
    pub fn new(node: Arc<Node>, reply: Reply, token: CancelToken, pool: Arc<WorkerPool>) -> Self {
        Self {
            node,
            reply,
            token,
            pool,
        }
    }

    /// Queue this task on its pool.
    pub fn schedule(self) {
        let pool = Arc::clone(&self.pool);
        pool.execute(move || self.run());
    }

    fn run(self) {
        let EvalTask {
            node,
            reply,
            token,
            pool,
        } = self;

        if token.is_cancelled() {
            return reply.send(Err(Cancelled));
        }
        match &*node {
            Node::Leaf(leaf) => reply.send(leaf.fetch(&token)),
            Node::Gate(gate) => reply.send(evaluate_gate(gate, &token, &pool)),
        }
    }
}

fn evaluate_gate(
    gate: &Gate,
    token: &CancelToken,
    pool: &Arc<WorkerPool>,
) -> Result<bool, Cancelled> {
    let args = gate.args();
    let rule = match GateRule::start(gate.kind(), args.len()) {
        Start::Decided(value) => {
            trace!(gate = %gate.kind(), value, "decided without evaluating arguments");
            return Ok(value);
        }
        Start::Await(rule) => rule,
    };

    let (tx, rx) = result_channel(args.len());
    let children: Vec<CancelToken> = args
        .iter()
        .enumerate()
        .map(|(index, arg)| {
            let child = token.child();
            EvalTask::new(
                Arc::clone(arg),
                Reply::new(tx.clone(), index),
                child.clone(),
                Arc::clone(pool),
            )
            .schedule();
            child
        })
        .collect();
    drop(tx);

    let mut children = Children::new(children);
    let outcome = children.collect(rule, &rx, token);
    if let Ok(value) = outcome {
        if children.unfinished() > 0 {
            trace!(gate = %gate.kind(), value, unfinished = children.unfinished(), "short-circuit");
        }
    }
    children.cancel_unfinished();
    outcome
}

/// Bookkeeping for the children of one gate task.
struct Children {
    tokens: Vec<CancelToken>,
    finished: Vec<bool>,
    abandoned: Vec<bool>,
}

impl Children {
    fn new(tokens: Vec<CancelToken>) -> Self {
        let n = tokens.len();
        Self {
            tokens,
            finished: vec![false; n],
            abandoned: vec![false; n],
        }
    }

    fn unfinished(&self) -> usize {
        self.finished.iter().filter(|&&done| !done).count()
    }

    fn abandon(&mut self, index: usize) {
        self.abandoned[index] = true;
        if !self.finished[index] {
            trace!(index, "abandoning child");
            self.tokens[index].cancel();
        }
    }

    fn cancel_unfinished(&self) {
        for (token, done) in self.tokens.iter().zip(&self.finished) {
            if !done {
                token.cancel();
            }
        }
    }

    /// Receive child results until the rule decides or evaluation fails.
    fn collect(
        &mut self,
        mut rule: GateRule,
        rx: &Receiver<ChildMessage>,
        token: &CancelToken,
    ) -> Result<bool, Cancelled> {
        loop {
            let message = select! {
                recv(rx) -> message => message.ok(),
                recv(token.signal()) -> _ => None,
            };
            // Our own cancellation, or every child reported without a decision.
            let Some(ChildMessage { index, outcome }) = message else {
                return Err(Cancelled);
            };
            if index >= self.tokens.len() {
                continue;
            }
            self.finished[index] = true;

            if self.abandoned[index] {
                continue;
            }
            match rule.accept(index, outcome?) {
                Verdict::Undecided => {}
                Verdict::Abandon(other) => self.abandon(other),
                Verdict::Decided(value) => return Ok(value),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazygate_core::Delayed;
    use std::time::Duration;

    fn run(node: Node, token: CancelToken) -> ChildMessage {
        let pool = Arc::new(WorkerPool::new(8).unwrap());
        let (tx, rx) = result_channel(1);
        EvalTask::new(Arc::new(node), Reply::new(tx, 7), token, Arc::clone(&pool)).schedule();
        let message = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        pool.shutdown_now();
        message
    }

    #[test]
    fn test_leaf_posts_own_index() {
        let message = run(Node::leaf(true), CancelToken::new());
        assert_eq!(
            message,
            ChildMessage {
                index: 7,
                outcome: Ok(true)
            }
        );
    }

    #[test]
    fn test_gate_result() {
        let node = Node::and(vec![
            Node::leaf(true),
            Node::or(vec![Node::leaf(false), Node::leaf(true)]),
        ]);
        assert_eq!(run(node, CancelToken::new()).outcome, Ok(true));
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(run(Node::leaf(true), token).outcome, Err(Cancelled));
    }

    #[test]
    fn test_cancelled_while_waiting() {
        let token = CancelToken::new();
        let remote = token.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            remote.cancel();
        });
        let slow = Node::from_leaf(Delayed::new(true, Duration::from_secs(3600)));
        let node = Node::or(vec![slow.clone(), slow]);
        assert_eq!(run(node, token).outcome, Err(Cancelled));
    }

    #[test]
    fn test_dropped_task_reports_cancelled() {
        // The pool discards the job unrun; the Reply guard still reports.
        let pool = Arc::new(WorkerPool::new(1).unwrap());
        pool.shutdown_now();
        let (tx, rx) = result_channel(1);
        EvalTask::new(
            Arc::new(Node::not(Node::leaf(true))),
            Reply::new(tx, 0),
            CancelToken::new(),
            pool,
        )
        .schedule();
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(10)).unwrap().outcome,
            Err(Cancelled)
        );
    }
}
