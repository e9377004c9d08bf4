//! Delayed delivery of actions back into a session.

use crate::actions::Action;
use crate::types::ReplyTicket;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

pub type ActionSender = UnboundedSender<Action>;

pub trait Scheduler {
    /// Send `action` to the session once `delay` has elapsed.
    fn schedule(&mut self, ticket: ReplyTicket, delay: Duration, action: Action);

    /// Drop a delivery that has not fired yet. Unknown tickets are ignored.
    fn cancel(&mut self, ticket: ReplyTicket);
}

/// Runs each delivery as a sleeping tokio task. Needs a tokio runtime.
pub struct TokioScheduler {
    sender: ActionSender,
    tasks: HashMap<ReplyTicket, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(sender: ActionSender) -> Self {
        Self {
            sender,
            tasks: HashMap::new(),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, ticket: ReplyTicket, delay: Duration, action: Action) {
        self.tasks.retain(|_, task| !task.is_finished());

        let sender = self.sender.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if sender.send(action).is_err() {
                tracing::debug!(ticket = ticket.0, "session closed before delivery");
            }
        });
        self.tasks.insert(ticket, task);
    }

    fn cancel(&mut self, ticket: ReplyTicket) {
        if let Some(task) = self.tasks.remove(&ticket) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[derive(Debug)]
struct Queued {
    due: Duration,
    ticket: ReplyTicket,
    action: Action,
}

/// Virtual clock advanced by hand, for tests and replays.
pub struct ManualScheduler {
    sender: ActionSender,
    now: Duration,
    queue: Vec<Queued>,
}

impl ManualScheduler {
    pub fn new(sender: ActionSender) -> Self {
        Self {
            sender,
            now: Duration::ZERO,
            queue: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Moves the clock forward and sends every delivery now due, earliest
    /// first. Returns how many were sent.
    pub fn advance(&mut self, by: Duration) -> usize {
        self.now += by;
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.queue).into_iter().partition(|q| q.due <= now);
        self.queue = waiting;
        due.sort_by_key(|q| (q.due, q.ticket));

        let fired = due.len();
        for queued in due {
            let _ = self.sender.send(queued.action);
        }
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, ticket: ReplyTicket, delay: Duration, action: Action) {
        self.queue.push(Queued {
            due: self.now + delay,
            ticket,
            action,
        });
    }

    fn cancel(&mut self, ticket: ReplyTicket) {
        self.queue.retain(|q| q.ticket != ticket);
    }
}
