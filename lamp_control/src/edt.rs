use std::cell::{Cell, RefCell};
use std::cmp::Ordering::Equal;

use tracing::trace;

/// Upper bound on pending messages. A lamp simulator never needs more than a handful.
pub const QUEUE_CAPACITY: usize = 16;

#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub struct Msg<T: Sized> {
    pub when: u32,
    pub order: u32,
    pub payload: T,
}

/// Event dispatch thread: a single-owner queue of messages ordered by due time.
///
/// Time is simulated in milliseconds. The owner either drives the clock with [EDT::poll]
/// (sleeping for real on [Event::Wait]) or jumps it forward with [EDT::advance_time_by].
pub struct EDT<T> {
    now: Cell<u32>,
    queue: RefCell<Vec<Msg<T>>>,
}

pub enum Event<T> {
    Execute { msg: T },
    Wait { ms: u32 },
    Halt,
}

impl<T: Copy> EDT<T> {
    pub fn create() -> EDT<T> {
        EDT {
            now: Cell::new(0),
            queue: RefCell::new(Vec::with_capacity(QUEUE_CAPACITY)),
        }
    }

    pub fn now(&self) -> u32 {
        self.now.get()
    }

    pub fn poll(&self) -> Event<T> {
        let head = match self.peek_head() {
            Some(head) => head,
            None => return Event::Halt,
        };

        let to_wait = head.when.saturating_sub(self.now.get());
        if to_wait > 0 {
            // the clock is at the head's due time once the owner is done waiting
            self.now.set(head.when);
            return Event::Wait { ms: to_wait };
        }

        let position = self
            .queue
            .borrow()
            .iter()
            .position(|it| it.when == head.when && it.order == head.order);
        if let Some(position) = position {
            let removed = self.queue.borrow_mut().swap_remove(position);
            debug_assert_eq!(removed.when, head.when);
            debug_assert_eq!(removed.order, head.order);
        }
        trace!(when = head.when, order = head.order, "dispatching message");
        Event::Execute { msg: head.payload }
    }

    /// Advances the time by the given value and feeds messages to the handler
    pub fn advance_time_by(&self, time: u32, handler: &dyn Fn(T)) {
        let target = self.now.get().saturating_add(time);
        let mut elapsed: u32 = 0;
        loop {
            match self.poll() {
                Event::Execute { msg } => {
                    handler(msg);
                }
                Event::Wait { ms } => {
                    elapsed = elapsed.saturating_add(ms);
                    if elapsed > time {
                        break;
                    }
                }
                Event::Halt => {
                    break;
                }
            }
        }
        self.now.set(target);
    }

    fn peek_head(&self) -> Option<Msg<T>> {
        self.queue
            .borrow()
            .iter()
            .min_by(|lhs, rhs| {
                let by_when = lhs.when.cmp(&rhs.when);
                match by_when {
                    Equal => lhs.order.cmp(&rhs.order),
                    _ => by_when,
                }
            })
            .cloned()
    }

    pub fn schedule(&self, delay: u32, payload: T) {
        // the clock stops at u32::MAX, late messages pile up there
        let when = self.now.get().saturating_add(delay);

        let order = self
            .queue
            .borrow()
            .iter()
            .filter(|message| message.when == when)
            .map(|it| it.order + 1)
            .max()
            .unwrap_or(0);

        self.queue.borrow_mut().push(Msg {
            when,
            order,
            payload,
        });

        debug_assert!(self.queue.borrow().len() <= QUEUE_CAPACITY);
    }

    pub fn remove<F>(&self, mut predicate: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.queue.borrow_mut().retain(|it| !predicate(&it.payload));
    }

    /// Drops every pending message, the next [EDT::poll] halts.
    pub fn exit(&self) {
        self.queue.borrow_mut().clear();
    }

    pub fn queue_len(&self) -> usize {
        self.queue.borrow().len()
    }
}
