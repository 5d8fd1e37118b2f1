use crate::notification::NotificationRequest;

/// Pending requests ordered by priority (highest first), FIFO within a
/// priority.
///
/// Every insert re-sorts the whole queue; queue sizes are bounded by the
/// number of monitors so this stays cheap.
#[derive(Debug, Default)]
pub struct PriorityQueue {
    items: Vec<NotificationRequest>,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, request: NotificationRequest) {
        self.items.push(request);
        // stable: equal keys keep insertion order
        self.items
            .sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()).then(a.seq.cmp(&b.seq)));
    }

    pub fn dequeue(&mut self) -> Option<NotificationRequest> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops everything, returning how many requests were discarded.
    pub fn clear(&mut self) -> usize {
        let n = self.items.len();
        self.items.clear();
        n
    }
}
