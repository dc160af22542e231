//! Indexed min-heap over [`InternalTask`], ordered ascending by `priority`
//! (smaller value = higher scheduling priority, so the root is always the
//! minimum-priority element).

use std::collections::HashMap;

use taskhive_shared::task::InternalTask;
use uuid::Uuid;

/// A binary min-heap. Push/Pop run in O(log n); Peek in O(1).
///
/// `delete_by_priority` is kept for source parity with the original
/// positional-delete behavior (first matching priority, O(n) scan) even
/// though it is semantically weak — two tasks can share a priority, and the
/// wrong one may be removed. `delete_by_id` is the preferred replacement:
/// an auxiliary `id -> index` map is kept in sync across every swap, giving
/// O(log n) deletion by actual task identity.
#[derive(Debug, Default)]
pub struct PriorityQueue {
    data: Vec<InternalTask>,
    index: HashMap<Uuid, usize>,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn peek(&self) -> Option<&InternalTask> {
        self.data.first()
    }

    pub fn push(&mut self, task: InternalTask) {
        let idx = self.data.len();
        self.index.insert(task.id, idx);
        self.data.push(task);
        self.heapify_up(idx);
    }

    pub fn pop(&mut self) -> Option<InternalTask> {
        if self.data.is_empty() {
            return None;
        }
        let last = self.data.len() - 1;
        self.swap_elems(0, last);
        let root = self.data.pop().expect("checked non-empty above");
        self.index.remove(&root.id);
        if !self.data.is_empty() {
            self.heapify_down(0);
        }
        Some(root)
    }

    /// Delete the first element with a matching priority. Kept for source
    /// parity tests; prefer [`Self::delete_by_id`].
    pub fn delete_by_priority(&mut self, priority: u16) -> bool {
        if self.data.is_empty() {
            return false;
        }
        match self.data.iter().position(|t| t.priority() == priority) {
            Some(idx) => {
                self.remove_at(idx);
                true
            }
            None => false,
        }
    }

    /// Delete a task by identity, in O(log n) via the auxiliary index.
    pub fn delete_by_id(&mut self, id: Uuid) -> bool {
        match self.index.get(&id).copied() {
            Some(idx) => {
                self.remove_at(idx);
                true
            }
            None => false,
        }
    }

    fn remove_at(&mut self, idx: usize) {
        let last = self.data.len() - 1;
        self.swap_elems(idx, last);
        let removed = self.data.pop().expect("idx was in bounds");
        self.index.remove(&removed.id);
        if idx >= self.data.len() {
            return;
        }
        if idx == 0 {
            self.heapify_down(0);
            return;
        }
        let parent = self.parent(idx);
        if self.data[parent].priority() > self.data[idx].priority() {
            self.heapify_up(idx);
        } else {
            self.heapify_down(idx);
        }
    }

    fn parent(&self, index: usize) -> usize {
        (index - 1) / 2
    }

    fn left_child(&self, index: usize) -> usize {
        2 * index + 1
    }

    fn right_child(&self, index: usize) -> usize {
        2 * index + 2
    }

    fn swap_elems(&mut self, i: usize, j: usize) {
        self.data.swap(i, j);
        self.index.insert(self.data[i].id, i);
        self.index.insert(self.data[j].id, j);
    }

    fn heapify_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = self.parent(index);
            if self.data[parent].priority() > self.data[index].priority() {
                self.swap_elems(parent, index);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn heapify_down(&mut self, mut index: usize) {
        loop {
            let size = self.data.len();
            let left = self.left_child(index);
            let right = self.right_child(index);
            let mut smallest = index;
            if left < size && self.data[left].priority() < self.data[smallest].priority() {
                smallest = left;
            }
            if right < size && self.data[right].priority() < self.data[smallest].priority() {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.swap_elems(index, smallest);
            index = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhive_shared::task::Task;

    fn task(priority: u16) -> InternalTask {
        InternalTask::new(Task {
            task_type: "send_email".to_string(),
            payload: serde_json::json!({}),
            priority,
            deadline: None,
            recurring: None,
        })
    }

    #[test]
    fn push_then_pop_returns_ascending_priority_order() {
        let mut pq = PriorityQueue::new();
        for p in [5, 2, 3, 1] {
            pq.push(task(p));
        }
        let popped: Vec<u16> = std::iter::from_fn(|| pq.pop().map(|t| t.priority())).collect();
        assert_eq!(popped, vec![1, 2, 3, 5]);
    }

    #[test]
    fn peek_does_not_remove() {
        let mut pq = PriorityQueue::new();
        pq.push(task(4));
        assert_eq!(pq.peek().unwrap().priority(), 4);
        assert_eq!(pq.len(), 1);
    }

    #[test]
    fn pop_on_empty_returns_none() {
        let mut pq = PriorityQueue::new();
        assert!(pq.pop().is_none());
    }

    #[test]
    fn delete_middle_by_priority_preserves_heap_property() {
        let mut pq = PriorityQueue::new();
        for p in [5, 2, 3, 1] {
            pq.push(task(p));
        }
        assert!(pq.delete_by_priority(1));
        assert_eq!(pq.peek().unwrap().priority(), 2);
        assert!(pq.delete_by_priority(3));
        assert_eq!(pq.peek().unwrap().priority(), 2);
        let remaining: Vec<u16> = std::iter::from_fn(|| pq.pop().map(|t| t.priority())).collect();
        assert_eq!(remaining, vec![2, 5]);
    }

    #[test]
    fn delete_by_priority_missing_value_returns_false() {
        let mut pq = PriorityQueue::new();
        pq.push(task(1));
        assert!(!pq.delete_by_priority(99));
    }

    #[test]
    fn delete_by_id_removes_exact_task_despite_shared_priority() {
        let mut pq = PriorityQueue::new();
        let a = task(3);
        let b = task(3);
        let a_id = a.id;
        let b_id = b.id;
        pq.push(a);
        pq.push(b);
        assert!(pq.delete_by_id(a_id));
        assert!(!pq.delete_by_id(a_id));
        let remaining = pq.pop().unwrap();
        assert_eq!(remaining.id, b_id);
    }

    #[test]
    fn heap_property_holds_after_random_operations() {
        let mut pq = PriorityQueue::new();
        for p in [10, 4, 7, 1, 9, 2, 6, 3, 8, 5] {
            pq.push(task(p));
        }
        pq.delete_by_priority(6);
        pq.pop();
        let mut last = 0u16;
        while let Some(t) = pq.pop() {
            assert!(t.priority() >= last);
            last = t.priority();
        }
    }
}
