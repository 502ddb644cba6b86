//! history.rs
//! Bounded, arrival-ordered history buffer for a single cache entry.

use crate::engine::Value;
use std::collections::VecDeque;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    values: VecDeque<Value>,
}

impl History {
    pub const fn empty() -> Self {
        Self { values: VecDeque::new() }
    }

    /// Appends `value`, evicting the oldest entries once `capacity` is reached.
    pub fn push(&mut self, value: Value, capacity: usize) {
        if capacity == 0 {
            return;
        }
        while self.values.len() >= capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// Oldest first.
    pub fn to_vec(&self) -> Vec<Value> {
        self.values.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_evicts_oldest_when_full() {
        let mut history = History::empty();
        for i in 0..5 {
            history.push(Value::Double(i as f64), 3);
        }
        assert_eq!(history.to_vec(), vec![Value::Double(2.0), Value::Double(3.0), Value::Double(4.0)]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut history = History::empty();
        history.push(Value::Double(1.0), 0);
        assert!(history.is_empty());
    }
}
