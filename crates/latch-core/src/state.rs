use std::cell::RefCell;

use latch_dom::value::Value;

/// The single state cell of a component instance.
///
/// Created empty, seeded lazily on the first read, and mutated only through
/// merged writes. It lives for the instance's whole existence.
#[derive(Default)]
pub struct StateCell {
    value: RefCell<Option<Value>>,
}

impl StateCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the held value, seeding it with `initial` on the first read.
    pub fn read(&self, initial: Value) -> Value {
        self.value
            .borrow_mut()
            .get_or_insert_with(|| initial)
            .clone()
    }

    /// Shallow-merges `next` into the held value and returns the result.
    pub fn write_merged(&self, next: Value) -> Value {
        let mut slot = self.value.borrow_mut();
        let merged = slot.take().unwrap_or_default().merge(next);
        *slot = Some(merged.clone());
        merged
    }
}

#[cfg(test)]
mod unit {
    use super::*;

    #[test]
    fn seeds_once_then_keeps_merging() {
        let cell = StateCell::new();
        let seeded = cell.read(Value::map([("n", Value::Int(1))]));
        assert_eq!(seeded.get("n"), Some(&Value::Int(1)));

        cell.write_merged(Value::map([("m", Value::Int(2))]));
        let current = cell.read(Value::Null); // initial ignored after seeding
        assert_eq!(current.get("n"), Some(&Value::Int(1)));
        assert_eq!(current.get("m"), Some(&Value::Int(2)));
    }
}
