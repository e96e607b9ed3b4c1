use std::collections::HashMap;
use std::hash::Hash;

/// A state-value table where every state not yet assigned reads as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueFunction<S: Eq + Hash> {
    values: HashMap<S, f64>,
}

impl<S: Eq + Hash> Default for ValueFunction<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Eq + Hash> ValueFunction<S> {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Creates an empty table with room for `capacity` states.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: HashMap::with_capacity(capacity),
        }
    }

    /// Value of `state`, or `0.0` if it was never set.
    pub fn get(&self, state: &S) -> f64 {
        *self.values.get(state).unwrap_or(&0.0)
    }

    pub fn set(&mut self, state: S, value: f64) {
        self.values.insert(state, value);
    }

    /// Whether `state` carries an explicitly assigned value.
    pub fn contains(&self, state: &S) -> bool {
        self.values.contains_key(state)
    }

    /// Number of explicitly assigned states.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest absolute difference between the two tables over the union of
    /// their assigned states (unassigned entries count as zero).
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.values
            .keys()
            .chain(other.values.keys())
            .map(|s| (self.get(s) - other.get(s)).abs())
            .fold(0.0, f64::max)
    }
}

impl<S: Eq + Hash> FromIterator<(S, f64)> for ValueFunction<S> {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_state_reads_zero() {
        let values: ValueFunction<&str> = ValueFunction::new();
        assert_eq!(values.get(&"nowhere"), 0.0);
        assert!(!values.contains(&"nowhere"));
        assert!(values.is_empty());
    }

    #[test]
    fn test_set_overwrites() {
        let mut values = ValueFunction::with_capacity(2);
        values.set('a', 1.5);
        values.set('a', -2.0);
        values.set('b', 3.0);
        assert_eq!(values.get(&'a'), -2.0);
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_max_abs_diff_covers_both_sides() {
        let left: ValueFunction<u8> = [(0, 1.0), (1, 2.0)].into_iter().collect();
        let right: ValueFunction<u8> = [(0, 1.5), (2, -4.0)].into_iter().collect();
        // state 2 only exists on the right, state 1 only on the left
        assert_eq!(left.max_abs_diff(&right), 4.0);
        assert_eq!(left.max_abs_diff(&left), 0.0);
    }
}
