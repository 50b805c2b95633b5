use std::fmt;

use serde_json::Value;
use smallvec::SmallVec;

use super::PredicateFn;

static NULL: Value = Value::Null;

/// A fully resolved validator argument.
#[derive(Clone)]
pub enum Arg {
    Value(Value),
    Predicate(PredicateFn),
}

impl Arg {
    /// The value form, `null` for predicates.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        match self {
            Self::Value(value) => value,
            Self::Predicate(_) => &NULL,
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => fmt::Debug::fmt(value, f),
            Self::Predicate(_) => f.write_str("<fn>"),
        }
    }
}

/// Resolved arguments handed to a validator after the field value.
///
/// Most validators take one or two arguments, so they live inline.
#[derive(Clone, Default)]
pub struct Args(SmallVec<[Arg; 2]>);

impl Args {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, arg: Arg) {
        self.0.push(arg);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Arg> {
        self.0.get(index)
    }

    /// The value at `index`; missing positions read as `null`.
    #[must_use]
    pub fn value(&self, index: usize) -> &Value {
        self.0.get(index).map_or(&NULL, Arg::as_value)
    }

    /// The predicate at `index`, if that position holds one.
    #[must_use]
    pub fn predicate(&self, index: usize) -> Option<&PredicateFn> {
        match self.0.get(index) {
            Some(Arg::Predicate(f)) => Some(f),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.0.iter()
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl FromIterator<Arg> for Args {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromIterator<Value> for Args {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().map(Arg::Value).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn missing_positions_read_as_null() {
        let args: Args = [json!(5)].into_iter().collect();
        assert_eq!(args.value(0), &json!(5));
        assert_eq!(args.value(3), &Value::Null);
        assert!(args.predicate(0).is_none());
    }

    #[test]
    fn predicates_are_kept_apart_from_values() {
        let f: PredicateFn = Arc::new(|v| v.is_string());
        let args: Args = [Arg::Predicate(f)].into_iter().collect();
        assert_eq!(args.value(0), &Value::Null);
        assert!(args.predicate(0).is_some_and(|p| p(&json!("x"))));
    }
}
