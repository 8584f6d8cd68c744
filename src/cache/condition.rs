//! Query Conditions
//!
//! Pure predicates over a single cached entity. Conditions never see the cache
//! itself, so `query` stays a plain scan under the read lock.
//!
//! An operation given by name that is not recognised produces a condition
//! that matches nothing.

// == Condition Trait ==
/// A predicate over one entity.
pub trait Condition<T>: Send + Sync {
    fn matches(&self, item: &T) -> bool;
}

impl<T, F> Condition<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn matches(&self, item: &T) -> bool {
        self(item)
    }
}

// == String Condition ==
/// Comparison applied by a [`StringCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOp {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
}

impl StringOp {
    /// Parses `eq`, `contains`, `startsWith` or `endsWith` (snake_case
    /// spellings are accepted too).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "eq" | "equals" => Some(StringOp::Equals),
            "contains" => Some(StringOp::Contains),
            "startsWith" | "starts_with" => Some(StringOp::StartsWith),
            "endsWith" | "ends_with" => Some(StringOp::EndsWith),
            _ => None,
        }
    }
}

/// Compares a string field, extracted by an accessor, against a fixed value.
pub struct StringCondition<T> {
    extractor: Box<dyn Fn(&T) -> &str + Send + Sync>,
    value: String,
    op: Option<StringOp>,
}

impl<T> StringCondition<T> {
    pub fn new<F>(extractor: F, op: StringOp, value: impl Into<String>) -> Self
    where
        F: Fn(&T) -> &str + Send + Sync + 'static,
    {
        Self {
            extractor: Box::new(extractor),
            value: value.into(),
            op: Some(op),
        }
    }

    /// Builds the condition from an operation name, see [`StringOp::from_name`].
    pub fn named<F>(extractor: F, op: &str, value: impl Into<String>) -> Self
    where
        F: Fn(&T) -> &str + Send + Sync + 'static,
    {
        Self {
            extractor: Box::new(extractor),
            value: value.into(),
            op: StringOp::from_name(op),
        }
    }
}

impl<T> Condition<T> for StringCondition<T> {
    fn matches(&self, item: &T) -> bool {
        let field = (self.extractor)(item);
        match self.op {
            Some(StringOp::Equals) => field == self.value,
            Some(StringOp::Contains) => field.contains(self.value.as_str()),
            Some(StringOp::StartsWith) => field.starts_with(self.value.as_str()),
            Some(StringOp::EndsWith) => field.ends_with(self.value.as_str()),
            None => false,
        }
    }
}

// == Number Condition ==
/// Ordered numeric types usable in a [`NumberCondition`].
pub trait Number: PartialOrd + Copy + Send + Sync + 'static {}

macro_rules! impl_number {
    ($($t:ty),*) => {
        $(impl Number for $t {})*
    };
}

impl_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// Comparison applied by a [`NumberCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberOp {
    Equals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl NumberOp {
    /// Parses `eq`, `gt`, `gte`, `lt` or `lte`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "eq" => Some(NumberOp::Equals),
            "gt" => Some(NumberOp::GreaterThan),
            "gte" => Some(NumberOp::GreaterOrEqual),
            "lt" => Some(NumberOp::LessThan),
            "lte" => Some(NumberOp::LessOrEqual),
            _ => None,
        }
    }
}

/// Compares a numeric field against a fixed value.
pub struct NumberCondition<T, N: Number> {
    extractor: Box<dyn Fn(&T) -> N + Send + Sync>,
    value: N,
    op: Option<NumberOp>,
}

impl<T, N: Number> NumberCondition<T, N> {
    pub fn new<F>(extractor: F, op: NumberOp, value: N) -> Self
    where
        F: Fn(&T) -> N + Send + Sync + 'static,
    {
        Self {
            extractor: Box::new(extractor),
            value,
            op: Some(op),
        }
    }

    /// Builds the condition from an operation name, see [`NumberOp::from_name`].
    pub fn named<F>(extractor: F, op: &str, value: N) -> Self
    where
        F: Fn(&T) -> N + Send + Sync + 'static,
    {
        Self {
            extractor: Box::new(extractor),
            value,
            op: NumberOp::from_name(op),
        }
    }
}

impl<T, N: Number> Condition<T> for NumberCondition<T, N> {
    fn matches(&self, item: &T) -> bool {
        let field = (self.extractor)(item);
        match self.op {
            Some(NumberOp::Equals) => field == self.value,
            Some(NumberOp::GreaterThan) => field > self.value,
            Some(NumberOp::GreaterOrEqual) => field >= self.value,
            Some(NumberOp::LessThan) => field < self.value,
            Some(NumberOp::LessOrEqual) => field <= self.value,
            None => false,
        }
    }
}

// == Composite Condition ==
/// Boolean combinator for a [`CompositeCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "and" => Some(LogicalOp::And),
            "or" => Some(LogicalOp::Or),
            _ => None,
        }
    }
}

/// An ordered list of sub-conditions joined by AND or OR.
///
/// AND over an empty list is true, OR over an empty list is false. Both
/// short-circuit in list order.
pub struct CompositeCondition<T> {
    conditions: Vec<Box<dyn Condition<T>>>,
    op: Option<LogicalOp>,
}

impl<T> CompositeCondition<T> {
    pub fn new(op: LogicalOp, conditions: Vec<Box<dyn Condition<T>>>) -> Self {
        Self {
            conditions,
            op: Some(op),
        }
    }

    pub fn named(op: &str, conditions: Vec<Box<dyn Condition<T>>>) -> Self {
        Self {
            conditions,
            op: LogicalOp::from_name(op),
        }
    }

    /// Joins `conditions` with AND.
    pub fn all_of(conditions: Vec<Box<dyn Condition<T>>>) -> Self {
        Self::new(LogicalOp::And, conditions)
    }

    /// Joins `conditions` with OR.
    pub fn any_of(conditions: Vec<Box<dyn Condition<T>>>) -> Self {
        Self::new(LogicalOp::Or, conditions)
    }

    /// Appends another sub-condition.
    pub fn with(mut self, condition: impl Condition<T> + 'static) -> Self {
        self.conditions.push(Box::new(condition));
        self
    }
}

impl<T> Condition<T> for CompositeCondition<T> {
    fn matches(&self, item: &T) -> bool {
        match self.op {
            Some(LogicalOp::And) => self.conditions.iter().all(|c| c.matches(item)),
            Some(LogicalOp::Or) => self.conditions.iter().any(|c| c.matches(item)),
            None => false,
        }
    }
}

// == Combinators ==
/// Chaining helpers available on every condition.
pub trait ConditionExt<T>: Condition<T> + Sized + 'static {
    fn and(self, other: impl Condition<T> + 'static) -> CompositeCondition<T> {
        CompositeCondition::all_of(vec![Box::new(self), Box::new(other)])
    }

    fn or(self, other: impl Condition<T> + 'static) -> CompositeCondition<T> {
        CompositeCondition::any_of(vec![Box::new(self), Box::new(other)])
    }
}

impl<T, C> ConditionExt<T> for C where C: Condition<T> + 'static {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    struct Person {
        name: String,
        age: u32,
        score: f64,
    }

    fn person(name: &str, age: u32, score: f64) -> Person {
        Person {
            name: name.to_string(),
            age,
            score,
        }
    }

    fn name_condition(op: StringOp, value: &str) -> StringCondition<Person> {
        StringCondition::new(|p: &Person| p.name.as_str(), op, value)
    }

    #[test]
    fn test_string_ops() {
        let john = person("John Smith", 40, 1.0);

        assert!(name_condition(StringOp::Equals, "John Smith").matches(&john));
        assert!(!name_condition(StringOp::Equals, "John").matches(&john));
        assert!(name_condition(StringOp::Contains, "n S").matches(&john));
        assert!(name_condition(StringOp::StartsWith, "John").matches(&john));
        assert!(!name_condition(StringOp::StartsWith, "Smith").matches(&john));
        assert!(name_condition(StringOp::EndsWith, "Smith").matches(&john));
    }

    #[test]
    fn test_string_named_ops() {
        let jane = person("Jane", 30, 1.0);

        let cond = StringCondition::named(|p: &Person| p.name.as_str(), "startsWith", "Ja");
        assert!(cond.matches(&jane));

        let cond = StringCondition::named(|p: &Person| p.name.as_str(), "eq", "Jane");
        assert!(cond.matches(&jane));
    }

    #[test]
    fn test_unknown_string_op_matches_nothing() {
        let jane = person("Jane", 30, 1.0);
        let cond = StringCondition::named(|p: &Person| p.name.as_str(), "like", "Jane");
        assert!(!cond.matches(&jane));
    }

    #[test]
    fn test_number_ops() {
        let p = person("X", 30, 2.5);
        let age = |op| NumberCondition::new(|p: &Person| p.age, op, 30u32);

        assert!(age(NumberOp::Equals).matches(&p));
        assert!(!age(NumberOp::GreaterThan).matches(&p));
        assert!(age(NumberOp::GreaterOrEqual).matches(&p));
        assert!(!age(NumberOp::LessThan).matches(&p));
        assert!(age(NumberOp::LessOrEqual).matches(&p));

        let score = NumberCondition::new(|p: &Person| p.score, NumberOp::LessThan, 3.0);
        assert!(score.matches(&p));
    }

    #[test]
    fn test_number_named_ops() {
        let p = person("X", 30, 2.5);
        assert!(NumberCondition::named(|p: &Person| p.score, "gte", 2.5).matches(&p));
        assert!(NumberCondition::named(|p: &Person| p.age, "lt", 31u32).matches(&p));
        assert!(!NumberCondition::named(|p: &Person| p.age, "between", 30u32).matches(&p));
    }

    #[test]
    fn test_empty_composites() {
        let p = person("X", 1, 1.0);
        assert!(CompositeCondition::<Person>::all_of(vec![]).matches(&p));
        assert!(!CompositeCondition::<Person>::any_of(vec![]).matches(&p));
    }

    #[test]
    fn test_unknown_composite_op_matches_nothing() {
        let p = person("X", 1, 1.0);
        assert!(!CompositeCondition::<Person>::named("xor", vec![]).matches(&p));
        let always: Box<dyn Condition<Person>> = Box::new(|_: &Person| true);
        assert!(!CompositeCondition::named("xor", vec![always]).matches(&p));
    }

    #[test]
    fn test_and_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let cond = CompositeCondition::<Person>::all_of(vec![])
            .with(|_: &Person| false)
            .with(move |_: &Person| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            });

        assert!(!cond.matches(&person("X", 1, 1.0)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_or_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let cond = CompositeCondition::<Person>::any_of(vec![])
            .with(|_: &Person| true)
            .with(move |_: &Person| {
                counter.fetch_add(1, Ordering::SeqCst);
                false
            });

        assert!(cond.matches(&person("X", 1, 1.0)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_nested_composites() {
        // name contains "John" AND (age < 18 OR age > 60)
        let cond = name_condition(StringOp::Contains, "John").and(
            NumberCondition::new(|p: &Person| p.age, NumberOp::LessThan, 18u32)
                .or(NumberCondition::new(|p: &Person| p.age, NumberOp::GreaterThan, 60u32)),
        );

        assert!(cond.matches(&person("John", 70, 0.0)));
        assert!(cond.matches(&person("Johnny", 10, 0.0)));
        assert!(!cond.matches(&person("John", 40, 0.0)));
        assert!(!cond.matches(&person("Jane", 70, 0.0)));
    }

    #[test]
    fn test_closure_condition() {
        let adult = |p: &Person| p.age >= 18;
        assert!(adult.matches(&person("X", 18, 0.0)));
        assert!(!adult.matches(&person("X", 17, 0.0)));
    }
}
