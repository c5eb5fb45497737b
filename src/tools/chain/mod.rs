//! Fallback Chains
//!
//! An ordered list of named strategies sharing one acceptance predicate.
//! Strategies run in order; the first value the predicate accepts wins and
//! the rest never run. A strategy returning `None` is a normal outcome.

mod tests;

/// A value produced by a chain plus the name of the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit<T> {
    pub value: T,
    pub strategy: &'static str,
}

type Strategy<'a, T> = Box<dyn FnMut() -> Option<T> + 'a>;

pub struct FallbackChain<'a, T> {
    strategies: Vec<(&'static str, Strategy<'a, T>)>,
    accept: Box<dyn Fn(&T) -> bool + 'a>,
}

impl<'a, T> FallbackChain<'a, T> {
    pub fn new(accept: impl Fn(&T) -> bool + 'a) -> Self {
        Self {
            strategies: Vec::new(),
            accept: Box::new(accept),
        }
    }

    /// Append a strategy; order of calls is order of evaluation.
    pub fn then(mut self, name: &'static str, strategy: impl FnMut() -> Option<T> + 'a) -> Self {
        self.strategies.push((name, Box::new(strategy)));
        self
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn resolve(self) -> Option<Hit<T>> {
        let Self { strategies, accept } = self;
        for (name, mut strategy) in strategies {
            match strategy() {
                Some(value) if accept(&value) => {
                    return Some(Hit {
                        value,
                        strategy: name,
                    })
                }
                _ => continue,
            }
        }
        None
    }

    pub fn resolve_value(self) -> Option<T> {
        self.resolve().map(|hit| hit.value)
    }
}
