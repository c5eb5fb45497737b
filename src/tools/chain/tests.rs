#![cfg(test)]
mod tests {
    use crate::tools::chain::*;
    use std::cell::Cell;

    #[test]
    fn test_first_accepted_value_wins() {
        let hit = FallbackChain::new(|s: &String| s.len() > 3)
            .then("short", || Some("ab".to_string()))
            .then("missing", || None)
            .then("long", || Some("abcdef".to_string()))
            .then("later", || Some("zzzzzz".to_string()))
            .resolve();

        assert_eq!(
            hit,
            Some(Hit {
                value: "abcdef".to_string(),
                strategy: "long",
            })
        );
    }

    #[test]
    fn test_short_circuits_after_hit() {
        let calls = Cell::new(0);
        let value = FallbackChain::new(|_: &u32| true)
            .then("first", || {
                calls.set(calls.get() + 1);
                Some(1)
            })
            .then("second", || {
                calls.set(calls.get() + 1);
                Some(2)
            })
            .resolve_value();

        assert_eq!(value, Some(1));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_exhausted_chain_is_none() {
        let chain = FallbackChain::new(|v: &i32| *v > 10)
            .then("a", || Some(1))
            .then("b", || None);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.resolve(), None);
    }

    #[test]
    fn test_empty_chain() {
        let chain: FallbackChain<'_, String> = FallbackChain::new(|_| true);
        assert!(chain.is_empty());
        assert!(chain.resolve_value().is_none());
    }
}
