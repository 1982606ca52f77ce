//! Selector-specific failure modes.

#[derive(thiserror::Error, Debug)]
pub enum SelectorError {
    /// A Selector with no critical route can never terminate: nothing
    /// would ever decrement the remaining-critical counter to zero.
    #[error("a Selector needs at least one critical route")]
    NoCriticalRoute,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_critical_route_has_a_fixed_message() {
        assert_eq!(
            SelectorError::NoCriticalRoute.to_string(),
            "a Selector needs at least one critical route"
        );
    }
}
