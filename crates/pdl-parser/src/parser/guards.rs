//! Parser guards to prevent stack overflow on deeply nested input

use super::ParseError;
use crate::token::Span;
use std::cell::Cell;
use std::rc::Rc;

/// Shared recursion counter for one parser instance.
pub type DepthCounter = Rc<Cell<usize>>;

/// RAII guard that tracks recursion depth
///
/// Automatically decrements depth on drop. The guard owns a handle to the
/// counter rather than borrowing the parser, so parsing can continue while
/// it is alive.
///
/// # Example
///
/// ```ignore
/// fn parse_group(&mut self) -> Result<Expression, ParseError> {
///     let _guard = self.enter("group")?;
///     // ... recursive parsing ...
/// }
/// ```
#[derive(Debug)]
pub struct DepthGuard {
    depth: DepthCounter,
}

impl DepthGuard {
    /// Enter one nesting level, failing once `limit` would be exceeded
    #[inline]
    pub fn new(depth: &DepthCounter, limit: usize, name: &'static str, span: Span) -> Result<Self, ParseError> {
        let next = depth.get() + 1;
        if next > limit {
            return Err(ParseError::limit_exceeded("nesting depth", limit, span)
                .with_suggestion(format!("Reduce nesting inside this {}", name)));
        }
        depth.set(next);
        Ok(Self {
            depth: Rc::clone(depth),
        })
    }
}

impl Drop for DepthGuard {
    #[inline]
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseErrorKind;

    #[test]
    fn test_depth_guard_increments_and_decrements() {
        let depth = DepthCounter::default();
        {
            let _g1 = DepthGuard::new(&depth, 4, "test", Span::default()).unwrap();
            assert_eq!(depth.get(), 1);
            {
                let _g2 = DepthGuard::new(&depth, 4, "test", Span::default()).unwrap();
                assert_eq!(depth.get(), 2);
            }
            assert_eq!(depth.get(), 1);
        }
        assert_eq!(depth.get(), 0);
    }

    #[test]
    fn test_depth_guard_exceeds_limit() {
        let depth = DepthCounter::default();
        let mut guards = Vec::new();
        for _ in 0..3 {
            guards.push(DepthGuard::new(&depth, 3, "test", Span::default()).unwrap());
        }
        let err = DepthGuard::new(&depth, 3, "test", Span::default()).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::LimitExceeded { limit: 3 }));
        assert_eq!(depth.get(), 3);
        drop(guards);
        assert_eq!(depth.get(), 0);
    }
}
