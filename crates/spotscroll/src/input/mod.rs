//! Input classifiers
//!
//! Each submodule turns one family of raw host events into scroll intents
//! on the [`Scroller`](crate::Scroller):
//!
//! - [`key`]: page keys scroll by a page, arrow keys record the input type
//!   and flash the edge when focus cannot move further
//! - [`wheel`]: delta wheel for engine-animated scrolling, raw wheel with
//!   manual axis selection for native scrolling
//! - [`touch`]: touch start, flick, mouse down and drag
//! - [`voice`]: recognised voice scroll keywords

pub mod key;
pub mod touch;
pub mod voice;
pub mod wheel;

/// Sign of a scroll request: -1, 0 or 1
pub(crate) fn direction_sign(delta: f32) -> i8 {
    if delta > 0.0 {
        1
    } else if delta < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_sign() {
        assert_eq!(direction_sign(12.5), 1);
        assert_eq!(direction_sign(-0.1), -1);
        assert_eq!(direction_sign(0.0), 0);
        assert_eq!(direction_sign(-0.0), 0);
    }
}
