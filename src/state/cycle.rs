//! Tab-order cycling over a flat list of focusable controls.

use crate::engine::ControlId;

/// Where focus goes next, and whether getting there wrapped around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusMove {
    pub target: ControlId,
    pub wrapped: bool,
}

/// Next focusable after `from` in registration order, wrapping at either end.
///
/// With nothing focused (or focus on something not in the list) the first
/// control is chosen, or the last one when `reverse`.
pub fn find_next_focusable(
    focusables: &[ControlId],
    from: Option<ControlId>,
    reverse: bool,
) -> Option<FocusMove> {
    if focusables.is_empty() {
        return None;
    }

    let len = focusables.len() as i64;
    let current_pos = from.and_then(|id| focusables.iter().position(|&f| f == id));

    match current_pos {
        None => {
            let target = if reverse { focusables[focusables.len() - 1] } else { focusables[0] };
            Some(FocusMove { target, wrapped: false })
        }
        Some(pos) => {
            let direction = if reverse { -1 } else { 1 };
            let raw = pos as i64 + direction;
            let next_pos = (raw % len + len) % len;
            Some(FocusMove {
                target: focusables[next_pos as usize],
                wrapped: raw < 0 || raw >= len,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Vec<ControlId> {
        (0..3).map(|_| ControlId::next()).collect()
    }

    #[test]
    fn test_empty_has_no_target() {
        assert_eq!(find_next_focusable(&[], None, false), None);
    }

    #[test]
    fn test_forward_starts_at_first() {
        let ids = setup();
        let first = find_next_focusable(&ids, None, false);
        assert_eq!(first, Some(FocusMove { target: ids[0], wrapped: false }));
    }

    #[test]
    fn test_reverse_starts_at_last() {
        let ids = setup();
        let last = find_next_focusable(&ids, None, true);
        assert_eq!(last, Some(FocusMove { target: ids[2], wrapped: false }));
    }

    #[test]
    fn test_wrap_is_reported() {
        let ids = setup();
        let forward = find_next_focusable(&ids, Some(ids[2]), false);
        assert_eq!(forward, Some(FocusMove { target: ids[0], wrapped: true }));

        let backward = find_next_focusable(&ids, Some(ids[0]), true);
        assert_eq!(backward, Some(FocusMove { target: ids[2], wrapped: true }));

        let middle = find_next_focusable(&ids, Some(ids[0]), false);
        assert_eq!(middle, Some(FocusMove { target: ids[1], wrapped: false }));
    }

    #[test]
    fn test_reverse_is_inverse_permutation() {
        let ids = setup();
        for &id in &ids {
            let Some(next) = find_next_focusable(&ids, Some(id), false) else {
                panic!("no target");
            };
            let back = find_next_focusable(&ids, Some(next.target), true);
            assert_eq!(back.map(|m| m.target), Some(id));
        }
    }

    #[test]
    fn test_unknown_origin_restarts() {
        let ids = setup();
        let stranger = ControlId::next();
        let next = find_next_focusable(&ids, Some(stranger), false);
        assert_eq!(next.map(|m| m.target), Some(ids[0]));
    }
}
