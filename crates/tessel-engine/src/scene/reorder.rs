use crate::batch::BatchState;
use crate::coords::Rect;

/// What the scheduler needs to know about one command.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ReorderItem {
    /// `None` for commands that will not draw (stale mesh); they never batch.
    pub state: Option<BatchState>,
    /// Screen area the command may touch, clip applied.
    pub bounds: Rect,
}

/// Reorders draws to reduce batch state changes without changing the image.
///
/// Two commands keep their relative order if their bounds overlap; without a
/// depth buffer this holds for opaque pairs as much as for blended ones.
/// Among the commands whose predecessors are all placed, the scheduler takes
/// the earliest one that continues the current state, else the earliest one.
/// Commands that never conflict therefore keep traversal order unless moving
/// them saves a state change.
///
/// `out` receives a permutation of `0..items.len()`.
#[derive(Debug, Default)]
pub struct DrawReorder {
    blockers: Vec<u32>,
    successors: Vec<Vec<u32>>,
    placed: Vec<bool>,
}

impl DrawReorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, items: &[ReorderItem], out: &mut Vec<usize>) {
        let n = items.len();
        out.clear();
        out.reserve(n);

        self.blockers.clear();
        self.blockers.resize(n, 0);
        self.placed.clear();
        self.placed.resize(n, false);
        for s in &mut self.successors {
            s.clear();
        }
        if self.successors.len() < n {
            self.successors.resize_with(n, Vec::new);
        }

        for j in 0..n {
            for i in 0..j {
                if conflicts(&items[i], &items[j]) {
                    self.successors[i].push(j as u32);
                    self.blockers[j] += 1;
                }
            }
        }

        // first index that may still be unplaced
        let mut low = 0;
        let mut current: Option<BatchState> = None;
        while out.len() < n {
            while low < n && self.placed[low] {
                low += 1;
            }
            let ready = |k: usize| !self.placed[k] && self.blockers[k] == 0;

            let mut pick = None;
            if let Some(state) = current {
                pick = (low..n).find(|&k| ready(k) && items[k].state == Some(state));
            }
            // the lowest unplaced index is always ready: its blockers are all earlier
            let pick = pick.or_else(|| (low..n).find(|&k| ready(k))).unwrap_or(low);

            self.placed[pick] = true;
            out.push(pick);
            current = items[pick].state;
            for &s in &self.successors[pick] {
                self.blockers[s as usize] -= 1;
            }
        }
    }
}

#[inline]
fn conflicts(a: &ReorderItem, b: &ReorderItem) -> bool {
    a.bounds.overlaps(b.bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::PxExtent2D;
    use crate::sprite::{BlendState, NativeTextureHandle, NativeTextureInfo};

    fn item(tex: u32, x: f32) -> ReorderItem {
        ReorderItem {
            state: Some(BatchState::new(
                NativeTextureInfo::new(NativeTextureHandle(tex), PxExtent2D::new(4, 4)),
                BlendState::AlphaBlend,
            )),
            bounds: Rect::new(x, 0.0, 10.0, 10.0),
        }
    }

    fn run(items: &[ReorderItem]) -> Vec<usize> {
        let mut out = Vec::new();
        DrawReorder::new().schedule(items, &mut out);
        out
    }

    fn state_changes(items: &[ReorderItem], order: &[usize]) -> usize {
        order.windows(2).filter(|w| items[w[0]].state != items[w[1]].state).count()
    }

    #[test]
    fn disjoint_draws_group_by_state() {
        let items = [item(1, 0.0), item(2, 20.0), item(1, 40.0), item(2, 60.0)];
        let order = run(&items);
        assert_eq!(order, vec![0, 2, 1, 3]);
        assert_eq!(state_changes(&items, &order), 1);
    }

    #[test]
    fn overlapping_draws_keep_order() {
        // the second texture-1 draw overlaps the texture-2 draw and must stay after it
        let items = [item(1, 0.0), item(2, 20.0), item(1, 25.0)];
        assert_eq!(run(&items), vec![0, 1, 2]);
    }

    #[test]
    fn touching_edges_do_not_conflict() {
        let items = [item(1, 0.0), item(2, 10.0), item(1, 20.0)];
        assert_eq!(run(&items), vec![0, 2, 1]);
    }

    #[test]
    fn result_is_a_permutation() {
        let items: Vec<_> = (0..50).map(|i| item(i % 3, (i * 7 % 40) as f32)).collect();
        let mut order = run(&items);
        order.sort_unstable();
        assert_eq!(order, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn conflicting_pairs_never_swap() {
        let items: Vec<_> = (0..40).map(|i| item(i % 4, (i * 13 % 60) as f32)).collect();
        let order = run(&items);
        let mut pos = vec![0; items.len()];
        for (p, &i) in order.iter().enumerate() {
            pos[i] = p;
        }
        for j in 0..items.len() {
            for i in 0..j {
                if conflicts(&items[i], &items[j]) {
                    assert!(pos[i] < pos[j], "{i} must paint before {j}");
                }
            }
        }
    }

    #[test]
    fn stale_items_do_not_batch() {
        let dead = ReorderItem { state: None, bounds: Rect::new(0.0, 0.0, 0.0, 0.0) };
        let items = [item(1, 0.0), dead, item(1, 20.0)];
        assert_eq!(run(&items), vec![0, 2, 1]);
    }

    #[test]
    fn scheduler_reuses_buffers() {
        let mut r = DrawReorder::new();
        let mut out = Vec::new();
        r.schedule(&[item(1, 0.0), item(2, 0.0)], &mut out);
        r.schedule(&[item(1, 0.0)], &mut out);
        assert_eq!(out, vec![0]);
    }
}
