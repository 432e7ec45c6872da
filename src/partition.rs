//! # Partition — Splitting the Odd Integers Across Workers
//!
//! For `N` workers, worker `i` (0-based) starts at `3 + 2i` and advances by
//! `2N`. The `N` progressions are the residue classes of the odd integers
//! `>= 3` modulo `2N`, so together they cover every odd integer `>= 3` exactly
//! once. 2 is the only even prime and is stored by the controller directly.
//!
//! ```text
//! N = 2:  worker 0 → 3, 7, 11, 15, …
//!         worker 1 → 5, 9, 13, 17, …
//! ```

use serde::Serialize;

/// First odd candidate handed to any worker.
pub const FIRST_ODD: i64 = 3;

/// One worker's arithmetic progression of odd candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Progression {
    pub start: i64,
    pub stride: i64,
}

impl Progression {
    /// Candidates of this progression, in increasing order, up to and including `bound`.
    pub fn up_to(self, bound: i64) -> impl Iterator<Item = i64> {
        let stride = self.stride;
        std::iter::successors(Some(self.start), move |&n| n.checked_add(stride))
            .take_while(move |&n| n <= bound)
    }
}

/// Starting points `3, 5, 7, …, 3 + 2(worker_count - 1)`, each with stride `2 * worker_count`.
///
/// Returns an empty plan for `worker_count == 0`; the validator rejects that
/// before the controller ever asks for a plan.
pub fn plan(worker_count: usize) -> Vec<Progression> {
    let stride = 2 * worker_count as i64;
    (0..worker_count as i64)
        .map(|i| Progression {
            start: FIRST_ODD + 2 * i,
            stride,
        })
        .collect()
}
