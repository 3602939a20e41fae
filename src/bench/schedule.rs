use rand::Rng;
use rand::seq::SliceRandom;

/// Per-iteration order in which the strategies are run.
///
/// Each row is a fresh permutation of `0..strategies`; only the order across
/// strategies is shuffled, never the inputs.
pub fn trial_order<R: Rng + ?Sized>(iterations: usize, strategies: usize, rng: &mut R) -> Vec<Vec<usize>> {
    (0..iterations)
        .map(|_| {
            let mut order: Vec<usize> = (0..strategies).collect();
            order.shuffle(rng);
            order
        })
        .collect()
}
