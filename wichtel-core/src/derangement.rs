use rand::seq::SliceRandom;
use rand::Rng;

use crate::WichtelError;

/// Upper bound on reshuffles before giving up. With a working random source
/// the expected number of attempts is about e, so this is never reached.
pub const MAX_SHUFFLE_ATTEMPTS: u32 = 10_000;

/// Returns a random permutation of `0..n` in which no index maps to itself.
///
/// Rejection sampling over unbiased shuffles, so every derangement is equally
/// likely. Fails for `n < 2`, where no derangement exists.
pub fn generate_derangement<R: Rng + ?Sized>(
    n: usize,
    rng: &mut R,
) -> Result<Vec<usize>, WichtelError> {
    shuffle_until_deranged(n, rng, MAX_SHUFFLE_ATTEMPTS).map(|(perm, _)| perm)
}

/// True when `perm` is a bijection on `0..perm.len()` with no fixed points.
pub fn is_derangement(perm: &[usize]) -> bool {
    let mut seen = vec![false; perm.len()];
    for (i, &target) in perm.iter().enumerate() {
        if target == i || target >= perm.len() || seen[target] {
            return false;
        }
        seen[target] = true;
    }
    true
}

pub(crate) fn shuffle_until_deranged<R: Rng + ?Sized>(
    n: usize,
    rng: &mut R,
    max_attempts: u32,
) -> Result<(Vec<usize>, u32), WichtelError> {
    if n < 2 {
        return Err(WichtelError::TooFewParticipants { count: n });
    }

    let mut perm = (0..n).collect::<Vec<_>>();
    for attempt in 1..=max_attempts {
        perm.shuffle(rng);
        if !has_fixed_point(&perm) {
            tracing::debug!(n, attempts = attempt, "derangement accepted");
            return Ok((perm, attempt));
        }
    }

    tracing::error!(n, max_attempts, "shuffle limit exceeded");
    Err(WichtelError::ShuffleLimitExceeded {
        attempts: max_attempts,
    })
}

fn has_fixed_point(perm: &[usize]) -> bool {
    perm.iter().enumerate().any(|(i, &target)| i == target)
}
