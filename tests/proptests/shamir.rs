//! Property tests for secret splitting

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

use fragmenter::domain::{ShareCount, Threshold};
use fragmenter::shamir::{self, PRIME};

/// Wrapper for valid share count and threshold pairs
#[derive(Clone, Copy, Debug)]
struct ValidSplitParams {
    threshold: u64,
    num_shares: u64,
}

impl Arbitrary for ValidSplitParams {
    fn arbitrary(g: &mut Gen) -> Self {
        // Keep it reasonable for testing
        let num_shares = u64::from(u8::arbitrary(g) % 24) + 1; // 1..=24
        let threshold = u64::arbitrary(g) % num_shares + 1; // 1..=num_shares
        ValidSplitParams {
            threshold,
            num_shares,
        }
    }
}

/// Wrapper for secrets inside the field
#[derive(Clone, Copy, Debug)]
struct FieldSecret(u64);

impl Arbitrary for FieldSecret {
    fn arbitrary(g: &mut Gen) -> Self {
        FieldSecret(u64::arbitrary(g) % PRIME)
    }
}

/// Any random selection of threshold shares recovers the secret
#[quickcheck]
fn prop_threshold_subset_recovers(secret: FieldSecret, params: ValidSplitParams, seed: u64) -> bool {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let Ok(mut shares) = shamir::split(params.num_shares, params.threshold, secret.0, &mut rng) else {
        return false;
    };
    if shares.len() as u64 != params.num_shares {
        return false;
    }

    shares.shuffle(&mut rng);
    let subset = &shares[..params.threshold as usize];
    shamir::join(subset).is_ok_and(|recovered| recovered == secret.0)
}

/// Random subsets one share short of the threshold never land on the secret
#[quickcheck]
fn prop_below_threshold_misses(secret: FieldSecret, params: ValidSplitParams, seed: u64) -> bool {
    const SUBSETS_PER_SPLIT: usize = 16;

    if params.threshold < 2 {
        return true;
    }
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut shares = shamir::split(params.num_shares, params.threshold, secret.0, &mut rng).unwrap();
    let short = (params.threshold - 1) as usize;

    // each interpolated value is uniform over the field: a hit has probability 1/PRIME
    (0..SUBSETS_PER_SPLIT).all(|_| {
        shares.shuffle(&mut rng);
        shamir::join(&shares[..short]).is_ok_and(|guess| guess != secret.0)
    })
}

/// Splitting is randomized: the same secret never yields the same shares twice
#[quickcheck]
fn prop_resplit_differs(secret: FieldSecret, seed: u64) -> bool {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let first = shamir::split(5, 3, secret.0, &mut rng).unwrap();
    let second = shamir::split(5, 3, secret.0, &mut rng).unwrap();
    first != second
}

/// Secrets at or above the prime are always rejected
#[quickcheck]
fn prop_out_of_field_rejected(excess: u64, seed: u64) -> bool {
    let secret = PRIME.saturating_add(excess % (u64::MAX - PRIME + 1));
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    shamir::split(3, 2, secret, &mut rng).is_err()
}

/// The Byzantine threshold always fits inside the pod and tolerates a third
#[quickcheck]
fn prop_byzantine_threshold_bounds(size: u16) -> bool {
    let n = u64::from(size) + 1;
    let k = *Threshold::byzantine(ShareCount::new(n).unwrap());
    let faulty = (n - 1) / 3;
    k >= 1 && k <= n && n - faulty >= k
}
