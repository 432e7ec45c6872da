//! # Primality — Trial Division and Closest-Prime Lookup
//!
//! Pure number-theoretic helpers consumed by the search engine:
//!
//! 1. [`is_prime`] decides primality of a single `i64` by odd trial division.
//! 2. [`closest_prime_at_or_below`] walks down from a bound to the nearest
//!    prime. The engine uses it as the completeness marker for range queries:
//!    a range `[min, max]` is fully searched once this prime is in the store.
//!
//! Trial division stops at `d * d <= n`. Any composite has a factor no larger
//! than its square root, so this classifies exactly like the wider `n / 2`
//! bound while doing O(√n) work instead of O(n).

/// Returns true if `n` is prime. Negative numbers, 0 and 1 are not prime.
pub fn is_prime(n: i64) -> bool {
    if n <= 1 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let mut d: i64 = 3;
    // i128 keeps d*d from overflowing near i64::MAX
    while (d as i128) * (d as i128) <= n as i128 {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Largest prime `p <= bound`, or `None` when `bound < 2`.
///
/// Even bounds (other than 2) step down to the odd number below, then odd
/// candidates are tried in decreasing order. 3 and 2 act as floors, so the
/// walk always terminates.
pub fn closest_prime_at_or_below(bound: i64) -> Option<i64> {
    if bound < 2 {
        return None;
    }
    if bound == 2 {
        return Some(2);
    }

    let mut candidate = if bound % 2 == 0 { bound - 1 } else { bound };
    while candidate >= 3 {
        if is_prime(candidate) {
            return Some(candidate);
        }
        candidate -= 2;
    }
    Some(2)
}
