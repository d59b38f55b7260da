//! Integer helpers: primality, factorisation and discriminants.

/// Compute `base^exp mod m` with 128-bit intermediates.
pub fn mod_pow(base: u64, mut exp: u64, m: u64) -> u64 {
    if m == 1 {
        return 0;
    }
    let m128 = m as u128;
    let mut result: u128 = 1;
    let mut b = (base as u128) % m128;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * b % m128;
        }
        b = b * b % m128;
        exp >>= 1;
    }
    result as u64
}

#[inline]
fn mod_mul(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128) * (b as u128) % (m as u128)) as u64
}

/// Check if `n` is a prime number.
///
/// Miller–Rabin with the first twelve primes as witnesses, which is
/// deterministic for every `u64`.
pub fn is_prime(n: u64) -> bool {
    const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

    if n < 2 {
        return false;
    }
    for &w in &WITNESSES {
        if n % w == 0 {
            return n == w;
        }
    }

    // Write n-1 as 2^r * d where d is odd
    let n_minus_1 = n - 1;
    let r = n_minus_1.trailing_zeros();
    let d = n_minus_1 >> r;

    'witness: for &a in &WITNESSES {
        let mut x = mod_pow(a, d, n);
        if x == 1 || x == n_minus_1 {
            continue 'witness;
        }
        for _ in 1..r {
            x = mod_mul(x, x, n);
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// The least prime strictly greater than `n`, if it fits in a `u64`.
pub fn next_prime(n: u64) -> Option<u64> {
    let mut candidate = n.checked_add(1)?;
    while !is_prime(candidate) {
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}

/// Greatest common divisor.
pub const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Pollard's rho with Brent's cycle detection. Returns a non-trivial factor
/// of the odd composite `n`.
fn pollard_rho(n: u64) -> u64 {
    let mut c = 1u64;
    loop {
        let f = |x: u64| (((x as u128) * (x as u128) + c as u128) % (n as u128)) as u64;
        let (mut x, mut y, mut d) = (2u64, 2u64, 1u64);
        while d == 1 {
            x = f(x);
            y = f(f(y));
            d = gcd(x.abs_diff(y), n);
        }
        if d != n {
            return d;
        }
        c += 1;
    }
}

/// Factor `n` into primes with multiplicities, sorted by prime.
///
/// Small factors are removed by trial division, the rest is split with
/// Pollard's rho.
pub fn factor(n: u64) -> Vec<(u64, u32)> {
    let mut primes = Vec::new();
    let mut rest = n;

    let mut d = 2u64;
    while d < 1000 && d * d <= rest {
        while rest % d == 0 {
            primes.push(d);
            rest /= d;
        }
        d += if d == 2 { 1 } else { 2 };
    }

    let mut stack = vec![rest];
    while let Some(m) = stack.pop() {
        if m == 1 {
            continue;
        }
        if is_prime(m) {
            primes.push(m);
            continue;
        }
        let f = pollard_rho(m);
        stack.push(f);
        stack.push(m / f);
    }

    primes.sort_unstable();
    let mut factors: Vec<(u64, u32)> = Vec::new();
    for q in primes {
        match factors.last_mut() {
            Some((last, exp)) if *last == q => *exp += 1,
            _ => factors.push((q, 1)),
        }
    }
    factors
}

/// Legendre symbol `(a / p)` for an odd prime `p`: `0`, `1` or `-1`.
pub fn legendre_symbol(a: i64, p: u64) -> i8 {
    let residue = a.rem_euclid(p as i64) as u64;
    if residue == 0 {
        return 0;
    }
    if mod_pow(residue, (p - 1) / 2, p) == 1 {
        1
    } else {
        -1
    }
}

/// Fundamental discriminant of the quadratic field `Q(sqrt(d))`.
///
/// Strips square factors from `d`; the square-free part `m` maps to `m`
/// when `m = 1 (mod 4)` and to `4m` otherwise. Returns `None` for `d = 0`.
pub fn fundamental_discriminant(d: i64) -> Option<i64> {
    if d == 0 {
        return None;
    }
    let sign = d.signum();
    let mut square_free: u64 = 1;
    for (q, e) in factor(d.unsigned_abs()) {
        if e % 2 == 1 {
            square_free *= q;
        }
    }
    let m = sign * square_free as i64;
    if m.rem_euclid(4) == 1 {
        Some(m)
    } else {
        Some(4 * m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_primes() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(4));
        assert!(is_prime(5));
        assert!(!is_prime(9));
        assert!(is_prime(431));
        assert!(is_prime(433));
        assert!(!is_prime(435));
    }

    #[test]
    fn large_primes_and_pseudoprimes() {
        assert!(is_prime(104729)); // 10000th prime
        assert!(is_prime((1u64 << 61) - 1)); // Mersenne
        assert!(!is_prime(3215031751)); // strong pseudoprime to bases 2, 3, 5, 7
        assert!(!is_prime(3825123056546413051)); // strong pseudoprime to bases up to 23
    }

    #[test]
    fn next_prime_basics() {
        assert_eq!(next_prime(0), Some(2));
        assert_eq!(next_prime(2), Some(3));
        assert_eq!(next_prime(430), Some(431));
        assert_eq!(next_prime(431), Some(433));
        assert_eq!(next_prime(1 << 20), Some(1048583));
        assert_eq!(next_prime(u64::MAX - 1), None);
    }

    #[test]
    fn factor_composites() {
        assert_eq!(factor(1), Vec::<(u64, u32)>::new());
        assert_eq!(factor(432), vec![(2, 4), (3, 3)]);
        assert_eq!(factor(434), vec![(2, 1), (7, 1), (31, 1)]);
        let n = 1_000_003u64 * 998_244_353;
        assert_eq!(factor(n), vec![(1_000_003, 1), (998_244_353, 1)]);
    }

    #[test]
    fn factor_reconstructs() {
        for n in [2u64, 97, 360, 65536, 999_999_937 * 3, (1 << 40) + 1] {
            let product: u64 = factor(n).iter().map(|&(q, e)| q.pow(e)).product();
            assert_eq!(product, n);
        }
    }

    #[test]
    fn fundamental_discriminants() {
        assert_eq!(fundamental_discriminant(-3), Some(-3));
        assert_eq!(fundamental_discriminant(-23), Some(-23));
        assert_eq!(fundamental_discriminant(-12), Some(-3));
        assert_eq!(fundamental_discriminant(-1), Some(-4));
        assert_eq!(fundamental_discriminant(-20), Some(-20));
        assert_eq!(fundamental_discriminant(5), Some(5));
        assert_eq!(fundamental_discriminant(0), None);
    }

    #[test]
    fn legendre_symbols() {
        assert_eq!(legendre_symbol(-1, 431), -1);
        assert_eq!(legendre_symbol(-1, 433), 1);
        assert_eq!(legendre_symbol(-3, 433), 1);
        assert_eq!(legendre_symbol(-7, 433), -1);
        assert_eq!(legendre_symbol(-23, 709), -1);
        assert_eq!(legendre_symbol(433, 433), 0);
        assert_eq!(legendre_symbol(2, 7), 1);
    }

    #[test]
    fn gcd_basics() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(17, 5), 1);
        assert_eq!(gcd(0, 7), 7);
    }
}
