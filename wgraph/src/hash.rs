//! String hashing and prime capacity selection shared by every table.

/// Position-weighted byte sum: `sum (i + 1) * key[i]`, with each byte read as a
/// signed char, so bytes above 0x7f contribute negatively.
/// Not cryptographic and clusters easily; bucket placement depends on it exactly.
pub fn hash_key(key: &str) -> u32 {
    key.bytes().enumerate().fold(0u32, |h, (i, b)| {
        let c = b as i8 as u32;
        h.wrapping_add((i as u32).wrapping_add(1).wrapping_mul(c))
    })
}

pub fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n < 2 || n % 2 == 0 {
        return false;
    }
    let mut f = 3usize;
    while f <= n / f {
        if n % f == 0 {
            return false;
        }
        f += 2;
    }
    true
}

/// Smallest prime >= `n`, searched over odd candidates (an even `n` starts at `n + 1`).
/// `None` when the search would run past `usize::MAX`.
pub fn next_prime(n: usize) -> Option<usize> {
    let mut c = if n % 2 == 0 { n.checked_add(1)? } else { n };
    while !is_prime(c) {
        c = c.checked_add(2)?;
    }
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_weighted_sum() {
        assert_eq!(hash_key(""), 0);
        assert_eq!(hash_key("A"), 65);
        assert_eq!(hash_key("ab"), 97 + 2 * 98);
        assert_eq!(hash_key("ba"), 98 + 2 * 97);
        assert_eq!(hash_key("abc"), 97 + 2 * 98 + 3 * 99);
    }

    #[test]
    fn high_bytes_count_as_signed() {
        // 'ü' is 0xC3 0xBC, i.e. -61 and -68 as signed chars
        assert_eq!(hash_key("Zürich"), 90 + 4 * 114 + 5 * 105 + 6 * 99 + 7 * 104 - 2 * 61 - 3 * 68);
        assert_eq!(hash_key("Zürich"), 2067);
        assert_eq!(hash_key("\u{e9}"), (-61i32 as u32).wrapping_add(2u32.wrapping_mul(-87i32 as u32)));
    }

    #[test]
    fn primes() {
        let small: Vec<usize> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(small, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert!(is_prime(7919));
        assert!(!is_prime(7917));
        assert!(!is_prime(25));
        assert!(!is_prime(49));
    }

    #[test]
    fn next_prime_rounds_up() {
        assert_eq!(next_prime(0), Some(3));
        assert_eq!(next_prime(2), Some(3));
        assert_eq!(next_prime(5), Some(5));
        assert_eq!(next_prime(10), Some(11));
        assert_eq!(next_prime(14), Some(17));
        assert_eq!(next_prime(24), Some(29));
        assert_eq!(next_prime(23), Some(23));
    }

    #[test]
    fn next_prime_stops_at_usize_max() {
        assert_eq!(next_prime(usize::MAX), None);
        assert_eq!(next_prime(usize::MAX - 1), None);
        assert!(!is_prime(usize::MAX));
    }
}
