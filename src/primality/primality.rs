use std::sync::atomic::{AtomicBool, Ordering};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::{CryptoRng, RngCore};
use crate::crypto_error::CryptoError;
use crate::math::mod_pow;
use crate::random::random_in_range;

// Nombre de tours Miller-Rabin par défaut : faux positif <= 4^-16
pub const DEFAULT_MR_ITERATIONS: u32 = 16;

// ---------------------------------------------------------------------------
// Table des 250 premiers nombres premiers (crible préliminaire, 2 à 1583)
// ---------------------------------------------------------------------------
pub const SMALL_PRIMES: [u32; 250] = [
       2,    3,    5,    7,   11,   13,   17,   19,   23,   29,
      31,   37,   41,   43,   47,   53,   59,   61,   67,   71,
      73,   79,   83,   89,   97,  101,  103,  107,  109,  113,
     127,  131,  137,  139,  149,  151,  157,  163,  167,  173,
     179,  181,  191,  193,  197,  199,  211,  223,  227,  229,
     233,  239,  241,  251,  257,  263,  269,  271,  277,  281,
     283,  293,  307,  311,  313,  317,  331,  337,  347,  349,
     353,  359,  367,  373,  379,  383,  389,  397,  401,  409,
     419,  421,  431,  433,  439,  443,  449,  457,  461,  463,
     467,  479,  487,  491,  499,  503,  509,  521,  523,  541,
     547,  557,  563,  569,  571,  577,  587,  593,  599,  601,
     607,  613,  617,  619,  631,  641,  643,  647,  653,  659,
     661,  673,  677,  683,  691,  701,  709,  719,  727,  733,
     739,  743,  751,  757,  761,  769,  773,  787,  797,  809,
     811,  821,  823,  827,  829,  839,  853,  857,  859,  863,
     877,  881,  883,  887,  907,  911,  919,  929,  937,  941,
     947,  953,  967,  971,  977,  983,  991,  997, 1009, 1013,
    1019, 1021, 1031, 1033, 1039, 1049, 1051, 1061, 1063, 1069,
    1087, 1091, 1093, 1097, 1103, 1109, 1117, 1123, 1129, 1151,
    1153, 1163, 1171, 1181, 1187, 1193, 1201, 1213, 1217, 1223,
    1229, 1231, 1237, 1249, 1259, 1277, 1279, 1283, 1289, 1291,
    1297, 1301, 1303, 1307, 1319, 1321, 1327, 1361, 1367, 1373,
    1381, 1399, 1409, 1423, 1427, 1429, 1433, 1439, 1447, 1451,
    1453, 1459, 1471, 1481, 1483, 1487, 1489, 1493, 1499, 1511,
    1523, 1531, 1543, 1549, 1553, 1559, 1567, 1571, 1579, 1583,
];

// ---------------------------------------------------------------------------
// Issue d'un test : Filtrage -> MillerRabin -> Probable / Composé.
// `Cancelled` n'apparaît que dans la recherche parallèle.
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Probable,
    Composite,
    Cancelled,
}

// Filtrage déterministe : Some(verdict) si la division d'essai conclut,
// None si le candidat doit passer Miller-Rabin.
fn trial_division(w: &BigInt) -> Option<Verdict> {
    if w <= &BigInt::one() {
        return Some(Verdict::Composite);
    }
    if w == &BigInt::from(2u32) {
        return Some(Verdict::Probable);
    }
    if w.is_even() {
        return Some(Verdict::Composite);
    }

    for &p in SMALL_PRIMES.iter() {
        if w == &BigInt::from(p) {
            return Some(Verdict::Probable);
        }
        if (w % p).is_zero() {
            return Some(Verdict::Composite);
        }
    }
    None
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.map_or(false, |flag| flag.load(Ordering::Acquire))
}

// ---------------------------------------------------------------------------
// Miller-Rabin : w - 1 = 2^a · m, m impair.
//
// Chaque tour tire b dans [2, w-2]. Le drapeau d'annulation est consulté
// entre deux tours : un worker abandonné s'arrête sans finir son test.
// ---------------------------------------------------------------------------
fn miller_rabin(
    w: &BigInt,
    iterations: u32,
    rng: &mut (impl RngCore + CryptoRng),
    cancel: Option<&AtomicBool>,
) -> Result<Verdict, CryptoError> {
    let w_minus_1 = w - 1u32;
    let a = w_minus_1.trailing_zeros().unwrap_or(0);
    let m = &w_minus_1 >> a;

    let two = BigInt::from(2u32);
    let upper = w - 2u32;

    'witness: for _ in 0..iterations {
        if is_cancelled(cancel) {
            return Ok(Verdict::Cancelled);
        }

        let b = random_in_range(rng, &upper, &two)?;
        let mut z = mod_pow(&b, &m, w)?;
        if z.is_one() || z == w_minus_1 {
            continue 'witness;
        }

        for _ in 1..a {
            z = (&z * &z) % w;
            if z == w_minus_1 {
                continue 'witness;
            }
            if z.is_one() {
                return Ok(Verdict::Composite);
            }
        }
        return Ok(Verdict::Composite);
    }

    Ok(Verdict::Probable)
}

/// Filtrage puis Miller-Rabin ; utilisé par les deux variantes de recherche
pub(crate) fn test_candidate(
    w: &BigInt,
    iterations: u32,
    rng: &mut (impl RngCore + CryptoRng),
    cancel: Option<&AtomicBool>,
) -> Result<Verdict, CryptoError> {
    match trial_division(w) {
        Some(verdict) => Ok(verdict),
        None => miller_rabin(w, iterations, rng, cancel),
    }
}

/// Test de primalité probabiliste : pas de faux négatif, faux positif <= 4^-iterations.
///
/// Retourne `Err(CryptoError::InvalidIterations)` si `iterations == 0`.
pub fn is_probably_prime(
    w: &BigInt,
    iterations: u32,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<bool, CryptoError> {
    if iterations == 0 {
        return Err(CryptoError::InvalidIterations);
    }
    Ok(test_candidate(w, iterations, rng, None)? == Verdict::Probable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(97)
    }

    #[test]
    fn test_small_prime_table() {
        assert_eq!(SMALL_PRIMES[0], 2);
        assert_eq!(SMALL_PRIMES[249], 1583);
        assert!(SMALL_PRIMES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_known_composites_rejected_for_every_round_count() {
        let mut rng = seeded();
        for iterations in 1..=8 {
            for c in [0u64, 1, 4, 15, 21, 100, 561, 1585] {
                assert!(
                    !is_probably_prime(&BigInt::from(c), iterations, &mut rng).unwrap(),
                    "{c} ne doit pas être déclaré premier"
                );
            }
        }
    }

    #[test]
    fn test_known_primes_accepted_for_every_round_count() {
        let mut rng = seeded();
        for iterations in 1..=8 {
            for p in [2u64, 3, 7, 11, 97, 1583, 1597, 7919, 2_305_843_009_213_693_951] {
                assert!(
                    is_probably_prime(&BigInt::from(p), iterations, &mut rng).unwrap(),
                    "{p} doit être déclaré premier"
                );
            }
        }
    }

    #[test]
    fn test_miller_rabin_catches_semiprime_beyond_table() {
        // 1601 · 1607 : aucun facteur dans la table, seul Miller-Rabin conclut
        let mut rng = seeded();
        let w = BigInt::from(1601u64 * 1607);
        assert_eq!(trial_division(&w), None);
        assert!(!is_probably_prime(&w, DEFAULT_MR_ITERATIONS, &mut rng).unwrap());

        // (2^61 - 1)(2^31 - 1)
        let w = BigInt::from(2_305_843_009_213_693_951u64) * BigInt::from(2_147_483_647u64);
        assert!(!is_probably_prime(&w, DEFAULT_MR_ITERATIONS, &mut rng).unwrap());
    }

    #[test]
    fn test_negative_candidates_are_composite() {
        let mut rng = seeded();
        assert!(!is_probably_prime(&BigInt::from(-7), 4, &mut rng).unwrap());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let mut rng = seeded();
        assert_eq!(
            is_probably_prime(&BigInt::from(97), 0, &mut rng),
            Err(CryptoError::InvalidIterations)
        );
    }

    #[test]
    fn test_cancelled_flag_interrupts_miller_rabin() {
        let mut rng = seeded();
        let cancel = AtomicBool::new(true);
        let w = BigInt::from(2_305_843_009_213_693_951u64);
        assert_eq!(
            test_candidate(&w, DEFAULT_MR_ITERATIONS, &mut rng, Some(&cancel)).unwrap(),
            Verdict::Cancelled
        );
        // La division d'essai reste prioritaire
        assert_eq!(
            test_candidate(&BigInt::from(15), 1, &mut rng, Some(&cancel)).unwrap(),
            Verdict::Composite
        );
    }
}
