use log::debug;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use rand_core::OsRng;
use crate::crypto_error::CryptoError;
use crate::math::{bit_length, mod_pow};
use crate::primality::{find_prime_with, PrimeSearchConfig};
use crate::random::random_below;

// Tirages de premier tolérés avant de conclure qu'aucun ne dépasse le secret
pub const MAX_PRIME_REDRAWS: usize = 64;

// ============================================================================
// Part de secret : une évaluation f(position) d'un polynôme aléatoire de
// degré threshold-1 sur Z_modulus dont le terme constant est le secret.
// Les parts d'une même session sont indépendantes les unes des autres.
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharedKeyShare {
    pub value:     BigInt,
    pub position:  BigInt,
    pub threshold: usize,
    pub modulus:   BigInt,
}

/// Découpe `secret` en `count` parts dont `threshold` suffisent à le reconstruire
pub fn generate_shares(
    secret: &BigInt,
    threshold: usize,
    count: usize,
    prime_bits: u64,
) -> Result<Vec<SharedKeyShare>, CryptoError> {
    generate_shares_with(secret, threshold, count, prime_bits, &PrimeSearchConfig::default())
}

// ----------------------------------------------------------------------------
// Génération des parts
//
//   p premier de prime_bits bits, p > secret (retiré sinon)
//   f(x) = secret + a_1·x + … + a_{t-1}·x^{t-1} mod p, a_i uniformes dans [0, p)
//   part i = (f(i), i) pour i = 1 … count
//
// Le secret peut occuper les prime_bits bits ; au-delà de 2^prime_bits - 2
// aucun premier de prime_bits bits ne le dépasse. Près de cette borne les
// premiers convenables se raréfient : après MAX_PRIME_REDRAWS tirages on
// abandonne. bit_length(count) < prime_bits garantit des positions
// distinctes et non nulles modulo p.
// ----------------------------------------------------------------------------
pub fn generate_shares_with(
    secret: &BigInt,
    threshold: usize,
    count: usize,
    prime_bits: u64,
    config: &PrimeSearchConfig,
) -> Result<Vec<SharedKeyShare>, CryptoError> {
    if threshold < 1 || threshold > count {
        return Err(CryptoError::InvalidThreshold { threshold, count });
    }
    if secret.is_negative() || bit_length(secret) > prime_bits {
        return Err(CryptoError::SecretOutOfRange);
    }
    let largest_odd = (BigInt::one() << prime_bits) - 1u32;
    if secret >= &largest_odd {
        return Err(CryptoError::SecretOutOfRange);
    }
    if bit_length(&BigInt::from(count)) >= prime_bits {
        return Err(CryptoError::TooManyShares { count, prime_bits });
    }

    let mut modulus = None;
    for draw in 1..=MAX_PRIME_REDRAWS {
        let p = find_prime_with(prime_bits, config)?;
        if &p > secret {
            modulus = Some(p);
            break;
        }
        debug!("premier {draw}/{MAX_PRIME_REDRAWS} inférieur au secret, nouveau tirage");
    }
    let modulus = modulus.ok_or(CryptoError::SecretOutOfRange)?;

    let mut rng = OsRng;
    let zero = BigInt::zero();
    let mut coefficients = Vec::with_capacity(threshold);
    coefficients.push(secret.clone());
    for _ in 1..threshold {
        coefficients.push(random_below(&mut rng, &modulus, &zero)?);
    }

    let shares = (1..=count)
        .map(|x| {
            let position = BigInt::from(x);
            let value = evaluate(&coefficients, &position, &modulus)?;
            Ok(SharedKeyShare { value, position, threshold, modulus: modulus.clone() })
        })
        .collect::<Result<Vec<_>, CryptoError>>()?;

    debug!(
        "{count} parts générées (seuil {threshold}, module de {} bits)",
        modulus.bits()
    );
    Ok(shares)
}

// f(x) = Σ a_i · x^i mod p
fn evaluate(coefficients: &[BigInt], x: &BigInt, modulus: &BigInt) -> Result<BigInt, CryptoError> {
    coefficients
        .iter()
        .enumerate()
        .try_fold(BigInt::zero(), |acc, (i, a)| -> Result<BigInt, CryptoError> {
            let x_i = mod_pow(x, &BigInt::from(i), modulus)?;
            Ok((acc + a * x_i) % modulus)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primality::is_probably_prime;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_evaluate_polynomial() {
        // f(x) = 5 + 3x + 2x² mod 11 ; f(4) = 5 + 12 + 32 = 49 ≡ 5
        let coefficients = [BigInt::from(5), BigInt::from(3), BigInt::from(2)];
        let v = evaluate(&coefficients, &BigInt::from(4), &BigInt::from(11)).unwrap();
        assert_eq!(v, BigInt::from(5));
    }

    #[test]
    fn test_share_fields() {
        let secret = BigInt::from(1234);
        let shares = generate_shares_with(&secret, 3, 5, 64, &PrimeSearchConfig::sequential()).unwrap();
        assert_eq!(shares.len(), 5);

        let modulus = &shares[0].modulus;
        assert_eq!(modulus.bits(), 64);
        assert!(modulus > &secret);
        let mut rng = StdRng::seed_from_u64(11);
        assert!(is_probably_prime(modulus, 16, &mut rng).unwrap());

        for (i, share) in shares.iter().enumerate() {
            assert_eq!(share.position, BigInt::from(i + 1));
            assert_eq!(share.threshold, 3);
            assert_eq!(&share.modulus, modulus);
            assert!(share.value >= BigInt::zero() && &share.value < modulus);
        }
    }

    #[test]
    fn test_threshold_one_shares_are_the_secret() {
        let secret = BigInt::from(77);
        let shares = generate_shares_with(&secret, 1, 4, 32, &PrimeSearchConfig::sequential()).unwrap();
        assert!(shares.iter().all(|s| s.value == secret));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let secret = BigInt::from(10);
        assert_eq!(
            generate_shares(&secret, 0, 3, 32),
            Err(CryptoError::InvalidThreshold { threshold: 0, count: 3 })
        );
        assert_eq!(
            generate_shares(&secret, 4, 3, 32),
            Err(CryptoError::InvalidThreshold { threshold: 4, count: 3 })
        );
        assert_eq!(generate_shares(&BigInt::from(-1), 2, 3, 32), Err(CryptoError::SecretOutOfRange));
        // 2^40 n'a pas sa place sous un premier de 32 bits
        assert_eq!(
            generate_shares(&(BigInt::from(1) << 40u32), 2, 3, 32),
            Err(CryptoError::SecretOutOfRange)
        );
        assert_eq!(
            generate_shares(&BigInt::from(1), 2, 20, 4),
            Err(CryptoError::TooManyShares { count: 20, prime_bits: 4 })
        );
    }

    #[test]
    fn test_secret_as_wide_as_the_prime() {
        // 2^63 + 5 : 64 bits, comme le module ; le tirage doit le dépasser
        let secret = (BigInt::one() << 63u32) + 5u32;
        let shares = generate_shares_with(&secret, 2, 3, 64, &PrimeSearchConfig::sequential()).unwrap();
        let modulus = &shares[0].modulus;
        assert_eq!(modulus.bits(), 64);
        assert!(modulus > &secret);
        assert_eq!(crate::shamir::reconstruct(&shares[1..]).unwrap(), secret);
        assert_eq!(crate::shamir::reconstruct(&shares).unwrap(), secret);
    }

    #[test]
    fn test_secret_above_every_prime_of_that_width_rejected() {
        // 2^8 - 1 = 255 : aucun premier de 8 bits n'est plus grand
        assert_eq!(generate_shares(&BigInt::from(255), 2, 3, 8), Err(CryptoError::SecretOutOfRange));
        assert_eq!(generate_shares(&BigInt::from(256), 2, 3, 8), Err(CryptoError::SecretOutOfRange));
    }

    #[test]
    fn test_secret_near_the_top_gives_up_after_redraws() {
        // 252 : 253 = 11·23, 254 et 255 composés ; 251 est le plus grand premier de 8 bits
        assert_eq!(
            generate_shares_with(&BigInt::from(252), 2, 3, 8, &PrimeSearchConfig::sequential()),
            Err(CryptoError::SecretOutOfRange)
        );
        // 200 : 8 des 23 premiers de 8 bits conviennent (211 … 251)
        let shares = generate_shares_with(&BigInt::from(200), 2, 3, 8, &PrimeSearchConfig::sequential()).unwrap();
        assert!(shares[0].modulus > BigInt::from(200));
        assert_eq!(crate::shamir::reconstruct(&shares).unwrap(), BigInt::from(200));
    }
}
