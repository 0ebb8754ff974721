use std::collections::HashSet;
use log::debug;
use num_bigint::BigInt;
use num_traits::Zero;
use crate::crypto_error::CryptoError;
use crate::math::{mod_inv, to_canonical_residue};
use crate::shamir::shamir_share::SharedKeyShare;

// ----------------------------------------------------------------------------
// Reconstruction validée.
//
// Refuse d'interpoler si les parts ne viennent pas d'une même session (module
// ou seuil différents), si elles sont moins nombreuses que le seuil ou si deux
// positions se répètent.
// ----------------------------------------------------------------------------
pub fn reconstruct(shares: &[SharedKeyShare]) -> Result<BigInt, CryptoError> {
    let first = shares.first().ok_or(CryptoError::NotEnoughShares { required: 1, provided: 0 })?;

    if shares
        .iter()
        .any(|s| s.modulus != first.modulus || s.threshold != first.threshold)
    {
        return Err(CryptoError::ShareMismatch);
    }
    if shares.len() < first.threshold {
        return Err(CryptoError::NotEnoughShares {
            required: first.threshold,
            provided: shares.len(),
        });
    }

    let mut positions = HashSet::with_capacity(shares.len());
    if !shares.iter().all(|s| positions.insert(&s.position)) {
        return Err(CryptoError::DuplicateSharePosition);
    }

    let secret = interpolate(shares)?;
    debug!("secret reconstruit à partir de {} parts (seuil {})", shares.len(), first.threshold);
    Ok(secret)
}

// ----------------------------------------------------------------------------
// Interpolation de Lagrange en x = 0, sans contrôle du seuil :
//
//   secret = Σ_i y_i · Π_{j≠i} x_j · (x_j - x_i)^-1  mod p
//
// Avec moins de `threshold` parts le résultat n'a aucun rapport avec le
// secret. Seule l'unicité du module est vérifiée.
// ----------------------------------------------------------------------------
pub fn interpolate(shares: &[SharedKeyShare]) -> Result<BigInt, CryptoError> {
    let p = &shares
        .first()
        .ok_or(CryptoError::NotEnoughShares { required: 1, provided: 0 })?
        .modulus;
    if shares.iter().any(|s| &s.modulus != p) {
        return Err(CryptoError::ShareMismatch);
    }

    let mut secret = BigInt::zero();
    for (i, share_i) in shares.iter().enumerate() {
        let mut term = to_canonical_residue(&share_i.value, p)?;
        for (j, share_j) in shares.iter().enumerate() {
            if i == j {
                continue;
            }
            let inverse = mod_inv(&(&share_j.position - &share_i.position), p)?;
            term = (term * &share_j.position) % p;
            term = (term * inverse) % p;
        }
        secret = (secret + term) % p;
    }

    to_canonical_residue(&secret, p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primality::PrimeSearchConfig;
    use crate::shamir::shamir_share::generate_shares_with;

    fn session(secret: u64, threshold: usize, count: usize) -> Vec<SharedKeyShare> {
        generate_shares_with(&BigInt::from(secret), threshold, count, 64, &PrimeSearchConfig::sequential())
            .unwrap()
    }

    #[test]
    fn test_every_threshold_subset_reconstructs() {
        let shares = session(1234, 3, 5);
        for a in 0..5 {
            for b in (a + 1)..5 {
                for c in (b + 1)..5 {
                    let subset = [shares[a].clone(), shares[b].clone(), shares[c].clone()];
                    assert_eq!(reconstruct(&subset).unwrap(), BigInt::from(1234), "parts {a},{b},{c}");
                }
            }
        }
        assert_eq!(reconstruct(&shares).unwrap(), BigInt::from(1234));
    }

    #[test]
    fn test_order_of_shares_does_not_matter() {
        let mut shares = session(99, 4, 6);
        shares.reverse();
        assert_eq!(reconstruct(&shares[..4]).unwrap(), BigInt::from(99));
    }

    #[test]
    fn test_zero_secret() {
        let shares = session(0, 2, 3);
        assert_eq!(reconstruct(&shares[1..]).unwrap(), BigInt::from(0));
    }

    #[test]
    fn test_below_threshold_is_rejected_and_meaningless() {
        let shares = session(1234, 3, 5);
        assert_eq!(
            reconstruct(&shares[..2]),
            Err(CryptoError::NotEnoughShares { required: 3, provided: 2 })
        );
        // L'interpolation brute rend une autre valeur
        assert_ne!(interpolate(&shares[..2]).unwrap(), BigInt::from(1234));
    }

    #[test]
    fn test_mixed_sessions_rejected() {
        let a = session(1, 2, 3);
        let b = session(1, 2, 3);
        let mixed = [a[0].clone(), b[1].clone()];
        assert_eq!(reconstruct(&mixed), Err(CryptoError::ShareMismatch));

        let mut other_threshold = a[1].clone();
        other_threshold.threshold = 3;
        assert_eq!(reconstruct(&[a[0].clone(), other_threshold]), Err(CryptoError::ShareMismatch));
    }

    #[test]
    fn test_duplicate_positions_rejected() {
        let shares = session(5, 2, 3);
        let dup = [shares[0].clone(), shares[0].clone()];
        assert_eq!(reconstruct(&dup), Err(CryptoError::DuplicateSharePosition));
        assert_eq!(interpolate(&dup), Err(CryptoError::NoModularInverse));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(reconstruct(&[]), Err(CryptoError::NotEnoughShares { required: 1, provided: 0 }));
        assert_eq!(interpolate(&[]), Err(CryptoError::NotEnoughShares { required: 1, provided: 0 }));
    }
}
