use num_bigint::{BigInt, Sign};
use num_traits::Signed;
use rand_core::{CryptoRng, RngCore};
use crate::crypto_error::CryptoError;
use crate::math::bit_length;

// ===========================================================================
// Aléa sûr
//
// La source d'entropie est un collaborateur externe : toute fonction prend
// un `RngCore + CryptoRng` (OsRng en production, StdRng graine fixe en test).
// ===========================================================================

/// Retourne `byte_length` octets tirés de la source sûre
pub fn random_bytes(
    rng: &mut (impl RngCore + CryptoRng),
    byte_length: usize,
) -> Result<Vec<u8>, CryptoError> {
    if byte_length < 1 {
        return Err(CryptoError::InvalidLength);
    }
    let mut buf = vec![0u8; byte_length];
    rng.fill_bytes(&mut buf);
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Chaîne de `bit_length` bits aléatoires, big-endian.
//
// Les bits excédentaires de l'octet de tête sont masqués ; `force_top_bit`
// met le bit de poids fort à 1 (taille exacte garantie pour les candidats
// premiers).
// ---------------------------------------------------------------------------
pub fn random_bits(
    rng: &mut (impl RngCore + CryptoRng),
    bit_length: u64,
    force_top_bit: bool,
) -> Result<Vec<u8>, CryptoError> {
    if bit_length < 1 {
        return Err(CryptoError::InvalidLength);
    }

    let byte_length = usize::try_from((bit_length + 7) / 8)
        .map_err(|_| CryptoError::InvalidLength)?;
    let mut bytes = random_bytes(rng, byte_length)?;

    // excess ∈ [0, 7]
    let excess = (byte_length as u64 * 8 - bit_length) as u32;
    bytes[0] &= 0xFFu8 >> excess;
    if force_top_bit {
        bytes[0] |= 0x80u8 >> excess;
    }

    Ok(bytes)
}

// ---------------------------------------------------------------------------
// Entier uniforme dans [min, max] (bornes incluses).
//
// Échantillonnage par rejet sur random_bits(bit_length(max - min)) : aucun
// biais de modulo, nombre de tirages variable (moins de 2 en moyenne).
// Exige max > min >= 0.
// ---------------------------------------------------------------------------
pub fn random_in_range(
    rng: &mut (impl RngCore + CryptoRng),
    max: &BigInt,
    min: &BigInt,
) -> Result<BigInt, CryptoError> {
    if min.is_negative() || max <= min {
        return Err(CryptoError::InvalidRange);
    }

    let interval = max - min;
    let bits = bit_length(&interval);

    loop {
        let raw = random_bits(rng, bits, false)?;
        let candidate = BigInt::from_bytes_be(Sign::Plus, &raw);
        if candidate <= interval {
            return Ok(candidate + min);
        }
    }
}

/// Tirage dans [min, max) — utilitaire interne pour les intervalles semi-ouverts
pub(crate) fn random_below(
    rng: &mut (impl RngCore + CryptoRng),
    upper: &BigInt,
    min: &BigInt,
) -> Result<BigInt, CryptoError> {
    let max = upper - 1u32;
    if &max == min && !min.is_negative() {
        return Ok(max);
    }
    random_in_range(rng, &max, min)
}
