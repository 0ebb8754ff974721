use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use crate::crypto_error::CryptoError;

// ===========================================================================
// Arithmétique modulaire sur entiers signés de précision arbitraire
//
// BigInt est le type canonique à toutes les frontières de l'API : les
// opérandes négatifs et les exposants négatifs sont acceptés ici, les
// résultats modulaires sont toujours ramenés dans [0, n).
// ===========================================================================

/// Valeur absolue, indépendante du signe
pub fn abs(a: &BigInt) -> BigInt {
    a.abs()
}

/// Nombre de bits de |a| ; bit_length(1) = 1, bit_length(0) = 0
pub fn bit_length(a: &BigInt) -> u64 {
    a.bits()
}

// ---------------------------------------------------------------------------
// Euclide étendu itératif : retourne (g, x, y) avec a·x + b·y = g = pgcd(a, b)
//
// Exige a > 0 et b > 0.
// ---------------------------------------------------------------------------
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> Result<(BigInt, BigInt, BigInt), CryptoError> {
    if !a.is_positive() || !b.is_positive() {
        return Err(CryptoError::NonPositiveOperand);
    }

    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let temp_r = r.clone();
        r = old_r - &quotient * &r;
        old_r = temp_r;

        let temp_s = s.clone();
        s = old_s - &quotient * &s;
        old_s = temp_s;

        let temp_t = t.clone();
        t = old_t - &quotient * &t;
        old_t = temp_t;
    }

    Ok((old_r, old_s, old_t))
}

// ---------------------------------------------------------------------------
// PGCD binaire (Stein) sur les magnitudes : gcd(0, b) = |b|, gcd(a, 0) = |a|
// ---------------------------------------------------------------------------
pub fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
    let mut u = a.magnitude().clone();
    let mut v = b.magnitude().clone();

    if u.is_zero() {
        return BigInt::from(v);
    }
    if v.is_zero() {
        return BigInt::from(u);
    }

    // 2^shift divise les deux opérandes
    let shift = (&u | &v).trailing_zeros().unwrap_or(0);
    let tz = u.trailing_zeros().unwrap_or(0);
    u >>= tz;

    loop {
        let tz = v.trailing_zeros().unwrap_or(0);
        v >>= tz;
        if u > v {
            std::mem::swap(&mut u, &mut v);
        }
        v -= &u;
        if v.is_zero() {
            break;
        }
    }

    BigInt::from(u << shift)
}

/// ppcm(a, b) = |a·b| / pgcd(a, b) ; ppcm(0, 0) = 0
pub fn lcm(a: &BigInt, b: &BigInt) -> BigInt {
    if a.is_zero() && b.is_zero() {
        return BigInt::zero();
    }
    (a * b).abs() / gcd(a, b)
}

/// Ramène a dans [0, n). Exige n > 0.
pub fn to_canonical_residue(a: &BigInt, n: &BigInt) -> Result<BigInt, CryptoError> {
    if !n.is_positive() {
        return Err(CryptoError::NonPositiveModulus);
    }
    Ok(a.mod_floor(n))
}

// ---------------------------------------------------------------------------
// Inverse modulaire de a mod n.
// Retourne Err(CryptoError::NoModularInverse) si gcd(a, n) != 1.
// ---------------------------------------------------------------------------
pub fn mod_inv(a: &BigInt, n: &BigInt) -> Result<BigInt, CryptoError> {
    let residue = to_canonical_residue(a, n)?;
    if residue.is_zero() {
        return Err(CryptoError::NoModularInverse);
    }

    let (g, x, _) = extended_gcd(&residue, n)?;
    if !g.is_one() {
        return Err(CryptoError::NoModularInverse);
    }

    to_canonical_residue(&x, n)
}

// ---------------------------------------------------------------------------
// Exponentiation modulaire b^e mod n.
//
// n = 1 renvoie 0 ; un exposant négatif renvoie l'inverse de b^|e| mod n.
// Le cas e >= 0 délègue au square-and-multiply de num-bigint (Montgomery
// pour les modules impairs) : c'est le point chaud des trois protocoles.
// ---------------------------------------------------------------------------
pub fn mod_pow(b: &BigInt, e: &BigInt, n: &BigInt) -> Result<BigInt, CryptoError> {
    if !n.is_positive() {
        return Err(CryptoError::NonPositiveModulus);
    }
    if n.is_one() {
        return Ok(BigInt::zero());
    }

    if e.is_negative() {
        let positive = mod_pow(b, &e.abs(), n)?;
        return mod_inv(&positive, n);
    }

    let base = to_canonical_residue(b, n)?;
    Ok(base.modpow(e, n))
}
