use std::fmt;
use std::sync::Arc;
use log::debug;
use num_bigint::BigInt;
use num_traits::One;
use rand_core::OsRng;
use zeroize::Zeroize;
use crate::crypto_error::CryptoError;
use crate::math::{gcd, lcm, mod_inv, zeroize_bigint};
use crate::primality::{find_prime_with, PrimeSearchConfig, MIN_KEY_BITS};
use crate::random::random_below;

// ============================================================================
// Clé publique RSA — (e, n), immuable après génération
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaPublicKey {
    e: BigInt,
    n: BigInt,
}

impl RsaPublicKey {
    pub(crate) fn from_parts(e: BigInt, n: BigInt) -> Self {
        RsaPublicKey { e, n }
    }

    pub fn e(&self) -> &BigInt {
        &self.e
    }

    pub fn n(&self) -> &BigInt {
        &self.n
    }
}

// ============================================================================
// Clé privée RSA — ZEROISÉE À LA DESTRUCTION
//
// La clé publique est partagée (Arc), pas dupliquée.
// ============================================================================
#[derive(Clone)]
pub struct RsaPrivateKey {
    d:          BigInt,
    public_key: Arc<RsaPublicKey>,
}

impl Zeroize for RsaPrivateKey {
    fn zeroize(&mut self) {
        zeroize_bigint(&mut self.d);
    }
}

impl Drop for RsaPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("d", &"<redacted>")
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl RsaPrivateKey {
    pub(crate) fn from_parts(d: BigInt, public_key: Arc<RsaPublicKey>) -> Self {
        RsaPrivateKey { d, public_key }
    }

    pub fn d(&self) -> &BigInt {
        &self.d
    }

    pub fn public_key(&self) -> &Arc<RsaPublicKey> {
        &self.public_key
    }

    /// Génère une paire de clés avec deux premiers de `bits` bits (recherche par défaut)
    pub fn generate(bits: u64) -> Result<Self, CryptoError> {
        Self::generate_with(bits, &PrimeSearchConfig::default())
    }

    // ------------------------------------------------------------------------
    // Génération de clés RSA
    //
    //   n = p·q, phi(n) = (p-1)(q-1), m = ppcm(p-1, q-1)
    //   e tiré uniformément dans [1, m) jusqu'à pgcd(e, m) = 1
    //   d = e^-1 mod phi(n)
    //
    // e premier avec m l'est aussi avec phi(n) : mêmes facteurs premiers.
    // ------------------------------------------------------------------------
    pub fn generate_with(bits: u64, config: &PrimeSearchConfig) -> Result<Self, CryptoError> {
        if bits < MIN_KEY_BITS {
            return Err(CryptoError::KeySizeTooSmall {
                requested: bits,
                minimum:   MIN_KEY_BITS,
            });
        }

        let p = find_prime_with(bits, config)?;
        let mut q = find_prime_with(bits, config)?;
        while p == q {
            q = find_prime_with(bits, config)?;
        }

        let n = &p * &q;
        let p_minus_1 = &p - 1u32;
        let q_minus_1 = &q - 1u32;
        let phi_n = &p_minus_1 * &q_minus_1;
        let m = lcm(&p_minus_1, &q_minus_1);

        let mut rng = OsRng;
        let e = loop {
            let candidate = random_below(&mut rng, &m, &BigInt::one())?;
            if gcd(&candidate, &m).is_one() {
                break candidate;
            }
        };
        let d = mod_inv(&e, &phi_n)?;

        debug!("paire RSA générée : |n| = {} bits", n.bits());

        Ok(RsaPrivateKey {
            d,
            public_key: Arc::new(RsaPublicKey { e, n }),
        })
    }
}
