use std::fmt;
use std::sync::Arc;
use log::debug;
use num_bigint::BigInt;
use num_traits::One;
use rand_core::OsRng;
use zeroize::Zeroize;
use crate::crypto_error::CryptoError;
use crate::math::{gcd, lcm, mod_inv, mod_pow, zeroize_bigint};
use crate::primality::{find_prime_with, PrimeSearchConfig, MIN_KEY_BITS};
use crate::random::random_below;

// Fonction L(u) = (u-1)/n  (division entière)
pub fn l_function(u: &BigInt, n: &BigInt) -> BigInt {
    (u - BigInt::one()) / n
}

// ============================================================================
// Clé publique Paillier — pas de données secrètes, pas de zeroize nécessaire
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaillierPublicKey {
    n:         BigInt,
    n_squared: BigInt,
    g:         BigInt,
}

impl PaillierPublicKey {
    pub(crate) fn from_parts(n: BigInt, n_squared: BigInt, g: BigInt) -> Self {
        PaillierPublicKey { n, n_squared, g }
    }

    pub fn n(&self) -> &BigInt {
        &self.n
    }

    pub fn n_squared(&self) -> &BigInt {
        &self.n_squared
    }

    pub fn g(&self) -> &BigInt {
        &self.g
    }
}

// ============================================================================
// Clé secrète Paillier — ZEROISÉE À LA DESTRUCTION
// ============================================================================
#[derive(Clone)]
pub struct PaillierPrivateKey {
    lambda:     BigInt,
    mu:         BigInt,
    public_key: Arc<PaillierPublicKey>,
}

impl Zeroize for PaillierPrivateKey {
    fn zeroize(&mut self) {
        zeroize_bigint(&mut self.lambda);
        zeroize_bigint(&mut self.mu);
    }
}

impl Drop for PaillierPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for PaillierPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaillierPrivateKey")
            .field("lambda", &"<redacted>")
            .field("mu", &"<redacted>")
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl PaillierPrivateKey {
    pub(crate) fn from_parts(lambda: BigInt, mu: BigInt, public_key: Arc<PaillierPublicKey>) -> Self {
        PaillierPrivateKey { lambda, mu, public_key }
    }

    pub fn lambda(&self) -> &BigInt {
        &self.lambda
    }

    pub fn mu(&self) -> &BigInt {
        &self.mu
    }

    pub fn public_key(&self) -> &Arc<PaillierPublicKey> {
        &self.public_key
    }

    /// Génère une paire de clés dont le module n fait environ `bits` bits
    pub fn generate(bits: u64) -> Result<Self, CryptoError> {
        Self::generate_with(bits, &PrimeSearchConfig::default())
    }

    // ========================================================================
    // Génération de clés Paillier
    //
    //   q premier de bits/2 + 1 bits, p premier de bits/2 bits
    //   n = p·q, n² ; lambda = ppcm(p-1, q-1)
    //   g tiré dans [1, n²), mu = L(g^lambda mod n², n)^-1 mod n
    //
    // (p, q) est retiré si pgcd(n, (p-1)(q-1)) != 1 (possible pour de petites
    // tailles), g est retiré s'il n'est pas inversible mod n ou si
    // L(g^lambda) n'est pas inversible mod n.
    // ========================================================================
    pub fn generate_with(bits: u64, config: &PrimeSearchConfig) -> Result<Self, CryptoError> {
        if bits < MIN_KEY_BITS {
            return Err(CryptoError::KeySizeTooSmall {
                requested: bits,
                minimum:   MIN_KEY_BITS,
            });
        }

        let half = bits / 2;
        let (p, q) = loop {
            let q = find_prime_with(half + 1, config)?;
            let p = find_prime_with(half, config)?;
            let phi_n = (&p - 1u32) * (&q - 1u32);
            if gcd(&(&p * &q), &phi_n).is_one() {
                break (p, q);
            }
            debug!("pgcd(n, phi(n)) != 1 — nouveau tirage de p et q");
        };

        let n = &p * &q;
        let n_squared = &n * &n;
        let lambda = lcm(&(&p - 1u32), &(&q - 1u32));

        let mut rng = OsRng;
        let one = BigInt::one();
        let (g, mu) = loop {
            let g = random_below(&mut rng, &n_squared, &one)?;
            if !gcd(&g, &n).is_one() {
                continue;
            }
            let g_lambda = mod_pow(&g, &lambda, &n_squared)?;
            match mod_inv(&l_function(&g_lambda, &n), &n) {
                Ok(mu) => break (g, mu),
                Err(CryptoError::NoModularInverse) => continue,
                Err(e) => return Err(e),
            }
        };

        debug!("paire Paillier générée : |n| = {} bits", n.bits());

        Ok(PaillierPrivateKey {
            lambda,
            mu,
            public_key: Arc::new(PaillierPublicKey { n, n_squared, g }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l_function() {
        assert_eq!(l_function(&BigInt::from(36), &BigInt::from(5)), BigInt::from(7));
        assert_eq!(l_function(&BigInt::from(1), &BigInt::from(5)), BigInt::from(0));
    }

    #[test]
    fn test_keygen_invariants() {
        let sk = PaillierPrivateKey::generate_with(64, &PrimeSearchConfig::sequential()).unwrap();
        let pk = sk.public_key();

        assert_eq!(pk.n_squared(), &(pk.n() * pk.n()));
        assert!(pk.g() >= &BigInt::one() && pk.g() < pk.n_squared());
        assert!(pk.n().bits() >= 64 && pk.n().bits() <= 66);

        // mu · L(g^lambda mod n²) ≡ 1 (mod n)
        let g_lambda = mod_pow(pk.g(), sk.lambda(), pk.n_squared()).unwrap();
        let product = (l_function(&g_lambda, pk.n()) * sk.mu()) % pk.n();
        assert!(product.is_one());
    }

    #[test]
    fn test_keygen_rejects_tiny_keys() {
        assert_eq!(
            PaillierPrivateKey::generate(10).err(),
            Some(CryptoError::KeySizeTooSmall { requested: 10, minimum: MIN_KEY_BITS })
        );
    }

    #[test]
    fn test_minimum_size_keys_are_usable() {
        // Petites tailles : les retirages (p, q) et g doivent tous aboutir
        for _ in 0..10 {
            let sk = PaillierPrivateKey::generate_with(MIN_KEY_BITS, &PrimeSearchConfig::sequential()).unwrap();
            let pk = sk.public_key();
            assert!(gcd(pk.n(), pk.g()).is_one());
        }
    }

    #[test]
    fn test_zeroize_and_redacted_debug() {
        let mut sk = PaillierPrivateKey::generate_with(32, &PrimeSearchConfig::sequential()).unwrap();
        assert!(format!("{sk:?}").contains("<redacted>"));
        sk.zeroize();
        assert_eq!(sk.lambda(), &BigInt::default());
        assert_eq!(sk.mu(), &BigInt::default());
    }
}
