use num_bigint::BigInt;
use num_traits::{One, Signed};
use rand_core::OsRng;
use crate::crypto_error::CryptoError;
use crate::math::{gcd, mod_pow};
use crate::paillier::p_keygen::PaillierPublicKey;
use crate::random::random_below;

impl PaillierPublicKey {
    // ---------------------------------------------------------------------------
    // Chiffrement Paillier : c = g^m · r^n  mod n²
    //
    // r est tiré dans [1, n²) avec pgcd(r, n) = 1 : deux chiffrements du même
    // message diffèrent (sécurité sémantique).
    // Retourne Err(CryptoError::MessageOutOfRange) si m est hors de [0, n).
    // ---------------------------------------------------------------------------
    pub fn encrypt(&self, m: &BigInt) -> Result<BigInt, CryptoError> {
        if m.is_negative() || m >= self.n() {
            return Err(CryptoError::MessageOutOfRange);
        }

        let mut rng = OsRng;
        let one = BigInt::one();
        let r = loop {
            let candidate = random_below(&mut rng, self.n_squared(), &one)?;
            if gcd(&candidate, self.n()).is_one() {
                break candidate;
            }
        };

        let g_m = mod_pow(self.g(), m, self.n_squared())?;
        let r_n = mod_pow(&r, self.n(), self.n_squared())?;
        Ok((&g_m * &r_n) % self.n_squared())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primality::PrimeSearchConfig;
    use crate::paillier::p_keygen::PaillierPrivateKey;

    #[test]
    fn test_encryption_is_randomized() {
        let sk = PaillierPrivateKey::generate_with(64, &PrimeSearchConfig::sequential()).unwrap();
        let pk = sk.public_key();
        let m = BigInt::from(42);
        let c1 = pk.encrypt(&m).unwrap();
        let c2 = pk.encrypt(&m).unwrap();
        assert_ne!(c1, c2);
        assert!(c1 < *pk.n_squared() && c2 < *pk.n_squared());
    }

    #[test]
    fn test_encrypt_rejects_out_of_range() {
        let sk = PaillierPrivateKey::generate_with(32, &PrimeSearchConfig::sequential()).unwrap();
        let pk = sk.public_key();
        assert_eq!(pk.encrypt(pk.n()), Err(CryptoError::MessageOutOfRange));
        assert_eq!(pk.encrypt(&BigInt::from(-3)), Err(CryptoError::MessageOutOfRange));
    }
}
