use num_bigint::BigInt;
use num_traits::{One, Signed};
use crate::crypto_error::CryptoError;
use crate::math::mod_pow;
use crate::paillier::p_keygen::PaillierPublicKey;

impl PaillierPublicKey {
    fn check_ciphertext(&self, c: &BigInt) -> Result<(), CryptoError> {
        if c.is_negative() || c >= self.n_squared() {
            return Err(CryptoError::CiphertextOutOfRange);
        }
        Ok(())
    }

    /// Addition homomorphique : ∏ c_i mod n² se déchiffre en Σ m_i mod n.
    /// Une liste vide donne 1, chiffré trivial de 0.
    pub fn add(&self, ciphertexts: &[BigInt]) -> Result<BigInt, CryptoError> {
        ciphertexts.iter().try_fold(BigInt::one(), |acc, c| -> Result<BigInt, CryptoError> {
            self.check_ciphertext(c)?;
            Ok((acc * c) % self.n_squared())
        })
    }

    /// Multiplication par un scalaire : c^k mod n² se déchiffre en m·k mod n.
    /// k < 0 passe par l'inverse de c modulo n².
    pub fn multiply(&self, c: &BigInt, k: &BigInt) -> Result<BigInt, CryptoError> {
        self.check_ciphertext(c)?;
        mod_pow(c, k, self.n_squared())
    }
}
