use num_bigint::BigInt;
use num_traits::Signed;
use crate::crypto_error::CryptoError;
use crate::math::mod_pow;
use crate::rsa::rsa_keygen::RsaPrivateKey;

// ---------------------------------------------------------------------------
// Opérations de la clé privée : déchiffrement et signature
// ---------------------------------------------------------------------------
impl RsaPrivateKey {
    /// m = c^d mod n
    pub fn decrypt(&self, c: &BigInt) -> Result<BigInt, CryptoError> {
        let n = self.public_key().n();
        if c.is_negative() || c >= n {
            return Err(CryptoError::CiphertextOutOfRange);
        }
        mod_pow(c, self.d(), n)
    }

    /// s = h^d mod n
    pub fn sign(&self, h: &BigInt) -> Result<BigInt, CryptoError> {
        let n = self.public_key().n();
        if h.is_negative() || h >= n {
            return Err(CryptoError::MessageOutOfRange);
        }
        mod_pow(h, self.d(), n)
    }
}
