use num_bigint::BigInt;
use num_traits::Signed;
use crate::crypto_error::CryptoError;
use crate::math::mod_pow;
use crate::paillier::p_keygen::{l_function, PaillierPrivateKey};

impl PaillierPrivateKey {
    // m = L(c^lambda mod n², n) · mu  mod n
    pub fn decrypt(&self, c: &BigInt) -> Result<BigInt, CryptoError> {
        let pk = self.public_key();
        if c.is_negative() || c >= pk.n_squared() {
            return Err(CryptoError::CiphertextOutOfRange);
        }

        // Calcule c^lambda mod n^2
        let c_lambda = mod_pow(c, self.lambda(), pk.n_squared())?;

        // Calcule m = L(c^lambda mod n^2) * mu (mod n)
        let l_c_lambda = l_function(&c_lambda, pk.n());
        Ok((&l_c_lambda * self.mu()) % pk.n())
    }
}
