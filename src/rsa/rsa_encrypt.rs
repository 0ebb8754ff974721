use num_bigint::BigInt;
use num_traits::Signed;
use crate::crypto_error::CryptoError;
use crate::math::mod_pow;
use crate::rsa::rsa_keygen::RsaPublicKey;

// ---------------------------------------------------------------------------
// Opérations de la clé publique : chiffrement et vérification (RSA "textbook")
// ---------------------------------------------------------------------------
impl RsaPublicKey {
    /// c = m^e mod n, pour 0 <= m < n
    pub fn encrypt(&self, m: &BigInt) -> Result<BigInt, CryptoError> {
        if m.is_negative() || m >= self.n() {
            return Err(CryptoError::MessageOutOfRange);
        }
        mod_pow(m, self.e(), self.n())
    }

    /// h = s^e mod n : retrouve l'empreinte signée
    pub fn verify(&self, s: &BigInt) -> Result<BigInt, CryptoError> {
        if s.is_negative() || s >= self.n() {
            return Err(CryptoError::CiphertextOutOfRange);
        }
        mod_pow(s, self.e(), self.n())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // n = 61·53, e = 17, exemple de manuel
    fn textbook_key() -> RsaPublicKey {
        RsaPublicKey::from_parts(BigInt::from(17), BigInt::from(3233))
    }

    #[test]
    fn test_textbook_encrypt() {
        let pk = textbook_key();
        assert_eq!(pk.encrypt(&BigInt::from(65)).unwrap(), BigInt::from(2790));
        assert_eq!(pk.encrypt(&BigInt::from(0)).unwrap(), BigInt::from(0));
    }

    #[test]
    fn test_encrypt_rejects_out_of_range() {
        let pk = textbook_key();
        assert_eq!(pk.encrypt(&BigInt::from(3233)), Err(CryptoError::MessageOutOfRange));
        assert_eq!(pk.encrypt(&BigInt::from(-1)), Err(CryptoError::MessageOutOfRange));
        assert_eq!(pk.verify(&BigInt::from(4000)), Err(CryptoError::CiphertextOutOfRange));
    }
}
