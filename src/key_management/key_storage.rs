use serde::{Serialize, Deserialize};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use num_bigint::BigInt;
use num_traits::{Num, One, Signed};
use crate::crypto_error::CryptoError;
use crate::math::mod_pow;
use crate::paillier::{PaillierPrivateKey, PaillierPublicKey};
use crate::rsa::{RsaPrivateKey, RsaPublicKey};
use crate::shamir::SharedKeyShare;

// ============================================================================
// Protection DoS parsing — limites de taille des entrées
//
// Ces constantes sont vérifiées AVANT toute opération coûteuse :
//   - un fichier de plusieurs Go serait lu en mémoire sans borne ;
//   - BigInt::from_str_radix est quadratique en la taille de l'entrée.
// Dimensionnées pour des modules jusqu'à 4096 bits :
//   n_squared fait au plus 8192 bits = 2048 caractères hex, marge à 3072.
// ============================================================================

/// Taille maximale d'un fichier de clés JSON en octets (32 Ko)
const MAX_KEY_FILE_BYTES: u64 = 32_768;

/// Longueur maximale d'un champ hexadécimal en caractères
const MAX_HEX_FIELD_LEN: usize = 3_072;

// ============================================================================
// Structures JSON pour la sérialisation des clés et des parts
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RsaPublicKeyJson {
    pub e: String,
    pub n: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RsaPrivateKeyJson {
    pub d:          String,
    pub public_key: RsaPublicKeyJson,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaillierPublicKeyJson {
    pub n:         String,
    pub g:         String,
    pub n_squared: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaillierPrivateKeyJson {
    pub lambda:     String,
    pub mu:         String,
    pub public_key: PaillierPublicKeyJson,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SharedKeyShareJson {
    pub value:     String,
    pub position:  String,
    pub threshold: usize,
    pub modulus:   String,
}

// ============================================================================
// Conversion BigInt ↔ hexadécimal
// ============================================================================

pub fn bigint_to_hex(value: &BigInt) -> String {
    value.to_str_radix(16).to_uppercase()
}

/// Convertit une string hex en BigInt positif ou nul.
///
/// Vérifie la longueur du champ AVANT la conversion (vecteur DoS CPU).
///
/// Retourne :
///   Err(HexFieldTooLong)  si len > MAX_HEX_FIELD_LEN
///   Err(HexParseError)    si le contenu n'est pas un hex valide ou est négatif
pub fn hex_to_bigint(hex_str: &str) -> Result<BigInt, CryptoError> {
    if hex_str.len() > MAX_HEX_FIELD_LEN {
        return Err(CryptoError::HexFieldTooLong {
            actual:  hex_str.len(),
            maximum: MAX_HEX_FIELD_LEN,
        });
    }
    let value = BigInt::from_str_radix(hex_str, 16)
        .map_err(|_| CryptoError::HexParseError)?;
    if value.is_negative() {
        return Err(CryptoError::HexParseError);
    }
    Ok(value)
}

// ============================================================================
// Conversion structures Rust → JSON
// ============================================================================

pub fn rsa_public_key_to_json(pk: &RsaPublicKey) -> RsaPublicKeyJson {
    RsaPublicKeyJson {
        e: bigint_to_hex(pk.e()),
        n: bigint_to_hex(pk.n()),
    }
}

pub fn rsa_private_key_to_json(sk: &RsaPrivateKey) -> RsaPrivateKeyJson {
    RsaPrivateKeyJson {
        d:          bigint_to_hex(sk.d()),
        public_key: rsa_public_key_to_json(sk.public_key()),
    }
}

pub fn paillier_public_key_to_json(pk: &PaillierPublicKey) -> PaillierPublicKeyJson {
    PaillierPublicKeyJson {
        n:         bigint_to_hex(pk.n()),
        g:         bigint_to_hex(pk.g()),
        n_squared: bigint_to_hex(pk.n_squared()),
    }
}

pub fn paillier_private_key_to_json(sk: &PaillierPrivateKey) -> PaillierPrivateKeyJson {
    PaillierPrivateKeyJson {
        lambda:     bigint_to_hex(sk.lambda()),
        mu:         bigint_to_hex(sk.mu()),
        public_key: paillier_public_key_to_json(sk.public_key()),
    }
}

pub fn share_to_json(share: &SharedKeyShare) -> SharedKeyShareJson {
    SharedKeyShareJson {
        value:     bigint_to_hex(&share.value),
        position:  bigint_to_hex(&share.position),
        threshold: share.threshold,
        modulus:   bigint_to_hex(&share.modulus),
    }
}

// ============================================================================
// Conversion JSON → structures Rust
//
// Chaque chargement vérifie la cohérence structurelle : protège contre les
// fichiers JSON corrompus ou falsifiés.
// ============================================================================

pub fn json_to_rsa_public_key(json: &RsaPublicKeyJson) -> Result<RsaPublicKey, CryptoError> {
    let e = hex_to_bigint(&json.e)?;
    let n = hex_to_bigint(&json.n)?;
    if n <= BigInt::one() || e < BigInt::one() || e >= n {
        return Err(CryptoError::KeyCoherenceError);
    }
    Ok(RsaPublicKey::from_parts(e, n))
}

pub fn json_to_rsa_private_key(json: &RsaPrivateKeyJson) -> Result<RsaPrivateKey, CryptoError> {
    let pk = json_to_rsa_public_key(&json.public_key)?;
    let d = hex_to_bigint(&json.d)?;

    // Sonde : (2^e)^d ≡ 2 (mod n) si e·d ≡ 1 modulo l'ordre du groupe
    let probe = BigInt::from(2u32) % pk.n();
    let round_trip = mod_pow(&mod_pow(&probe, pk.e(), pk.n())?, &d, pk.n())?;
    if round_trip != probe {
        return Err(CryptoError::KeyCoherenceError);
    }

    Ok(RsaPrivateKey::from_parts(d, Arc::new(pk)))
}

pub fn json_to_paillier_public_key(json: &PaillierPublicKeyJson) -> Result<PaillierPublicKey, CryptoError> {
    let n         = hex_to_bigint(&json.n)?;
    let g         = hex_to_bigint(&json.g)?;
    let n_squared = hex_to_bigint(&json.n_squared)?;

    if n <= BigInt::one() || n_squared != &n * &n || g < BigInt::one() || g >= n_squared {
        return Err(CryptoError::KeyCoherenceError);
    }

    Ok(PaillierPublicKey::from_parts(n, n_squared, g))
}

pub fn json_to_paillier_private_key(json: &PaillierPrivateKeyJson) -> Result<PaillierPrivateKey, CryptoError> {
    let pk = Arc::new(json_to_paillier_public_key(&json.public_key)?);
    let sk = PaillierPrivateKey::from_parts(
        hex_to_bigint(&json.lambda)?,
        hex_to_bigint(&json.mu)?,
        pk,
    );

    // Sonde : g est le chiffré de 1 avec r = 1
    let g = sk.public_key().g().clone();
    if !sk.decrypt(&g)?.is_one() {
        return Err(CryptoError::KeyCoherenceError);
    }

    Ok(sk)
}

pub fn json_to_share(json: &SharedKeyShareJson) -> Result<SharedKeyShare, CryptoError> {
    let share = SharedKeyShare {
        value:     hex_to_bigint(&json.value)?,
        position:  hex_to_bigint(&json.position)?,
        threshold: json.threshold,
        modulus:   hex_to_bigint(&json.modulus)?,
    };

    if share.threshold < 1
        || share.position < BigInt::one()
        || share.position >= share.modulus
        || share.value >= share.modulus
    {
        return Err(CryptoError::KeyCoherenceError);
    }

    Ok(share)
}

// ============================================================================
// Vérification de taille de fichier (DoS protection)
//
// Appelée avant fs::read_to_string ; la métadonnée est lue sans ouvrir le
// contenu.
// ============================================================================

fn check_file_size(path: &Path) -> io::Result<()> {
    let meta = fs::metadata(path)?;
    if meta.len() > MAX_KEY_FILE_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Fichier de clés trop grand : {} octets (maximum autorisé : {} octets).",
                meta.len(),
                MAX_KEY_FILE_BYTES
            ),
        ));
    }
    Ok(())
}

fn save_json<T: Serialize>(value: &T, path: &Path) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

fn load_json<J, T, F>(path: &Path, convert: F) -> io::Result<T>
where
    J: for<'de> Deserialize<'de>,
    F: FnOnce(&J) -> Result<T, CryptoError>,
{
    check_file_size(path)?;
    let raw = fs::read_to_string(path)?;
    let json: J = serde_json::from_str(&raw)?;
    convert(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

// ============================================================================
// Sauvegarde JSON sur disque
// ============================================================================

pub fn save_rsa_private_key_json(sk: &RsaPrivateKey, path: impl AsRef<Path>) -> io::Result<()> {
    save_json(&rsa_private_key_to_json(sk), path.as_ref())
}

pub fn save_rsa_public_key_json(pk: &RsaPublicKey, path: impl AsRef<Path>) -> io::Result<()> {
    save_json(&rsa_public_key_to_json(pk), path.as_ref())
}

pub fn save_paillier_private_key_json(sk: &PaillierPrivateKey, path: impl AsRef<Path>) -> io::Result<()> {
    save_json(&paillier_private_key_to_json(sk), path.as_ref())
}

pub fn save_paillier_public_key_json(pk: &PaillierPublicKey, path: impl AsRef<Path>) -> io::Result<()> {
    save_json(&paillier_public_key_to_json(pk), path.as_ref())
}

pub fn save_share_json(share: &SharedKeyShare, path: impl AsRef<Path>) -> io::Result<()> {
    save_json(&share_to_json(share), path.as_ref())
}

// ============================================================================
// Chargement JSON depuis disque
// Vérification de la taille du fichier AVANT la lecture (protection DoS).
// ============================================================================

pub fn load_rsa_private_key_json(path: impl AsRef<Path>) -> io::Result<RsaPrivateKey> {
    load_json(path.as_ref(), json_to_rsa_private_key)
}

pub fn load_rsa_public_key_json(path: impl AsRef<Path>) -> io::Result<RsaPublicKey> {
    load_json(path.as_ref(), json_to_rsa_public_key)
}

pub fn load_paillier_private_key_json(path: impl AsRef<Path>) -> io::Result<PaillierPrivateKey> {
    load_json(path.as_ref(), json_to_paillier_private_key)
}

pub fn load_paillier_public_key_json(path: impl AsRef<Path>) -> io::Result<PaillierPublicKey> {
    load_json(path.as_ref(), json_to_paillier_public_key)
}

pub fn load_share_json(path: impl AsRef<Path>) -> io::Result<SharedKeyShare> {
    load_json(path.as_ref(), json_to_share)
}

// ============================================================================
// Utilitaires
// ============================================================================

pub fn key_file_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

pub fn ensure_keys_directory(dir_path: impl AsRef<Path>) -> io::Result<()> {
    let dir = dir_path.as_ref();
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip_and_limits() {
        let v = BigInt::from(0xABCDEFu32);
        assert_eq!(bigint_to_hex(&v), "ABCDEF");
        assert_eq!(hex_to_bigint("abcdef").unwrap(), v);
        assert_eq!(hex_to_bigint("xyz"), Err(CryptoError::HexParseError));
        assert_eq!(hex_to_bigint("-1F"), Err(CryptoError::HexParseError));

        let long = "F".repeat(MAX_HEX_FIELD_LEN + 1);
        assert_eq!(
            hex_to_bigint(&long),
            Err(CryptoError::HexFieldTooLong { actual: MAX_HEX_FIELD_LEN + 1, maximum: MAX_HEX_FIELD_LEN })
        );
    }

    #[test]
    fn test_rsa_textbook_json_conversion() {
        // n = 61·53, e = 17, d = 2753
        let json = RsaPrivateKeyJson {
            d:          bigint_to_hex(&BigInt::from(2753)),
            public_key: RsaPublicKeyJson {
                e: bigint_to_hex(&BigInt::from(17)),
                n: bigint_to_hex(&BigInt::from(3233)),
            },
        };
        let sk = json_to_rsa_private_key(&json).unwrap();
        assert_eq!(sk.d(), &BigInt::from(2753));
        assert_eq!(rsa_private_key_to_json(&sk), json);

        let mut tampered = json.clone();
        tampered.d = bigint_to_hex(&BigInt::from(2754));
        assert!(matches!(json_to_rsa_private_key(&tampered), Err(CryptoError::KeyCoherenceError)));
    }

    #[test]
    fn test_paillier_public_key_coherence() {
        let json = PaillierPublicKeyJson {
            n:         "23".to_string(),
            g:         "24".to_string(),
            n_squared: "4C9".to_string(),
        };
        assert!(json_to_paillier_public_key(&json).is_ok());

        let mut bad = json.clone();
        bad.n_squared = "4CA".to_string();
        assert_eq!(json_to_paillier_public_key(&bad), Err(CryptoError::KeyCoherenceError));
    }

    #[test]
    fn test_share_json_validation() {
        let share = SharedKeyShare {
            value:     BigInt::from(5),
            position:  BigInt::from(2),
            threshold: 2,
            modulus:   BigInt::from(11),
        };
        let json = share_to_json(&share);
        assert_eq!(json_to_share(&json).unwrap(), share);

        let mut bad = json.clone();
        bad.position = "0".to_string();
        assert_eq!(json_to_share(&bad), Err(CryptoError::KeyCoherenceError));

        let mut bad = json;
        bad.threshold = 0;
        assert_eq!(json_to_share(&bad), Err(CryptoError::KeyCoherenceError));
    }
}
