//! Primitives cryptographiques de théorie des nombres sur entiers de
//! précision arbitraire : RSA "textbook", cryptosystème de Paillier
//! (additivement homomorphe) et partage de secret à seuil de Shamir.
//!
//! Tout repose sur un socle commun : arithmétique modulaire ([`math`]),
//! aléa sûr ([`random`]) et oracle de primalité ([`primality`]) dont la
//! recherche peut être parallélisée.

// Déclaration des modules
pub mod crypto_error;
pub mod math;
pub mod random;
pub mod primality;
pub mod rsa;
pub mod paillier;
pub mod shamir;
pub mod key_management;

// Fonctions mathématiques principales
pub use crate::math::{abs, bit_length, extended_gcd, gcd, lcm, mod_inv, mod_pow, to_canonical_residue};

// Aléa
pub use crate::random::{random_bits, random_bytes, random_in_range};

// Primalité
pub use crate::primality::{
    find_prime, find_prime_parallel, find_prime_with, is_probably_prime, PrimeSearchConfig,
    DEFAULT_MR_ITERATIONS, MIN_KEY_BITS,
};

// Types des trois constructions
pub use crate::rsa::{RsaPrivateKey, RsaPublicKey};
pub use crate::paillier::{PaillierPrivateKey, PaillierPublicKey};
pub use crate::shamir::{generate_shares, reconstruct, SharedKeyShare};

// Erreur centralisée
pub use crypto_error::CryptoError;

// Le type entier canonique de l'API
pub use num_bigint::BigInt;
