// Réexporte les primitives d'arithmétique modulaire

mod modular;

pub use modular::{abs, bit_length, extended_gcd, gcd, lcm, mod_inv, mod_pow, to_canonical_residue};

use num_bigint::BigInt;

// ---------------------------------------------------------------------------
// Efface un scalaire secret. num-bigint n'expose pas son buffer interne :
// on remet la valeur à zéro, ce qui libère l'ancien stockage.
// ---------------------------------------------------------------------------
pub(crate) fn zeroize_bigint(n: &mut BigInt) {
    *n = BigInt::default();
}
