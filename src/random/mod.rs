// Tirages uniformes à partir d'une source d'octets cryptographiquement sûre

mod secure_random;

pub use secure_random::{random_bits, random_bytes, random_in_range};
pub(crate) use secure_random::random_below;
