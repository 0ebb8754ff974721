pub mod p_keygen;

pub use p_keygen::{l_function, PaillierPrivateKey, PaillierPublicKey};
