pub mod rsa_keygen;
pub mod rsa_encrypt;
pub mod rsa_decrypt;

//Rexportation pratiques pour l'utilisateur du module

pub use rsa_keygen::{RsaPrivateKey, RsaPublicKey};
