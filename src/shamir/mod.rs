pub mod shamir_share;
pub mod shamir_reconstruct;

//Rexportation pratiques pour l'utilisateur du module

pub use shamir_share::{generate_shares, generate_shares_with, SharedKeyShare};
pub use shamir_reconstruct::{interpolate, reconstruct};
