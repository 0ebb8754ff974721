pub mod p_homomorphic;
