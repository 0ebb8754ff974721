pub mod p_encrypt;
