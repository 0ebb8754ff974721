pub mod key_storage;

// Réexportations key_storage
pub use key_storage::{
    RsaPublicKeyJson, RsaPrivateKeyJson,
    PaillierPublicKeyJson, PaillierPrivateKeyJson, SharedKeyShareJson,
    bigint_to_hex, hex_to_bigint,
    rsa_public_key_to_json, rsa_private_key_to_json,
    paillier_public_key_to_json, paillier_private_key_to_json, share_to_json,
    json_to_rsa_public_key, json_to_rsa_private_key,
    json_to_paillier_public_key, json_to_paillier_private_key, json_to_share,
    save_rsa_private_key_json, save_rsa_public_key_json,
    save_paillier_private_key_json, save_paillier_public_key_json, save_share_json,
    load_rsa_private_key_json, load_rsa_public_key_json,
    load_paillier_private_key_json, load_paillier_public_key_json, load_share_json,
    key_file_exists, ensure_keys_directory,
};
