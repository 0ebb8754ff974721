// =========================================================
// Métriques — Mesures de durée des primitives
// RSA, Paillier & Shamir (avec choix interactif)
// =========================================================

// ── Bibliothèque ──────────────────────────────────────────
use numtheory_crypto::key_management::{
    ensure_keys_directory, key_file_exists,
    load_paillier_private_key_json, load_rsa_private_key_json,
    save_paillier_private_key_json, save_paillier_public_key_json,
    save_rsa_private_key_json, save_rsa_public_key_json,
};
use numtheory_crypto::random::random_in_range;
use numtheory_crypto::shamir::{generate_shares, reconstruct};
use numtheory_crypto::{CryptoError, PaillierPrivateKey, RsaPrivateKey};

// ── Stdlib & crates externes ──────────────────────────────
use num_bigint::BigInt;
use num_traits::Zero;
use rand_core::OsRng;
use std::io::{self, Write};
use std::time::{Duration, Instant};

// ── Chemins des fichiers de clés ──────────────────────────
const KEYS_DIR:                  &str = "keys";
const RSA_PRIVATE_JSON_PATH:     &str = "keys/rsa_private.json";
const RSA_PUBLIC_JSON_PATH:      &str = "keys/rsa_public.json";
const PAILLIER_PRIVATE_JSON_PATH: &str = "keys/paillier_private.json";
const PAILLIER_PUBLIC_JSON_PATH:  &str = "keys/paillier_public.json";

// ── Tailles utilisées par la démonstration ────────────────
const RSA_PRIME_BITS:     u64 = 1024;
const PAILLIER_BITS:      u64 = 1024;
const SHAMIR_PRIME_BITS:  u64 = 256;

// ─────────────────────────────────────────────────────────
// Erreur applicative centrale
//
// Unifie CryptoError et io::Error pour propager toutes les
// erreurs via ? sans conversion manuelle.
// ─────────────────────────────────────────────────────────

#[derive(Debug)]
enum AppError {
    Crypto(CryptoError),
    Io(std::io::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Crypto(e) => write!(f, "Erreur cryptographique : {}", e),
            AppError::Io(e)     => write!(f, "Erreur I/O : {}", e),
        }
    }
}

impl From<CryptoError> for AppError {
    fn from(e: CryptoError) -> Self { AppError::Crypto(e) }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self { AppError::Io(e) }
}

// ─────────────────────────────────────────────────────────
// Point d'entrée
// ─────────────────────────────────────────────────────────

fn main() {
    env_logger::init();

    if let Err(e) = ensure_keys_directory(KEYS_DIR) {
        eprintln!("[FATAL] Impossible de créer le répertoire keys/ : {}", e);
        std::process::exit(1);
    }

    loop {
        afficher_menu();
        let choix = lire_choix();

        let res = match choix.as_str() {
            "1" => demonstration_rsa(),
            "2" => demonstration_paillier(),
            "3" => demonstration_shamir(),
            "4" => { println!("\nAu revoir !\n"); break; }
            _   => { println!("\nChoix invalide. Veuillez choisir 1, 2, 3 ou 4.\n"); continue; }
        };

        if let Err(e) = res {
            eprintln!("\n[ERREUR] {}\n", e);
        }

        println!("\nAppuyez sur Entrée pour continuer...");
        let mut pause = String::new();
        io::stdin().read_line(&mut pause).ok();
    }
}

// ─────────────────────────────────────────────────────────
// Menu
// ─────────────────────────────────────────────────────────

fn afficher_menu() {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   MÉTRIQUES PRIMITIVES — MENU                 ║");
    println!("╚═══════════════════════════════════════════════╝");
    println!("\n  [1] RSA (chiffrement + signature)");
    println!("  [2] Cryptosystème de Paillier");
    println!("  [3] Partage de secret de Shamir");
    println!("  [4] Quitter\n");
    print!("Votre choix : ");
    io::stdout().flush().ok();
}

fn lire_choix() -> String {
    let mut input = String::new();
    io::stdin().read_line(&mut input).ok();
    input.trim().to_string()
}

fn afficher_duree_keygen(duree: Option<Duration>) {
    match duree {
        Some(d) => println!("  Génération des clés    : {:.3?}  (nouvelle génération)", d),
        None    => println!("  Génération des clés    : —  (chargées depuis le disque)"),
    }
}

// ─────────────────────────────────────────────────────────
// Gestion des clés : chargement ou génération + sauvegarde
// ─────────────────────────────────────────────────────────

fn charger_ou_generer_rsa() -> Result<(RsaPrivateKey, Option<Duration>), AppError> {
    if key_file_exists(RSA_PRIVATE_JSON_PATH) {
        println!("\n  Clés RSA existantes détectées — chargement...");
        match load_rsa_private_key_json(RSA_PRIVATE_JSON_PATH) {
            Ok(sk) => return Ok((sk, None)),
            Err(e) => println!("  Erreur de chargement ({}) — regénération...", e),
        }
    } else {
        println!("\n  Aucune clé RSA trouvée — génération ({} bits par premier)...", RSA_PRIME_BITS);
    }

    let t     = Instant::now();
    let sk    = RsaPrivateKey::generate(RSA_PRIME_BITS)?;
    let duree = t.elapsed();

    save_rsa_private_key_json(&sk, RSA_PRIVATE_JSON_PATH)?;
    save_rsa_public_key_json(sk.public_key(), RSA_PUBLIC_JSON_PATH)?;
    println!("  Clés sauvegardées dans {}/\n", KEYS_DIR);
    Ok((sk, Some(duree)))
}

fn charger_ou_generer_paillier() -> Result<(PaillierPrivateKey, Option<Duration>), AppError> {
    if key_file_exists(PAILLIER_PRIVATE_JSON_PATH) {
        println!("\n  Clés Paillier existantes détectées — chargement...");
        match load_paillier_private_key_json(PAILLIER_PRIVATE_JSON_PATH) {
            Ok(sk) => return Ok((sk, None)),
            Err(e) => println!("  Erreur de chargement ({}) — regénération...", e),
        }
    } else {
        println!("\n  Aucune clé Paillier trouvée — génération ({} bits)...", PAILLIER_BITS);
    }

    let t     = Instant::now();
    let sk    = PaillierPrivateKey::generate(PAILLIER_BITS)?;
    let duree = t.elapsed();

    save_paillier_private_key_json(&sk, PAILLIER_PRIVATE_JSON_PATH)?;
    save_paillier_public_key_json(sk.public_key(), PAILLIER_PUBLIC_JSON_PATH)?;
    println!("  Clés sauvegardées dans {}/\n", KEYS_DIR);
    Ok((sk, Some(duree)))
}

// Tirage uniforme dans [0, n)
fn message_aleatoire(n: &BigInt) -> Result<BigInt, CryptoError> {
    random_in_range(&mut OsRng, &(n - 1u32), &BigInt::zero())
}

// ─────────────────────────────────────────────────────────
// [1] Démonstration RSA
// ─────────────────────────────────────────────────────────

fn demonstration_rsa() -> Result<(), AppError> {
    println!("\n==============================================");
    println!("    RSA — Démonstration");
    println!("==============================================");

    let (sk, duree_keygen) = charger_ou_generer_rsa()?;
    let pk = sk.public_key();
    println!("  |n| = {} bits, |e| = {} bits", pk.n().bits(), pk.e().bits());

    let m = message_aleatoire(pk.n())?;

    let t         = Instant::now();
    let c         = pk.encrypt(&m)?;
    let duree_enc = t.elapsed();

    let t         = Instant::now();
    let dec       = sk.decrypt(&c)?;
    let duree_dec = t.elapsed();

    let t          = Instant::now();
    let s          = sk.sign(&m)?;
    let duree_sign = t.elapsed();

    let t            = Instant::now();
    let h            = pk.verify(&s)?;
    let duree_verify = t.elapsed();

    if dec == m && h == m {
        println!("\n  Aller-retour vérifié : D(E(m)) = m et V(S(m)) = m");
    } else {
        println!("\n  Erreur dans l'aller-retour RSA !");
    }

    println!("\n==============================================");
    println!("    RÉSUMÉ DES TEMPS — RSA");
    println!("==============================================");
    afficher_duree_keygen(duree_keygen);
    println!("  Chiffrement            : {:.3?}", duree_enc);
    println!("  Déchiffrement          : {:.3?}", duree_dec);
    println!("  Signature              : {:.3?}", duree_sign);
    println!("  Vérification           : {:.3?}", duree_verify);
    println!("==============================================");

    Ok(())
}

// ─────────────────────────────────────────────────────────
// [2] Démonstration Paillier — homomorphisme additif
// ─────────────────────────────────────────────────────────

fn demonstration_paillier() -> Result<(), AppError> {
    println!("\n==============================================");
    println!("    Cryptosystème de Paillier — Démonstration");
    println!("==============================================");

    let (sk, duree_keygen) = charger_ou_generer_paillier()?;
    let pk = sk.public_key();
    println!("  |n| = {} bits, |n²| = {} bits", pk.n().bits(), pk.n_squared().bits());

    // Messages dans [0, n) — domaine valide Paillier
    let m1           = message_aleatoire(pk.n())?;
    let m2           = message_aleatoire(pk.n())?;
    let k            = BigInt::from(7u32);
    let somme_claire = (&m1 + &m2) % pk.n();
    let produit_clair = (&m1 * &k) % pk.n();

    let t            = Instant::now();
    let c1           = pk.encrypt(&m1)?;
    let duree_enc_m1 = t.elapsed();

    let t            = Instant::now();
    let c2           = pk.encrypt(&m2)?;
    let duree_enc_m2 = t.elapsed();

    // Addition homomorphique : E(m1) * E(m2) mod n² = E((m1+m2) mod n)
    let t            = Instant::now();
    let c_somme      = pk.add(&[c1.clone(), c2])?;
    let duree_add    = t.elapsed();

    // Multiplication par un scalaire : E(m1)^k mod n² = E(m1·k mod n)
    let t            = Instant::now();
    let c_produit    = pk.multiply(&c1, &k)?;
    let duree_mul    = t.elapsed();

    let t            = Instant::now();
    let dec_somme    = sk.decrypt(&c_somme)?;
    let duree_dec    = t.elapsed();
    let dec_produit  = sk.decrypt(&c_produit)?;

    if dec_somme == somme_claire {
        println!("\n  Homomorphisme additif vérifié : D(E(m1)·E(m2)) = (m1+m2) mod n");
    } else {
        println!("\n  Erreur dans l'homomorphisme additif !");
    }
    if dec_produit == produit_clair {
        println!("  Multiplication scalaire vérifiée : D(E(m1)^k) = m1·k mod n");
    } else {
        println!("  Erreur dans la multiplication scalaire !");
    }

    println!("\n==============================================");
    println!("    RÉSUMÉ DES TEMPS — Paillier");
    println!("==============================================");
    afficher_duree_keygen(duree_keygen);
    println!("  Chiffrement m1         : {:.3?}", duree_enc_m1);
    println!("  Chiffrement m2         : {:.3?}", duree_enc_m2);
    println!("  Addition homomorphique : {:.3?}", duree_add);
    println!("  Multiplication scalaire: {:.3?}", duree_mul);
    println!("  Déchiffrement          : {:.3?}", duree_dec);
    println!("==============================================");

    Ok(())
}

// ─────────────────────────────────────────────────────────
// [3] Démonstration Shamir — seuil 3 parmi 5
// ─────────────────────────────────────────────────────────

fn demonstration_shamir() -> Result<(), AppError> {
    println!("\n==============================================");
    println!("    Partage de secret de Shamir — Démonstration");
    println!("==============================================");

    let borne  = BigInt::from(1u32) << (SHAMIR_PRIME_BITS - 2);
    let secret = message_aleatoire(&borne)?;
    println!("  secret = {} bits, seuil 3 parmi 5", secret.bits());

    let t           = Instant::now();
    let parts       = generate_shares(&secret, 3, 5, SHAMIR_PRIME_BITS)?;
    let duree_share = t.elapsed();

    let t           = Instant::now();
    let retrouve    = reconstruct(&[parts[4].clone(), parts[0].clone(), parts[2].clone()])?;
    let duree_rec   = t.elapsed();

    if retrouve == secret {
        println!("\n  Reconstruction vérifiée à partir des parts 5, 1 et 3");
    } else {
        println!("\n  Erreur dans la reconstruction !");
    }

    match reconstruct(&parts[..2]) {
        Err(e) => println!("  Deux parts seulement : refus attendu ({})", e),
        Ok(_)  => println!("  Deux parts seulement : reconstruction inattendue !"),
    }

    println!("\n==============================================");
    println!("    RÉSUMÉ DES TEMPS — Shamir");
    println!("==============================================");
    println!("  Génération des parts   : {:.3?}", duree_share);
    println!("  Reconstruction         : {:.3?}", duree_rec);
    println!("==============================================");

    Ok(())
}
