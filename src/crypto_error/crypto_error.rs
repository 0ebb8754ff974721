// ===========================================================================
// Gestion centralisée des erreurs cryptographiques
//
// Tous les modules utilisent ce type au lieu de panic!/assert!/unwrap().
// Les erreurs de domaine remontent immédiatement à l'appelant, sans
// récupération silencieuse. La recherche de premiers n'échoue jamais par
// "malchance" : elle ne fait que durer plus longtemps.
// ===========================================================================

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CryptoError {
    // --- Erreurs de domaine (arithmétique modulaire) ---
    /// Le module n est <= 0
    NonPositiveModulus,
    /// extended_gcd exige a > 0 et b > 0
    NonPositiveOperand,
    /// L'inverse modulaire n'existe pas (gcd != 1)
    NoModularInverse,

    // --- Erreurs de domaine (aléa) ---
    /// random_in_range appelé avec max <= min ou min < 0
    InvalidRange,
    /// random_bytes / random_bits appelés avec une longueur < 1
    InvalidLength,

    // --- Erreurs de paramètres ---
    /// Miller-Rabin exige au moins un tour
    InvalidIterations,
    /// La taille de clé (ou de premier) demandée est trop petite
    KeySizeTooSmall { requested: u64, minimum: u64 },
    /// Le message m est hors de [0, n)
    MessageOutOfRange,
    /// Le chiffré c est hors de son domaine ([0, n) RSA, [0, n²) Paillier)
    CiphertextOutOfRange,

    // --- Erreurs de partage de secret ---
    /// Secret négatif ou trop grand pour un premier de la taille demandée
    SecretOutOfRange,
    /// Seuil nul ou supérieur au nombre de parts
    InvalidThreshold { threshold: usize, count: usize },
    /// Moins de parts que le seuil fourni à la reconstruction
    NotEnoughShares { required: usize, provided: usize },
    /// Parts issues de sessions différentes (module ou seuil divergent)
    ShareMismatch,
    /// Deux parts portent la même position
    DuplicateSharePosition,
    /// Trop de parts : les positions 1..=count ne tiennent pas dans le corps
    TooManyShares { count: usize, prime_bits: u64 },

    // --- Erreurs de stockage / parsing des clés ---
    /// Parsing hexadécimal invalide dans un champ de clé JSON
    HexParseError,
    /// Champ hex trop long : vecteur DoS potentiel (conversion BigInt coûteuse)
    HexFieldTooLong { actual: usize, maximum: usize },
    /// Clé chargée incohérente (n_squared != n*n, sonde de déchiffrement…)
    KeyCoherenceError,

    // --- Recherche parallèle ---
    /// Aucun worker n'a pu rendre de résultat
    WorkerPoolFailed,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::NonPositiveModulus =>
                write!(f, "Le module doit être strictement positif"),
            CryptoError::NonPositiveOperand =>
                write!(f, "Les opérandes de extended_gcd doivent être strictement positifs"),
            CryptoError::NoModularInverse =>
                write!(f, "Impossible de calculer l'inverse modulaire (gcd != 1)"),
            CryptoError::InvalidRange =>
                write!(f, "Intervalle aléatoire invalide : il faut max > min >= 0"),
            CryptoError::InvalidLength =>
                write!(f, "La longueur demandée doit être >= 1"),
            CryptoError::InvalidIterations =>
                write!(f, "Miller-Rabin exige au moins un tour"),
            CryptoError::KeySizeTooSmall { requested, minimum } =>
                write!(f, "Taille de clé {requested} bits insuffisante, minimum requis : {minimum} bits"),
            CryptoError::MessageOutOfRange =>
                write!(f, "Le message doit être dans [0, n)"),
            CryptoError::CiphertextOutOfRange =>
                write!(f, "Le chiffré est hors de son domaine"),
            CryptoError::SecretOutOfRange =>
                write!(f, "Le secret doit être positif et strictement inférieur au module de partage"),
            CryptoError::InvalidThreshold { threshold, count } =>
                write!(f, "Seuil {threshold} invalide pour {count} parts (il faut 1 <= seuil <= parts)"),
            CryptoError::NotEnoughShares { required, provided } =>
                write!(f, "Parts insuffisantes : {required} requises, {provided} fournies"),
            CryptoError::ShareMismatch =>
                write!(f, "Les parts ne proviennent pas de la même session (module ou seuil différent)"),
            CryptoError::DuplicateSharePosition =>
                write!(f, "Deux parts partagent la même position"),
            CryptoError::TooManyShares { count, prime_bits } =>
                write!(f, "{count} parts ne tiennent pas dans un corps de {prime_bits} bits"),
            CryptoError::HexParseError =>
                write!(f, "Parsing hexadécimal invalide dans le fichier de clés"),
            CryptoError::HexFieldTooLong { actual, maximum } =>
                write!(f, "Champ hexadécimal trop long : {actual} caractères (maximum autorisé : {maximum})"),
            CryptoError::KeyCoherenceError =>
                write!(f, "Fichier de clés incohérent (corrompu ou falsifié)"),
            CryptoError::WorkerPoolFailed =>
                write!(f, "La recherche parallèle de premier n'a produit aucun résultat"),
        }
    }
}

impl std::error::Error for CryptoError {}
