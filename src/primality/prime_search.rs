use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread;
use log::{debug, trace, warn};
use num_bigint::{BigInt, BigUint};
use rand_core::{CryptoRng, OsRng, RngCore};
use crate::crypto_error::CryptoError;
use crate::primality::primality::{test_candidate, Verdict, DEFAULT_MR_ITERATIONS};
use crate::random::random_bits;

// Un candidat de 1 bit vaut toujours 1 : jamais premier
pub const MIN_PRIME_BITS: u64 = 2;

// Taille minimale acceptée pour les premiers RSA et les modules Paillier
pub const MIN_KEY_BITS: u64 = 16;

// ===========================================================================
// Paramètres de la recherche de premiers
// ===========================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimeSearchConfig {
    /// Tours Miller-Rabin par candidat
    pub iterations: u32,
    /// Nombre de workers ; <= 1 => boucle séquentielle
    pub workers:    usize,
}

impl PrimeSearchConfig {
    /// Recherche mono-thread, tours par défaut
    pub fn sequential() -> Self {
        PrimeSearchConfig { iterations: DEFAULT_MR_ITERATIONS, workers: 1 }
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }
}

impl Default for PrimeSearchConfig {
    fn default() -> Self {
        let workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        PrimeSearchConfig { iterations: DEFAULT_MR_ITERATIONS, workers }
    }
}

fn check_search_params(bit_length: u64, iterations: u32) -> Result<(), CryptoError> {
    if bit_length < MIN_PRIME_BITS {
        return Err(CryptoError::KeySizeTooSmall {
            requested: bit_length,
            minimum:   MIN_PRIME_BITS,
        });
    }
    if iterations == 0 {
        return Err(CryptoError::InvalidIterations);
    }
    Ok(())
}

// Candidat impair d'exactement `bit_length` bits (bits de tête et de queue à 1)
fn draw_candidate(
    rng: &mut (impl RngCore + CryptoRng),
    bit_length: u64,
) -> Result<BigInt, CryptoError> {
    let raw = random_bits(rng, bit_length, true)?;
    let mut candidate = BigUint::from_bytes_be(&raw);
    candidate.set_bit(0, true);
    Ok(BigInt::from(candidate))
}

// ---------------------------------------------------------------------------
// Recherche séquentielle : tirer, tester, recommencer jusqu'au premier
// candidat déclaré probablement premier.
// ---------------------------------------------------------------------------
pub fn find_prime_with_rng(
    rng: &mut (impl RngCore + CryptoRng),
    bit_length: u64,
    iterations: u32,
) -> Result<BigInt, CryptoError> {
    check_search_params(bit_length, iterations)?;

    let mut attempts = 0u64;
    loop {
        attempts += 1;
        let candidate = draw_candidate(rng, bit_length)?;
        trace!("candidat #{attempts} ({bit_length} bits)");

        if test_candidate(&candidate, iterations, rng, None)? == Verdict::Probable {
            debug!("premier probable de {bit_length} bits trouvé après {attempts} candidats");
            return Ok(candidate);
        }
    }
}

/// Recherche séquentielle alimentée par l'entropie système
pub fn find_prime(bit_length: u64, iterations: u32) -> Result<BigInt, CryptoError> {
    find_prime_with_rng(&mut OsRng, bit_length, iterations)
}

/// Choisit la variante selon `config.workers`
pub fn find_prime_with(bit_length: u64, config: &PrimeSearchConfig) -> Result<BigInt, CryptoError> {
    if config.workers <= 1 {
        find_prime(bit_length, config.iterations)
    } else {
        find_prime_parallel(bit_length, config.iterations, config.workers)
    }
}

// ===========================================================================
// Recherche parallèle
//
// Le pool vit dans un thread::scope propre à l'appel : tous les workers sont
// joints avant le retour, sur chemin de succès comme d'erreur. Chaque worker
// possède son propre OsRng et ne partage que le drapeau d'annulation.
// Le premier worker qui trouve lève le drapeau (swap) et envoie son candidat ;
// les autres s'arrêtent au prochain point de contrôle, leurs candidats en
// cours sont jetés même s'ils étaient premiers.
// ===========================================================================

struct PrimeFound {
    worker_id: usize,
    attempts:  u64,
    prime:     BigInt,
}

type WorkerReport = Result<PrimeFound, CryptoError>;

fn search_worker(
    worker_id: usize,
    bit_length: u64,
    iterations: u32,
    cancel: &AtomicBool,
    tx: Sender<WorkerReport>,
) {
    let mut rng = OsRng;
    let mut attempts = 0u64;

    while !cancel.load(Ordering::Acquire) {
        attempts += 1;
        let verdict = draw_candidate(&mut rng, bit_length).and_then(|candidate| {
            test_candidate(&candidate, iterations, &mut rng, Some(cancel))
                .map(|verdict| (candidate, verdict))
        });

        match verdict {
            Ok((prime, Verdict::Probable)) => {
                // Un seul worker gagne la course
                if !cancel.swap(true, Ordering::AcqRel) {
                    let _ = tx.send(Ok(PrimeFound { worker_id, attempts, prime }));
                }
                return;
            }
            Ok((_, Verdict::Composite)) => continue,
            Ok((_, Verdict::Cancelled)) => return,
            Err(e) => {
                if !cancel.swap(true, Ordering::AcqRel) {
                    let _ = tx.send(Err(e));
                }
                return;
            }
        }
    }
}

pub fn find_prime_parallel(
    bit_length: u64,
    iterations: u32,
    workers: usize,
) -> Result<BigInt, CryptoError> {
    check_search_params(bit_length, iterations)?;
    if workers <= 1 {
        return find_prime(bit_length, iterations);
    }

    let cancel = AtomicBool::new(false);
    let (tx, rx) = mpsc::channel::<WorkerReport>();

    let outcome = thread::scope(|scope| {
        let mut spawned = 0usize;
        for worker_id in 0..workers {
            let tx = tx.clone();
            let cancel = &cancel;
            let handle = thread::Builder::new()
                .name(format!("prime-search-{worker_id}"))
                .spawn_scoped(scope, move || {
                    search_worker(worker_id, bit_length, iterations, cancel, tx)
                });
            match handle {
                Ok(_) => spawned += 1,
                Err(e) => warn!("worker {worker_id} non démarré : {e}"),
            }
        }
        // Seuls les workers gardent un émetteur : recv() échoue s'ils disparaissent tous
        drop(tx);

        if spawned == 0 {
            return None;
        }
        let report = rx.recv().unwrap_or(Err(CryptoError::WorkerPoolFailed));
        cancel.store(true, Ordering::Release);
        Some(report)
    });

    match outcome {
        Some(Ok(found)) => {
            debug!(
                "premier probable de {bit_length} bits trouvé par le worker {} après {} candidats ({workers} workers)",
                found.worker_id, found.attempts
            );
            Ok(found.prime)
        }
        Some(Err(e)) => Err(e),
        None => {
            warn!("aucun worker disponible, repli sur la recherche séquentielle");
            find_prime(bit_length, iterations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primality::is_probably_prime;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_two_bit_search_returns_three() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(find_prime_with_rng(&mut rng, 2, 4).unwrap(), BigInt::from(3));
    }

    #[test]
    fn test_sequential_search_exact_bit_length() {
        let mut rng = StdRng::seed_from_u64(2);
        for bits in [3u64, 8, 17, 32, 64, 96] {
            let p = find_prime_with_rng(&mut rng, bits, DEFAULT_MR_ITERATIONS).unwrap();
            assert_eq!(p.bits(), bits);
            assert!(is_probably_prime(&p, DEFAULT_MR_ITERATIONS, &mut rng).unwrap());
        }
    }

    #[test]
    fn test_parallel_search_exact_bit_length() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..4 {
            let p = find_prime_parallel(128, DEFAULT_MR_ITERATIONS, 4).unwrap();
            assert_eq!(p.bits(), 128);
            assert!(is_probably_prime(&p, DEFAULT_MR_ITERATIONS, &mut rng).unwrap());
        }
    }

    #[test]
    fn test_worker_stops_when_already_cancelled() {
        let cancel = AtomicBool::new(true);
        let (tx, rx) = mpsc::channel::<WorkerReport>();
        search_worker(0, 64, DEFAULT_MR_ITERATIONS, &cancel, tx);
        // l'émetteur est détruit au retour du worker : canal vide et fermé
        assert!(matches!(rx.recv(), Err(mpsc::RecvError)));
    }

    #[test]
    fn test_workers_send_exactly_one_report() {
        for _ in 0..20 {
            let cancel = AtomicBool::new(false);
            let (tx, rx) = mpsc::channel::<WorkerReport>();
            thread::scope(|scope| {
                for worker_id in 0..2 {
                    let tx = tx.clone();
                    let cancel = &cancel;
                    scope.spawn(move || search_worker(worker_id, 8, 4, cancel, tx));
                }
            });
            drop(tx);

            let reports: Vec<WorkerReport> = rx.iter().collect();
            assert_eq!(reports.len(), 1);
            assert!(cancel.load(Ordering::Acquire));
            match &reports[0] {
                Ok(found) => {
                    assert!(found.worker_id < 2);
                    assert!(found.attempts >= 1);
                    assert_eq!(found.prime.bits(), 8);
                }
                Err(e) => panic!("le worker a signalé une erreur : {e}"),
            }
        }
    }

    #[test]
    fn test_config_dispatch() {
        let mut rng = StdRng::seed_from_u64(4);
        let sequential = PrimeSearchConfig::sequential().with_iterations(8);
        assert_eq!(sequential.workers, 1);
        let p = find_prime_with(48, &sequential).unwrap();
        assert_eq!(p.bits(), 48);

        let parallel = PrimeSearchConfig::default().with_workers(3);
        let q = find_prime_with(48, &parallel).unwrap();
        assert_eq!(q.bits(), 48);
        assert!(is_probably_prime(&q, 8, &mut rng).unwrap());
    }

    #[test]
    fn test_default_config_has_at_least_one_worker() {
        let config = PrimeSearchConfig::default();
        assert!(config.workers >= 1);
        assert_eq!(config.iterations, DEFAULT_MR_ITERATIONS);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert_eq!(
            find_prime(1, 4),
            Err(CryptoError::KeySizeTooSmall { requested: 1, minimum: MIN_PRIME_BITS })
        );
        assert_eq!(find_prime(64, 0), Err(CryptoError::InvalidIterations));
        assert_eq!(find_prime_parallel(64, 0, 4), Err(CryptoError::InvalidIterations));
    }
}
