// Oracle de primalité : division d'essai, Miller-Rabin, recherche de premiers

mod primality;
mod prime_search;

pub use primality::{is_probably_prime, DEFAULT_MR_ITERATIONS, SMALL_PRIMES};
pub use prime_search::{
    find_prime, find_prime_parallel, find_prime_with, find_prime_with_rng,
    PrimeSearchConfig, MIN_KEY_BITS, MIN_PRIME_BITS,
};
