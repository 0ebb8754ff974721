use numtheory_crypto::PrimeSearchConfig;

/// Installe env_logger une seule fois (RUST_LOG=debug pour suivre la recherche)
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Recherche parallèle à deux workers : exerce le pool même sur une machine mono-cœur
#[allow(dead_code)]
pub fn parallel_search() -> PrimeSearchConfig {
    PrimeSearchConfig::default().with_workers(2)
}
