#![no_main]
use fenhash::chess::fen::Fen;
use fenhash::{compute_hash, KeyStore};
use libfuzzer_sys::fuzz_target;
use rand::rngs::StdRng;
use rand::SeedableRng;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let keys = KeyStore::from_rng(&mut StdRng::seed_from_u64(0)).unwrap();
        // Anything that parses hashes the same way through both entry points.
        if let Ok(fen) = Fen::parse(s) {
            assert_eq!(compute_hash(s, &keys).unwrap(), keys.hash(&fen));
            assert_eq!(
                Fen::parse(&fen.to_string()).map(|reparsed| keys.hash(&reparsed)).unwrap(),
                keys.hash(&fen)
            );
        } else {
            assert!(compute_hash(s, &keys).is_err());
        }
    }
});
