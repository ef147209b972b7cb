//! Salted, iterated SHA-256 password hashes, stored as
//! `sha256$<iterations>$<salt>$<digest-hex>`. The iteration count is part
//! of the stored string so it can be raised without invalidating existing
//! accounts.

use rand::{thread_rng, Rng as _};
use sha2::{Digest as _, Sha256};

const ITERATIONS: u32 = 100_000;
const SALT_LENGTH: usize = 16;

pub fn hash_password(password: &str) -> String {
    let salt: String = thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(SALT_LENGTH)
        .map(char::from)
        .collect();
    let digest = iterated_digest(password, &salt, ITERATIONS);
    format!("sha256${ITERATIONS}${salt}${digest}")
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    match (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) {
        (Some("sha256"), Some(iterations), Some(salt), Some(expected), None) => iterations
            .parse::<u32>()
            .map(|iterations| iterated_digest(password, salt, iterations) == expected)
            .unwrap_or(false),
        _ => false,
    }
}

fn iterated_digest(password: &str, salt: &str, iterations: u32) -> String {
    let mut output = Sha256::digest(format!("{salt}{password}").as_bytes());
    for _ in 1..iterations {
        output = Sha256::digest(output);
    }
    output.iter().map(|byte| format!("{byte:02x}")).collect()
}
