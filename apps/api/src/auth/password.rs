//! Salted PBKDF2-HMAC-SHA256 password hashing.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use uuid::Uuid;

const PBKDF2_ROUNDS: u32 = 100_000;
const HASH_LEN: usize = 32;

/// Hex-encoded hash plus the salt it was derived with.
#[derive(Debug, Clone)]
pub struct HashedPassword {
    pub hash: String,
    pub salt: String,
}

/// Hashes `password` under a fresh 32-hex-character salt.
pub fn hash_password(password: &str) -> HashedPassword {
    let salt = Uuid::new_v4().simple().to_string();
    HashedPassword {
        hash: derive(password, &salt, PBKDF2_ROUNDS),
        salt,
    }
}

pub fn verify_password(password: &str, hash: &str, salt: &str) -> bool {
    let computed = derive(password, salt, PBKDF2_ROUNDS);
    // Equal-length hex strings; compare every byte.
    computed.len() == hash.len()
        && computed
            .bytes()
            .zip(hash.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

fn derive(password: &str, salt: &str, rounds: u32) -> String {
    let mut out = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), rounds, &mut out);
    hex::encode(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_matches_rfc_7914_vector() {
        // PBKDF2-HMAC-SHA256("passwd", "salt", c=1, dkLen=32), first half of the RFC 7914 vector.
        assert_eq!(
            derive("passwd", "salt", 1),
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc"
        );
    }

    #[test]
    fn test_hash_then_verify() {
        let hashed = hash_password("hunter2");
        assert_eq!(hashed.salt.len(), 32);
        assert_eq!(hashed.hash.len(), HASH_LEN * 2);
        assert!(verify_password("hunter2", &hashed.hash, &hashed.salt));
        assert!(!verify_password("hunter3", &hashed.hash, &hashed.salt));
    }

    #[test]
    fn test_salts_differ_per_hash() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_wrong_salt_fails() {
        let hashed = hash_password("pw");
        assert!(!verify_password("pw", &hashed.hash, "00000000000000000000000000000000"));
    }
}
