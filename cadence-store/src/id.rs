/// Opaque identifier generation
///
/// Every row created by the store gets a short random TEXT id rather than a
/// database-generated key, because user ids can also arrive pre-made from an
/// external identity provider and both kinds must live in the same column.
///
/// # Example
///
/// ```
/// use cadence_store::id::new_id;
///
/// let id = new_id();
/// assert_eq!(id.len(), 12);
/// ```

use rand::Rng;

/// Alphabet for generated ids (URL-safe, case-sensitive)
const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of generated ids
///
/// 62^12 ≈ 3.2e21 values, plenty for a per-user task tracker.
pub const ID_LEN: usize = 12;

/// Generates a new opaque id
pub fn new_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_length() {
        assert_eq!(new_id().len(), ID_LEN);
    }

    #[test]
    fn test_id_alphabet() {
        let id = new_id();
        assert!(id.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_ids_are_distinct() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
    }
}
