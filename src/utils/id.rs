use rand::Rng;
use uuid::Uuid;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random UUID v4 string
pub fn generate_unique_id() -> String {
    Uuid::new_v4().to_string()
}

/// 10 character lowercase alphanumeric id
pub fn generate_short_id() -> String {
    let mut rng = rand::thread_rng();
    (0..10)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_id_is_uuid() {
        let id = generate_unique_id();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, generate_unique_id());
    }

    #[test]
    fn test_short_id_shape() {
        let id = generate_short_id();
        assert_eq!(id.len(), 10);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }
}
