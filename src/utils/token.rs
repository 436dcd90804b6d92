use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Verification codes sent by email.
pub const VERIFICATION_CODE_LEN: usize = 10;
/// Password-reset secrets embedded in reset links.
pub const RESET_SECRET_LEN: usize = 20;

pub fn generate_code(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_have_requested_length_and_charset() {
        let code = generate_code(VERIFICATION_CODE_LEN);
        assert_eq!(code.len(), VERIFICATION_CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn secrets_do_not_repeat() {
        let a = generate_code(RESET_SECRET_LEN);
        let b = generate_code(RESET_SECRET_LEN);
        assert_ne!(a, b);
    }
}
