use rand::Rng;

/// Generates an alphanumeric secret of the given length. Used for api
/// secrets, verification codes and password reset tokens.
pub fn create_random_secret(secret_len: usize) -> String {
    let rng = rand::thread_rng();
    rng.sample_iter(&rand::distributions::Alphanumeric)
        .take(secret_len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn creates_secret_of_given_length() {
        for len in [0, 1, 16, 64].iter() {
            assert_eq!(create_random_secret(*len).len(), *len);
        }
    }

    #[test]
    fn creates_distinct_secrets() {
        assert_ne!(create_random_secret(32), create_random_secret(32));
    }
}
