/// Credential helpers
///
/// - [`password`]: Argon2id hashing and verification for `users.hashed_password`

pub mod password;
