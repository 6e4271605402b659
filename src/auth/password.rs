//! Password hashing and strength validation.

use serde::{Deserialize, Serialize};
use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// A bcrypt hash of a user's password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a validated password with bcrypt.
    ///
    /// # Errors
    /// Returns an [Error::HashingError] if the underlying hashing
    /// library fails; the error string should only be logged on the
    /// server.
    pub fn new(password: ValidatedPassword) -> Result<Self, Error> {
        Self::with_cost(password, bcrypt::DEFAULT_COST)
    }

    /// Hash a validated password with an explicit bcrypt cost.
    ///
    /// Lower costs are only appropriate for tests and seed data.
    ///
    /// # Errors
    /// Returns an [Error::HashingError] if the underlying hashing
    /// library fails.
    pub fn with_cost(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        bcrypt::hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap an existing hash string without validation, e.g. one loaded
    /// from the database.
    pub fn new_unchecked(hash: &str) -> Self {
        Self(hash.to_owned())
    }

    /// Check `password` against this hash.
    ///
    /// # Errors
    /// Returns an [Error::HashingError] if the stored hash could not be
    /// parsed.
    pub fn verify(&self, password: &str) -> Result<bool, Error> {
        bcrypt::verify(password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A password that has passed the strength check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `raw_password`, rejecting anything below
    /// a zxcvbn score of three.
    ///
    /// # Errors
    /// Returns an [Error::TooWeak] describing the problem when the
    /// password is too easy to guess.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        let entropy = zxcvbn(raw_password, &[]);

        if entropy.score() < Score::Three {
            let warning = entropy
                .feedback()
                .and_then(|feedback| feedback.warning())
                .map(|warning| warning.to_string())
                .unwrap_or_else(|| "choose a longer, less common password".to_owned());

            return Err(Error::TooWeak(warning));
        }

        Ok(Self(raw_password.to_owned()))
    }

    /// Skip the strength check. For tests and seed data only.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

#[cfg(test)]
mod password_tests {
    use crate::Error;

    use super::{PasswordHash, ValidatedPassword};

    /// Minimum bcrypt cost, to keep the tests fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn weak_password_is_rejected() {
        let result = ValidatedPassword::new("hunter2");

        assert!(
            matches!(result, Err(Error::TooWeak(_))),
            "want TooWeak error, got {result:?}"
        );
    }

    #[test]
    fn strong_password_is_accepted() {
        assert!(ValidatedPassword::new("correct horse battery staple").is_ok());
    }

    #[test]
    fn hash_verifies_the_original_password() {
        let password = ValidatedPassword::new_unchecked("averygoodsecret42");
        let hash = PasswordHash::with_cost(password, TEST_COST).unwrap();

        assert!(hash.verify("averygoodsecret42").unwrap());
        assert!(!hash.verify("someothersecret").unwrap());
    }

    #[test]
    fn verify_fails_on_garbage_hash() {
        let hash = PasswordHash::new_unchecked("not a bcrypt hash");

        let result = hash.verify("whatever");

        assert!(
            matches!(result, Err(Error::HashingError(_))),
            "want HashingError, got {result:?}"
        );
    }
}
