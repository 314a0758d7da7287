//! Password strength checks and salted hashes for user accounts.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use serde::{Deserialize, Serialize};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// A password that is hard enough to guess, but not yet hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `raw_password`.
    ///
    /// `user_inputs` are words the password should not be built from, e.g.
    /// the account's email address.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] with a suggestion for a stronger password if
    /// the password scores below three out of four.
    pub fn new(raw_password: &str, user_inputs: &[&str]) -> Result<Self, Error> {
        let analysis = zxcvbn(raw_password, user_inputs);

        match analysis.score() {
            Score::Three | Score::Four => Ok(Self(raw_password.to_owned())),
            _ => Err(Error::TooWeak(
                analysis
                    .feedback()
                    .unwrap_or(&Feedback::default())
                    .to_string(),
            )),
        }
    }

    /// Wrap `raw_password` without checking its strength.
    ///
    /// Only meant for seeding test databases.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("********")
    }
}

/// A bcrypt hash of a user's password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The bcrypt cost used outside of tests.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with `cost` rounds.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt rejects the cost or input.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash read back from the database.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Check the strength of `raw_password` and hash it.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] or [Error::HashingError].
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        Self::new(ValidatedPassword::new(raw_password, &[])?, cost)
    }

    /// Whether `raw_password` produced this hash.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod validated_password_tests {
    use crate::{Error, auth::ValidatedPassword};

    #[test]
    fn rejects_empty_password() {
        assert!(matches!(
            ValidatedPassword::new("", &[]),
            Err(Error::TooWeak(_))
        ));
    }

    #[test]
    fn rejects_common_password() {
        assert!(matches!(
            ValidatedPassword::new("password1234", &[]),
            Err(Error::TooWeak(_))
        ));
    }

    #[test]
    fn rejects_password_made_from_user_inputs() {
        let got = ValidatedPassword::new("siti.rahayu@tokobaju.id", &["siti.rahayu@tokobaju.id"]);

        assert!(matches!(got, Err(Error::TooWeak(_))));
    }

    #[test]
    fn accepts_long_password() {
        assert!(ValidatedPassword::new("kain tenun biru dari flores", &[]).is_ok());
    }

    #[test]
    fn display_hides_password() {
        let password = ValidatedPassword::new_unchecked("hunter2");

        assert_eq!(password.to_string(), "********");
    }
}
