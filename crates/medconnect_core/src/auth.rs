//! crates/medconnect_core/src/auth.rs
//!
//! Login and registration forms of the landing screen.
//!
//! Validation failures are reported per field and never reach the session
//! controller; only a successful check yields a [`UserIdentity`].

use tracing::{debug, warn};

use crate::domain::{Account, UserIdentity};
use crate::ports::{PortError, UserDirectory};

pub const MIN_PASSWORD_LEN: usize = 6;

pub const EMAIL_REQUIRED: &str = "Por favor, escribe tu correo electrónico";
pub const EMAIL_MALFORMED: &str = "El correo debe incluir el símbolo @";
pub const PASSWORD_REQUIRED: &str = "Por favor, escribe tu contraseña";
pub const PASSWORD_TOO_SHORT: &str = "La contraseña debe tener al menos 6 caracteres";
pub const NAME_REQUIRED: &str = "Por favor, escribe tu nombre completo";
pub const CONFIRMATION_REQUIRED: &str = "Por favor, confirma tu contraseña";
pub const CONFIRMATION_MISMATCH: &str = "Las contraseñas no coinciden";
pub const BAD_CREDENTIALS: &str = "Correo o contraseña incorrectos";
pub const EMAIL_TAKEN: &str = "Este correo ya está registrado. Intenta iniciar sesión";

/// One inline message slot per form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
    pub confirm_password: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.confirm_password.is_none()
    }

    fn email(message: &'static str) -> Self {
        Self {
            email: Some(message),
            ..Self::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("The form has invalid fields")]
    Rejected(FieldErrors),
    #[error("Account directory error: {0}")]
    Port(#[from] PortError),
}

fn email_error(email: &str) -> Option<&'static str> {
    if email.trim().is_empty() {
        Some(EMAIL_REQUIRED)
    } else if !email.contains('@') {
        Some(EMAIL_MALFORMED)
    } else {
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Field checks only. The length rule is a registration policy, so a short
    /// wrong password still ends in the credential mismatch message.
    pub fn validate(&self) -> FieldErrors {
        FieldErrors {
            email: email_error(&self.email),
            password: self.password.trim().is_empty().then_some(PASSWORD_REQUIRED),
            ..FieldErrors::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> FieldErrors {
        let password = if self.password.trim().is_empty() {
            Some(PASSWORD_REQUIRED)
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            Some(PASSWORD_TOO_SHORT)
        } else {
            None
        };
        let confirm_password = if self.confirm_password.trim().is_empty() {
            Some(CONFIRMATION_REQUIRED)
        } else if self.password != self.confirm_password {
            Some(CONFIRMATION_MISMATCH)
        } else {
            None
        };

        FieldErrors {
            name: self.name.trim().is_empty().then_some(NAME_REQUIRED),
            email: email_error(&self.email),
            password,
            confirm_password,
        }
    }
}

/// Checks a login form against the directory.
pub async fn login(
    directory: &dyn UserDirectory,
    form: &LoginForm,
) -> Result<UserIdentity, AuthError> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Err(AuthError::Rejected(errors));
    }

    match directory.find_by_email(&form.email).await {
        Ok(account) if account.password == form.password => {
            debug!(email = %account.email, "Credentials accepted.");
            Ok(account.identity())
        }
        Ok(_) | Err(PortError::NotFound(_)) => {
            warn!(email = %form.email, "Credential mismatch.");
            Err(AuthError::Rejected(FieldErrors::email(BAD_CREDENTIALS)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Validates a registration form and stores the new account.
pub async fn register(
    directory: &dyn UserDirectory,
    form: &RegistrationForm,
) -> Result<UserIdentity, AuthError> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Err(AuthError::Rejected(errors));
    }

    let account = Account {
        name: form.name.trim().to_string(),
        email: form.email.clone(),
        password: form.password.clone(),
    };
    match directory.register(account).await {
        Ok(identity) => Ok(identity),
        Err(PortError::Conflict(_)) => Err(AuthError::Rejected(FieldErrors::email(EMAIL_TAKEN))),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortResult;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeDirectory {
        accounts: Mutex<Vec<Account>>,
    }

    impl FakeDirectory {
        fn with_demo() -> Self {
            Self {
                accounts: Mutex::new(vec![Account {
                    name: "Usuario Demo".to_string(),
                    email: "demo@medconnect.com".to_string(),
                    password: "demo123".to_string(),
                }]),
            }
        }
    }

    #[async_trait]
    impl UserDirectory for FakeDirectory {
        async fn find_by_email(&self, email: &str) -> PortResult<Account> {
            self.accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.email == email)
                .cloned()
                .ok_or_else(|| PortError::NotFound(email.to_string()))
        }

        async fn register(&self, account: Account) -> PortResult<UserIdentity> {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.iter().any(|a| a.email == account.email) {
                return Err(PortError::Conflict(account.email));
            }
            let identity = account.identity();
            accounts.push(account);
            Ok(identity)
        }
    }

    fn login_form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn rejected(result: Result<UserIdentity, AuthError>) -> FieldErrors {
        match result {
            Err(AuthError::Rejected(errors)) => errors,
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn demo_account_logs_in() {
        let directory = FakeDirectory::with_demo();
        let user = login(&directory, &login_form("demo@medconnect.com", "demo123"))
            .await
            .unwrap();
        assert_eq!(user, UserIdentity::new("Usuario Demo", "demo@medconnect.com"));
    }

    #[tokio::test]
    async fn wrong_password_is_reported_on_email() {
        let directory = FakeDirectory::with_demo();
        let errors = rejected(login(&directory, &login_form("demo@medconnect.com", "wrong")).await);
        assert_eq!(errors.email, Some(BAD_CREDENTIALS));
        assert_eq!(errors.password, None);

        let errors = rejected(login(&directory, &login_form("nadie@medconnect.com", "demo123")).await);
        assert_eq!(errors.email, Some(BAD_CREDENTIALS));
    }

    #[tokio::test]
    async fn malformed_login_fields_are_rejected_before_lookup() {
        let directory = FakeDirectory::with_demo();
        let errors = rejected(login(&directory, &login_form("", "")).await);
        assert_eq!(errors.email, Some(EMAIL_REQUIRED));
        assert_eq!(errors.password, Some(PASSWORD_REQUIRED));

        let errors = rejected(login(&directory, &login_form("demo.medconnect.com", "demo123")).await);
        assert_eq!(errors.email, Some(EMAIL_MALFORMED));
    }

    #[test]
    fn registration_checks_every_field() {
        let errors = RegistrationForm {
            name: "  ".to_string(),
            email: "ana".to_string(),
            password: "abc".to_string(),
            confirm_password: String::new(),
        }
        .validate();
        assert_eq!(errors.name, Some(NAME_REQUIRED));
        assert_eq!(errors.email, Some(EMAIL_MALFORMED));
        assert_eq!(errors.password, Some(PASSWORD_TOO_SHORT));
        assert_eq!(errors.confirm_password, Some(CONFIRMATION_REQUIRED));

        let errors = RegistrationForm {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "secreto1".to_string(),
            confirm_password: "secreto2".to_string(),
        }
        .validate();
        assert_eq!(errors.confirm_password, Some(CONFIRMATION_MISMATCH));
        assert_eq!(errors.password, None);
    }

    #[tokio::test]
    async fn registration_stores_account_and_rejects_duplicates() {
        let directory = FakeDirectory::with_demo();
        let form = RegistrationForm {
            name: "Ana López".to_string(),
            email: "ana@example.com".to_string(),
            password: "secreto".to_string(),
            confirm_password: "secreto".to_string(),
        };
        let user = register(&directory, &form).await.unwrap();
        assert_eq!(user.name, "Ana López");

        let again = login(&directory, &login_form("ana@example.com", "secreto")).await;
        assert!(again.is_ok());

        let duplicate = RegistrationForm {
            email: "demo@medconnect.com".to_string(),
            ..form
        };
        let errors = rejected(register(&directory, &duplicate).await);
        assert_eq!(errors.email, Some(EMAIL_TAKEN));
    }
}
