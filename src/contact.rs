use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Acknowledgement shown after the contact form is submitted
pub const ACKNOWLEDGEMENT: &str = "Thank you for your message! We will get back to you soon.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

/// Contact form fields; kept locally, never sent anywhere
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Record of an accepted submission
#[derive(Debug, Clone, Serialize)]
pub struct ContactReceipt {
    pub form: ContactForm,
    pub received_at: DateTime<Utc>,
    pub acknowledgement: &'static str,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::MissingField("Name"));
        }
        if self.email.trim().is_empty() {
            return Err(ContactError::MissingField("Email"));
        }
        if !self.email.contains('@') {
            return Err(ContactError::InvalidEmail(self.email.clone()));
        }
        if self.message.trim().is_empty() {
            return Err(ContactError::MissingField("Message"));
        }
        Ok(())
    }

    /// Log the message, acknowledge it and reset the form
    pub fn submit(&mut self) -> Result<ContactReceipt, ContactError> {
        self.validate()?;

        let form = std::mem::take(self);
        info!(
            "Contact form submitted by {} <{}>: {}",
            form.name, form.email, form.message
        );

        Ok(ContactReceipt {
            form,
            received_at: Utc::now(),
            acknowledgement: ACKNOWLEDGEMENT,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_acknowledges_and_clears() {
        let mut form = ContactForm::new("Asha", "asha@example.com", "Leaves look odd");
        let receipt = form.submit().unwrap();

        assert_eq!(receipt.acknowledgement, ACKNOWLEDGEMENT);
        assert_eq!(receipt.form.name, "Asha");
        assert_eq!(form, ContactForm::default());
    }

    #[test]
    fn test_missing_fields() {
        let mut form = ContactForm::new("", "a@b.c", "hi");
        assert_eq!(form.submit().unwrap_err(), ContactError::MissingField("Name"));
        assert_eq!(form.email, "a@b.c", "rejected form keeps its contents");

        let form = ContactForm::new("A", " ", "hi");
        assert_eq!(form.validate().unwrap_err(), ContactError::MissingField("Email"));

        let form = ContactForm::new("A", "a@b.c", "");
        assert_eq!(form.validate().unwrap_err(), ContactError::MissingField("Message"));
    }

    #[test]
    fn test_invalid_email() {
        let form = ContactForm::new("A", "not-an-email", "hi");
        assert!(matches!(form.validate(), Err(ContactError::InvalidEmail(_))));
    }
}
