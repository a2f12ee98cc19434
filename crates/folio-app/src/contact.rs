// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use url::Url;
use url::form_urlencoded::byte_serialize;

use crate::focus::ContactField;

const SIGNATURE: &str = "Sent from the folio contact panel";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Message => &self.message,
        }
    }

    pub fn field_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Message => &mut self.message,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for field in ContactField::ALL {
            if self.field(field).trim().is_empty() {
                bail!("{} is required", field.label());
            }
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => bail!("email {email:?} does not look like an address"),
        }
    }

    /// Build the `mailto:` draft for `recipient`. Spaces are encoded as `%20`
    /// so mail clients do not show literal `+` signs.
    pub fn compose_mailto(&self, recipient: &str) -> Result<Url> {
        self.validate()?;
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();

        let subject = format!("Portfolio message from {name}");
        let body = format!("Name: {name}\nEmail: {email}\n\nMessage:\n{message}\n\n-- {SIGNATURE}");

        let mut url = Url::parse(&format!("mailto:{}", recipient.trim()))
            .with_context(|| format!("build mailto address for {recipient:?}"))?;
        url.set_query(Some(&format!(
            "subject={}&body={}",
            encode_component(&subject),
            encode_component(&body)
        )));
        Ok(url)
    }
}

fn encode_component(value: &str) -> String {
    byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::ContactForm;
    use anyhow::Result;

    fn filled() -> ContactForm {
        ContactForm {
            name: "  Sam Lee ".to_owned(),
            email: "sam@example.com".to_owned(),
            message: "Loved the drift simulator & the plots".to_owned(),
        }
    }

    #[test]
    fn mailto_encodes_subject_and_body() -> Result<()> {
        let url = filled().compose_mailto("alex@example.com")?;
        let raw = url.as_str();
        assert!(raw.starts_with("mailto:alex@example.com?subject=Portfolio%20message%20from%20Sam%20Lee&body="));
        assert!(raw.contains("Name%3A%20Sam%20Lee%0AEmail%3A%20sam%40example.com"));
        assert!(raw.contains("simulator%20%26%20the%20plots"));
        assert!(!raw.contains('+'));
        Ok(())
    }

    #[test]
    fn plus_signs_in_input_survive_encoding() -> Result<()> {
        let mut form = filled();
        form.message = "C++ or Rust?".to_owned();
        let url = form.compose_mailto("alex@example.com")?;
        assert!(url.as_str().contains("C%2B%2B%20or%20Rust%3F"));
        Ok(())
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut form = filled();
        form.message = "   ".to_owned();
        let error = form
            .compose_mailto("alex@example.com")
            .expect_err("blank message should fail");
        assert_eq!(error.to_string(), "message is required");
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut form = filled();
        form.email = "sam.example.com".to_owned();
        let error = form.validate().expect_err("no @ should fail");
        assert!(error.to_string().contains("does not look like an address"));
    }
}
