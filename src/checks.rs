//! Pre-flight checks run before a destructive operation.

use crate::platform::{Locale, Platform};

/// Result of validating a user-supplied locale name.
///
/// The validator never terminates the process; the command layer maps each
/// variant to a message and an exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleCheck {
    /// The locale exists on the platform.
    Found,
    /// No locale name was provided.
    NameRequired,
    /// The locale list could not be loaded.
    Unavailable(String),
    /// The named locale is not on the platform.
    Missing(String),
}

impl LocaleCheck {
    /// The message to show for a failed check, `None` when the check passed.
    pub fn failure_message(&self) -> Option<String> {
        match self {
            LocaleCheck::Found => None,
            LocaleCheck::NameRequired => {
                Some("You must provide a locale name (--locale-name).".to_string())
            }
            LocaleCheck::Unavailable(reason) => {
                Some(format!("Locales can't be loaded from the platform: {}", reason))
            }
            LocaleCheck::Missing(name) => Some(format!(
                "Locale {} can't be found. Please create it before continuing.",
                name
            )),
        }
    }
}

/// Check that `locale_name` refers to a locale that exists on the platform.
///
/// An empty name fails fast, nothing is fetched. Matching is case-sensitive
/// exact equality on the locale name.
pub fn check_locale(platform: &dyn Platform, locale_name: &str) -> LocaleCheck {
    if locale_name.is_empty() {
        return LocaleCheck::NameRequired;
    }

    let locales: Vec<Locale> = match platform.pull_locales() {
        Ok(locales) => locales,
        Err(err) => return LocaleCheck::Unavailable(err.to_string()),
    };

    if locales.iter().any(|locale| locale.name == locale_name) {
        LocaleCheck::Found
    } else {
        LocaleCheck::Missing(locale_name.to_string())
    }
}
