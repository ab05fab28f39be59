//! Security policies and the two marketplace variants
//!
//! Every behavior that differs between the vulnerable and the hardened build is
//! expressed as a policy value here, and [`Variant::profile`] bundles them. A
//! process runs exactly one variant.

use crate::error::{CarlotError, ErrorContext};
use crate::sanitize::SanitizationPolicy;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Content security policy sent by the hardened variant
pub const HARDENED_CSP: &str = "default-src 'self'; \
script-src 'self' https://cdn.jsdelivr.net; \
style-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net https://fonts.googleapis.com; \
img-src 'self' data:; \
font-src 'self' data: https://fonts.gstatic.com; \
object-src 'none'; base-uri 'self'; frame-ancestors 'self'";

/// Default session cookie name
pub const SESSION_COOKIE_NAME: &str = "carlot_session";

/// Which build of the marketplace this process serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Vulnerable,
    Hardened,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Vulnerable => "vulnerable",
            Variant::Hardened => "hardened",
        }
    }

    /// Resolve the policy bundle for this variant
    pub fn profile(&self) -> SecurityProfile {
        match self {
            Variant::Vulnerable => SecurityProfile {
                variant: *self,
                sanitization: SanitizationPolicy::None,
                csrf: CsrfPolicy::Disabled,
                cookie: CookiePolicy {
                    name: SESSION_COOKIE_NAME.to_string(),
                    same_site: SameSitePolicy::None,
                    // Browsers drop SameSite=None cookies without Secure
                    secure: true,
                    http_only: false,
                },
                headers: SecurityHeaders::none(),
                message: MessagePolicy::Reflect,
                catalog: CatalogPolicy::Raw,
            },
            Variant::Hardened => SecurityProfile {
                variant: *self,
                sanitization: SanitizationPolicy::Strict,
                csrf: CsrfPolicy::SessionToken,
                cookie: CookiePolicy {
                    name: SESSION_COOKIE_NAME.to_string(),
                    same_site: SameSitePolicy::Lax,
                    secure: true,
                    http_only: true,
                },
                headers: SecurityHeaders::hardened(),
                message: MessagePolicy::Escaped,
                catalog: CatalogPolicy::Sanitized,
            },
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = CarlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vulnerable" => Ok(Variant::Vulnerable),
            "hardened" => Ok(Variant::Hardened),
            other => Err(CarlotError::Validation {
                message: format!(
                    "Invalid variant '{}'. Must be one of: vulnerable, hardened",
                    other
                ),
                field: Some("variant".to_string()),
                context: ErrorContext::new("policy").with_operation("parse_variant"),
            }),
        }
    }
}

/// Cross-site request forgery protection for state-changing requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsrfPolicy {
    /// POSTs are accepted without any token
    Disabled,
    /// POSTs must echo the token stored in the caller's session
    SessionToken,
}

impl CsrfPolicy {
    pub fn is_enforced(&self) -> bool {
        matches!(self, CsrfPolicy::SessionToken)
    }
}

/// `SameSite` attribute of the session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    None,
    Lax,
    Strict,
}

/// Attributes of the session cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookiePolicy {
    pub name: String,
    pub same_site: SameSitePolicy,
    pub secure: bool,
    pub http_only: bool,
}

/// Headers attached to every response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityHeaders {
    pub content_security_policy: Option<String>,
    pub x_content_type_options: bool,
    pub referrer_policy: Option<String>,
}

impl SecurityHeaders {
    /// No hardening headers at all
    pub fn none() -> Self {
        Self {
            content_security_policy: None,
            x_content_type_options: false,
            referrer_policy: None,
        }
    }

    pub fn hardened() -> Self {
        Self {
            content_security_policy: Some(HARDENED_CSP.to_string()),
            x_content_type_options: true,
            referrer_policy: Some("same-origin".to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content_security_policy.is_none()
            && !self.x_content_type_options
            && self.referrer_policy.is_none()
    }
}

/// How the sell confirmation message is built and rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagePolicy {
    /// Echo raw form input inside HTML and render it unescaped
    Reflect,
    /// Plain-text summary rendered with escaping
    Escaped,
}

impl MessagePolicy {
    /// Build the confirmation shown after a successful listing.
    ///
    /// `year` and `price` are the raw form values, as typed by the seller.
    pub fn confirmation(
        &self,
        make: &str,
        model: &str,
        year: &str,
        price: &str,
        description: &str,
    ) -> String {
        match self {
            MessagePolicy::Reflect => format!(
                "Thanks! Listed <strong>{} {}</strong> ({}) for ${}. Description: {}",
                make, model, year, price, description
            ),
            MessagePolicy::Escaped => {
                format!("{} {} ({}) for ${} successfully listed", make, model, year, price)
            }
        }
    }

    /// Whether the message is trusted HTML (not escaped by templates)
    pub fn renders_raw(&self) -> bool {
        matches!(self, MessagePolicy::Reflect)
    }
}

/// How stored descriptions are prepared for the catalog page.
///
/// The result is emitted as markup, without template escaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogPolicy {
    /// Stored text goes out unchanged
    Raw,
    /// Stored text is run through the strict sanitizer again
    Sanitized,
}

impl CatalogPolicy {
    pub fn render<'a>(&self, description: &'a str) -> Cow<'a, str> {
        match self {
            CatalogPolicy::Raw => Cow::Borrowed(description),
            CatalogPolicy::Sanitized => SanitizationPolicy::Strict.sanitize(description),
        }
    }
}

/// The full set of policies a variant runs with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityProfile {
    pub variant: Variant,
    pub sanitization: SanitizationPolicy,
    pub csrf: CsrfPolicy,
    pub cookie: CookiePolicy,
    pub headers: SecurityHeaders,
    pub message: MessagePolicy,
    pub catalog: CatalogPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parsing() {
        assert_eq!("vulnerable".parse::<Variant>().unwrap(), Variant::Vulnerable);
        assert_eq!(" Hardened ".parse::<Variant>().unwrap(), Variant::Hardened);

        let err = "safe".parse::<Variant>().unwrap_err();
        assert!(err.to_string().contains("Invalid variant 'safe'"));
    }

    #[test]
    fn test_variant_display_round_trips() {
        for variant in [Variant::Vulnerable, Variant::Hardened] {
            assert_eq!(variant.to_string().parse::<Variant>().unwrap(), variant);
        }
    }

    #[test]
    fn test_vulnerable_profile() {
        let profile = Variant::Vulnerable.profile();
        assert_eq!(profile.sanitization, SanitizationPolicy::None);
        assert!(!profile.csrf.is_enforced());
        assert_eq!(profile.cookie.same_site, SameSitePolicy::None);
        assert!(profile.cookie.secure);
        assert!(!profile.cookie.http_only);
        assert!(profile.headers.is_empty());
        assert!(profile.message.renders_raw());
        assert_eq!(profile.catalog, CatalogPolicy::Raw);
    }

    #[test]
    fn test_hardened_profile() {
        let profile = Variant::Hardened.profile();
        assert_eq!(profile.sanitization, SanitizationPolicy::Strict);
        assert!(profile.csrf.is_enforced());
        assert_eq!(profile.cookie.same_site, SameSitePolicy::Lax);
        assert!(profile.cookie.secure);
        assert!(profile.cookie.http_only);
        assert_eq!(
            profile.headers.content_security_policy.as_deref(),
            Some(HARDENED_CSP)
        );
        assert!(!profile.message.renders_raw());
        assert_eq!(profile.catalog, CatalogPolicy::Sanitized);
    }

    #[test]
    fn test_each_variant_keeps_one_message_defect() {
        let vulnerable = Variant::Vulnerable.profile();
        let hardened = Variant::Hardened.profile();
        assert_ne!(vulnerable.message, hardened.message);
        assert_ne!(vulnerable.sanitization, hardened.sanitization);
        assert_ne!(vulnerable.catalog, hardened.catalog);
    }

    #[test]
    fn test_same_site_none_is_always_secure() {
        for variant in [Variant::Vulnerable, Variant::Hardened] {
            let cookie = variant.profile().cookie;
            if cookie.same_site == SameSitePolicy::None {
                assert!(cookie.secure, "{} sends SameSite=None without Secure", variant);
            }
        }
    }

    #[test]
    fn test_catalog_rendering() {
        let payload = "<script>alert(1)</script><b>Clean</b> car";

        let raw = CatalogPolicy::Raw.render(payload);
        assert_eq!(raw, payload);
        assert!(matches!(raw, Cow::Borrowed(_)));

        let sanitized = CatalogPolicy::Sanitized.render(payload);
        assert_eq!(sanitized, "Clean car");
        assert_eq!(CatalogPolicy::Sanitized.render("Tom & Jerry"), "Tom &amp; Jerry");
    }

    #[test]
    fn test_csp_restricts_sources() {
        assert!(HARDENED_CSP.starts_with("default-src 'self'; script-src 'self' https://cdn.jsdelivr.net;"));
        assert!(HARDENED_CSP.contains("object-src 'none'"));
        assert!(HARDENED_CSP.ends_with("frame-ancestors 'self'"));
    }

    #[test]
    fn test_confirmation_messages() {
        let reflected = MessagePolicy::Reflect.confirmation(
            "Ford",
            "Focus",
            "2021",
            "9999",
            "<script>alert(1)</script>",
        );
        assert_eq!(
            reflected,
            "Thanks! Listed <strong>Ford Focus</strong> (2021) for $9999. Description: <script>alert(1)</script>"
        );

        let escaped =
            MessagePolicy::Escaped.confirmation("Ford", "Focus", "2021", "9999", "ignored");
        assert_eq!(escaped, "Ford Focus (2021) for $9999 successfully listed");
    }
}
