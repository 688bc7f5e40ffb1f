//! Registry authentication options.
//!
//! This module aggregates registry credentials supplied through the
//! environment into a single [`RegistryOptions`] value. Several
//! username/password pairs may be configured at once as parallel
//! comma-delimited lists; they are paired positionally, so the two lists
//! must have the same length.

use crate::config::RegistryConfig;
use crate::error::{RemoError, Result};


/// A username/password pair for registry authentication.
///
/// Either part may be empty; an entirely empty credential means anonymous
/// access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Username for authentication
    pub username: String,
    /// Password for authentication
    pub password: String,
}

impl Credential {
    /// Creates a credential pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use libremo::auth::Credential;
    ///
    /// let credential = Credential::new("user", "pass");
    /// assert_eq!(credential.username, "user");
    /// ```
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the HTTP Basic Authorization header value for this
    /// credential, or `None` when both parts are empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use libremo::auth::Credential;
    ///
    /// let credential = Credential::new("user", "pass");
    /// assert_eq!(credential.to_header_value().as_deref(), Some("Basic dXNlcjpwYXNz"));
    /// ```
    pub fn to_header_value(&self) -> Option<String> {
        if self.username.is_empty() && self.password.is_empty() {
            return None;
        }
        use base64::{Engine as _, engine::general_purpose};
        let pair = format!("{}:{}", self.username, self.password);
        let encoded = general_purpose::STANDARD.encode(pair);
        Some(format!("Basic {}", encoded))
    }
}

/// Aggregated options for talking to a registry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistryOptions {
    /// Skip TLS certificate verification
    pub insecure_skip_tls_verify: bool,

    /// Opaque registry token, forwarded as-is when non-empty
    pub registry_token: String,

    /// Ordered credential list, tried in configuration order
    pub credentials: Vec<Credential>,

    /// Allow plain-HTTP registry access
    pub non_ssl: bool,

    /// Requested platform (e.g., "linux/arm64"); empty means no constraint
    pub platform: String,

    /// Fail resolution when the requested platform is unavailable instead
    /// of falling back
    pub force_platform: bool,
}

impl RegistryOptions {
    /// Builds options from a loaded configuration plus caller-supplied
    /// flags.
    ///
    /// The configured username and password strings are each split on
    /// commas and paired positionally, with surrounding whitespace trimmed
    /// from every entry. Unset credentials produce a single anonymous
    /// credential rather than none.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error when the username and password lists
    /// differ in length.
    pub fn from_config(
        config: &RegistryConfig,
        insecure_skip_tls_verify: bool,
        platform: impl Into<String>,
        force_platform: bool,
    ) -> Result<Self> {
        let usernames: Vec<&str> = config.username.split(',').collect();
        let passwords: Vec<&str> = config.password.split(',').collect();
        if usernames.len() != passwords.len() {
            return Err(RemoError::config(format!(
                "{} usernames but {} passwords; the lists must match in length",
                usernames.len(),
                passwords.len()
            )));
        }

        let credentials = usernames
            .iter()
            .zip(passwords.iter())
            .map(|(username, password)| Credential::new(username.trim(), password.trim()))
            .collect();

        Ok(Self {
            insecure_skip_tls_verify,
            registry_token: config.registry_token.clone(),
            credentials,
            non_ssl: config.non_ssl,
            platform: platform.into(),
            force_platform,
        })
    }

    /// Returns the first configured username.
    ///
    /// Kept for callers that predate multi-credential support; the value
    /// is always read from the credential list, never stored separately.
    pub fn username(&self) -> &str {
        self.credentials
            .first()
            .map(|credential| credential.username.as_str())
            .unwrap_or_default()
    }

    /// Returns the first configured password. See [`Self::username`].
    pub fn password(&self) -> &str {
        self.credentials
            .first()
            .map(|credential| credential.password.as_str())
            .unwrap_or_default()
    }
}

/// Builds [`RegistryOptions`] from `REMO_*` environment variables and the
/// given flags.
///
/// # Examples
///
/// ```no_run
/// use libremo::auth::build_registry_options;
///
/// # fn example() -> libremo::error::Result<()> {
/// let options = build_registry_options(false, "linux/amd64", false)?;
/// assert!(!options.credentials.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn build_registry_options(
    insecure_skip_tls_verify: bool,
    platform: &str,
    force_platform: bool,
) -> Result<RegistryOptions> {
    let config = RegistryConfig::from_env()?;
    RegistryOptions::from_config(&config, insecure_skip_tls_verify, platform, force_platform)
}
