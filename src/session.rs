//! Session boundary for the dashboard.
//!
//! Signing out is a capability, not embedded navigation: the destination
//! and the client storage keys to clear come from configuration, and the
//! UI receives them as an explicit directive to execute.

use serde::Serialize;

/// Instructions the client executes to terminate its session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignOutDirective {
    /// Hard-navigation destination after local state is cleared.
    pub redirect: String,
    /// Client storage keys to remove before navigating.
    pub clear_keys: Vec<String>,
}

/// Configured sign-out behavior.
#[derive(Debug, Clone)]
pub struct SessionBoundary {
    redirect_url: String,
    clear_keys: Vec<String>,
}

impl SessionBoundary {
    pub fn new(redirect_url: String, clear_keys: Vec<String>) -> Self {
        Self {
            redirect_url,
            clear_keys,
        }
    }

    pub fn sign_out(&self) -> SignOutDirective {
        SignOutDirective {
            redirect: self.redirect_url.clone(),
            clear_keys: self.clear_keys.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_out_reports_configured_destination_and_keys() {
        let boundary = SessionBoundary::new(
            "https://dashboard.example.com".to_string(),
            vec!["crm-products".to_string()],
        );
        let directive = boundary.sign_out();
        assert_eq!(directive.redirect, "https://dashboard.example.com");
        assert_eq!(directive.clear_keys, vec!["crm-products".to_string()]);
    }
}
