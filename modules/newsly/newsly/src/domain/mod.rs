use std::fmt;

pub mod access;
pub mod account;
pub mod auth;
pub mod catalog;
pub mod error;
pub mod feed;
pub mod fields;
pub mod options;
pub mod preferences;
pub mod preview;
pub mod render;
pub mod session;
pub mod store;
pub mod validation;
pub mod wizard;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod wizard_test;

/// Page the application moves to after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Onboarding,
    SignIn,
    SignUp,
    Settings,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Onboarding => "/onboarding",
            Self::SignIn => "/signin",
            Self::SignUp => "/signup",
            Self::Settings => "/settings",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
