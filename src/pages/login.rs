//! Login page.

use crate::state::auth::{AuthState, AuthStatus};

#[must_use]
pub fn render(auth: &AuthState) -> String {
    let mut out = String::from("multidraft · sign in\n");
    match auth.status {
        AuthStatus::Checking => out.push_str("Checking saved session...\n"),
        AuthStatus::Authenticated => out.push_str("Signed in.\n"),
        AuthStatus::Unauthenticated if auth.loading => out.push_str("Signing in...\n"),
        AuthStatus::Unauthenticated => out.push_str("Not signed in. Run `multidraft login --user-id <ID>`.\n"),
    }
    if let Some(error) = &auth.error {
        out.push_str(&format!("! {error}\n"));
    }
    out
}

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;
