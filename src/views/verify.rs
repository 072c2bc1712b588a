//! Email verification pages.

use super::{escape, layout};

/// `/verify-email`: waiting for the user to confirm their address.
pub fn render_verify_email(email: Option<&str>) -> String {
    let current = match email {
        Some(e) => format!(r#"<p class="muted" style="font-size:.875rem">Current email: {}</p>"#, escape(e)),
        None => String::new(),
    };

    let body = format!(
        r#"<div class="center">
  <div class="card">
    <h1 style="color:#1a105c">Verify Your Email</h1>
    {current}
    <p class="muted">Please check your email for a verification link. Once you've verified your email,
      you'll be able to access the dashboard.</p>
    <p class="muted" style="font-size:.875rem">If you haven't received the email, check your spam folder or click below to resend.</p>
    <a class="button" href="/api/auth/resend-verification">Resend Verification Email</a>
    <p><a class="link" href="/api/auth/logout">Logout</a></p>
  </div>
</div>"#
    );
    layout("Verify Your Email", &body)
}

/// `/verify`: resend goes through the provider's hosted verification prompt.
pub fn render_verify(email: Option<&str>, resend_url: &str) -> String {
    let email = escape(email.unwrap_or("your address"));
    let resend_url = escape(resend_url);

    let body = format!(
        r#"<div class="center">
  <div class="card">
    <h2>Verify Your Email</h2>
    <p class="muted">We've sent a verification email to {email}. Please check your inbox and click the verification link to continue.</p>
    <p class="muted" style="font-size:.875rem">If you haven't received the email, check your spam folder or click below to resend.</p>
    <a class="button" href="{resend_url}">Resend Verification Email</a>
  </div>
</div>"#
    );
    layout("Verify Your Email", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_email_page_shows_address() {
        let html = render_verify_email(Some("fan@example.com"));
        assert!(html.contains("Current email: fan@example.com"));
        assert!(html.contains(r#"href="/api/auth/resend-verification""#));
        assert!(html.contains(r#"href="/api/auth/logout""#));

        assert!(!render_verify_email(None).contains("Current email"));
    }

    #[test]
    fn test_verify_page_escapes_url() {
        let html = render_verify(None, "https://tenant/authorize?a=1&prompt=verify_email");
        assert!(html.contains("a=1&amp;prompt=verify_email"));
        assert!(html.contains("sent a verification email to your address"));
    }
}
