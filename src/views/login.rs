//! Sign-in page.

use super::{escape, layout};

const LOGO_URL: &str = "https://hornets-dashboard-smoky.vercel.app/Charlotte_Hornets_(2014).webp";

pub fn render(team_name: &str, error: bool) -> String {
    let banner = if error {
        r#"<div class="error">Sign-in failed. Please try again.</div>"#
    } else {
        ""
    };
    let team = escape(team_name);

    let body = format!(
        r#"<div class="center">
  <div class="card">
    {banner}
    <img src="{LOGO_URL}" alt="{team} Logo" width="96" height="96" style="max-width:100%;height:auto">
    <h1 style="color:#1a105c">Welcome to {team} Dashboard</h1>
    <p class="muted">Sign in or create an account to access the dashboard</p>
    <a class="button" href="/api/auth/login">Sign In / Sign Up</a>
  </div>
</div>"#
    );
    layout(&format!("{team_name} Dashboard"), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_page() {
        let html = render("Charlotte Hornets", false);
        assert!(html.contains(r#"href="/api/auth/login""#));
        assert!(html.contains("Sign In / Sign Up"));
        assert!(!html.contains("Sign-in failed"));

        assert!(render("Charlotte Hornets", true).contains("Sign-in failed"));
    }
}
