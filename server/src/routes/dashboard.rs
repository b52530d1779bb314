//! Member dashboard placeholders.
//!
//! The portal sections are not built yet; each renders a "coming soon" page in
//! the site's layout so navigation works end to end.

use axum::extract::Path;
use axum::response::Html;

use crate::error::ApiError;

pub struct DashboardSection {
    pub slug: &'static str,
    pub title: &'static str,
    pub blurb: &'static str,
}

pub const SECTIONS: &[DashboardSection] = &[
    DashboardSection {
        slug: "training",
        title: "Training Plans",
        blurb: "Personalised weekly programming built around your goals.",
    },
    DashboardSection {
        slug: "nutrition",
        title: "Nutrition",
        blurb: "Meal guidance and macro targets from our coaches.",
    },
    DashboardSection {
        slug: "bookings",
        title: "Class Bookings",
        blurb: "Reserve spots in group classes and manage your waitlist.",
    },
    DashboardSection {
        slug: "orders",
        title: "Orders",
        blurb: "Track apparel and supplement orders from the studio shop.",
    },
    DashboardSection {
        slug: "billing",
        title: "Billing",
        blurb: "Manage your membership, payment method, and receipts.",
    },
];

fn find_section(slug: &str) -> Option<&'static DashboardSection> {
    SECTIONS.iter().find(|s| s.slug == slug)
}

/// Wrap `body` in the shared site chrome.
fn render_page(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title} | Ironwood Fitness</title>
  <link rel="stylesheet" href="/css/site.css">
</head>
<body>
  <header class="site-header">
    <a class="brand" href="/">Ironwood Fitness</a>
    <nav><a href="/dashboard">Dashboard</a> <a href="/pricing/">Pricing</a> <a href="/login/">Sign in</a></nav>
  </header>
  <main class="dashboard">
{body}
  </main>
</body>
</html>
"#
    )
}

fn render_overview() -> String {
    let cards: String = SECTIONS
        .iter()
        .map(|s| {
            format!(
                "    <a class=\"card\" href=\"/dashboard/{}\"><h2>{}</h2><p>{}</p></a>\n",
                s.slug, s.title, s.blurb
            )
        })
        .collect();
    let body = format!("    <h1>Your dashboard</h1>\n    <div class=\"cards\">\n{cards}    </div>");
    render_page("Dashboard", &body)
}

fn render_coming_soon(section: &DashboardSection) -> String {
    let body = format!(
        "    <h1>{}</h1>\n    <p class=\"coming-soon\">Coming soon</p>\n    <p>{}</p>\n    <p><a href=\"/dashboard\">Back to dashboard</a></p>",
        section.title, section.blurb
    );
    render_page(section.title, &body)
}

/// `GET /dashboard`: section overview.
pub async fn overview() -> Html<String> {
    Html(render_overview())
}

/// `GET /dashboard/{section}`: coming-soon page for a known section.
pub async fn section(Path(slug): Path<String>) -> Result<Html<String>, ApiError> {
    let section = find_section(&slug).ok_or_else(|| ApiError::NotFound("no such dashboard section".to_owned()))?;
    Ok(Html(render_coming_soon(section)))
}
