// Demo mode: a construction company landing page and a visitor scrolling it
//
// The page carries every animated feature:
// - hero content that fades in on load
// - a stats strip with four counters (projects, clients, years, awards)
// - a skills section with four progress rings
// - service, why-us, project, team, blog and contact cards that reveal on scroll
//
// The scroll script pauses on each section long enough for its animations to
// finish, then moves on. Run with: sitefx demo --speed 2

use crate::dom::PageManifest;
use anyhow::{Context, Result};

const DEMO_PAGE: &str = r#"
title = "Buildex Construction"
viewport_height = 800

# ── Header and hero ──────────────────────────────────────────────────────────

[[elements]]
tag = "header"
id = "header"
top = 0
height = 100

[[elements]]
tag = "section"
id = "home"
class = "hero"
top = 100
height = 700

[[elements.children]]
class = "hero-content"
top = 200
height = 400
text = "Building your vision"

# ── Services ─────────────────────────────────────────────────────────────────

[[elements]]
tag = "section"
id = "services"
top = 800
height = 800

[[elements.children]]
class = "service-card"
top = 150
height = 180
text = "General contracting"

[[elements.children]]
class = "service-card"
top = 350
height = 180
text = "Renovation"

[[elements.children]]
class = "service-card"
top = 550
height = 180
text = "Project management"

# ── Stats ────────────────────────────────────────────────────────────────────

[[elements]]
tag = "section"
id = "stats"
class = "stats-section"
top = 1600
height = 400

[[elements.children]]
tag = "span"
class = "counter"
top = 150
height = 60
text = "0"
attrs = { data-target = 250 }

[[elements.children]]
tag = "span"
class = "counter"
top = 150
height = 60
text = "0"
attrs = { data-target = 1500 }

[[elements.children]]
tag = "span"
class = "counter"
top = 150
height = 60
text = "0"
attrs = { data-target = 35 }

[[elements.children]]
tag = "span"
class = "counter"
top = 150
height = 60
text = "0"
attrs = { data-target = 98 }

# ── Skills ───────────────────────────────────────────────────────────────────

[[elements]]
tag = "section"
id = "about"
class = "skills-section"
top = 2000
height = 600

[[elements.children]]
class = "skill-circle"
top = 200
height = 120
attrs = { data-percent = 95 }

[[elements.children.children]]
tag = "circle"
class = "skill-progress"

[[elements.children]]
class = "skill-circle"
top = 200
height = 120
attrs = { data-percent = 90 }

[[elements.children.children]]
tag = "circle"
class = "skill-progress"

[[elements.children]]
class = "skill-circle"
top = 200
height = 120
attrs = { data-percent = 85 }

[[elements.children.children]]
tag = "circle"
class = "skill-progress"

[[elements.children]]
class = "skill-circle"
top = 200
height = 120
attrs = { data-percent = 88 }

[[elements.children.children]]
tag = "circle"
class = "skill-progress"

# ── Why choose us ────────────────────────────────────────────────────────────

[[elements]]
tag = "section"
id = "why"
top = 2600
height = 600

[[elements.children]]
class = "choose-item"
top = 100
height = 120

[[elements.children]]
class = "choose-item"
top = 250
height = 120

[[elements.children]]
class = "choose-item"
top = 400
height = 120

# ── Projects ─────────────────────────────────────────────────────────────────

[[elements]]
tag = "section"
id = "projects"
top = 3200
height = 700

[[elements.children]]
class = "project-card"
top = 100
height = 160
attrs = { data-category = "residential" }

[[elements.children]]
class = "project-card"
top = 300
height = 160
attrs = { data-category = "commercial" }

[[elements.children]]
class = "project-card"
top = 500
height = 160
attrs = { data-category = "industrial" }

# ── Team and blog ────────────────────────────────────────────────────────────

[[elements]]
tag = "section"
id = "team"
top = 3900
height = 600

[[elements.children]]
class = "team-card"
top = 100
height = 200

[[elements.children]]
class = "team-card"
top = 300
height = 200

[[elements]]
tag = "section"
id = "blog"
top = 4500
height = 600

[[elements.children]]
tag = "article"
class = "blog-card"
top = 100
height = 200

[[elements.children]]
tag = "article"
class = "blog-card"
top = 300
height = 200

# ── Contact and footer ───────────────────────────────────────────────────────

[[elements]]
tag = "section"
id = "contact"
top = 5100
height = 600

[[elements.children]]
class = "contact-item"
top = 100
height = 120

[[elements.children]]
class = "contact-item"
top = 250
height = 120

[[elements.children]]
class = "contact-item"
top = 400
height = 120

[[elements]]
tag = "footer"
top = 5700
height = 300

# ── Visitor ──────────────────────────────────────────────────────────────────

[[scroll]]
at_ms = 1500
y = 700

[[scroll]]
at_ms = 3000
y = 1500

[[scroll]]
at_ms = 7000
y = 2100

[[scroll]]
at_ms = 8500
y = 2800

[[scroll]]
at_ms = 10000
y = 3500

[[scroll]]
at_ms = 11500
y = 4200

[[scroll]]
at_ms = 13000
y = 4800

[[scroll]]
at_ms = 14500
y = 5200
"#;

/// The built-in demo page
pub fn demo_manifest() -> Result<PageManifest> {
    PageManifest::from_toml_str(DEMO_PAGE).context("Built-in demo page is invalid")
}
