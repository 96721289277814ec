use tera::{Context, Tera};

const TEMPLATES: [(&str, &str); 8] = [
    ("layout.html", include_str!("../../views/layout.html")),
    ("waitlist_welcome.html", include_str!("../../views/waitlist_welcome.html")),
    ("waitlist_admin.html", include_str!("../../views/waitlist_admin.html")),
    ("referral_invite.html", include_str!("../../views/referral_invite.html")),
    ("referral_admin.html", include_str!("../../views/referral_admin.html")),
    ("referral_sent.html", include_str!("../../views/referral_sent.html")),
    ("alpha_welcome.html", include_str!("../../views/alpha_welcome.html")),
    ("alpha_admin.html", include_str!("../../views/alpha_admin.html")),
];

/// Email bodies, compiled into the binary. `.html` templates auto-escape
/// everything a visitor typed.
#[derive(Clone)]
pub struct EmailTemplates(Tera);

impl EmailTemplates {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self(tera))
    }

    pub fn render(&self, template_name: &str, ctx: &Context) -> Result<String, tera::Error> {
        self.0.render(template_name, ctx)
    }
}

pub fn context(entries: &[(&str, &str)]) -> Context {
    let mut ctx = Context::new();
    for (key, value) in entries.iter().copied() {
        ctx.insert(key, value);
    }
    ctx
}
