// HTML rendering (templates embedded at build time)

use tera::{Context, Tera};

use crate::models::Snapshot;

pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("index.html", include_str!("../../templates/index.html")),
            ("metrics.html", include_str!("../../templates/metrics.html")),
        ])?;
        Ok(Self { tera })
    }

    /// Dashboard shell; the metrics fragment is loaded by the page itself.
    pub fn index(&self, refresh_secs: u64) -> Result<String, tera::Error> {
        let mut ctx = Context::new();
        ctx.insert("refresh_secs", &refresh_secs);
        self.tera.render("index.html", &ctx)
    }

    pub fn metrics(&self, snapshot: &Snapshot) -> Result<String, tera::Error> {
        let ctx = Context::from_serialize(snapshot)?;
        self.tera.render("metrics.html", &ctx)
    }
}
