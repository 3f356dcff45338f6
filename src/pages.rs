//! HTML pages rendered with Tera

use std::path::Path;
use tera::{Context, Tera};

/// URL prefix the static directory is mounted under
pub const STATIC_PREFIX: &str = "/static";

/// The pages served by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Index,
    Chat,
    Pricing,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Index, Page::Chat, Page::Pricing];

    pub fn template_name(&self) -> &'static str {
        match self {
            Page::Index => "index.html",
            Page::Chat => "chat.html",
            Page::Pricing => "precos.html",
        }
    }
}

/// Parsed templates, loaded once at startup
pub struct Pages {
    tera: Tera,
}

impl Pages {
    /// Load every `*.html` template under `dir` and check the pages exist
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, tera::Error> {
        let glob = dir.as_ref().join("**").join("*.html");
        let tera = Tera::new(&glob.to_string_lossy())?;

        let loaded: Vec<&str> = tera.get_template_names().collect();
        for page in Page::ALL {
            if !loaded.contains(&page.template_name()) {
                return Err(tera::Error::msg(format!(
                    "template '{}' not found in {}",
                    page.template_name(),
                    dir.as_ref().display()
                )));
            }
        }

        Ok(Self { tera })
    }

    pub fn render(&self, page: Page) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("static_prefix", STATIC_PREFIX);
        self.tera.render(page.template_name(), &context)
    }
}
