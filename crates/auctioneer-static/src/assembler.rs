//! Turns auctions into finished HTML documents.

use pulldown_cmark::{html, Options, Parser};

use auctioneer_record::Auction;

use crate::assets::listing_css;
use crate::images::ImageHost;
use crate::templates::{ListingContext, PageContext, TemplateEngine};
use crate::tidy::{tidy, TidyOptions};

/// Errors that stop a single listing from rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to render template: {0}")]
    Template(#[from] minijinja::Error),
}

/// Renders listing markdown and assembles it into a styled page.
pub struct Assembler {
    templates: TemplateEngine,
    images: ImageHost,
    escape: bool,
    tidy: TidyOptions,
}

impl Assembler {
    /// Create an assembler resolving photos against `images`. With `escape`
    /// set, titles and descriptions are HTML-escaped before substitution.
    pub fn new(images: ImageHost, escape: bool) -> Self {
        Self {
            templates: TemplateEngine::new(),
            images,
            escape,
            tidy: TidyOptions::default(),
        }
    }

    /// Render and assemble one auction into a complete HTML document.
    pub fn render(&self, auction: &Auction) -> Result<String, RenderError> {
        let markdown = self.render_markdown(auction)?;
        self.assemble(&markdown, auction.title())
    }

    /// Fill the listing template for an auction.
    pub fn render_markdown(&self, auction: &Auction) -> Result<String, RenderError> {
        let context = ListingContext::from_auction(auction, &self.images, self.escape);
        Ok(self.templates.render_listing(&context, self.escape)?)
    }

    /// Convert listing markdown to HTML, wrap it in the page shell and
    /// normalize the result. Normalizer warnings are logged, never returned.
    pub fn assemble(&self, markdown: &str, title: &str) -> Result<String, RenderError> {
        let context = PageContext {
            title: title.to_string(),
            stylesheet: listing_css().to_string(),
            content: markdown_to_html(markdown),
        };
        let page = self.templates.render_page(&context, self.escape)?;

        let tidied = tidy(&page, self.tidy);
        if !tidied.warnings.is_empty() {
            tracing::warn!(
                "HTML normalizer reported {} warnings for '{}'",
                tidied.warnings.len(),
                title
            );
            for warning in &tidied.warnings {
                tracing::warn!("  {}", warning);
            }
        }

        Ok(tidied.document)
    }
}

/// Convert CommonMark to an HTML fragment with no extensions enabled.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty());

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}
