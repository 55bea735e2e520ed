//! Template engine for listing markdown and the HTML page shell.

use minijinja::{context, Environment, HtmlEscape, Value};

use auctioneer_record::Auction;

use crate::images::ImageHost;

/// Handling fee quoted in the express shipping clause.
pub const HANDLING_FEE: &str = "$15.00";

/// Shipping clause for listings that offer delivery.
pub const EXPRESS_SHIPPING: &str = "This item will be delivered by Express Post. \
If you live in Perth you can also pick it up. Postage and Handling Costs: $15.00";

/// Shipping clause for pickup-only listings.
pub const PICKUP_ONLY: &str = "Not applicable: pick up in Bibra Lake only";

/// Values substituted into the listing markdown.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ListingContext {
    /// Listing title
    pub title: String,
    /// Description markdown
    pub description: String,
    /// `<img>` tags for the photo strip, one per line
    pub images: String,
    /// The shipping clause
    pub postage: &'static str,
}

impl ListingContext {
    /// Resolve an auction's photos and shipping clause. With `escape` set the
    /// photo attributes are HTML-escaped.
    pub fn from_auction(auction: &Auction, host: &ImageHost, escape: bool) -> Self {
        Self {
            title: auction.title().to_string(),
            description: auction.description().to_string(),
            images: image_section(auction, host, escape),
            postage: postage_clause(auction.shipping_override()),
        }
    }
}

/// Context for the page shell.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PageContext {
    /// Listing title
    pub title: String,
    /// Stylesheet inlined in the head
    pub stylesheet: String,
    /// Rendered body HTML
    pub content: String,
}

/// Pick the shipping clause for a listing.
pub fn postage_clause(shipping_override: bool) -> &'static str {
    if shipping_override {
        EXPRESS_SHIPPING
    } else {
        PICKUP_ONLY
    }
}

/// Build the `<img>` tags for an auction's photos.
///
/// The primary photo is included when non-empty and the secondary one when
/// present and non-empty.
pub fn image_section(auction: &Auction, host: &ImageHost, escape: bool) -> String {
    let photos = std::iter::once(auction.primary_image())
        .chain(auction.secondary_image())
        .filter(|photo| !photo.is_empty());

    photos
        .map(|photo| {
            let src = host.resolve(photo);
            if escape {
                format!(r#"<img src="{}" alt="{}">"#, HtmlEscape(&src), HtmlEscape(photo))
            } else {
                format!(r#"<img src="{}" alt="{}">"#, src, photo)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Template engine using minijinja.
///
/// The listing template is registered twice: as `listing.md`, which renders
/// fields verbatim, and as `listing.html`, which HTML-escapes the title and
/// description.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template("listing.md", LISTING_TEMPLATE)
            .expect("Failed to add listing template");
        env.add_template("listing.html", LISTING_TEMPLATE)
            .expect("Failed to add escaping listing template");
        env.add_template("page.html", PAGE_TEMPLATE)
            .expect("Failed to add page template");

        Self { env }
    }

    /// Render the listing markdown.
    pub fn render_listing(
        &self,
        context: &ListingContext,
        escape: bool,
    ) -> Result<String, minijinja::Error> {
        let name = if escape { "listing.html" } else { "listing.md" };
        let tmpl = self.env.get_template(name)?;

        tmpl.render(context! {
            title => field(&context.title, escape),
            description => field(&context.description, escape),
            images => Value::from_safe_string(context.images.clone()),
            postage => Value::from_safe_string(context.postage.to_string()),
        })
    }

    /// Render the full HTML page around already rendered content.
    pub fn render_page(
        &self,
        context: &PageContext,
        escape: bool,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("page.html")?;

        tmpl.render(context! {
            title => field(&context.title, escape),
            stylesheet => Value::from_safe_string(context.stylesheet.clone()),
            content => Value::from_safe_string(context.content.clone()),
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn field(text: &str, escape: bool) -> Value {
    if escape {
        Value::from(text)
    } else {
        Value::from_safe_string(text.to_string())
    }
}

const LISTING_TEMPLATE: &str = r##"# {{ title }}

<div class="images-container">
{{ images }}
</div>

{{ description }}

## Payment Policy

* Paypal is preferred
* Direct Bank Deposit is also good!
* Item will be shipped immediately on the same or next business day of receiving full payment

## Shipping Policy

Please note that it may take up to 7 days for shipping as we reserve the right for your payment to clear prior to shipping the goods.

The following freight charges are applicable:

* {{ postage }}

## Returns Policy

No exchange or warranty is offered on these goods but we will make every effort to ensure that you get the item in the same condition as it left our premises.

## Terms & Conditions

By bidding on this item you are offering to enter into a contract with the seller. The winning bidder will enter a contract of sale between themselves and the seller only. We reserve the right not to ship the item until the payment has been received in full and has cleared, and will cancel the sale if full payment is not received within 7 days of the auction ending.

## About Us

We are just getting rid of some of our toys to make room for new toys. We love our toys and take good care of them. We hope you will find something that you like. Thanks for looking!
"##;

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{ title }} - eBay Listing</title>
  <style>
{{ stylesheet }}
  </style>
</head>
<body>
{{ content }}
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn auction(yaml: &str) -> Auction {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        Auction::from_yaml(&value).unwrap()
    }

    fn render(yaml: &str) -> String {
        let ctx = ListingContext::from_auction(&auction(yaml), &ImageHost::default(), false);
        TemplateEngine::new().render_listing(&ctx, false).unwrap()
    }

    #[test]
    fn no_photos_means_no_images() {
        let a = auction("title: Kite");
        assert_eq!(image_section(&a, &ImageHost::default(), false), "");

        let markdown = render("title: Kite");
        assert!(!markdown.contains("<img"));
    }

    #[test]
    fn includes_both_photos() {
        let a = auction("title: Kite\nphoto_1: a.jpg\nphoto_2: b.jpg");
        let host = ImageHost::default();

        assert_eq!(
            image_section(&a, &host, false),
            format!(
                "<img src=\"{}\" alt=\"a.jpg\">\n<img src=\"{}\" alt=\"b.jpg\">",
                host.resolve("a.jpg"),
                host.resolve("b.jpg")
            )
        );
    }

    #[test]
    fn secondary_photo_alone() {
        let a = auction("title: Kite\nphoto_2: b.jpg");
        let section = image_section(&a, &ImageHost::default(), false);

        assert_eq!(section.matches("<img").count(), 1);
        assert!(section.contains("alt=\"b.jpg\""));
    }

    #[test]
    fn empty_secondary_photo_is_skipped() {
        let a = auction("title: Kite\nphoto_1: a.jpg\nphoto_2: ''");
        assert_eq!(
            image_section(&a, &ImageHost::default(), false)
                .matches("<img")
                .count(),
            1
        );
    }

    #[test]
    fn express_clause_when_overridden() {
        let markdown = render("title: Book\noverride: true");

        assert!(markdown.contains(EXPRESS_SHIPPING));
        assert!(markdown.contains(HANDLING_FEE));
        assert!(!markdown.contains(PICKUP_ONLY));
    }

    #[test]
    fn pickup_clause_by_default() {
        let markdown = render("title: Book");

        assert!(markdown.contains(PICKUP_ONLY));
        assert!(!markdown.contains(EXPRESS_SHIPPING));
        assert!(!markdown.contains(HANDLING_FEE));
    }

    #[test]
    fn interpolates_title_and_description() {
        let markdown = render("title: Book\ndescription: A great read.");

        assert!(markdown.starts_with("# Book\n"));
        assert!(markdown.contains("\nA great read.\n"));
        assert!(markdown.contains("## Terms & Conditions"));
    }

    #[test]
    fn does_not_escape_fields_by_default() {
        let markdown = render("title: Tom & Jerry\ndescription: '<b>rare</b>'");

        assert!(markdown.contains("# Tom & Jerry"));
        assert!(markdown.contains("<b>rare</b>"));
    }

    #[test]
    fn escapes_fields_on_request() {
        let a = auction("title: Tom & Jerry\ndescription: '<b>rare</b>'\nphoto_1: a.jpg");
        let ctx = ListingContext::from_auction(&a, &ImageHost::default(), true);
        let markdown = TemplateEngine::new().render_listing(&ctx, true).unwrap();

        assert!(markdown.contains("# Tom &amp; Jerry"));
        assert!(markdown.contains("&lt;b&gt;rare&lt;"));
        assert!(markdown.contains("<img src=\"https:&#x2f;&#x2f;"));
        assert!(markdown.contains("alt=\"a.jpg\""));
        assert!(markdown.contains("## Terms & Conditions"));
    }

    #[test]
    fn escapes_photo_attributes_on_request() {
        let a = auction("title: Kite\nphoto_1: 'big \"kite\".jpg'");
        let host = ImageHost::default();

        let escaped = image_section(&a, &host, true);
        assert!(escaped.contains("alt=\"big &quot;kite&quot;.jpg\""));
        assert_eq!(escaped.matches('"').count(), 4);

        let raw = image_section(&a, &host, false);
        assert!(raw.contains("alt=\"big \"kite\".jpg\""));
    }

    #[test]
    fn renders_page_shell() {
        let engine = TemplateEngine::new();
        let context = PageContext {
            title: "Lego".to_string(),
            stylesheet: "p { margin: 0; }".to_string(),
            content: "<p>Hello</p>".to_string(),
        };

        let html = engine.render_page(&context, false).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Lego - eBay Listing</title>"));
        assert!(html.contains("p { margin: 0; }"));
        assert!(html.contains("<p>Hello</p>"));
    }
}
