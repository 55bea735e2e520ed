//! The stylesheet embedded in every listing page.

/// Stylesheet for listing pages.
pub fn listing_css() -> &'static str {
    LISTING_CSS
}

const LISTING_CSS: &str = r#"/* Listing theme */
:root {
  --primary-color: #2d3748;
  --secondary-color: #4a5568;
  --accent-color: #3182ce;
  --background-color: #ffffff;
  --text-color: #4a5568;
  --border-color: #e2e8f0;
}

body {
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
  line-height: 1.6;
  color: var(--text-color);
  max-width: 800px;
  margin: 0 auto;
  padding: 2rem;
  background: var(--background-color);
}

h1, h2 {
  color: var(--primary-color);
  margin-top: 2rem;
  margin-bottom: 1rem;
  font-weight: 600;
}

h1 {
  font-size: 2rem;
  border-bottom: 2px solid var(--border-color);
  padding-bottom: 0.5rem;
}

h2 {
  font-size: 1.5rem;
}

/* Photos */
.images-container {
  display: flex;
  gap: 1rem;
  flex-wrap: wrap;
  justify-content: center;
  margin: 2rem 0;
  padding: 1rem;
  background: var(--border-color);
  border-radius: 0.5rem;
}

.images-container img {
  max-width: 100%;
  height: auto;
  border-radius: 0.25rem;
  box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1);
}

ul {
  list-style-type: disc;
  margin-left: 1.5rem;
  margin-bottom: 1.5rem;
}

li {
  margin-bottom: 0.5rem;
}

p {
  margin-bottom: 1rem;
}

.shipping-info {
  background-color: #f7fafc;
  border-left: 4px solid var(--accent-color);
  padding: 1rem;
  margin: 1rem 0;
  border-radius: 0.25rem;
}

/* Responsive */
@media (max-width: 640px) {
  body {
    padding: 1rem;
  }

  .images-container {
    flex-direction: column;
  }
}
"#;
