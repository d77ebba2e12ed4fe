//! A human browsable HTML representation, the "discoverable API" page.
//!
//! [`HtmlCodec`] renders the payload as a JSON preview together with links to every other
//! representation the endpoint offers. Register it on top of the default codecs with
//! [`discoverable_content_types`].

use bytes::Bytes;
use micro_rest_codec::{Codec, CodecContext, ContentTypeRegistry, DecodeError, EncodeError, JsonCodec};
use minijinja::Environment;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

const TEMPLATE_NAME: &str = "page.html";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{ title }}</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css">
</head>
<body>
  <nav class="navbar navbar-dark bg-dark mb-4">
    <div class="container"><span class="navbar-brand">{{ branding_title }}</span></div>
  </nav>
  <div class="container">
{%- if error %}
    <h1>{{ error.status }} {{ error.reason }}</h1>
  {%- if json %}
    <pre>{{ json }}</pre>
  {%- endif %}
{%- else %}
    <h1>{{ heading }}</h1>
    <h2>Data</h2>
    <pre>{{ json }}</pre>
{%- endif %}
    <h2>Content types</h2>
    <table class="table">
      <thead><tr><th>Mime type</th><th>Description</th><th></th></tr></thead>
      <tbody>
{%- for link in links %}
        <tr>
          <td><a href="{{ link.href }}">{{ link.mime_type }}</a></td>
          <td>{{ link.description }}</td>
          <td><a href="{{ link.download_href }}">download .{{ link.extension }}</a></td>
        </tr>
{%- endfor %}
      </tbody>
    </table>
  </div>
</body>
</html>
"#;

#[derive(Debug, Clone)]
pub struct HtmlCodec {
    title: String,
    branding_title: Option<String>,
    heading: Option<String>,
    max_preview_items: usize,
}

#[derive(Serialize)]
struct Page<'a> {
    title: &'a str,
    branding_title: &'a str,
    heading: &'a str,
    json: Option<String>,
    error: Option<ErrorStatus<'a>>,
    links: Vec<Link<'a>>,
}

#[derive(Serialize)]
struct ErrorStatus<'a> {
    status: u16,
    reason: &'a str,
}

#[derive(Serialize)]
struct Link<'a> {
    mime_type: &'a str,
    extension: &'a str,
    description: &'a str,
    href: String,
    download_href: String,
}

impl HtmlCodec {
    pub const MIME_TYPE: &'static str = "text/html";

    pub fn new() -> Self {
        Self { title: "REST API".to_string(), branding_title: None, heading: None, max_preview_items: 5 }
    }

    /// The page title, also the default branding title and heading.
    #[must_use]
    pub fn title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn branding_title<S: Into<String>>(mut self, branding_title: S) -> Self {
        self.branding_title = Some(branding_title.into());
        self
    }

    #[must_use]
    pub fn heading<S: Into<String>>(mut self, heading: S) -> Self {
        self.heading = Some(heading.into());
        self
    }

    /// How many items of a list payload the preview shows.
    #[must_use]
    pub fn max_preview_items(mut self, max_preview_items: usize) -> Self {
        self.max_preview_items = max_preview_items;
        self
    }

    /// Pretty JSON of `value`, lists longer than the preview limit cut short with a note.
    fn preview(&self, value: &Value) -> Result<String, EncodeError> {
        match value {
            Value::Array(items) if items.len() > self.max_preview_items => {
                let shown = Value::Array(items[..self.max_preview_items].to_vec());
                let json = JsonCodec::to_pretty(&shown)?;
                let open = json.trim_end().strip_suffix(']').unwrap_or(json.as_str()).trim_end();
                Ok(format!(
                    "{open}\n  // ... only showing the first {}. There are {} in total.\n]",
                    self.max_preview_items,
                    items.len()
                ))
            }
            _ => JsonCodec::to_pretty(value),
        }
    }

    fn page<'a>(&'a self, value: &Value, ctx: &CodecContext<'a>) -> Result<Page<'a>, EncodeError> {
        let (json, error) = if ctx.is_error_status() {
            // the error page is best effort, a payload that can not be shown is left out
            let json = JsonCodec::to_pretty(value).ok();
            (json, Some(ErrorStatus { status: ctx.status().as_u16(), reason: ctx.reason() }))
        } else {
            (Some(self.preview(value)?), None)
        };

        Ok(Page {
            title: &self.title,
            branding_title: self.branding_title.as_deref().unwrap_or(&self.title),
            heading: self.heading.as_deref().unwrap_or(&self.title),
            json,
            error,
            links: links(ctx.content_types()),
        })
    }
}

impl Default for HtmlCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn links(content_types: &ContentTypeRegistry) -> Vec<Link<'_>> {
    content_types
        .iter()
        .filter_map(|codec| {
            let mime_type = codec.mime_type();
            let href = serde_urlencoded::to_string([("mimetype", mime_type)]);
            let download_href = serde_urlencoded::to_string([("mimetype", mime_type), ("downloadfile", "true")]);
            match (href, download_href) {
                (Ok(href), Ok(download_href)) => Some(Link {
                    mime_type,
                    extension: codec.extension(),
                    description: codec.description(),
                    href: format!("?{href}"),
                    download_href: format!("?{download_href}"),
                }),
                _ => {
                    trace!(mime_type, "skip link that can not be url encoded");
                    None
                }
            }
        })
        .collect()
}

impl Codec for HtmlCodec {
    fn mime_type(&self) -> &str {
        Self::MIME_TYPE
    }

    fn extension(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "Formatted HTML view with help for the REST API."
    }

    fn encode(&self, value: &Value, ctx: &CodecContext<'_>) -> Result<Bytes, EncodeError> {
        let page = self.page(value, ctx)?;

        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, PAGE_TEMPLATE).map_err(EncodeError::new)?;
        let template = env.get_template(TEMPLATE_NAME).map_err(EncodeError::new)?;
        let rendered = template.render(page).map_err(EncodeError::new)?;

        Ok(Bytes::from(rendered))
    }

    fn decode(&self, _raw: &[u8], _ctx: &CodecContext<'_>) -> Result<Value, DecodeError> {
        Err(DecodeError::new("text/html request bodies are not supported"))
    }
}

/// The default codecs (JSON, YAML) plus [`HtmlCodec`].
pub fn discoverable_content_types() -> ContentTypeRegistry {
    ContentTypeRegistry::defaults().merge(&ContentTypeRegistry::new().with(HtmlCodec::new()))
}
