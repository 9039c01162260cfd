//! Editor preview of a pointed-to page.

use htmlescape::{encode_attribute, encode_minimal};
use serde::Serialize;

use crate::opengraph::OpenGraph;

/// Site label used when the page does not name its site.
pub const UNKNOWN_SITE: &str = "Unknown Site";

/// Open Graph summary of a URL, as shown next to the pointer field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    /// URL the preview was fetched from
    pub url: String,
    /// Parsed page, `None` when it carries no Open Graph data
    pub page: Option<OpenGraph>,
}

impl Preview {
    /// Renders the preview as an HTML fragment.
    ///
    /// The import checkbox is only offered when the page has an image;
    /// `import_checked` pre-selects it.
    pub fn render_html(&self, import_checked: bool) -> String {
        let Some(page) = &self.page else {
            return "<p class=\"page-pointer-empty\">No preview available</p>".to_string();
        };
        let image = page.image().filter(|image| !image.is_empty());

        let mut html = String::new();
        if let Some(image) = image {
            html.push_str(&format!(
                "<img src=\"{}\" style=\"align:left; margin-right:10px;\" />",
                encode_attribute(image)
            ));
        }
        let site_name = page
            .site_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_SITE);
        html.push_str(&format!(
            "<div class=\"about\"><p><big><a href=\"{}\" target=\"_blank\">{}</a> on {}</big></p>",
            encode_attribute(&self.url),
            encode_minimal(page.title().unwrap_or_default()),
            encode_minimal(site_name)
        ));
        if image.is_some() {
            html.push_str(&format!(
                "<p><label><input type=\"checkbox\" name=\"import_flag\" value=\"1\"{} /> \
                 Import Image and Set as Featured</label></p>",
                if import_checked {
                    " checked=\"checked\""
                } else {
                    ""
                }
            ));
        }
        html.push_str("</div>");
        html
    }
}

/// Renders a fetch failure for the editor.
pub fn render_error(message: &str) -> String {
    format!("<p style=\"color:red;\">{}</p>", encode_minimal(message))
}
