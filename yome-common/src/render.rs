//! Styled HTML rendering of indexed tables

use crate::html::escape_html;
use crate::table::IndexedTable;
use serde::Serialize;
use std::fmt;

/// Default `id` attribute of rendered tables
pub const DEFAULT_TABLE_ID: &str = "T_yome";

/// A rendered, embeddable HTML fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlDocument(String);

impl HtmlDocument {
    pub fn new(html: String) -> Self {
        Self(html)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for HtmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders an [`IndexedTable`] as an HTML table with CSS applied to data cells
///
/// Index levels render as row headers; consecutive rows repeating the same
/// index prefix are merged with `rowspan`.
pub struct Styler<'a> {
    table: &'a IndexedTable,
    table_id: String,
    properties: Vec<(String, String)>,
}

impl<'a> Styler<'a> {
    pub fn new(table: &'a IndexedTable) -> Self {
        Self {
            table,
            table_id: DEFAULT_TABLE_ID.to_string(),
            properties: Vec::new(),
        }
    }

    pub fn table_id(mut self, id: &str) -> Self {
        self.table_id = id.to_string();
        self
    }

    /// Add a CSS property applied to every data cell
    pub fn set_property(mut self, name: &str, value: &str) -> Self {
        self.properties.push((name.to_string(), value.to_string()));
        self
    }

    pub fn render(&self) -> HtmlDocument {
        let id = escape_html(&self.table_id);
        let mut html = String::new();

        if !self.properties.is_empty() {
            html.push_str("<style type=\"text/css\">\n");
            html.push_str(&format!("#{} td {{\n", id));
            for (name, value) in &self.properties {
                html.push_str(&format!("  {}: {};\n", name, value));
            }
            html.push_str("}\n</style>\n");
        }

        html.push_str(&format!("<table id=\"{}\">\n", id));
        self.render_head(&mut html);
        self.render_body(&mut html);
        html.push_str("</table>\n");

        HtmlDocument::new(html)
    }

    fn render_head(&self, html: &mut String) {
        html.push_str("  <thead>\n    <tr>\n");
        for (level, name) in self.table.index_names().iter().enumerate() {
            html.push_str(&format!(
                "      <th class=\"index_name level{}\">{}</th>\n",
                level,
                escape_html(name)
            ));
        }
        for (col, name) in self.table.columns().iter().enumerate() {
            html.push_str(&format!(
                "      <th class=\"col_heading level0 col{}\">{}</th>\n",
                col,
                escape_html(name)
            ));
        }
        html.push_str("    </tr>\n  </thead>\n");
    }

    fn render_body(&self, html: &mut String) {
        html.push_str("  <tbody>\n");
        for (row, (index, values)) in self.table.entries().enumerate() {
            html.push_str("    <tr>\n");
            for (level, value) in index.iter().enumerate() {
                let span = self.table.level_span(row, level);
                match span {
                    0 => {}
                    1 => html.push_str(&format!(
                        "      <th class=\"row_heading level{} row{}\">{}</th>\n",
                        level,
                        row,
                        escape_html(&value.to_string())
                    )),
                    n => html.push_str(&format!(
                        "      <th class=\"row_heading level{} row{}\" rowspan=\"{}\">{}</th>\n",
                        level,
                        row,
                        n,
                        escape_html(&value.to_string())
                    )),
                }
            }
            for (col, value) in values.iter().enumerate() {
                html.push_str(&format!(
                    "      <td class=\"data row{} col{}\">{}</td>\n",
                    row,
                    col,
                    escape_html(&value.to_string())
                ));
            }
            html.push_str("    </tr>\n");
        }
        html.push_str("  </tbody>\n");
    }
}
