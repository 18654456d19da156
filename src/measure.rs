use crate::model::Table;
use unicode_width::UnicodeWidthStr;

pub struct TextMetrics {
    pub char_width: f64,
    pub line_height: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub header_height: f64,
    pub min_table_width: f64,
    pub min_table_height: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 32.0,
            padding_x: 16.0,
            padding_y: 8.0,
            header_height: 42.0,
            min_table_width: 224.0,
            min_table_height: 80.0,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    /// Estimated on-canvas size of a table. A stored width wins over the
    /// estimate.
    pub fn table_size(&self, table: &Table) -> (f64, f64) {
        let header_width = self.text_width(&table.name);

        let max_field_width = table
            .fields
            .iter()
            .map(|f| {
                self.text_width(&f.name) + self.text_width(&f.data_type.name) + self.char_width * 2.0
            })
            .fold(0.0, f64::max);

        let content_width = header_width.max(max_field_width) + self.padding_x * 2.0;
        let width = table
            .width
            .unwrap_or_else(|| content_width.max(self.min_table_width));

        let body_height = if table.fields.is_empty() {
            0.0
        } else {
            table.fields.len() as f64 * self.line_height + self.padding_y * 2.0
        };
        let height = (self.header_height + body_height).max(self.min_table_height);

        (width, height)
    }
}
