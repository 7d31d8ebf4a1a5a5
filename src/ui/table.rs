//! Table rendering for formatted output.

/// A box-drawing table for formatted output.
///
/// Column widths grow to fit content. When a maximum table width is set and
/// the content overflows it, the last column (by convention the free-text
/// notes column) is shrunk and its cells truncated with an ellipsis.
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    column_widths: Vec<usize>,
    max_width: Option<usize>,
}

impl Table {
    /// Create a new table with the given headers.
    pub fn new(headers: Vec<&str>) -> Self {
        let headers: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let column_widths = headers.iter().map(|h| display_width(h)).collect();

        Self {
            headers,
            rows: Vec::new(),
            column_widths,
            max_width: None,
        }
    }

    /// Cap the rendered table width.
    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = Some(max_width);
        self
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: Vec<String>) {
        for (i, cell) in row.iter().enumerate() {
            if i < self.column_widths.len() {
                self.column_widths[i] = self.column_widths[i].max(display_width(cell));
            }
        }
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table as a string.
    pub fn render(&self) -> String {
        let widths = self.effective_widths();
        let mut output = String::new();

        output.push_str(&render_border(&widths, '┌', '┬', '┐'));
        output.push('\n');

        output.push_str(&render_row(&widths, &self.headers));
        output.push('\n');

        output.push_str(&render_border(&widths, '├', '┼', '┤'));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&render_row(&widths, row));
            output.push('\n');
        }

        output.push_str(&render_border(&widths, '└', '┴', '┘'));

        output
    }

    /// Column widths after applying the max-width cap.
    ///
    /// Each column costs its width plus two padding spaces and one border,
    /// plus the closing border. Only the last column is shrunk, down to a
    /// floor of 10.
    fn effective_widths(&self) -> Vec<usize> {
        let mut widths = self.column_widths.clone();
        if let Some(max) = self.max_width {
            let total: usize = widths.iter().sum::<usize>() + widths.len() * 3 + 1;
            if total > max {
                let excess = total - max;
                if let Some(last) = widths.last_mut() {
                    *last = last.saturating_sub(excess).max(10);
                }
            }
        }
        widths
    }
}

fn render_border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let mut s = String::new();
    s.push(left);
    for (i, width) in widths.iter().enumerate() {
        s.push_str(&"─".repeat(width + 2));
        if i < widths.len() - 1 {
            s.push(mid);
        }
    }
    s.push(right);
    s
}

fn render_row(widths: &[usize], row: &[String]) -> String {
    let mut s = String::from("│");
    for (i, width) in widths.iter().enumerate() {
        let cell = row.get(i).map(|s| s.as_str()).unwrap_or("");
        let cell = truncate(cell, *width);
        let pad = width.saturating_sub(display_width(&cell));
        s.push(' ');
        s.push_str(&cell);
        s.push_str(&" ".repeat(pad));
        s.push_str(" │");
    }
    s
}

/// Truncate a string to a display width, adding an ellipsis when cut.
fn truncate(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Width in terminal cells, approximated as char count.
fn display_width(s: &str) -> usize {
    s.chars().count()
}
