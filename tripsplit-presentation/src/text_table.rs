use std::{borrow::Cow, fmt::Write};

const COLUMN_GAP: &str = "  ";

#[derive(Default)]
pub struct TextTableBuilder<'a, Seq> {
    headers: &'a [Cow<'a, str>],
    rows: Vec<Seq>,
    alignments: Cow<'a, [Alignment]>,
}

#[derive(Clone, Copy, Default)]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

impl<'a, Seq> TextTableBuilder<'a, Seq>
where
    Seq: AsRef<[Cow<'a, str>]> + Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alignments(mut self, alignments: &'a [Alignment]) -> Self {
        self.alignments = Cow::Borrowed(alignments);
        self
    }

    pub fn headers(mut self, headers: &'a [Cow<'a, str>]) -> Self {
        self.headers = headers;
        if self.alignments.is_empty() {
            self.alignments = Cow::Owned(vec![Alignment::default(); self.headers.len()]);
        }
        self
    }

    pub fn row(mut self, row: Seq) -> Self {
        self.rows.push(row);
        self
    }

    /// Renders a header, a dashed rule and one line per row. Cells beyond
    /// the header count are dropped.
    pub fn build(self) -> String {
        let col_count = self.headers.len();
        if col_count == 0 {
            return String::new();
        }

        let mut col_widths: Vec<usize> = self.headers.iter().map(|h| text_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.as_ref().iter().take(col_count).enumerate() {
                col_widths[i] = col_widths[i].max(text_width(cell));
            }
        }

        let mut out = String::new();
        self.write_line(&mut out, self.headers, &col_widths);

        let rule: Vec<Cow<'_, str>> = col_widths
            .iter()
            .map(|width| Cow::Owned("-".repeat(*width)))
            .collect();
        self.write_line(&mut out, &rule, &col_widths);

        for row in &self.rows {
            self.write_line(&mut out, row.as_ref(), &col_widths);
        }

        out
    }

    fn write_line(&self, out: &mut String, cells: &[Cow<'_, str>], col_widths: &[usize]) {
        let mut line = String::new();
        for (i, width) in col_widths.iter().copied().enumerate() {
            if i > 0 {
                line.push_str(COLUMN_GAP);
            }
            let cell = cells.get(i).map(|c| c.as_ref()).unwrap_or("");
            let alignment = self.alignments.get(i).copied().unwrap_or_default();
            let _ = match alignment {
                Alignment::Left => write!(&mut line, "{cell:<width$}"),
                Alignment::Right => write!(&mut line, "{cell:>width$}"),
            };
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

fn text_width(text: &str) -> usize {
    text.chars().count()
}
