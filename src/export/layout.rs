/// Fixed page geometry for one export call, in points. A4 with the margins
/// and leading the exporter has always used.
#[derive(Clone, Copy)]
pub struct PageLayout {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub margin_pt: f32,
    pub line_height_pt: f32,
    pub font_size_pt: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width_pt: 595.28,
            page_height_pt: 841.89,
            margin_pt: 56.0,
            line_height_pt: 18.0,
            font_size_pt: 14.0,
        }
    }
}

impl PageLayout {
    pub fn usable_width(&self) -> f32 {
        self.page_width_pt - 2.0 * self.margin_pt
    }

    pub fn max_baseline(&self) -> f32 {
        self.page_height_pt - self.margin_pt
    }
}

pub struct PlacedLine {
    pub text: String,
    pub y_pt: f32,
}

pub struct Page {
    pub lines: Vec<PlacedLine>,
}

pub struct Document {
    pub pages: Vec<Page>,
}

/// Greedy word wrap. Explicit newlines always force a break; a word wider
/// than `max_width` gets a line of its own, unsplit. Empty input wraps to a
/// single blank line so the export never yields an empty document.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let mut words = raw.split_whitespace();
        let Some(first) = words.next() else {
            lines.push(String::new());
            continue;
        };
        let mut current = first.to_string();
        for word in words {
            let candidate = format!("{current} {word}");
            if measure(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}

/// Lays wrapped lines onto pages top to bottom. A line whose baseline would
/// land beyond the bottom margin opens a fresh page.
pub fn paginate(lines: &[String], layout: &PageLayout) -> Document {
    let mut pages = Vec::new();
    let mut page = Page { lines: Vec::new() };
    let mut y = layout.margin_pt;

    for text in lines {
        if y + layout.line_height_pt > layout.max_baseline() {
            pages.push(std::mem::replace(&mut page, Page { lines: Vec::new() }));
            y = layout.margin_pt;
        }
        page.lines.push(PlacedLine {
            text: text.clone(),
            y_pt: y,
        });
        y += layout.line_height_pt;
    }

    pages.push(page);
    Document { pages }
}
