use crate::domain::model::{Book, FilterOption};
use std::fmt::Write;

const NO_IMAGE: &str = "No image";

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// 卡片：封面、標題、「作者 — 年份」
pub fn render_card(index: usize, book: &Book) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", index + 1, book.display_title());
    let _ = writeln!(out, "    {} — {}", field(&book.author), field(&book.year));
    let _ = writeln!(out, "    {}", book.image_url().unwrap_or(NO_IMAGE));
    out
}

pub fn render_cards(books: &[Book]) -> String {
    books
        .iter()
        .enumerate()
        .map(|(i, b)| render_card(i, b))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_detail(book: &Book) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", book.display_title());
    let _ = writeln!(out, "{}", "=".repeat(book.display_title().chars().count()));
    if let Some(image) = book.image_url() {
        let _ = writeln!(out, "Image:       {}", image);
    }
    let rows = [
        ("Author", &book.author),
        ("Year", &book.year),
        ("Publisher", &book.publisher),
        ("City", &book.city),
        ("Language", &book.language),
        ("Manuscripts", &book.manuscripts),
        ("Category", &book.category),
        ("Location", &book.id),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{:<12} {}", format!("{}:", label), field(value));
    }
    if let Some(comment) = book.comment.as_deref().filter(|c| !c.trim().is_empty()) {
        let _ = writeln!(out, "\n{}", comment.trim());
    }
    let links = book.links();
    if !links.is_empty() {
        out.push('\n');
        for (n, link) in links {
            let _ = writeln!(out, "Link {}: {}", n, link);
        }
    }
    out
}

pub fn render_options(title: &str, options: &[FilterOption]) -> String {
    let mut out = format!("{}:\n", title);
    let visible: Vec<_> = options.iter().filter(|o| !o.value.is_empty()).collect();
    if visible.is_empty() {
        out.push_str("  (none)\n");
    }
    for option in visible {
        if option.label == option.value {
            let _ = writeln!(out, "  {}", option.value);
        } else {
            let _ = writeln!(out, "  {:<8} {}", option.value, option.label);
        }
    }
    out
}
