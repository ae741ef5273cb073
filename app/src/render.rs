use docqa_client::{AppState, HealthStatus, NoticeKind};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

pub const TITLE: &str = "RAG PDF Analyzer";

/// Renders markdown answer text for a plain terminal.
///
/// Headings become underlined titles, list items get bullets or numbers,
/// code blocks are indented, table cells are joined with ` | ` and inline
/// markers are dropped. Raw HTML is printed as written.
pub fn render_markdown(markdown: &str) -> String {
    let mut writer = TerminalWriter::default();
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    for event in Parser::new_ext(markdown, options) {
        writer.handle(event);
    }
    writer.finish()
}

#[derive(Default)]
struct TerminalWriter {
    out: String,
    heading: Option<(HeadingLevel, String)>,
    /// One entry per open list: the next number for ordered lists.
    lists: Vec<Option<u64>>,
    in_code_block: bool,
    link_targets: Vec<String>,
    /// Cells written so far in the current table row.
    row_cells: usize,
    /// Byte offset where the table header row starts.
    header_start: usize,
}

impl TerminalWriter {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.start_block();
                self.heading = Some((level, String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = self.heading.take() {
                    let title = title.trim().to_string();
                    let underline = match level {
                        HeadingLevel::H1 => Some('='),
                        HeadingLevel::H2 => Some('-'),
                        _ => None,
                    };
                    self.out.push_str(&title);
                    if let Some(mark) = underline {
                        self.out.push('\n');
                        self.out.extend(std::iter::repeat(mark).take(title.chars().count()));
                    }
                }
            }
            Event::Start(Tag::Paragraph) => self.start_block(),
            Event::Start(Tag::List(first)) => {
                if self.lists.is_empty() {
                    self.start_block();
                }
                self.lists.push(first);
            }
            Event::End(TagEnd::List(_)) => {
                self.lists.pop();
            }
            Event::Start(Tag::Item) => {
                self.ensure_newline();
                let depth = self.lists.len().saturating_sub(1);
                self.out.push_str(&"  ".repeat(depth));
                match self.lists.last_mut() {
                    Some(Some(number)) => {
                        self.out.push_str(&format!("{}. ", number));
                        *number += 1;
                    }
                    _ => self.out.push_str("• "),
                }
            }
            Event::Start(Tag::CodeBlock(_)) => {
                self.start_block();
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                self.in_code_block = false;
                while self.out.ends_with('\n') {
                    self.out.pop();
                }
            }
            Event::Start(Tag::Table(_)) => self.start_block(),
            Event::Start(Tag::TableHead) => {
                self.ensure_newline();
                self.header_start = self.out.len();
                self.row_cells = 0;
            }
            Event::End(TagEnd::TableHead) => {
                let width = self.out[self.header_start..].chars().count();
                self.out.push('\n');
                self.out.extend(std::iter::repeat('-').take(width));
            }
            Event::Start(Tag::TableRow) => {
                self.ensure_newline();
                self.row_cells = 0;
            }
            Event::Start(Tag::TableCell) => {
                if self.row_cells > 0 {
                    self.out.push_str(" | ");
                }
                self.row_cells += 1;
            }
            Event::Start(Tag::HtmlBlock) => self.start_block(),
            Event::End(TagEnd::HtmlBlock) => {
                while self.out.ends_with('\n') {
                    self.out.pop();
                }
            }
            Event::Html(html) => self.out.push_str(&html),
            Event::InlineHtml(html) => self.push_text(&html),
            Event::Start(Tag::Link { dest_url, .. }) => {
                self.link_targets.push(dest_url.to_string());
            }
            Event::End(TagEnd::Link) => {
                if let Some(target) = self.link_targets.pop() {
                    self.push_text(&format!(" ({})", target));
                }
            }
            Event::Text(text) => {
                if self.in_code_block {
                    for line in text.lines() {
                        self.out.push_str("    ");
                        self.out.push_str(line);
                        self.out.push('\n');
                    }
                } else {
                    self.push_text(&text);
                }
            }
            Event::Code(code) => self.push_text(&format!("`{}`", code)),
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.out.push('\n'),
            Event::Rule => {
                self.start_block();
                self.out.push_str("────────");
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        match &mut self.heading {
            Some((_, title)) => title.push_str(text),
            None => self.out.push_str(text),
        }
    }

    fn ensure_newline(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    /// Blocks are separated by a blank line, except inside lists.
    fn start_block(&mut self) {
        if !self.lists.is_empty() {
            self.ensure_newline();
            return;
        }
        if self.out.is_empty() || self.out.ends_with("\n\n") {
            return;
        }
        self.ensure_newline();
        self.out.push('\n');
    }

    fn finish(self) -> String {
        self.out.trim_end().to_string()
    }
}

pub fn health_badge(health: Option<&HealthStatus>) -> String {
    let Some(health) = health else {
        return "Loading...".to_string();
    };

    let mark = if health.is_healthy() { '✓' } else { '✗' };
    let mut badge = format!("{} {}", mark, health.status);
    if let Some(count) = health.document_count {
        badge.push_str(&format!(" · {} docs", count));
    }
    badge
}

fn notice_prefix(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Success => "[ok]",
        NoticeKind::Warning => "[!]",
        NoticeKind::Error => "[error]",
    }
}

pub fn upload_label(state: &AppState) -> String {
    if state.uploading {
        "Uploading...".to_string()
    } else if state.can_upload() {
        "Upload".to_string()
    } else {
        "Upload (disabled)".to_string()
    }
}

pub fn ask_label(state: &AppState) -> &'static str {
    if state.querying {
        "Searching..."
    } else {
        "Ask"
    }
}

/// Why `/clear` was refused.
pub fn clear_refusal(state: &AppState) -> &'static str {
    if state.clearing {
        "Documents are already being cleared."
    } else {
        "Wait for the current upload to finish first."
    }
}

pub fn render_notice(state: &AppState) -> Option<String> {
    state
        .upload_notice
        .as_ref()
        .map(|notice| format!("{} {}", notice_prefix(notice.kind), notice.text))
}

pub fn render_documents(documents: &[String]) -> String {
    if documents.is_empty() {
        return "No documents uploaded yet.".to_string();
    }

    let mut out = format!("Uploaded Documents ({})", documents.len());
    for doc in documents {
        out.push_str("\n  - ");
        out.push_str(doc);
    }
    out
}

pub fn render_answer(answer: &str) -> String {
    format!("Answer:\n{}", render_markdown(answer))
}

/// Full view of the session, printed by `/status`.
pub fn render_state(state: &AppState) -> String {
    let mut sections = vec![format!("{}  [{}]", TITLE, health_badge(state.health.as_ref()))];

    let mut upload = String::from("Upload PDF\n  selected: ");
    match &state.selected_file {
        Some(file) => upload.push_str(file.file_name()),
        None => upload.push_str("(none)"),
    }
    upload.push_str(&format!("\n  [{}]", upload_label(state)));
    if let Some(notice) = render_notice(state) {
        upload.push_str("\n  ");
        upload.push_str(&notice);
    }
    sections.push(upload);
    sections.push(render_documents(&state.documents));

    let mut query = format!("Ask Questions  [{}]", ask_label(state));
    if !state.question.trim().is_empty() {
        query.push_str(&format!("\n  question: {}", state.question.trim()));
    }
    sections.push(query);

    if !state.answer.is_empty() {
        sections.push(render_answer(&state.answer));
    }

    sections.join("\n\n")
}
