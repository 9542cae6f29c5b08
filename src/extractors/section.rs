// src/extractors/section.rs

use crate::extractors::elements::DocumentElement;

/// Ordered mapping from section label to accumulated body text. Labels keep
/// the order they were opened in; per-filing section sets differ, so the
/// consolidated table computes its column set as a union at assembly time.
#[derive(Debug, Clone, Default)]
pub struct SectionMap {
    entries: Vec<(String, String)>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty entry for `label` unless one already exists.
    fn open(&mut self, label: &str) {
        if !self.contains(label) {
            self.entries.push((label.to_string(), String::new()));
        }
    }

    /// Appends `text` plus a trailing space to the entry for `label`,
    /// creating the entry first if absent.
    fn append(&mut self, label: &str, text: &str) {
        match self.entries.iter_mut().find(|(key, _)| key == label) {
            Some((_, value)) => {
                value.push_str(text);
                value.push(' ');
            }
            None => {
                let mut value = String::with_capacity(text.len() + 1);
                value.push_str(text);
                value.push(' ');
                self.entries.push((label.to_string(), value));
            }
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == label)
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, value)| value.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrites every label with whitespace runs collapsed to single spaces.
    fn normalize_labels(mut self) -> Self {
        for (key, _) in &mut self.entries {
            *key = normalize_label(key);
        }
        self
    }
}

/// Collapses internal whitespace runs to single spaces and trims. Idempotent.
pub fn normalize_label(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Scanner state while walking one filing's element stream.
///
/// A heading such as "ITEM 7." (trailing period) is only half a label; the
/// scanner holds it in `PendingContinuation` until the next fully upper-case
/// heading completes it. Headings without a trailing period open their
/// section immediately.
#[derive(Debug, Clone)]
enum ScanState {
    /// Nothing opened yet; body text is dropped.
    NoSection,
    /// A partial label is waiting for an upper-case continuation heading.
    /// No entry exists for it yet.
    PendingContinuation { label: String },
    /// A current section cursor is set. Its entry may still be missing when
    /// the cursor came out of an abandoned continuation; body text creates
    /// it lazily.
    InSection { label: String },
}

/// True for headings that start a new section: the text contains "ITEM"
/// case-insensitively and is shorter than 100 characters.
fn starts_section(text: &str) -> bool {
    text.to_uppercase().contains("ITEM") && text.chars().count() < 100
}

/// Fully upper-case: at least one cased character and no lowercase ones.
/// Digits and punctuation don't count either way.
fn is_fully_upper(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

/// Walks an ordered element stream and produces the section map for one
/// filing. Every body-text element lands in the most recently opened section
/// or is dropped when no section has been opened yet.
pub fn extract_sections(elements: &[DocumentElement]) -> SectionMap {
    let mut sections = SectionMap::new();
    let mut state = ScanState::NoSection;

    for element in elements {
        state = match element {
            DocumentElement::Heading(text) => on_heading(state, text, &mut sections),
            DocumentElement::Text(text) => on_text(state, text, &mut sections),
        };
    }

    sections.normalize_labels()
}

fn on_heading(state: ScanState, text: &str, sections: &mut SectionMap) -> ScanState {
    let text = text.trim();

    if starts_section(text) {
        if text.ends_with('.') {
            // Partial label, e.g. "ITEM 7." awaiting "MANAGEMENT'S
            // DISCUSSION...". No entry until the continuation arrives.
            return ScanState::PendingContinuation {
                label: text.to_string(),
            };
        }
        sections.open(text);
        return ScanState::InSection {
            label: text.to_string(),
        };
    }

    match state {
        ScanState::PendingContinuation { label } if is_fully_upper(text) => {
            let merged = format!("{} {}", label, text);
            sections.open(&merged);
            ScanState::InSection { label: merged }
        }
        // Quirk, preserved: a stray heading clears the pending flag without
        // concatenating, but the cursor keeps the partial label and body
        // text may still open its entry later.
        ScanState::PendingContinuation { label } => ScanState::InSection { label },
        other => other,
    }
}

fn on_text(state: ScanState, text: &str, sections: &mut SectionMap) -> ScanState {
    match &state {
        ScanState::NoSection => {
            tracing::trace!("Dropping body text before first section");
        }
        ScanState::PendingContinuation { label } | ScanState::InSection { label } => {
            sections.append(label, text.trim());
        }
    }
    state
}

/// One row of the consolidated filing table: fixed identity fields plus the
/// variable per-filing section map. No ticker+accession pair repeats.
#[derive(Debug, Clone)]
pub struct FilingRow {
    pub ticker: String,
    pub form_type: String,
    pub accession_number: String,
    pub filing_date: String,
    pub sections: SectionMap,
}

/// Consolidated table, one row per retrieved filing, in retrieval order.
#[derive(Debug, Clone, Default)]
pub struct FilingTable {
    rows: Vec<FilingRow>,
}

impl FilingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: FilingRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[FilingRow] {
        &self.rows
    }

    /// Union of every section label seen across rows, in first-seen order.
    pub fn section_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for row in &self.rows {
            for label in row.sections.labels() {
                if !columns.contains(&label) {
                    columns.push(label);
                }
            }
        }
        columns
    }

    /// First section column whose upper-cased label contains `needle`.
    pub fn find_section_column(&self, needle: &str) -> Option<&str> {
        let needle = needle.to_uppercase();
        self.section_columns()
            .into_iter()
            .find(|column| column.to_uppercase().contains(&needle))
    }

    /// First row whose filing date equals `filing_date` exactly.
    pub fn find_by_filing_date(&self, filing_date: &str) -> Option<&FilingRow> {
        self.rows.iter().find(|row| row.filing_date == filing_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::elements::DocumentElement::{Heading, Text};

    #[test]
    fn body_text_before_any_heading_is_dropped() {
        let elements = vec![
            Text("Front matter prose.".to_string()),
            Heading("ITEM 1. BUSINESS".to_string()),
            Text("We sell widgets.".to_string()),
        ];

        let sections = extract_sections(&elements);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections.get("ITEM 1. BUSINESS"), Some("We sell widgets. "));
    }

    #[test]
    fn partial_label_merges_with_upper_case_continuation() {
        let elements = vec![
            Heading("ITEM 7.".to_string()),
            Heading("MANAGEMENT'S DISCUSSION".to_string()),
            Text("Revenue grew.".to_string()),
        ];

        let sections = extract_sections(&elements);
        assert_eq!(
            sections.get("ITEM 7. MANAGEMENT'S DISCUSSION"),
            Some("Revenue grew. ")
        );
        assert!(!sections.contains("ITEM 7."));
    }

    #[test]
    fn no_entry_exists_until_the_continuation_arrives() {
        let elements = vec![Heading("ITEM 7.".to_string())];
        let sections = extract_sections(&elements);
        assert!(sections.is_empty());
    }

    #[test]
    fn heading_without_trailing_period_opens_immediately() {
        let elements = vec![Heading("ITEM 1A".to_string())];
        let sections = extract_sections(&elements);
        assert_eq!(sections.get("ITEM 1A"), Some(""));
    }

    // Documented quirk: a heading that is neither a section start nor an
    // upper-case continuation abandons the pending merge, yet the cursor
    // keeps the partial label and body text opens its entry lazily.
    #[test]
    fn abandoned_continuation_keeps_the_partial_cursor() {
        let elements = vec![
            Heading("ITEM 7.".to_string()),
            Heading("Overview of results".to_string()),
            Text("Margins improved.".to_string()),
        ];

        let sections = extract_sections(&elements);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections.get("ITEM 7."), Some("Margins improved. "));
    }

    #[test]
    fn abandoned_continuation_with_no_body_text_opens_nothing() {
        let elements = vec![
            Heading("ITEM 7.".to_string()),
            Heading("Overview of results".to_string()),
            Heading("ITEM 8. FINANCIAL STATEMENTS".to_string()),
        ];

        let sections = extract_sections(&elements);
        assert_eq!(sections.len(), 1);
        assert!(sections.contains("ITEM 8. FINANCIAL STATEMENTS"));
    }

    #[test]
    fn item_heading_takes_priority_over_pending_continuation() {
        // "ITEM 1A. RISK FACTORS" is upper-case, but it starts its own
        // section rather than continuing "ITEM 7.".
        let elements = vec![
            Heading("ITEM 7.".to_string()),
            Heading("ITEM 1A. RISK FACTORS".to_string()),
        ];

        let sections = extract_sections(&elements);
        assert_eq!(sections.len(), 1);
        assert!(sections.contains("ITEM 1A. RISK FACTORS"));
        assert!(!sections.contains("ITEM 7. ITEM 1A. RISK FACTORS"));
    }

    #[test]
    fn long_headings_do_not_start_sections() {
        let long = format!("ITEM 7. {}", "X".repeat(100));
        let elements = vec![
            Heading(long),
            Text("Stray text.".to_string()),
        ];

        let sections = extract_sections(&elements);
        assert!(sections.is_empty());
    }

    #[test]
    fn text_attributes_to_most_recently_opened_section() {
        let elements = vec![
            Heading("ITEM 1. BUSINESS".to_string()),
            Text("First.".to_string()),
            Heading("ITEM 3. LEGAL PROCEEDINGS".to_string()),
            Text("Second.".to_string()),
            Text("Third.".to_string()),
        ];

        let sections = extract_sections(&elements);
        assert_eq!(sections.get("ITEM 1. BUSINESS"), Some("First. "));
        assert_eq!(
            sections.get("ITEM 3. LEGAL PROCEEDINGS"),
            Some("Second. Third. ")
        );
    }

    #[test]
    fn labels_are_whitespace_normalized() {
        let elements = vec![
            Heading("ITEM  7.".to_string()),
            Heading("MANAGEMENT'S   DISCUSSION".to_string()),
        ];

        let sections = extract_sections(&elements);
        assert!(sections.contains("ITEM 7. MANAGEMENT'S DISCUSSION"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_label("  ITEM  7.\t MANAGEMENT'S \n DISCUSSION ");
        let twice = normalize_label(&once);
        assert_eq!(once, "ITEM 7. MANAGEMENT'S DISCUSSION");
        assert_eq!(once, twice);
    }

    fn row(date: &str, labels: &[&str]) -> FilingRow {
        let mut sections = SectionMap::new();
        for label in labels {
            sections.open(label);
        }
        FilingRow {
            ticker: "TST".to_string(),
            form_type: "10-K".to_string(),
            accession_number: format!("acc-{}", date),
            filing_date: date.to_string(),
            sections,
        }
    }

    #[test]
    fn table_columns_are_the_union_in_first_seen_order() {
        let mut table = FilingTable::new();
        table.push(row("2023-11-03", &["ITEM 1. BUSINESS", "ITEM 7. MD&A"]));
        table.push(row("2022-10-28", &["ITEM 1. BUSINESS", "ITEM 8. FINANCIALS"]));

        assert_eq!(
            table.section_columns(),
            vec!["ITEM 1. BUSINESS", "ITEM 7. MD&A", "ITEM 8. FINANCIALS"]
        );
        // the older filing has no ITEM 7 column
        let older = table.find_by_filing_date("2022-10-28").unwrap();
        assert!(older.sections.get("ITEM 7. MD&A").is_none());
    }

    #[test]
    fn find_section_column_is_case_insensitive_substring() {
        let mut table = FilingTable::new();
        table.push(row(
            "2023-11-03",
            &["Item 7. Management's Discussion", "ITEM 7A. MARKET RISK"],
        ));

        assert_eq!(
            table.find_section_column("ITEM 7."),
            Some("Item 7. Management's Discussion")
        );
        assert_eq!(table.find_section_column("ITEM 9."), None);
    }

    #[test]
    fn find_by_filing_date_is_exact() {
        let mut table = FilingTable::new();
        table.push(row("2023-11-03", &[]));

        assert!(table.find_by_filing_date("2023-11-03").is_some());
        assert!(table.find_by_filing_date("2023").is_none());
    }
}
