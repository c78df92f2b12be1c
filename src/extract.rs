use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace};
use unicode_general_category::{get_general_category, GeneralCategory};

use crate::document::Element;

/// Topics in first-seen order, each with its questions and stray lines in
/// document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionsByTopic(IndexMap<String, Vec<String>>);

impl QuestionsByTopic {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, topic: &str) -> Option<&[String]> {
        self.0.get(topic).map(Vec::as_slice)
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn question_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Flattened `(topic, question)` pairs, the shape the quiz front-end consumes.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .flat_map(|(topic, qs)| qs.iter().map(move |q| (topic, q.as_str())))
    }
}

/// Short and made of letters only. The character check runs over the whole
/// string, so a space disqualifies it and only single words pass in practice.
pub fn is_valid_topic(text: &str) -> bool {
    text.split_whitespace().count() <= 3 && !text.is_empty() && text.chars().all(is_letter)
}

/// Letter categories only (Lu, Ll, Lt, Lm, Lo). Combining marks and letter
/// numbers are not letters even though Unicode counts them as alphabetic.
fn is_letter(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

#[derive(Debug, Default)]
pub struct Scan {
    result: QuestionsByTopic,
    current_topic: Option<String>,
}

impl Scan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_topic(&self) -> Option<&str> {
        self.current_topic.as_deref()
    }

    pub fn step(mut self, element: Element) -> Self {
        match element {
            Element::Paragraph { text } => {
                if is_valid_topic(&text) {
                    trace!(topic = %text, "topic");
                    // Re-inserting an existing key resets its entries in place.
                    self.result.0.insert(text.clone(), Vec::new());
                    self.current_topic = Some(text);
                } else if let Some(entries) = self.current_entries() {
                    entries.push(text);
                } else {
                    trace!(text = %text, "dropping paragraph before first topic");
                }
            }
            Element::List { items } => {
                if let Some(entries) = self.current_entries() {
                    entries.extend(items);
                } else {
                    trace!(items = items.len(), "dropping list before first topic");
                }
            }
        }
        self
    }

    pub fn finish(self) -> QuestionsByTopic {
        self.result
    }

    fn current_entries(&mut self) -> Option<&mut Vec<String>> {
        let topic = self.current_topic.as_deref()?;
        self.result.0.get_mut(topic)
    }
}

pub fn extract<I>(elements: I) -> QuestionsByTopic
where
    I: IntoIterator<Item = Element>,
{
    let result = elements
        .into_iter()
        .fold(Scan::new(), Scan::step)
        .finish();
    debug!(
        topics = result.len(),
        questions = result.question_count(),
        "extracted questions"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries<'a>(q: &'a QuestionsByTopic, topic: &str) -> Vec<&'a str> {
        q.get(topic)
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn single_word_is_a_topic() {
        assert!(is_valid_topic("Intro"));
        assert!(is_valid_topic("Économie"));
    }

    #[test]
    fn multi_word_title_is_rejected_by_literal_rule() {
        // The word limit allows three words, but the space itself is not alphabetic.
        assert!(!is_valid_topic("Intro Questions"));
        assert!(!is_valid_topic("A B C"));
    }

    #[test]
    fn digits_punctuation_and_empty_are_not_topics() {
        assert!(!is_valid_topic("Math1"));
        assert!(!is_valid_topic("Math?"));
        assert!(!is_valid_topic(""));
    }

    #[test]
    fn combining_marks_and_letter_numbers_are_not_topics() {
        // U+093F and U+0902 are vowel signs, U+216B is a Roman numeral.
        assert!(!is_valid_topic("हिंदी"));
        assert!(!is_valid_topic("Ⅻ"));
        assert!(is_valid_topic("日本語"));
        assert!(is_valid_topic("ǅemal"));
    }

    #[test]
    fn stray_text_and_list_items_group_under_topic() {
        let q = extract([
            Element::paragraph("Math"),
            Element::paragraph("q1 stray"),
            Element::list(["What is 2+2?", "What is pi?"]),
        ]);
        assert_eq!(q.topics().collect::<Vec<_>>(), ["Math"]);
        assert_eq!(
            entries(&q, "Math"),
            ["q1 stray", "What is 2+2?", "What is pi?"]
        );
    }

    #[test]
    fn content_before_first_topic_is_dropped() {
        let q = extract([
            Element::list(["orphan"]),
            Element::paragraph("Intro Questions"),
            Element::paragraph("History"),
            Element::list(["When?"]),
        ]);
        assert_eq!(q.len(), 1);
        assert_eq!(entries(&q, "History"), ["When?"]);
        assert!(q.pairs().all(|(_, question)| question != "orphan"));
    }

    #[test]
    fn repeated_topic_restarts_its_entries_in_place() {
        let q = extract([
            Element::paragraph("Math"),
            Element::list(["old"]),
            Element::paragraph("Science"),
            Element::list(["atoms"]),
            Element::paragraph("Math"),
            Element::list(["new"]),
        ]);
        assert_eq!(q.topics().collect::<Vec<_>>(), ["Math", "Science"]);
        assert_eq!(entries(&q, "Math"), ["new"]);
        assert_eq!(entries(&q, "Science"), ["atoms"]);
    }

    #[test]
    fn current_topic_survives_stray_paragraphs_and_lists() {
        let scan = [
            Element::paragraph("Biology"),
            Element::list(["cells"]),
            Element::paragraph("not a title"),
        ]
        .into_iter()
        .fold(Scan::new(), Scan::step);
        assert_eq!(scan.current_topic(), Some("Biology"));

        let q = scan.step(Element::list(["genes"])).finish();
        assert_eq!(entries(&q, "Biology"), ["cells", "not a title", "genes"]);
    }

    #[test]
    fn empty_stray_paragraph_is_kept() {
        let q = extract([Element::paragraph("Art"), Element::paragraph("")]);
        assert_eq!(entries(&q, "Art"), [""]);
    }

    #[test]
    fn empty_input_is_empty_mapping() {
        let q = extract(Vec::<Element>::new());
        assert!(q.is_empty());
        assert_eq!(q.question_count(), 0);
    }

    #[test]
    fn extraction_is_deterministic() {
        let input = vec![
            Element::paragraph("Chemistry"),
            Element::list(["a", "b"]),
            Element::paragraph("Physics"),
            Element::paragraph("stray"),
        ];
        assert_eq!(extract(input.clone()), extract(input));
    }

    #[test]
    fn pairs_flatten_in_document_order() {
        let q = extract([
            Element::paragraph("Math"),
            Element::list(["a", "b"]),
            Element::paragraph("Art"),
            Element::list(["c"]),
        ]);
        assert_eq!(
            q.pairs().collect::<Vec<_>>(),
            [("Math", "a"), ("Math", "b"), ("Art", "c")]
        );
    }
}
