//! Text analysis tools: statistics, pattern extraction, character classes and
//! analysis of fetched web pages.

use super::format::{percentage, yes_no};
use super::Tool;
use crate::error::ToolError;
use crate::types::{Arguments, ParameterDescriptor, ToolDescriptor, ToolOutput};
use crate::upstream::{fetch_text, Fetch};
use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use std::fmt::Write;
use std::sync::{Arc, LazyLock};
use tracing::info;
use url::Url;

/// Characters read per minute for the reading-time estimate.
pub const READING_SPEED: usize = 400;

static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n|\n|\r").unwrap());
static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://[\w/:%#$&?()~.=+\-]+").unwrap());
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());
static HASHTAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#[\w\x{3040}-\x{309F}\x{30A0}-\x{30FF}\x{4E00}-\x{9FAF}]+").unwrap()
});
static DECIMAL_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\p{Nd}$").unwrap());
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());
static ENGLISH_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-zA-Z]+\b").unwrap());

static SCRIPT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());
static STYLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// ---------------------------------------------------------------------------
// Analyses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStats {
    pub characters: usize,
    pub characters_without_whitespace: usize,
    pub lines: usize,
    pub words: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            characters: text.chars().count(),
            characters_without_whitespace: text.chars().filter(|c| !c.is_whitespace()).count(),
            lines: LINE_BREAK.split(text).count(),
            words: text.split_whitespace().count(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "Text analysis\n\
             - Characters: {} ({} excluding whitespace)\n\
             - Lines: {}\n\
             - Words: {}",
            self.characters, self.characters_without_whitespace, self.lines, self.words
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatternMatches {
    pub urls: Vec<String>,
    pub emails: Vec<String>,
    pub hashtags: Vec<String>,
    pub numbers: Vec<String>,
}

impl PatternMatches {
    pub fn of(text: &str) -> Self {
        Self {
            urls: find_all(&URL, text),
            emails: find_all(&EMAIL, text),
            hashtags: find_all(&HASHTAG, text),
            numbers: find_all(&NUMBER, text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty() && self.emails.is_empty() && self.hashtags.is_empty() && self.numbers.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Pattern extraction");
        if self.is_empty() {
            out.push_str("\nNo recognizable patterns found.");
            return out;
        }

        for (label, items) in [
            ("URLs", &self.urls),
            ("Email addresses", &self.emails),
            ("Hashtags", &self.hashtags),
        ] {
            if !items.is_empty() {
                let _ = write!(out, "\n{label} ({}):", items.len());
                for item in items {
                    let _ = write!(out, "\n- {item}");
                }
            }
        }
        if !self.numbers.is_empty() {
            let _ = write!(out, "\nNumbers ({}):\n- {}", self.numbers.len(), self.numbers.join(", "));
        }
        out
    }
}

fn find_all(re: &Regex, text: &str) -> Vec<String> {
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Hiragana,
    Katakana,
    Kanji,
    Alphabet,
    Digit,
    Whitespace,
    Other,
}

impl CharClass {
    fn of(c: char) -> Self {
        match c {
            '\u{3040}'..='\u{309F}' => Self::Hiragana,
            '\u{30A0}'..='\u{30FF}' => Self::Katakana,
            '\u{4E00}'..='\u{9FAF}' => Self::Kanji,
            'a'..='z' | 'A'..='Z' => Self::Alphabet,
            c if is_decimal_digit(c) => Self::Digit,
            c if c.is_whitespace() => Self::Whitespace,
            _ => Self::Other,
        }
    }

    fn is_japanese(self) -> bool {
        matches!(self, Self::Hiragana | Self::Katakana | Self::Kanji)
    }
}

/// Decimal digits in any script, not only ASCII.
fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit() || (!c.is_ascii() && DECIMAL_DIGIT.is_match(c.encode_utf8(&mut [0; 4])))
}

/// Per-class character counts. Every character falls into exactly one class,
/// so the counts always sum to `total`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CharacterBreakdown {
    pub total: usize,
    pub hiragana: usize,
    pub katakana: usize,
    pub kanji: usize,
    pub alphabet: usize,
    pub digits: usize,
    pub whitespace: usize,
    pub other: usize,
    pub contains_japanese: bool,
    pub english_words: usize,
    /// Whole minutes at [`READING_SPEED`]; zero means under a minute.
    pub reading_minutes: usize,
}

impl CharacterBreakdown {
    pub fn of(text: &str) -> Self {
        let mut out = Self::default();
        for c in text.chars() {
            let class = CharClass::of(c);
            out.total += 1;
            out.contains_japanese |= class.is_japanese();
            match class {
                CharClass::Hiragana => out.hiragana += 1,
                CharClass::Katakana => out.katakana += 1,
                CharClass::Kanji => out.kanji += 1,
                CharClass::Alphabet => out.alphabet += 1,
                CharClass::Digit => out.digits += 1,
                CharClass::Whitespace => out.whitespace += 1,
                CharClass::Other => out.other += 1,
            }
        }
        out.english_words = ENGLISH_WORD.find_iter(text).count();
        out.reading_minutes = out.total / READING_SPEED;
        out
    }

    /// Share of `count` in this text; `0.0` for empty text.
    pub fn share(&self, count: usize) -> f64 {
        percentage(count, self.total)
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Character types");
        for (label, count) in [
            ("Hiragana", self.hiragana),
            ("Katakana", self.katakana),
            ("Kanji", self.kanji),
            ("Alphabet", self.alphabet),
            ("Digits", self.digits),
            ("Whitespace", self.whitespace),
        ] {
            let _ = write!(out, "\n- {label}: {count} ({:.1}%)", self.share(count));
        }
        if self.other > 0 {
            let _ = write!(out, "\n- Other: {} ({:.1}%)", self.other, self.share(self.other));
        }

        let reading = match self.reading_minutes {
            0 => "under 1 minute".to_string(),
            n => format!("{n} min"),
        };
        let _ = write!(
            out,
            "\nContains Japanese: {}\nEnglish words: {}\nEstimated reading time: {reading} (at {READING_SPEED} characters per minute)",
            yes_no(self.contains_japanese),
            self.english_words,
        );
        out
    }
}

/// Reduce an HTML document to its visible text.
pub fn strip_html(html: &str) -> String {
    let text = SCRIPT.replace_all(html, "");
    let text = STYLE.replace_all(&text, "");
    let text = TAG.replace_all(&text, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

fn text_descriptor(name: &str, description: &str) -> ToolDescriptor {
    ToolDescriptor::new(name, description).required(ParameterDescriptor::string("text", "Text to analyze"))
}

fn text_arg(args: &Arguments) -> Result<String, ToolError> {
    Ok(args.require_string("text")?.to_string())
}

impl From<TextStats> for ToolOutput {
    fn from(output: TextStats) -> Self {
        ToolOutput::TextStats(output)
    }
}

impl From<PatternMatches> for ToolOutput {
    fn from(output: PatternMatches) -> Self {
        ToolOutput::Patterns(output)
    }
}

impl From<CharacterBreakdown> for ToolOutput {
    fn from(output: CharacterBreakdown) -> Self {
        ToolOutput::CharacterTypes(output)
    }
}

pub struct AnalyzeTextTool;

#[async_trait]
impl Tool for AnalyzeTextTool {
    type Args = String;
    type Output = TextStats;

    fn descriptor(&self) -> ToolDescriptor {
        text_descriptor("analyze_text", "Count characters, lines and words in a text.")
    }

    fn decode(&self, args: &Arguments) -> Result<String, ToolError> {
        text_arg(args)
    }

    async fn execute(&self, text: String) -> Result<TextStats, ToolError> {
        Ok(TextStats::of(&text))
    }

    fn format(&self, output: &TextStats) -> String {
        output.render()
    }
}

pub struct ExtractPatternsTool;

#[async_trait]
impl Tool for ExtractPatternsTool {
    type Args = String;
    type Output = PatternMatches;

    fn descriptor(&self) -> ToolDescriptor {
        text_descriptor(
            "extract_patterns",
            "Extract URLs, email addresses, hashtags and numbers from a text.",
        )
    }

    fn decode(&self, args: &Arguments) -> Result<String, ToolError> {
        text_arg(args)
    }

    async fn execute(&self, text: String) -> Result<PatternMatches, ToolError> {
        Ok(PatternMatches::of(&text))
    }

    fn format(&self, output: &PatternMatches) -> String {
        output.render()
    }
}

pub struct AnalyzeCharacterTypesTool;

#[async_trait]
impl Tool for AnalyzeCharacterTypesTool {
    type Args = String;
    type Output = CharacterBreakdown;

    fn descriptor(&self) -> ToolDescriptor {
        text_descriptor(
            "analyze_character_types",
            "Break a text down by character type (hiragana, katakana, kanji, alphabet, digits).",
        )
    }

    fn decode(&self, args: &Arguments) -> Result<String, ToolError> {
        text_arg(args)
    }

    async fn execute(&self, text: String) -> Result<CharacterBreakdown, ToolError> {
        Ok(CharacterBreakdown::of(&text))
    }

    fn format(&self, output: &CharacterBreakdown) -> String {
        output.render()
    }
}

// ---------------------------------------------------------------------------
// analyze_url
// ---------------------------------------------------------------------------

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlAnalysis {
    pub url: String,
    pub stats: TextStats,
    pub patterns: PatternMatches,
    pub characters: CharacterBreakdown,
}

impl From<UrlAnalysis> for ToolOutput {
    fn from(output: UrlAnalysis) -> Self {
        ToolOutput::UrlAnalysis(output)
    }
}

/// Fetches a page and runs the three text analyses over its visible text.
pub struct AnalyzeUrlTool {
    fetch: Arc<dyn Fetch>,
}

impl AnalyzeUrlTool {
    pub fn new(fetch: Arc<dyn Fetch>) -> Self {
        Self { fetch }
    }
}

#[async_trait]
impl Tool for AnalyzeUrlTool {
    type Args = Url;
    type Output = UrlAnalysis;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new("analyze_url", "Fetch a web page and analyze its text content.")
            .required(ParameterDescriptor::string("url", "http:// or https:// URL of the page"))
    }

    fn decode(&self, args: &Arguments) -> Result<Url, ToolError> {
        let raw = args.require_string("url")?;
        match Url::parse(raw.trim()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
            _ => Err(ToolError::invalid_enum(args.tool(), "url", raw)),
        }
    }

    async fn execute(&self, url: Url) -> Result<UrlAnalysis, ToolError> {
        info!("Analyzing page at {}", url.host_str().unwrap_or_default());

        let headers = [("User-Agent".to_string(), BROWSER_USER_AGENT.to_string())];
        let html = fetch_text(self.fetch.as_ref(), "analyze_url", &url, &headers).await?;
        let text = strip_html(&html);

        Ok(UrlAnalysis {
            url: url.to_string(),
            stats: TextStats::of(&text),
            patterns: PatternMatches::of(&text),
            characters: CharacterBreakdown::of(&text),
        })
    }

    fn format(&self, output: &UrlAnalysis) -> String {
        format!(
            "URL analysis: {}\n\n{}\n\n{}\n\n{}",
            output.url,
            output.stats.render(),
            output.patterns.render(),
            output.characters.render(),
        )
    }
}
