//! Anchor generation for law headings.
//!
//! Each text line of a law is classified as a section, subsection or
//! article heading using three configurable regex rules, tested in that
//! order. A heading produces an anchor tag whose id is composed from the
//! currently open article and section:
//!
//! | heading    | anchor id                           | state change      |
//! |------------|-------------------------------------|-------------------|
//! | section    | `{article}_{section}`               | section updated   |
//! | subsection | `{article}_{section}_{subsection}`  | none              |
//! | article    | `{article}`                         | article updated   |
//!
//! An [`AnchorGenerator`] carries that state across calls, so it belongs to
//! exactly one document. Create a new one (or call [`AnchorGenerator::reset`])
//! before rendering the next document, otherwise anchors leak the previous
//! document's article and section.
//!
//! # Example
//!
//! ```rust
//! use lawdispatch_core::anchor::{AnchorGenerator, AnchorLookupConfig, AnchorRuleConfig};
//! use lawdispatch_core::AnchorClassifier;
//!
//! let config = AnchorLookupConfig {
//!     section: AnchorRuleConfig::new(r"\((\d+)\) .+", r"s\1"),
//!     article: AnchorRuleConfig::new(r"(\w+)\. .+", r"a\1"),
//!     subsection: AnchorRuleConfig::new(r"([a-z]+)\. .+", r"\1"),
//! };
//! let mut anchors = AnchorGenerator::new(&config).unwrap();
//!
//! assert_eq!(anchors.classify("1. Scope").as_deref(), Some("[anchor=a1][/anchor]"));
//! assert_eq!(anchors.classify("(2) Terms").as_deref(), Some("[anchor=a1_s2][/anchor]"));
//! assert_eq!(anchors.classify("plain text"), None);
//! ```

use std::iter::Peekable;
use std::str::Chars;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{LawDispatchError, Result};

/// Classifies a text line and yields the anchor tag to emit before it.
///
/// The renderer calls this once per non-blank text node with the trimmed,
/// NFKD-normalized text.
pub trait AnchorClassifier {
    fn classify(&mut self, line: &str) -> Option<String>;
}

/// Classifier that never emits anchors.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnchors;

impl AnchorClassifier for NoAnchors {
    fn classify(&mut self, _line: &str) -> Option<String> {
        None
    }
}

/// One `[anchor_lookup.*]` entry of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorRuleConfig {
    /// Regex with exactly one capture group.
    #[serde(rename = "match")]
    pub pattern: String,
    /// Replacement template using `\1` or `\g<1>` backreferences.
    pub anchor_link: String,
}

impl AnchorRuleConfig {
    pub fn new(pattern: impl Into<String>, anchor_link: impl Into<String>) -> Self {
        Self { pattern: pattern.into(), anchor_link: anchor_link.into() }
    }
}

/// The `[anchor_lookup]` section: one rule per heading kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorLookupConfig {
    pub section: AnchorRuleConfig,
    pub article: AnchorRuleConfig,
    pub subsection: AnchorRuleConfig,
}

/// A compiled heading rule.
#[derive(Debug, Clone)]
pub struct AnchorRule {
    regex: Regex,
    replacement: String,
}

impl AnchorRule {
    /// Compiles `config`, naming the rule `kind` in error messages.
    pub fn compile(kind: &'static str, config: &AnchorRuleConfig) -> Result<Self> {
        let regex = Regex::new(&config.pattern)
            .map_err(|e| LawDispatchError::InvalidPattern { rule: kind, reason: e.to_string() })?;

        let groups = regex.captures_len() - 1;
        if groups != 1 {
            return Err(LawDispatchError::InvalidPattern {
                rule: kind,
                reason: format!("expected exactly one capture group, found {}", groups),
            });
        }

        Ok(Self { regex, replacement: translate_replacement(&config.anchor_link) })
    }

    /// Applies the rule to `line`, returning the rewritten line on a match.
    ///
    /// The pattern may match anywhere in the line; every match is replaced
    /// and unmatched text is kept.
    pub fn apply(&self, line: &str) -> Option<String> {
        if self.regex.is_match(line) {
            Some(self.regex.replace_all(line, self.replacement.as_str()).into_owned())
        } else {
            None
        }
    }
}

/// Stateful heading classifier for a single document.
#[derive(Debug, Clone)]
pub struct AnchorGenerator {
    section_rule: AnchorRule,
    article_rule: AnchorRule,
    subsection_rule: AnchorRule,
    article: String,
    section: String,
}

impl AnchorGenerator {
    pub fn new(config: &AnchorLookupConfig) -> Result<Self> {
        Ok(Self {
            section_rule: AnchorRule::compile("section", &config.section)?,
            article_rule: AnchorRule::compile("article", &config.article)?,
            subsection_rule: AnchorRule::compile("subsection", &config.subsection)?,
            article: String::new(),
            section: String::new(),
        })
    }

    /// Forgets the open article and section.
    pub fn reset(&mut self) {
        self.article.clear();
        self.section.clear();
    }

    pub fn current_article(&self) -> &str {
        &self.article
    }

    pub fn current_section(&self) -> &str {
        &self.section
    }

    /// Returns the anchor id for `line`, updating state, or `None`.
    ///
    /// Empty article or section components are kept, so a section before
    /// any article yields `_s1`.
    pub fn anchor_id(&mut self, line: &str) -> Option<String> {
        if let Some(section) = self.section_rule.apply(line) {
            self.section = section;
            Some(format!("{}_{}", self.article, self.section))
        } else if let Some(subsection) = self.subsection_rule.apply(line) {
            Some(format!("{}_{}_{}", self.article, self.section, subsection))
        } else if let Some(article) = self.article_rule.apply(line) {
            self.article = article;
            Some(self.article.clone())
        } else {
            None
        }
    }
}

impl AnchorClassifier for AnchorGenerator {
    fn classify(&mut self, line: &str) -> Option<String> {
        self.anchor_id(line).map(|id| anchor_tag(&id))
    }
}

/// Wraps an anchor id in the BBCode anchor tag.
pub fn anchor_tag(id: &str) -> String {
    format!("[anchor={}][/anchor]", id)
}

/// Converts a backslash-style replacement template into regex crate syntax.
///
/// `\1` and `\g<1>` become `${1}`, `\g<name>` becomes `${name}`, `\\` is a
/// literal backslash, `\n` and `\t` are newline and tab. `\0`, `\0NN` and
/// three-digit `\NNN` are octal character escapes, not group references. A
/// literal `$` is escaped so it is never read as a group reference. Any
/// other escape is kept as written.
pub fn translate_replacement(template: &str) -> String {
    let mut out = String::with_capacity(template.len() + 4);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' => out.push_str("$$"),
            '\\' => match chars.peek().copied() {
                Some(d) if d.is_ascii_digit() => {
                    if let Some(ch) = take_octal_escape(&mut chars) {
                        push_literal(&mut out, ch);
                        continue;
                    }
                    let mut group = String::new();
                    while let Some(&d) = chars.peek() {
                        if !d.is_ascii_digit() || group.len() == 2 {
                            break;
                        }
                        group.push(d);
                        chars.next();
                    }
                    out.push_str(&format!("${{{}}}", group));
                }
                Some('g') => {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    if lookahead.next() == Some('<') {
                        let name: String = lookahead.clone().take_while(|&ch| ch != '>').collect();
                        let len = name.chars().count();
                        let closed = lookahead.clone().nth(len) == Some('>');
                        if closed && !name.is_empty() {
                            out.push_str(&format!("${{{}}}", name));
                            // skip `g<name>`
                            for _ in 0..len + 3 {
                                chars.next();
                            }
                            continue;
                        }
                    }
                    out.push('\\');
                }
                Some('\\') => {
                    chars.next();
                    out.push('\\');
                }
                Some('n') => {
                    chars.next();
                    out.push('\n');
                }
                Some('t') => {
                    chars.next();
                    out.push('\t');
                }
                _ => out.push('\\'),
            },
            _ => out.push(c),
        }
    }

    out
}

/// Consumes an octal escape after a backslash: `0` plus up to two octal
/// digits, or exactly three octal digits. Leaves `chars` untouched otherwise.
fn take_octal_escape(chars: &mut Peekable<Chars<'_>>) -> Option<char> {
    let ahead: Vec<char> = chars.clone().take(3).collect();
    let is_octal = |c: &char| ('0'..='7').contains(c);

    let len = if ahead.first() == Some(&'0') {
        1 + ahead[1..].iter().take_while(|c| is_octal(*c)).count()
    } else if ahead.len() == 3 && ahead.iter().all(is_octal) {
        3
    } else {
        return None;
    };

    let digits: String = ahead[..len].iter().collect();
    let ch = u32::from_str_radix(&digits, 8).ok().and_then(char::from_u32)?;
    for _ in 0..len {
        chars.next();
    }
    Some(ch)
}

fn push_literal(out: &mut String, ch: char) {
    if ch == '$' {
        out.push_str("$$");
    } else {
        out.push(ch);
    }
}
