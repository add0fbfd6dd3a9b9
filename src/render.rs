use itertools::Itertools;

/// Highlight state of a single letter of the target word
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum LetterState {
    Untyped,
    Correct,
    Incorrect,
}

impl LetterState {
    pub fn css_class(&self) -> &'static str {
        match self {
            LetterState::Untyped => "untyped",
            LetterState::Correct => "correct",
            LetterState::Incorrect => "incorrect",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Letter {
    pub char: char,
    pub state: LetterState,
}

/// Maps every character of `target` to its highlight given what has been typed so far.
pub fn render(target: &str, typed: &str) -> Vec<Letter> {
    let mut typed_chars = typed.chars();

    target
        .chars()
        .map(|expected| {
            let state = match typed_chars.next() {
                None => LetterState::Untyped,
                Some(c) if c == expected => LetterState::Correct,
                Some(_) => LetterState::Incorrect,
            };
            Letter {
                char: expected,
                state,
            }
        })
        .collect()
}

pub fn escape_markup(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Markup rendition of [`render`] for display surfaces that take HTML.
pub fn to_markup(target: &str, typed: &str) -> String {
    render(target, typed)
        .iter()
        .map(|letter| {
            format!(
                "<span class=\"letter {}\">{}</span>",
                letter.state.css_class(),
                escape_markup(&letter.char.to_string())
            )
        })
        .join("")
}
