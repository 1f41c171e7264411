use crate::model::language_model::{BEGIN_OF_SENTENCE_ID, CONTROL_WORDS};

/// A word found in a text, with its position in characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
	/// Index of the first character.
	pub start: usize,
	/// Index one past the last character.
	pub end: usize,
	pub text: String,
}

/// Word that opens every context handed to a model.
const BEGIN_OF_SENTENCE: &str = CONTROL_WORDS[BEGIN_OF_SENTENCE_ID as usize];

fn is_word_char(c: char) -> bool {
	c.is_alphanumeric() || c == '\'' || c == '-' || c == '_'
}

fn is_sentence_end(c: char) -> bool {
	matches!(c, '.' | '!' | '?' | '\n')
}

/// True if every character of `token` is numeric.
pub fn is_number(token: &str) -> bool {
	!token.is_empty() && token.chars().all(char::is_numeric)
}

/// Splits `text` into word tokens.
///
/// A word is a maximal run of alphanumeric characters, apostrophes,
/// hyphens and underscores. Spans count characters, not bytes.
pub fn tokenize_text(text: &str) -> Vec<Token> {
	let mut tokens = Vec::new();
	let mut current: Option<Token> = None;

	for (i, c) in text.chars().enumerate() {
		if is_word_char(c) {
			let token = current.get_or_insert_with(|| Token { start: i, end: i, text: String::new() });
			token.text.push(c);
			token.end = i + 1;
		} else if let Some(token) = current.take() {
			tokens.push(token);
		}
	}
	tokens.extend(current);

	tokens
}

/// Splits the text left of the cursor into a prediction context.
///
/// Only the current sentence is kept and it is opened by `<s>`. The last
/// element is the word being typed, empty if `text` ends in a separator.
///
/// # Example
/// `"Hello. How are yo"` → `["<s>", "How", "are", "yo"]`
pub fn tokenize_context(text: &str) -> Vec<String> {
	let sentence_start = text
		.char_indices()
		.rev()
		.find(|&(_, c)| is_sentence_end(c))
		.map(|(i, c)| i + c.len_utf8())
		.unwrap_or(0);
	let sentence = &text[sentence_start..];

	let mut context = vec![BEGIN_OF_SENTENCE.to_owned()];
	context.extend(tokenize_text(sentence).into_iter().map(|token| token.text));

	let in_word = sentence.chars().last().is_some_and(is_word_char);
	if !in_word {
		context.push(String::new());
	}

	context
}
