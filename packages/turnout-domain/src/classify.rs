use serde::{Deserialize, Serialize};

use crate::{
	field::SearchField,
	pattern::{self, NamePairPatterns},
};

/// Field selector value that explicitly asks for the untargeted search.
pub const ALL_FIELDS_SENTINEL: &str = "all";
/// Normalized tokens shorter than this are too unselective to use as ranked prefix terms.
pub const MIN_PREFIX_TERM_CHARS: usize = 3;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
	Browse,
	FieldTargeted,
	NamePair,
	RankedText,
}
impl Strategy {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Browse => "browse",
			Self::FieldTargeted => "field_targeted",
			Self::NamePair => "name_pair",
			Self::RankedText => "ranked_text",
		}
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TextQuery {
	/// Normalized terms, each matched as a word prefix; every term is required.
	Prefix(Vec<String>),
	/// Every normalized word of the input, parsed as a plain phrase without prefix marking.
	Phrase(Vec<String>),
}
impl TextQuery {
	pub fn terms(&self) -> &[String] {
		match self {
			Self::Prefix(terms) | Self::Phrase(terms) => terms,
		}
	}

	/// Input for `to_tsquery` (prefix form) or `plainto_tsquery` (phrase form).
	///
	/// Terms are alphanumeric only, so the prefix form never carries tsquery operators supplied
	/// by the caller.
	pub fn tsquery_input(&self) -> String {
		match self {
			Self::Prefix(terms) =>
				terms.iter().map(|term| format!("{term}:*")).collect::<Vec<_>>().join(" & "),
			Self::Phrase(words) => words.join(" "),
		}
	}
}

/// Immutable result of classifying one request. Built fresh per request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SearchPlan {
	Browse,
	FieldTargeted { field: SearchField, tokens: Vec<String> },
	NamePair { tokens: [String; 2] },
	RankedText(TextQuery),
}
impl SearchPlan {
	pub fn strategy(&self) -> Strategy {
		match self {
			Self::Browse => Strategy::Browse,
			Self::FieldTargeted { .. } => Strategy::FieldTargeted,
			Self::NamePair { .. } => Strategy::NamePair,
			Self::RankedText(_) => Strategy::RankedText,
		}
	}

	pub fn tokens(&self) -> &[String] {
		match self {
			Self::Browse => &[],
			Self::FieldTargeted { tokens, .. } => tokens,
			Self::NamePair { tokens } => tokens,
			Self::RankedText(query) => query.terms(),
		}
	}

	pub fn field(&self) -> Option<SearchField> {
		match self {
			Self::FieldTargeted { field, .. } => Some(*field),
			_ => None,
		}
	}

	/// Substring patterns for a field-targeted plan, one per token.
	pub fn contains_patterns(&self) -> Vec<String> {
		match self {
			Self::FieldTargeted { tokens, .. } =>
				tokens.iter().map(|token| pattern::contains_pattern(token)).collect(),
			_ => Vec::new(),
		}
	}

	pub fn name_pair_patterns(&self) -> Option<NamePairPatterns> {
		match self {
			Self::NamePair { tokens: [first, second] } => Some(NamePairPatterns::new(first, second)),
			_ => None,
		}
	}
}

pub fn classify(raw_text: Option<&str>, field_selector: Option<&str>) -> SearchPlan {
	let tokens = raw_text.unwrap_or_default().split_whitespace().collect::<Vec<_>>();

	if tokens.is_empty() {
		return SearchPlan::Browse;
	}
	if let Some(field) = field_selector.and_then(targeted_field) {
		return SearchPlan::FieldTargeted {
			field,
			tokens: tokens.iter().map(|token| token.to_string()).collect(),
		};
	}
	if let [first, second] = tokens.as_slice() {
		return SearchPlan::NamePair { tokens: [first.to_string(), second.to_string()] };
	}

	SearchPlan::RankedText(text_query(&tokens))
}

/// Lowercases a token and strips everything that is not alphanumeric.
pub fn normalize_token(token: &str) -> String {
	token.chars().filter(|ch| ch.is_alphanumeric()).flat_map(char::to_lowercase).collect()
}

fn targeted_field(selector: &str) -> Option<SearchField> {
	let trimmed = selector.trim();

	if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_FIELDS_SENTINEL) {
		return None;
	}

	SearchField::parse(trimmed)
}

fn text_query(tokens: &[&str]) -> TextQuery {
	let words = tokens
		.iter()
		.map(|token| normalize_token(token))
		.filter(|word| !word.is_empty())
		.collect::<Vec<_>>();
	let terms = words
		.iter()
		.filter(|word| word.chars().count() >= MIN_PREFIX_TERM_CHARS)
		.cloned()
		.collect::<Vec<_>>();

	if terms.is_empty() { TextQuery::Phrase(words) } else { TextQuery::Prefix(terms) }
}
