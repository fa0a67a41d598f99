//! `LIKE` pattern forms used by substring and prefix matching.
//!
//! Every pattern is lowercased so it can be compared against `lower(column)` and hit the trigram
//! indexes, and user input is escaped so `%`, `_` and `\` always match literally.

/// Lowercases `raw` and escapes the `LIKE` metacharacters with the default `\` escape.
pub fn escape_like(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());

	for ch in raw.chars().flat_map(char::to_lowercase) {
		if matches!(ch, '\\' | '%' | '_') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}

pub fn contains_pattern(token: &str) -> String {
	format!("%{}%", escape_like(token))
}

pub fn prefix_pattern(token: &str) -> String {
	format!("{}%", escape_like(token))
}

/// The four patterns tested for a two-token personal name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NamePairPatterns {
	pub first_prefix: String,
	pub second_prefix: String,
	pub joined_prefix: String,
	pub joined_contains: String,
}
impl NamePairPatterns {
	pub fn new(first: &str, second: &str) -> Self {
		let joined = format!("{first} {second}");

		Self {
			first_prefix: prefix_pattern(first),
			second_prefix: prefix_pattern(second),
			joined_prefix: prefix_pattern(&joined),
			joined_contains: contains_pattern(&joined),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn escape_like_lowercases_and_escapes_metacharacters() {
		assert_eq!(escape_like("O'Brien"), "o'brien");
		assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
	}

	#[test]
	fn name_pair_patterns_cover_both_orders_and_joined_forms() {
		let patterns = NamePairPatterns::new("Van", "Buren");

		assert_eq!(patterns.first_prefix, "van%");
		assert_eq!(patterns.second_prefix, "buren%");
		assert_eq!(patterns.joined_prefix, "van buren%");
		assert_eq!(patterns.joined_contains, "%van buren%");
	}
}
