use serde::Serialize;

/// Which layer of the pipeline produced the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "site", rename_all = "lowercase")]
pub enum Strategy {
	Site(&'static str),
	Generic,
	Fallback,
}

impl std::fmt::Display for Strategy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Strategy::Site(name) => write!(f, "site:{name}"),
			Strategy::Generic => f.write_str("generic"),
			Strategy::Fallback => f.write_str("fallback"),
		}
	}
}

/// Bounded digest of one page, produced once per vanish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
	pub text: String,
	pub title: String,
	pub source_url: String,
	pub strategy: Strategy,
}

impl ExtractionResult {
	pub fn char_count(&self) -> usize {
		self.text.chars().count()
	}
}
