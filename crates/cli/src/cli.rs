use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "ghost")]
#[command(about = "Ghost tabs - inspect hidden tabs, search their content, test extraction")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format
	#[arg(short, long, global = true, value_enum, default_value = "text")]
	pub format: OutputFormat,

	/// Search backend base URL (overrides config and GHOST_BACKEND_URL)
	#[arg(long, global = true, value_name = "URL")]
	pub backend: Option<String>,

	/// Record store file (overrides config and GHOST_STORE_PATH)
	#[arg(long, global = true, value_name = "FILE")]
	pub store: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run the content extractor over a saved HTML page
	Extract {
		file: PathBuf,
		/// URL the page was saved from; selects site-specific extraction
		#[arg(long)]
		url: Option<String>,
		/// Title to report instead of the document's own
		#[arg(long)]
		title: Option<String>,
	},

	/// Semantic search over indexed pages
	Search {
		query: String,
		/// Number of results
		#[arg(short = 'k', long, default_value_t = ghost_protocol::DEFAULT_TOP_K)]
		top_k: usize,
	},

	/// LLM-assisted keyword search over indexed pages
	LlmSearch {
		query: String,
		#[arg(short = 'k', long, default_value_t = ghost_protocol::DEFAULT_TOP_K)]
		top_k: usize,
	},

	/// List pages the backend has indexed
	Indexed,

	/// Show the backend's LLM settings, or replace them when all three flags are given
	LlmConfig {
		#[arg(long, value_name = "URL", requires_all = ["api_key", "model"])]
		base_url: Option<String>,
		#[arg(long, value_name = "KEY", requires_all = ["base_url", "model"])]
		api_key: Option<String>,
		#[arg(long, requires_all = ["base_url", "api_key"])]
		model: Option<String>,
	},

	/// Backend reachability and local store summary
	Status,

	/// Hidden-record store management
	Hidden {
		#[command(subcommand)]
		action: HiddenAction,
	},

	/// Show or change engine settings
	Settings {
		/// Discard hidden tabs instead of keeping them loaded
		#[arg(long)]
		auto_discard: Option<bool>,
	},
}

#[derive(Subcommand, Debug)]
pub enum HiddenAction {
	/// List hidden records
	#[command(alias = "ls")]
	List,
	/// Forget a hidden record and drop it from the index
	#[command(alias = "rm")]
	Remove { url: String },
}

impl Commands {
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Extract { .. } => "extract",
			Commands::Search { .. } => "search",
			Commands::LlmSearch { .. } => "llm-search",
			Commands::Indexed => "indexed",
			Commands::LlmConfig { .. } => "llm-config",
			Commands::Status => "status",
			Commands::Hidden { action: HiddenAction::List } => "hidden list",
			Commands::Hidden {
				action: HiddenAction::Remove { .. },
			} => "hidden remove",
			Commands::Settings { .. } => "settings",
		}
	}
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn cli_definition_is_valid() {
		Cli::command().debug_assert();
	}

	#[test]
	fn global_flags_follow_subcommands() {
		let cli = Cli::parse_from(["ghost", "hidden", "rm", "https://a.test/", "-f", "json", "-vv", "--store", "/tmp/s.json"]);
		assert_eq!(cli.verbose, 2);
		assert_eq!(cli.format, OutputFormat::Json);
		assert_eq!(cli.store, Some(PathBuf::from("/tmp/s.json")));
		assert_eq!(cli.command.name(), "hidden remove");
	}

	#[test]
	fn search_top_k_defaults() {
		let cli = Cli::parse_from(["ghost", "search", "rust tabs"]);
		match cli.command {
			Commands::Search { query, top_k } => {
				assert_eq!(query, "rust tabs");
				assert_eq!(top_k, 5);
			}
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn llm_config_takes_all_three_settings_or_none() {
		let cli = Cli::parse_from(["ghost", "llm-config"]);
		assert_eq!(cli.command.name(), "llm-config");

		let cli = Cli::parse_from(["ghost", "llm-config", "--base-url", "https://llm.test/v1", "--api-key", "sk-1", "--model", "m"]);
		match cli.command {
			Commands::LlmConfig { base_url, api_key, model } => {
				assert_eq!(base_url.as_deref(), Some("https://llm.test/v1"));
				assert_eq!(api_key.as_deref(), Some("sk-1"));
				assert_eq!(model.as_deref(), Some("m"));
			}
			other => panic!("unexpected command {other:?}"),
		}

		assert!(Cli::try_parse_from(["ghost", "llm-config", "--model", "m"]).is_err());
	}
}
