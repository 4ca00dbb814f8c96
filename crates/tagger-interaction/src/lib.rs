//! Network collaborators: the Gemini suggestion provider and the Zotero
//! item fetcher.

pub mod gemini_suggestion_provider;
pub mod zotero_client;

pub use gemini_suggestion_provider::GeminiSuggestionProvider;
pub use zotero_client::ZoteroClient;
