//! lettura-providers — translation backends and article sources.
//!
//! Implements the `Translator` trait for Google's public endpoint and
//! LibreTranslate, and the `ArticleSource` trait for La Stampa and local
//! text files. Also owns configuration loading.

pub mod config;
pub mod file;
pub mod google;
pub mod lastampa;
pub mod libretranslate;
pub mod mock;

pub use config::{create_translator, load_config, LetturaConfig, TranslatorConfig};
pub use file::FileSource;
pub use google::GoogleTranslator;
pub use lastampa::{LaStampaSource, NewsConfig};
pub use libretranslate::LibreTranslator;
pub use mock::MockTranslator;
