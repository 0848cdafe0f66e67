//! `aibackend-check`: load a settings file, build every configured backend
//! and optionally run a chat, embed or split call against them.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use aibackend_backends::Backends;
use aibackend_core::loader::{resolve_with_base, SettingsLoader};
use aibackend_core::{Backend, BackendConfig, BaseConfig, ChatBackend, EmbeddingBackend, TextSplitter};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckArgs {
    pub config: Option<PathBuf>,
    pub chat: Vec<String>,
    pub embed: Vec<String>,
    pub split: Option<String>,
}

pub const USAGE: &str =
    "Usage: aibackend-check [--config PATH] [--chat MESSAGE]... [--embed TEXT]... [--split TEXT]";

impl CheckArgs {
    /// Parse arguments, excluding the program name.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| args.next().ok_or_else(|| anyhow!("{flag} requires a value"));
            match arg.as_str() {
                "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
                "--chat" => parsed.chat.push(value("--chat")?),
                "--embed" => parsed.embed.push(value("--embed")?),
                "--split" => parsed.split = Some(value("--split")?),
                other => bail!("unexpected argument '{other}'\n{USAGE}"),
            }
        }
        Ok(parsed)
    }
}

/// Run the check and return the human-readable report.
pub fn run(args: &CheckArgs) -> Result<String> {
    let loader = match &args.config {
        Some(path) => {
            let cwd = std::env::current_dir().context("reading current directory")?;
            let path = resolve_with_base(&cwd, path.to_string_lossy());
            SettingsLoader::from_file(&path)
                .with_context(|| format!("loading settings from {}", path.display()))?
        }
        None => SettingsLoader::load().context("loading settings")?,
    };
    let settings = loader.settings().context("reading settings")?;
    let backends = Backends::from_settings(&settings).context("invalid backend configuration")?;

    let mut report = String::new();
    match &backends.chat {
        Some(chat) => {
            describe(&mut report, "chat", chat.config().base())?;
            if !args.chat.is_empty() {
                let response = chat.chat(&args.chat).context("chat call failed")?;
                writeln!(report, "  response: {response}")?;
            }
        }
        None => writeln!(report, "chat: not configured")?,
    }
    match &backends.embedding {
        Some(embedding) => {
            describe(&mut report, "embedding", embedding.config().base())?;
            writeln!(report, "  embedding_output_dimensions: {}", embedding.embedding_output_dimensions())?;
            for (text, vector) in args.embed.iter().zip(embedding.embed(args.embed.clone())) {
                let vector = vector.context("embed call failed")?;
                let preview: Vec<String> = vector.iter().take(4).map(|x| format!("{x:.4}")).collect();
                writeln!(report, "  embed {text:?}: [{}, ...] ({} dims)", preview.join(", "), vector.len())?;
            }
        }
        None => writeln!(report, "embedding: not configured")?,
    }

    if let Some(text) = &args.split {
        let splitter = match (&backends.embedding, &backends.chat) {
            (Some(embedding), _) => embedding.text_splitter(),
            (None, Some(chat)) => chat.text_splitter(),
            (None, None) => bail!("--split needs a configured backend"),
        };
        let chunks = splitter.split_text(text);
        writeln!(report, "split into {} chunk(s):", chunks.len())?;
        for (i, chunk) in chunks.iter().enumerate() {
            writeln!(report, "  {}. {chunk}", i + 1)?;
        }
    }
    info!("backend check passed");
    Ok(report)
}

fn describe(report: &mut String, role: &str, base: &BaseConfig) -> std::fmt::Result {
    writeln!(report, "{role}: model_id={}", base.model_id())?;
    writeln!(report, "  token_limit: {}", base.token_limit())?;
    writeln!(report, "  chunk_overlap_characters: {}", base.chunk_overlap_characters())
}
