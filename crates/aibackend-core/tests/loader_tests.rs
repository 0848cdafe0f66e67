use aibackend_core::loader::{expand_path, resolve_with_base, SettingsLoader};
use aibackend_core::settings::{MODEL_ID, TOKEN_LIMIT};
use figment::Jail;
use tempfile::TempDir;

const SETTINGS: &str = r#"
[chat]
class = "echo"

[chat.config]
MODEL_ID = "gpt-4"
TOKEN_LIMIT = "8000"

[embedding]
class = "hash"

[embedding.config]
MODEL_ID = "text-embed-1"
EMBEDDING_OUTPUT_DIMENSIONS = 1536

[model_defaults]
chunk_overlap_characters = 64

[model_defaults.token_limits]
text-embed-1 = 512
"#;

#[test]
fn from_file_reads_both_backends() {
    Jail::expect_with(|jail| {
        jail.create_file("custom.toml", SETTINGS)?;

        let settings = SettingsLoader::from_file(&jail.directory().join("custom.toml"))
            .and_then(|l| l.settings())
            .map_err(|e| e.to_string())?;

        let chat = settings.chat.expect("chat section");
        assert_eq!(chat.class, "echo");
        assert_eq!(chat.config.model_id().map_err(|e| e.to_string())?, "gpt-4");
        assert_eq!(chat.config.optional_int(TOKEN_LIMIT).map_err(|e| e.to_string())?, Some(8000));

        let embedding = settings.embedding.expect("embedding section");
        assert_eq!(embedding.class, "hash");
        assert_eq!(settings.model_defaults.chunk_overlap_characters, Some(64));
        assert_eq!(settings.model_defaults.token_limits.get("text-embed-1"), Some(&512));
        Ok(())
    });
}

#[test]
fn missing_file_is_a_load_error() {
    let tmp = TempDir::new().unwrap();
    let err = SettingsLoader::from_file(&tmp.path().join("nope.toml"))
        .err()
        .expect("should fail");
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn env_vars_override_file_values() {
    Jail::expect_with(|jail| {
        jail.create_file("aibackend.toml", SETTINGS)?;
        jail.set_env("AIBACKEND_CHAT__CONFIG__TOKEN_LIMIT", 4000);

        let settings = SettingsLoader::load()
            .and_then(|l| l.settings())
            .map_err(|e| e.to_string())?;
        let chat = settings.chat.expect("chat section");
        assert_eq!(chat.config.optional_int(TOKEN_LIMIT).map_err(|e| e.to_string())?, Some(4000));
        Ok(())
    });
}

#[test]
fn environment_file_is_layered_on_base() {
    Jail::expect_with(|jail| {
        jail.create_file("aibackend.toml", SETTINGS)?;
        jail.create_file(
            "aibackend.prod.toml",
            "[chat.config]\nMODEL_ID = \"gpt-4o\"\n",
        )?;
        jail.set_env("AIBACKEND_ENV", "prod");

        let settings = SettingsLoader::load()
            .and_then(|l| l.settings())
            .map_err(|e| e.to_string())?;
        let chat = settings.chat.expect("chat section");
        assert_eq!(chat.class, "echo", "base keys survive the merge");
        assert_eq!(chat.config.get(MODEL_ID).and_then(|v| v.as_str()), Some("gpt-4o"));
        Ok(())
    });
}

#[test]
fn get_extracts_a_single_key() {
    Jail::expect_with(|jail| {
        jail.create_file("aibackend.toml", SETTINGS)?;
        let loader = SettingsLoader::load().map_err(|e| e.to_string())?;
        let class: String = loader.get("embedding.class").map_err(|e| e.to_string())?;
        assert_eq!(class, "hash");
        assert!(loader.get::<String>("nothing.here").is_err());
        Ok(())
    });
}

#[test]
fn relative_paths_resolve_against_base() {
    let base = std::path::Path::new("/srv/app");
    assert_eq!(resolve_with_base(base, "conf/aibackend.toml"), base.join("conf/aibackend.toml"));
    assert_eq!(resolve_with_base(base, "/etc/aibackend.toml"), std::path::PathBuf::from("/etc/aibackend.toml"));
    assert_eq!(expand_path("plain/path"), std::path::PathBuf::from("plain/path"));
}
