//! Configuration loading and validation tests
//!
//! Tests focus on BEHAVIOR of configuration loading, validation, and error
//! handling. We test observable outcomes, not implementation details of TOML
//! parsing.

use cooking_agent::config::{AgentConfig, ConfigError};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_config_loads_successfully_from_valid_toml() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[agent]
id = "cooking-agent"
description = "Answers questions about recipes"

[server]
port = 9000

[llm]
provider = "groq"
model = "llama-3.3-70b-versatile"
api_key_env = "GROQ_API_KEY"
system_prompt = "You are a recipe expert."
"#
    )
    .unwrap();

    let config = AgentConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.agent.id, "cooking-agent");
    assert_eq!(config.agent.description, "Answers questions about recipes");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.llm.provider, "groq");
    assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
}

#[test]
fn test_config_without_server_section_uses_default_port() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[agent]
id = "cooking-agent"
description = "Answers questions about recipes"

[llm]
provider = "groq"
model = "llama-3.3-70b-versatile"
api_key_env = "GROQ_API_KEY"
system_prompt = "You are a recipe expert."
"#
    )
    .unwrap();

    let config = AgentConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.server.port, 8080);
}

#[test]
fn test_config_rejects_invalid_agent_id() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[agent]
id = "invalid@agent"
description = "Bad id"

[llm]
provider = "groq"
model = "llama-3.3-70b-versatile"
api_key_env = "GROQ_API_KEY"
system_prompt = "You are a recipe expert."
"#
    )
    .unwrap();

    let result = AgentConfig::load_from_file(temp_file.path());

    assert!(matches!(result, Err(ConfigError::InvalidAgentId(_))));
}

#[test]
fn test_config_rejects_invalid_base_url() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[agent]
id = "cooking-agent"
description = "Answers questions about recipes"

[llm]
provider = "groq"
model = "llama-3.3-70b-versatile"
api_key_env = "GROQ_API_KEY"
system_prompt = "You are a recipe expert."
base_url = "not a url"
"#
    )
    .unwrap();

    let result = AgentConfig::load_from_file(temp_file.path());

    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
fn test_config_rejects_missing_required_section() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[agent]
id = "cooking-agent"
description = "No llm section"
"#
    )
    .unwrap();

    let result = AgentConfig::load_from_file(temp_file.path());

    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_config_missing_file_is_a_read_error() {
    let result = AgentConfig::load_from_file(std::path::Path::new("/nonexistent/agent.toml"));

    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_api_key_resolution_reports_missing_env_var() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[agent]
id = "cooking-agent"
description = "Answers questions about recipes"

[llm]
provider = "groq"
model = "llama-3.3-70b-versatile"
api_key_env = "COOKING_AGENT_TEST_UNSET_KEY"
system_prompt = "You are a recipe expert."
"#
    )
    .unwrap();

    let config = AgentConfig::load_from_file(temp_file.path()).unwrap();

    // Loading succeeds; resolution of the key is deferred and fails loudly
    let result = config.get_llm_api_key();
    assert!(matches!(result, Err(ConfigError::EnvVarNotFound(_))));
}
