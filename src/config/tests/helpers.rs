//! Shared test helpers for configuration tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::NudgerConfig;

/// Applies a configuration layer to the composer based on the layer type.
pub fn apply_layer(composer: &mut MergeComposer, layer_type: &str, value: Value) {
    match layer_type {
        "defaults" => composer.push_defaults(value),
        "file" => composer.push_file(value, None),
        "environment" => composer.push_environment(value),
        "cli" => composer.push_cli(value),
        _ => panic!("unknown layer type: {layer_type}"),
    }
}

/// Helper to compose a [`NudgerConfig`] from a sequence of `(layer_type, value)` pairs.
pub fn build_config_from_layers(layers: &[(&str, Value)]) -> NudgerConfig {
    let mut composer = MergeComposer::new();

    for (layer_type, value) in layers {
        apply_layer(&mut composer, layer_type, value.clone());
    }

    NudgerConfig::merge_from_layers(composer.layers()).expect("merge should succeed")
}

/// Configuration with every required field set.
pub fn complete_config() -> NudgerConfig {
    NudgerConfig {
        target: Some("unikraft/unikraft".to_owned()),
        token: Some("ghp_example".to_owned()),
        discord_token: Some("bot-token".to_owned()),
        discord_guild_id: Some("1000".to_owned()),
        ..NudgerConfig::default()
    }
}
