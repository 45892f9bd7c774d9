//! Command-line pre-processing ahead of ortho-config parsing.
//!
//! The target may be given positionally (`nudger unikraft/unikraft/42`) and
//! the command may be prefixed with the `notify-reviewers` command word.
//! Neither is known to the derived parser, so both are lifted out of the
//! argument vector before it is handed over.

use std::ffi::OsString;

use nudger::{IntakeError, NudgerConfig};
use ortho_config::OrthoConfig;

/// Optional command word accepted before any other argument.
pub const COMMAND_WORD: &str = "notify-reviewers";

/// Flags whose value is passed as the following argument.
const VALUE_FLAGS: &[&str] = &[
    "--target",
    "-T",
    "--owner",
    "-o",
    "--repo",
    "-r",
    "--token",
    "-t",
    "--github-api-url",
    "-g",
    "--discord-token",
    "-d",
    "--discord-guild-id",
    "-D",
    "--discord-api-url",
    "-a",
    "--users-file",
    "-u",
    "--concurrency",
    "-c",
    "--request-timeout-seconds",
    "-s",
    "--message-template",
    "-m",
    "--config-path",
];

/// Removes the command word and the first positional argument.
///
/// Returns the positional target, if any, and the remaining arguments with
/// the program name kept first. Values that follow a value-taking flag are
/// never mistaken for the target, and everything after `--` is positional.
pub fn split_positional_target<I>(args: I) -> (Option<String>, Vec<OsString>)
where
    I: IntoIterator<Item = OsString>,
{
    let mut iter = args.into_iter();
    let mut remaining: Vec<OsString> = iter.next().into_iter().collect();
    let mut target = None;
    let mut command_word_allowed = true;

    while let Some(arg) = iter.next() {
        if arg == "--" {
            for rest in iter.by_ref() {
                match rest.to_str() {
                    Some(text) if target.is_none() => target = Some(text.to_owned()),
                    _ => remaining.push(rest),
                }
            }
            break;
        }

        let Some(text) = arg.to_str() else {
            remaining.push(arg);
            continue;
        };

        if text.len() > 1 && text.starts_with('-') {
            let takes_value = VALUE_FLAGS.contains(&text);
            remaining.push(arg);
            if takes_value {
                remaining.extend(iter.next());
            }
        } else if command_word_allowed && text == COMMAND_WORD {
            command_word_allowed = false;
        } else if target.is_none() {
            command_word_allowed = false;
            target = Some(text.to_owned());
        } else {
            remaining.push(arg);
        }
    }

    (target, remaining)
}

/// Loads configuration from `args`, honouring a positional target.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when ortho-config rejects the
/// arguments or when a positional target is combined with `--target`.
pub fn load_config_from<I>(args: I) -> Result<NudgerConfig, IntakeError>
where
    I: IntoIterator<Item = OsString>,
{
    let (target, remaining) = split_positional_target(args);
    let target_flag_given = remaining.iter().any(is_target_flag);

    let mut config =
        NudgerConfig::load_from_iter(remaining).map_err(|error| IntakeError::Configuration {
            message: error.to_string(),
        })?;

    if let Some(value) = target {
        if target_flag_given {
            return Err(IntakeError::Configuration {
                message: format!(
                    "target `{value}` given positionally and with --target; use one"
                ),
            });
        }
        config.set_target(value);
    }
    Ok(config)
}

fn is_target_flag(arg: &OsString) -> bool {
    arg.to_str().is_some_and(|text| {
        text == "--target" || text.starts_with("--target=") || text.starts_with("-T")
    })
}
