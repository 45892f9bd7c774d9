//! Reviewer notification operation.

use std::io::Write;

use camino::Utf8Path;
use nudger::chat::ChatGateway;
use nudger::github::ReviewGateway;
use nudger::telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetrySink};
use nudger::{
    ChatError, DiscordConfig, DiscordGateway, IdentityDirectory, IntakeError, NudgerConfig,
    OctocrabReviewGateway, PersonalAccessToken, RepositoryLocator, ReviewNotifier, RunError,
    RunSummary,
};
use tokio_util::sync::CancellationToken;

use super::output::write_run_summary;

/// Notifies the requested reviewers of the configured target.
///
/// # Errors
///
/// Returns [`RunError`] when configuration is invalid, the identity file
/// cannot be loaded, or reviewers cannot be listed.
pub async fn run<W: Write>(
    config: &NudgerConfig,
    cancel: CancellationToken,
    writer: &mut W,
) -> Result<RunSummary, RunError> {
    run_with_gateway_builders(
        config,
        OctocrabReviewGateway::for_token,
        DiscordGateway::new,
        cancel,
        writer,
    )
    .await
}

/// Notifies reviewers using custom gateway builders.
///
/// Every setting is validated and the identity file is loaded before either
/// builder runs, so configuration mistakes never reach the network.
pub async fn run_with_gateway_builders<R, C, BuildReview, BuildChat, W>(
    config: &NudgerConfig,
    build_review: BuildReview,
    build_chat: BuildChat,
    cancel: CancellationToken,
    writer: &mut W,
) -> Result<RunSummary, RunError>
where
    R: ReviewGateway,
    C: ChatGateway,
    BuildReview: FnOnce(&PersonalAccessToken, &RepositoryLocator) -> Result<R, IntakeError>,
    BuildChat: FnOnce(DiscordConfig) -> Result<C, ChatError>,
    W: Write,
{
    let target = config.review_target()?;
    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    let discord = config.discord_config()?;
    let settings = config.dispatch_settings()?;
    let template = config.message_template()?;
    let directory = IdentityDirectory::load(Utf8Path::new(&config.users_file))?;

    let review = build_review(&token, target.locator())?;
    let chat = build_chat(discord)?;

    let telemetry: Box<dyn TelemetrySink> = if config.report_jsonl {
        Box::new(StderrJsonlTelemetrySink)
    } else {
        Box::new(NoopTelemetrySink)
    };

    let summary = ReviewNotifier::new(&review, &chat, &directory)
        .with_template(template)
        .with_settings(settings)
        .with_cancellation(cancel)
        .with_telemetry(telemetry.as_ref())
        .run(&target)
        .await?;

    write_run_summary(writer, &target.locator().to_string(), &summary)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use nudger::chat::{ChannelHandle, ChatGateway, MemberHandle, MessageAck};
    use nudger::github::ReviewGateway;
    use nudger::{
        ChatError, DirectoryError, IntakeError, NudgerConfig, PullRequestNumber,
        RepositoryLocator, RunError, RunStatus,
    };
    use rstest::{fixture, rstest};
    use tempfile::NamedTempFile;
    use tokio_util::sync::CancellationToken;

    use super::run_with_gateway_builders;

    struct StaticReviewGateway;

    #[async_trait]
    impl ReviewGateway for StaticReviewGateway {
        async fn list_open_pull_requests(
            &self,
            _locator: &RepositoryLocator,
        ) -> Result<Vec<PullRequestNumber>, IntakeError> {
            Ok(vec![PullRequestNumber::new(42).expect("42 is positive")])
        }

        async fn list_reviewers(
            &self,
            _locator: &RepositoryLocator,
            _number: PullRequestNumber,
        ) -> Result<Vec<String>, IntakeError> {
            Ok(vec!["alice".to_owned(), "carol".to_owned()])
        }
    }

    #[derive(Clone, Default)]
    struct CapturingChatGateway {
        sent: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ChatGateway for CapturingChatGateway {
        async fn find_member(&self, username: &str) -> Result<MemberHandle, ChatError> {
            Ok(MemberHandle {
                user_id: format!("id-{username}"),
                username: username.to_owned(),
            })
        }

        async fn open_direct_channel(
            &self,
            member: &MemberHandle,
        ) -> Result<ChannelHandle, ChatError> {
            Ok(ChannelHandle {
                channel_id: member.user_id.clone(),
            })
        }

        async fn send_message(
            &self,
            _channel: &ChannelHandle,
            content: &str,
        ) -> Result<MessageAck, ChatError> {
            self.sent
                .lock()
                .expect("sent mutex should be available")
                .push(content.to_owned());
            Ok(MessageAck {
                message_id: "1".to_owned(),
            })
        }
    }

    #[fixture]
    fn users_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file should be created");
        write!(file, "alice:\n  github: alice\n  discord: alice#1\n")
            .expect("identity document should be written");
        file
    }

    fn config_for(users_file: &NamedTempFile) -> NudgerConfig {
        NudgerConfig {
            target: Some("unikraft/unikraft".to_owned()),
            token: Some("ghp_example".to_owned()),
            discord_token: Some("bot-token".to_owned()),
            discord_guild_id: Some("1000".to_owned()),
            users_file: users_file.path().to_string_lossy().into_owned(),
            ..NudgerConfig::default()
        }
    }

    #[rstest]
    #[tokio::test]
    async fn notifies_mapped_reviewers_and_writes_report(users_file: NamedTempFile) {
        let config = config_for(&users_file);
        let chat = CapturingChatGateway::default();
        let sent = Arc::clone(&chat.sent);

        let mut buffer = Vec::new();
        let summary = run_with_gateway_builders(
            &config,
            |token, locator| {
                assert_eq!(token.value(), "ghp_example");
                assert_eq!(locator.to_string(), "unikraft/unikraft");
                Ok(StaticReviewGateway)
            },
            move |discord| {
                assert_eq!(discord.guild_id, "1000");
                Ok(chat)
            },
            CancellationToken::new(),
            &mut buffer,
        )
        .await
        .expect("run should succeed");

        assert_eq!(summary.status(), RunStatus::SucceededWithSkips);
        assert_eq!(
            sent.lock().expect("sent mutex should be available").clone(),
            vec![
                "Hello alice#1! You have a pull request #42 to review on GitHub \
                 (GitHub username: alice)."
                    .to_owned()
            ]
        );
        let output = String::from_utf8(buffer).expect("output should be valid UTF-8");
        assert!(output.contains("#42 alice -> alice#1: sent"), "{output}");
        assert!(output.contains("#42 carol: skipped (unmapped)"), "{output}");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_identity_file_fails_before_gateways_are_built(users_file: NamedTempFile) {
        let config = NudgerConfig {
            users_file: "/nonexistent/nudger/users.yaml".to_owned(),
            ..config_for(&users_file)
        };

        let mut buffer = Vec::new();
        let result = run_with_gateway_builders(
            &config,
            |_token, _locator| -> Result<StaticReviewGateway, IntakeError> {
                panic!("review gateway must not be built")
            },
            |_discord| -> Result<CapturingChatGateway, ChatError> {
                panic!("chat gateway must not be built")
            },
            CancellationToken::new(),
            &mut buffer,
        )
        .await;

        assert!(
            matches!(result, Err(RunError::Directory(DirectoryError::Io { .. }))),
            "expected Directory(Io), got {result:?}"
        );
        assert!(buffer.is_empty(), "nothing should be written");
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_target_fails_before_gateways_are_built(users_file: NamedTempFile) {
        let config = NudgerConfig {
            target: Some("not-a-target".to_owned()),
            ..config_for(&users_file)
        };

        let mut buffer = Vec::new();
        let result = run_with_gateway_builders(
            &config,
            |_token, _locator| -> Result<StaticReviewGateway, IntakeError> {
                panic!("review gateway must not be built")
            },
            |_discord| -> Result<CapturingChatGateway, ChatError> {
                panic!("chat gateway must not be built")
            },
            CancellationToken::new(),
            &mut buffer,
        )
        .await;

        assert_eq!(
            result,
            Err(RunError::Configuration(IntakeError::InvalidTarget {
                target: "not-a-target".to_owned(),
            }))
        );
    }
}
