//! Composition of a running terminal session.
//!
//! `run` wires the session, push channel and renderer together, then reads
//! commands from stdin until `quit` or end of input.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::application::policy::ActionKind;
use crate::application::session::GameSession;
use crate::application::submitter::SubmitRequest;
use crate::config::ClientConfig;
use crate::infrastructure::messaging::ConnectionStateObserver;
use crate::infrastructure::websocket::NotificationClient;
use crate::infrastructure::{ConnectionState, EventBus};
use crate::ports::outbound::GameApiPort;
use crate::ui::commands::{Command, HELP};
use crate::ui::presentation::derive_view;
use crate::ui::presentation::labels::connection_notice;
use crate::ui::{Locale, ViewRenderer};

pub const CONNECTION_WATCH_INTERVAL: Duration = Duration::from_millis(500);

pub struct RunnerDeps {
    pub config: ClientConfig,
    pub api: Arc<dyn GameApiPort>,
    pub renderer: Arc<dyn ViewRenderer>,
}

pub async fn run(deps: RunnerDeps) -> anyhow::Result<()> {
    run_with_input(deps, BufReader::new(tokio::io::stdin())).await
}

pub async fn run_with_input<R>(deps: RunnerDeps, input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let RunnerDeps {
        config,
        api,
        renderer,
    } = deps;

    tracing::info!(
        game_id = %config.game_id,
        player_id = %config.player_id,
        all_ai = config.all_ai,
        "Starting session"
    );

    let game = GameSession::new(api, config.game_id.clone(), config.session());
    let runner = Runner::new(game.clone(), renderer, config.locale);

    let mut tasks = game.spawn_background(config.auto_pass_delay, config.poll_interval);
    tasks.push(runner.spawn_render_loop());
    tasks.push(runner.spawn_chat_loop());

    let bus = EventBus::new();
    tasks.push(Arc::new(game.notification_channel()).attach(&bus).await);
    let connection =
        NotificationClient::new(config.ws_url.clone(), config.game_id.clone(), bus).spawn();
    tasks.push(runner.spawn_connection_watch(connection.observer()));

    if let Err(e) = game.refresh().await {
        tracing::warn!(error = %e, "Initial refresh failed");
        runner.renderer.notify(&e.to_string());
    }

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if runner.handle_line(&line).await.is_break() {
            break;
        }
    }

    tracing::info!(game_id = %config.game_id, "Leaving session");
    tasks.abort_all();
    connection.disconnect();
    game.end().await;
    Ok(())
}

/// Turns commands into session calls and frames into rendered views.
pub struct Runner {
    game: GameSession,
    renderer: Arc<dyn ViewRenderer>,
    locale: Locale,
}

impl Runner {
    pub fn new(game: GameSession, renderer: Arc<dyn ViewRenderer>, locale: Locale) -> Self {
        Self {
            game,
            renderer,
            locale,
        }
    }

    pub async fn handle_line(&self, line: &str) -> ControlFlow<()> {
        match Command::parse(line) {
            Ok(Some(command)) => self.execute(command).await,
            Ok(None) => ControlFlow::Continue(()),
            Err(e) => {
                self.renderer.notify(&e.to_string());
                ControlFlow::Continue(())
            }
        }
    }

    /// Failures are reported through the renderer; successes show up as
    /// the next published frame.
    pub async fn execute(&self, command: Command) -> ControlFlow<()> {
        let outcome = match command {
            Command::Say(text) => self.game.say(text).await.map(drop).map_err(|e| e.to_string()),
            Command::Vote(target) => self
                .game
                .select(ActionKind::Vote, target)
                .await
                .map_err(|e| e.to_string()),
            Command::Target(target) => self
                .game
                .select(ActionKind::NightAction, target)
                .await
                .map_err(|e| e.to_string()),
            Command::Confirm => self.game.confirm().await.map(drop).map_err(|e| e.to_string()),
            Command::Next => self
                .game
                .submit(SubmitRequest::NextPhase)
                .await
                .map(drop)
                .map_err(|e| e.to_string()),
            Command::Chat(text) => self.game.send_chat(&text).await.map_err(|e| e.to_string()),
            Command::Refresh => self.game.refresh().await.map(drop).map_err(|e| e.to_string()),
            Command::Help => {
                self.renderer.notify(HELP);
                Ok(())
            }
            Command::Quit => return ControlFlow::Break(()),
        };

        if let Err(message) = outcome {
            tracing::debug!(%message, "Command failed");
            self.renderer.notify(&message);
        }
        ControlFlow::Continue(())
    }

    /// Render every published frame, newest first wins if several pile up.
    pub fn spawn_render_loop(&self) -> JoinHandle<()> {
        let mut frames = self.game.frames();
        let session = self.game.local_session();
        let renderer = Arc::clone(&self.renderer);
        let locale = self.locale;

        tokio::spawn(async move {
            loop {
                let frame = frames.borrow_and_update().clone();
                if let Some(frame) = frame {
                    renderer.render(&derive_view(&frame, &session, locale));
                }
                if frames.changed().await.is_err() {
                    return;
                }
            }
        })
    }

    /// Tell the user when the push channel drops or comes back.
    pub fn spawn_connection_watch(&self, observer: ConnectionStateObserver) -> JoinHandle<()> {
        let renderer = Arc::clone(&self.renderer);
        let locale = self.locale;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(CONNECTION_WATCH_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut announced = ConnectionState::Disconnected;
            loop {
                ticker.tick().await;
                let current = observer.state();
                if matches!(
                    current,
                    ConnectionState::Connecting | ConnectionState::Disconnected
                ) {
                    continue;
                }
                if let Some(notice) = connection_notice(locale, announced, current) {
                    tracing::debug!(state = current.as_str(), "Push channel state changed");
                    renderer.notify(notice);
                }
                announced = current;
            }
        })
    }

    pub fn spawn_chat_loop(&self) -> JoinHandle<()> {
        let mut lines = self.game.chat_log().subscribe();
        let renderer = Arc::clone(&self.renderer);

        tokio::spawn(async move {
            loop {
                match lines.recv().await {
                    Ok(entry) => renderer.render_chat(&entry),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Chat renderer fell behind");
                    }
                    Err(RecvError::Closed) => return,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chat::ChatEntry;
    use crate::infrastructure::messaging::set_connection_state;
    use crate::infrastructure::testing::fixtures::{game_id, local_session, standard_state_dto};
    use crate::ports::outbound::testing::FakeGameApi;
    use crate::ui::presentation::GameView;
    use std::sync::atomic::AtomicU8;
    use std::sync::Mutex;
    use wolfpack_shared::ActionRequest;

    #[derive(Default)]
    struct RecordingRenderer {
        views: Mutex<Vec<GameView>>,
        notices: Mutex<Vec<String>>,
    }

    impl ViewRenderer for RecordingRenderer {
        fn render(&self, view: &GameView) {
            self.views.lock().expect("lock").push(view.clone());
        }

        fn render_chat(&self, _entry: &ChatEntry) {}

        fn notify(&self, message: &str) {
            self.notices.lock().expect("lock").push(message.to_string());
        }
    }

    impl RecordingRenderer {
        fn notices(&self) -> Vec<String> {
            self.notices.lock().expect("lock").clone()
        }

        fn last_view(&self) -> Option<GameView> {
            self.views.lock().expect("lock").last().cloned()
        }
    }

    fn runner(api: &FakeGameApi) -> (Runner, Arc<RecordingRenderer>, GameSession) {
        let renderer = Arc::new(RecordingRenderer::default());
        let game = GameSession::new(Arc::new(api.clone()), game_id(), local_session());
        let runner = Runner::new(
            game.clone(),
            Arc::clone(&renderer) as Arc<dyn ViewRenderer>,
            Locale::En,
        );
        (runner, renderer, game)
    }

    #[tokio::test]
    async fn vote_then_confirm_submits_the_choice() {
        let api = FakeGameApi::with_state(standard_state_dto(1, "vote", "villager"));
        let (runner, renderer, game) = runner(&api);
        game.refresh().await.expect("refresh");

        assert!(runner.handle_line("vote 3").await.is_continue());
        assert!(runner.handle_line("confirm").await.is_continue());

        assert_eq!(api.submitted().await, vec![ActionRequest::vote(3)]);
        assert!(renderer.notices().is_empty());
    }

    #[tokio::test]
    async fn failures_are_reported_not_raised() {
        let api = FakeGameApi::with_state(standard_state_dto(1, "vote", "villager"));
        let (runner, renderer, game) = runner(&api);
        game.refresh().await.expect("refresh");

        assert!(runner.handle_line("dance").await.is_continue());
        assert!(runner.handle_line("vote 1").await.is_continue());
        assert!(runner.handle_line("confirm").await.is_continue());

        let notices = renderer.notices();
        assert_eq!(notices.len(), 3);
        assert!(notices[0].contains("dance"));
        assert!(api.submitted().await.is_empty());
    }

    #[tokio::test]
    async fn quit_breaks_and_help_is_printed() {
        let api = FakeGameApi::new();
        let (runner, renderer, _game) = runner(&api);

        assert!(runner.handle_line("help").await.is_continue());
        assert!(runner.handle_line("").await.is_continue());
        assert!(runner.handle_line("quit").await.is_break());
        assert_eq!(renderer.notices(), vec![HELP.to_string()]);
    }

    #[tokio::test]
    async fn render_loop_draws_each_frame() {
        let api = FakeGameApi::with_state(standard_state_dto(1, "day", "villager"));
        let (runner, renderer, game) = runner(&api);
        let task = runner.spawn_render_loop();

        let mut frames = game.frames();
        game.refresh().await.expect("refresh");
        frames.changed().await.expect("frame");
        tokio::time::sleep(Duration::from_millis(20)).await;
        task.abort();

        let view = renderer.last_view().expect("rendered");
        assert_eq!(view.header, "Day 1 · Day discussion");
    }

    #[tokio::test(start_paused = true)]
    async fn push_channel_loss_and_recovery_are_announced() {
        let api = FakeGameApi::new();
        let (runner, renderer, _game) = runner(&api);
        let state = Arc::new(AtomicU8::new(ConnectionState::Disconnected.to_u8()));
        let task = runner.spawn_connection_watch(ConnectionStateObserver::new(Arc::clone(&state)));

        let hold = Duration::from_millis(600);
        for next in [
            ConnectionState::Connecting,
            ConnectionState::Connected,
            ConnectionState::Reconnecting,
            ConnectionState::Connecting,
            ConnectionState::Reconnecting,
            ConnectionState::Connecting,
            ConnectionState::Connected,
        ] {
            set_connection_state(&state, next);
            tokio::time::sleep(hold).await;
        }
        set_connection_state(&state, ConnectionState::Reconnecting);
        set_connection_state(&state, ConnectionState::Failed);
        tokio::time::sleep(hold).await;
        task.abort();

        assert_eq!(
            renderer.notices(),
            vec![
                "Push channel lost, reconnecting".to_string(),
                "Push channel reconnected".to_string(),
                "Push channel unavailable; relying on scheduled refresh".to_string(),
            ]
        );
    }
}
