//! tripsync - browse and edit trips kept live by the server
//!
//! The loop follows the usual pattern:
//! 1. Event (keyboard) -> Component.handle_event() -> UiAction
//! 2. UiAction dispatched to the UI EffectStore
//! 3. The UI reducer updates state and returns effects (save)
//! 4. Effects call into the TripProvider, which reports back with TripActions
//! 5. If either store changed, re-render
//!
//! # Usage
//!
//! ```sh
//! # Interactive list and edit form
//! tripsync --server localhost:3000 --log-file tripsync.log
//!
//! # Print the trips once
//! tripsync list
//!
//! # Print live changes until ctrl-c
//! tripsync watch
//! ```

use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tripsync::components::{Component, TripEdit, TripEditProps, TripList, TripListProps};
use tripsync::sync::SaveOutcome;
use tripsync::ui::{self, Effect, Screen, UiAction, UiState};
use tripsync::{
    Applied, Args, ChannelState, Command, HttpTripApi, PushConnector, Trip, TripAction, TripApi,
    TripProvider, TripsState, WireTrip, WsConnector,
};
use tripsync_core::{
    process_raw_event, spawn_event_poller, EffectStoreWithMiddleware, EventKind,
    LoggingMiddleware, RawEvent, TaskManager,
};

/// Task key for the UI side of a form save
const FORM_SAVE_TASK: &str = "form-save";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;

    let config = args.server_config();
    info!(server = %config.host(), "tripsync starting");
    let api = HttpTripApi::new(&config);

    match args.command {
        Some(Command::List) => print_trips(api).await,
        Some(Command::Watch) => {
            watch_changes(TripProvider::new(api, WsConnector::new(&config))).await
        }
        None => run_tui(TripProvider::new(api, WsConnector::new(&config))).await,
    }
}

/// Logs go to `log_file` only; stdout belongs to the terminal UI.
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let Some(path) = log_file else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tripsync=debug".into());
    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
    Ok(())
}

// ============================================================================
// list / watch
// ============================================================================

async fn print_trips(api: HttpTripApi) -> anyhow::Result<()> {
    let trips: Vec<Trip> = api
        .list_trips()
        .await
        .context("failed to fetch trips")?
        .into_iter()
        .map(WireTrip::into_trip)
        .collect();

    if trips.is_empty() {
        println!("No trips.");
    }
    for trip in &trips {
        println!("{}", describe(trip));
    }
    Ok(())
}

async fn watch_changes<Api: TripApi, C: PushConnector>(
    mut provider: TripProvider<Api, C>,
) -> anyhow::Result<()> {
    provider.mount();
    let mut channel = provider
        .watch_channel_state()
        .context("live channel did not start")?;
    let mut channel_alive = true;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,

            changed = channel.changed(), if channel_alive => {
                if changed.is_err() {
                    channel_alive = false;
                    continue;
                }
                let state = *channel.borrow_and_update();
                println!("channel: {state:?}");
                if state == ChannelState::Disconnected {
                    channel_alive = false;
                }
            }

            applied = provider.recv() => {
                let Some(applied) = applied else { break };
                print_change(&applied, provider.state());
            }
        }
    }

    provider.unmount().await;
    Ok(())
}

fn print_change(applied: &Applied, state: &TripsState) {
    if !applied.changed {
        return;
    }
    match &applied.action {
        TripAction::FetchSucceeded(trips) => println!("loaded {} trips", trips.len()),
        TripAction::FetchFailed(err) => eprintln!("fetch failed: {err}"),
        TripAction::SaveSucceeded(trip) => println!("upserted {}", describe(trip)),
        TripAction::Deleted { id } => {
            println!("deleted {id} ({} trips left)", state.trips().len())
        }
        TripAction::FetchStarted | TripAction::SaveStarted | TripAction::SaveFailed(_) => {}
    }
}

fn describe(trip: &Trip) -> String {
    let date = trip
        .date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "[{}] {} - ${} - {} - car: {}",
        trip.id.as_deref().unwrap_or("-"),
        trip.destination,
        trip.budget,
        date,
        if trip.with_car { "yes" } else { "no" }
    )
}

// ============================================================================
// Terminal UI
// ============================================================================

async fn run_tui<Api: TripApi, C: PushConnector>(
    provider: TripProvider<Api, C>,
) -> anyhow::Result<()> {
    // ===== Terminal setup =====
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, provider).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[derive(Default)]
struct TripsUi {
    list: TripList,
    edit: TripEdit,
}

impl TripsUi {
    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        ui: &UiState,
        trips: &TripsState,
        channel: ChannelState,
    ) {
        match ui.screen {
            Screen::List => self.list.render(frame, area, list_props(ui, trips, channel)),
            Screen::Edit => self.edit.render(
                frame,
                area,
                TripEditProps {
                    form: &ui.form,
                    is_focused: true,
                },
            ),
        }
    }

    fn map_event(&mut self, event: &EventKind, ui: &UiState, trips: &TripsState) -> Vec<UiAction> {
        match ui.screen {
            Screen::List => self
                .list
                .handle_event(event, list_props(ui, trips, ChannelState::default()))
                .into_iter()
                .collect(),
            Screen::Edit => self
                .edit
                .handle_event(
                    event,
                    TripEditProps {
                        form: &ui.form,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect(),
        }
    }
}

fn list_props<'a>(ui: &UiState, trips: &'a TripsState, channel: ChannelState) -> TripListProps<'a> {
    TripListProps {
        trips: trips.trips(),
        fetching: trips.fetching,
        fetching_error: trips.fetching_error.as_ref().map(|err| err.message()),
        selected: ui.selected,
        channel,
        is_focused: true,
    }
}

async fn run_app<B, Api, C>(
    terminal: &mut Terminal<B>,
    mut provider: TripProvider<Api, C>,
) -> anyhow::Result<()>
where
    B: Backend,
    Api: TripApi,
    C: PushConnector,
{
    let logging = LoggingMiddleware::new().quiet(&["EditInput", "EditBackspace", "ListSelect"]);
    let mut store = EffectStoreWithMiddleware::new(UiState::default(), ui::reducer, logging);
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<UiAction>();
    let mut tasks = TaskManager::new(action_tx.clone());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<RawEvent>();
    let cancel_token = CancellationToken::new();
    let _poller = spawn_event_poller(
        event_tx,
        Duration::from_millis(10),
        Duration::from_millis(16),
        cancel_token.clone(),
    );

    provider.mount();
    let mut channel_rx = provider.watch_channel_state();

    let mut ui = TripsUi::default();
    let mut should_render = true;
    let result: anyhow::Result<()> = loop {
        if should_render {
            let channel = provider.channel_state();
            if let Err(err) = terminal.draw(|frame| {
                ui.render(frame, frame.area(), store.state(), provider.state(), channel);
            }) {
                break Err(err.into());
            }
            should_render = false;
        }

        tokio::select! {
            Some(raw_event) = event_rx.recv() => {
                let event = process_raw_event(raw_event);
                if event.is_interrupt() {
                    break Ok(());
                }
                if matches!(event, EventKind::Resize(..)) {
                    should_render = true;
                }
                for action in ui.map_event(&event, store.state(), provider.state()) {
                    let _ = action_tx.send(action);
                }
            }

            Some(action) = action_rx.recv() => {
                if action == UiAction::Quit {
                    break Ok(());
                }
                let result = store.dispatch(action);
                should_render |= result.changed;
                for effect in result.effects {
                    handle_effect(effect, &mut provider, &mut tasks);
                }
            }

            applied = provider.recv() => {
                match applied {
                    Some(applied) => should_render |= applied.changed,
                    None => break Ok(()),
                }
            }

            alive = channel_changed(&mut channel_rx) => {
                if !alive {
                    channel_rx = None;
                }
                should_render = true;
            }
        }
    };

    cancel_token.cancel();
    tasks.cancel_all();
    provider.unmount().await;
    result
}

/// Resolves on the next channel state change; `false` once the channel task is gone.
async fn channel_changed(rx: &mut Option<watch::Receiver<ChannelState>>) -> bool {
    match rx {
        Some(rx) => rx.changed().await.is_ok(),
        None => std::future::pending().await,
    }
}

/// Handle effects by calling into the provider
fn handle_effect<Api: TripApi, C: PushConnector>(
    effect: Effect,
    provider: &mut TripProvider<Api, C>,
    tasks: &mut TaskManager<UiAction>,
) {
    match effect {
        Effect::SaveTrip(form) => {
            let trip = form.to_trip(Local::now().date_naive());
            let completion = provider.save_trip(trip);
            tasks.spawn(FORM_SAVE_TASK, async move {
                match completion.wait().await {
                    SaveOutcome::Saved(_) => UiAction::EditDidSave,
                    SaveOutcome::Failed(err) => UiAction::EditDidFail(err.message().to_string()),
                }
            });
        }
    }
}
