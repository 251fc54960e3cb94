use crate::storage::{LocalStorageBackend, listen_storage_changes};
use crate::utils::*;
use anyhow::Context as _;
use clap::{Args, ValueEnum};
use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use mineboard_core as game;
use yew::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCellState {
    Hidden,
    Revealed(u8),
    Flagged,
    TriggeredMine,
    Mine,
    Misflagged,
}

/// Maps the engine's cell onto what the player should see, uncovering mines once the game is over.
fn view_cell_state(session: &game::GameSession, coords: game::Coord2) -> ViewCellState {
    use game::CellState::*;
    use game::GameStatus::*;

    let Some(cell) = session.cell(coords) else {
        return ViewCellState::Hidden;
    };
    let triggered = session
        .board()
        .and_then(game::Board::triggered_mine)
        .is_some_and(|mine| mine == coords);

    match (session.status(), cell.state, cell.is_mine) {
        (_, Revealed, true) if triggered => ViewCellState::TriggeredMine,
        (_, Revealed, _) => ViewCellState::Revealed(cell.adjacent_mines),
        (Won, _, true) => ViewCellState::Flagged,
        (Lost, Hidden, true) => ViewCellState::Mine,
        (Lost, Flagged, false) => ViewCellState::Misflagged,
        (_, Flagged, _) => ViewCellState::Flagged,
        (_, Hidden, _) => ViewCellState::Hidden,
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    const fn config(self) -> game::GameConfig {
        match self {
            Self::Beginner => game::GameConfig::BEGINNER,
            Self::Intermediate => game::GameConfig::INTERMEDIATE,
            Self::Expert => game::GameConfig::EXPERT,
        }
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Board preset, ignored when a custom size is given
    #[arg(short, long, value_enum, default_value_t)]
    difficulty: Difficulty,

    /// Custom board rows
    #[arg(long, requires_all = ["columns", "mines"])]
    rows: Option<game::Coord>,

    /// Custom board columns
    #[arg(long, requires_all = ["rows", "mines"])]
    columns: Option<game::Coord>,

    /// Custom mine count
    #[arg(long, requires_all = ["rows", "columns"])]
    mines: Option<game::CellCount>,
}

impl GameProps {
    pub(crate) fn config(&self) -> anyhow::Result<game::GameConfig> {
        match (self.rows, self.columns, self.mines) {
            (Some(rows), Some(columns), Some(mines)) => game::GameConfig::new((rows, columns), mines)
                .with_context(|| format!("Invalid board {rows}x{columns} with {mines} mines")),
            _ => Ok(self.difficulty.config()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Reveal(game::Coord2),
    Flag(game::Coord2),
    Tick,
    NewGame,
    StorageChanged(game::StorageChange),
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    row: game::Coord,
    column: game::Coord,
    cell_state: ViewCellState,
    #[prop_or_default]
    locked: bool,
    callback: Callback<Msg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    use ViewCellState::*;

    let CellProps {
        row,
        column,
        cell_state,
        locked,
        callback,
    } = props.clone();

    let mut class = classes!(
        "cell",
        match cell_state {
            Hidden => classes!(),
            Revealed(count) => classes!("open", format!("num-{}", count)),
            Flagged => classes!("flag"),
            TriggeredMine => classes!("open", "mine", "oops"),
            Mine => classes!("open", "mine"),
            Misflagged => classes!("flag", "wrong"),
        }
    );
    if locked {
        class.push("locked");
    }

    let onclick = {
        let callback = callback.clone();
        Callback::from(move |_: MouseEvent| {
            log::trace!("({}, {}) click", row, column);
            callback.emit(Msg::Reveal((row, column)));
        })
    };

    let oncontextmenu = Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        log::trace!("({}, {}) context menu", row, column);
        callback.emit(Msg::Flag((row, column)));
    });

    html! {
        <td {class} {onclick} {oncontextmenu}/>
    }
}

pub(crate) struct GameView {
    config: game::GameConfig,
    session: game::GameSession,
    scores: game::ScoreboardView,
    dispatcher: game::SyncDispatcher<LocalStorageBackend, BrowserPrompt>,
    _timer_interval: Interval,
    _storage_listener: EventListener,
}

impl GameView {
    fn new_session(config: game::GameConfig, seed: u64) -> game::GameSession {
        log::debug!("new game, seed: {}", seed);
        game::GameSession::new(config, seed).unwrap_or_else(|err| {
            log::error!("Cannot start {:?}: {}, using defaults", config, err);
            game::GameSession::with_default_config(seed)
        })
    }

    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(1_000, move || link.send_message(Msg::Tick))
    }

    fn dispatch(&mut self, event: game::HostEvent) -> bool {
        match self.dispatcher.dispatch(event) {
            Some(inbound) => self.scores.apply(inbound),
            None => false,
        }
    }

    fn reveal_cell(&mut self, coords: game::Coord2) -> bool {
        let result = match self.session.cell(coords) {
            Some(cell) if cell.is_revealed() => self.session.chord_reveal(coords),
            _ => self.session.reveal(coords),
        };

        let mut updated = match result {
            Ok(outcome) => outcome.has_update(),
            Err(err) => {
                log::warn!("reveal {:?} rejected: {}", coords, err);
                false
            }
        };

        if let Some(outbound) = self.session.take_outbound() {
            log::debug!("won: {:?}", outbound);
            updated |= self.dispatch(outbound.into());
        }

        updated
    }

    fn mark_cell(&mut self, coords: game::Coord2) -> bool {
        self.session
            .toggle_flag(coords)
            .map_or(false, |outcome| outcome.has_update())
    }

    fn can_interact_at(&self, coords: game::Coord2) -> bool {
        if self.session.is_finished() {
            return false;
        }
        match self.session.cell(coords) {
            Some(cell) if cell.is_revealed() => self
                .session
                .board()
                .is_some_and(|board| board.can_chord_reveal_at(coords)),
            Some(_) => true,
            None => false,
        }
    }

    fn game_state_class(&self) -> Classes {
        use game::GameStatus::*;
        classes!(match self.session.status() {
            NotStarted => "not-started",
            InProgress => "in-progress",
            Won => "win",
            Lost => "lose",
        })
    }

    fn scoreboard_view(&self) -> Html {
        let scoreboard = self.scores.scoreboard();
        if scoreboard.is_empty() {
            return html! { <p class="scoreboard empty">{"No wins yet"}</p> };
        }

        html! {
            <ol class="scoreboard">
                {
                    for scoreboard.iter().map(|entry| {
                        let name = if entry.name.is_empty() { "(anonymous)" } else { entry.name.as_str() };
                        html! {
                            <li><span>{name}</span><time>{format_time(entry.time)}</time></li>
                        }
                    })
                }
            </ol>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let config = props.config().unwrap_or_else(|err| {
            log::error!("{:#}, using defaults", err);
            game::GameConfig::default()
        });
        let seed = props.seed.unwrap_or_else(js_random_seed);

        let store = game::ScoreboardStore::new(LocalStorageBackend);
        let mut view = Self {
            config,
            session: Self::new_session(config, seed),
            scores: game::ScoreboardView::default(),
            dispatcher: game::SyncDispatcher::new(store, BrowserPrompt),
            _timer_interval: Self::create_timer(ctx),
            _storage_listener: listen_storage_changes(ctx.link().callback(Msg::StorageChanged)),
        };
        view.dispatch(game::HostEvent::Boot);
        view
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Reveal(coords) => {
                log::debug!("reveal cell: {:?}", coords);
                self.reveal_cell(coords)
            }
            Flag(coords) => {
                log::debug!("mark cell: {:?}", coords);
                self.mark_cell(coords)
            }
            Tick => self.session.tick(),
            NewGame => {
                let seed = ctx.props().seed.unwrap_or_else(js_random_seed);
                self.session = Self::new_session(self.config, seed);
                true
            }
            StorageChanged(change) => self.dispatch(change.into()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let (rows, columns) = self.session.config().size;
        let game_state_class = classes!("state", self.game_state_class());
        let is_playable = self.session.status().is_playable();
        let mines_left = format_for_counter(self.session.mines_left());
        let elapsed_time =
            format_for_counter(i32::try_from(self.session.elapsed()).unwrap_or(i32::MAX));

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::NewGame
        });

        html! {
            <div class="mineboard" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <nav>
                    <aside>{mines_left}</aside>
                    <span><button class={game_state_class} onclick={cb_new_game}/></span>
                    <aside>{elapsed_time}</aside>
                </nav>
                <table class={is_playable.then_some("playable")}>
                    {
                        for (0..rows).map(|row| html! {
                            <tr>
                                {
                                    for (0..columns).map(|column| {
                                        let pos = (row, column);
                                        let cell_state = view_cell_state(&self.session, pos);
                                        let locked = !self.can_interact_at(pos);
                                        let callback = ctx.link().callback(|msg: Msg| msg);
                                        html! {
                                            <CellView {row} {column} {cell_state} {locked} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                {self.scoreboard_view()}
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(size: game::Coord2, mines: &[game::Coord2]) -> game::GameSession {
        let layout = game::MineLayout::from_mine_coords(size, mines).unwrap();
        game::GameSession::with_board(game::Board::from_layout(&layout))
    }

    #[test]
    fn endgame_render_adapter_maps_triggered_mine_mine_and_misflagged() {
        let mut session = session((2, 2), &[(0, 0), (1, 0)]);

        session.reveal((1, 1)).unwrap();
        assert_eq!(
            session.toggle_flag((0, 1)).unwrap(),
            game::MarkOutcome::Changed
        );
        assert_eq!(
            session.reveal((0, 0)).unwrap(),
            game::RevealOutcome::HitMine
        );

        assert_eq!(view_cell_state(&session, (0, 0)), ViewCellState::TriggeredMine);
        assert_eq!(view_cell_state(&session, (1, 0)), ViewCellState::Mine);
        assert_eq!(view_cell_state(&session, (0, 1)), ViewCellState::Misflagged);
        assert_eq!(view_cell_state(&session, (1, 1)), ViewCellState::Revealed(2));
    }

    #[test]
    fn won_board_shows_mines_as_flags() {
        let mut session = session((1, 2), &[(0, 0)]);

        session.reveal((0, 1)).unwrap();

        assert_eq!(view_cell_state(&session, (0, 0)), ViewCellState::Flagged);
        assert_eq!(view_cell_state(&session, (0, 1)), ViewCellState::Revealed(1));
    }

    #[test]
    fn unstarted_session_renders_hidden_cells() {
        let session = game::GameSession::new(game::GameConfig::BEGINNER, 3).unwrap();

        assert_eq!(view_cell_state(&session, (4, 4)), ViewCellState::Hidden);
        assert_eq!(view_cell_state(&session, (40, 4)), ViewCellState::Hidden);
    }

    #[test]
    fn custom_board_needs_all_dimensions() {
        use clap::Parser;

        #[derive(Parser, Debug)]
        struct Cli {
            #[command(flatten)]
            game: GameProps,
        }

        let cli = Cli::try_parse_from(["", "--rows=5", "--columns=6", "--mines=7"]).unwrap();
        assert_eq!(
            cli.game.config().unwrap(),
            game::GameConfig::new((5, 6), 7).unwrap()
        );

        let cli = Cli::try_parse_from(["", "--difficulty=expert"]).unwrap();
        assert_eq!(cli.game.config().unwrap(), game::GameConfig::EXPERT);

        assert!(Cli::try_parse_from(["", "--rows=5"]).is_err());

        let cli = Cli::try_parse_from(["", "--rows=2", "--columns=2", "--mines=4"]).unwrap();
        assert!(cli.game.config().is_err());
    }
}
