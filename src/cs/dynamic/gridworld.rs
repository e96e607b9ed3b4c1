//! The classic noisy grid world.
//!
//! Cells are walls, empty squares, the start square, or exits carrying a
//! reward. Taking `Exit` from an exit cell leads to a single absorbing
//! terminal state and collects the exit's reward. Movement actions succeed
//! with probability `1 - noise` and slip to each perpendicular direction
//! with probability `noise / 2`; moving into a wall or off the grid leaves
//! the agent where it is.
//!
//! Coordinates are `(x, y)` with `x` the column and `y = 0` the bottom row.

use crate::cs::dynamic::mdp::MarkovDecisionProcess;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridCell {
    Empty,
    Wall,
    Start,
    Exit(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridState {
    Cell { x: usize, y: usize },
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridAction {
    North,
    West,
    South,
    East,
    Exit,
}

const MOVES: [GridAction; 4] = [
    GridAction::North,
    GridAction::West,
    GridAction::South,
    GridAction::East,
];

#[derive(Debug, Clone)]
pub struct GridWorld {
    /// Indexed as `cells[x][y]`.
    cells: Vec<Vec<GridCell>>,
    width: usize,
    height: usize,
    noise: f64,
    living_reward: f64,
}

impl GridWorld {
    /// Builds a grid from rows listed top to bottom, with noise 0.2 and no
    /// living reward.
    ///
    /// # Errors
    /// * `InvalidGrid` if there are no cells or the rows differ in length
    pub fn new(rows: Vec<Vec<GridCell>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(Error::InvalidGrid("grid has no cells".to_string()));
        }
        if let Some(row) = rows.iter().position(|r| r.len() != width) {
            return Err(Error::InvalidGrid(format!(
                "row {} has {} cells, expected {}",
                row,
                rows[row].len(),
                width
            )));
        }

        Ok(Self::from_layout(rows))
    }

    /// Parses whitespace-separated tokens, one string per row, top to bottom:
    /// `#` is a wall, `S` the start, `.` an empty cell and any number an exit
    /// with that reward.
    ///
    /// ```
    /// use mdp_dp::dynamic::{GridCell, GridWorld};
    ///
    /// let grid = GridWorld::parse(&[". . 1", "S # -1"]).unwrap();
    /// assert_eq!(grid.cell(2, 1), GridCell::Exit(1.0));
    /// assert_eq!(grid.cell(0, 0), GridCell::Start);
    /// ```
    pub fn parse(rows: &[&str]) -> Result<Self> {
        let rows = rows
            .iter()
            .map(|row| {
                row.split_whitespace()
                    .map(parse_cell)
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(rows)
    }

    /// Sets the probability of slipping sideways.
    ///
    /// # Errors
    /// * `InvalidNoise` if `noise` is NaN or outside `[0, 1]`
    pub fn with_noise(mut self, noise: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&noise) {
            return Err(Error::InvalidNoise(noise));
        }
        self.noise = noise;
        Ok(self)
    }

    /// Sets the reward for every move that does not exit the grid.
    pub fn with_living_reward(mut self, living_reward: f64) -> Self {
        self.living_reward = living_reward;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The cell at column `x`, row `y` (counted from the bottom).
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the grid.
    pub fn cell(&self, x: usize, y: usize) -> GridCell {
        self.cells[x][y]
    }

    /// The first start cell in column-major order, if any.
    pub fn start_state(&self) -> Option<GridState> {
        self.cells_iter()
            .find(|&(_, _, cell)| cell == GridCell::Start)
            .map(|(x, y, _)| GridState::Cell { x, y })
    }

    fn cells_iter(&self) -> impl Iterator<Item = (usize, usize, GridCell)> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).map(move |y| (x, y, self.cells[x][y])))
    }

    fn is_allowed(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.cells[x as usize][y as usize] != GridCell::Wall
    }

    /// Where a move in `direction` from `(x, y)` lands.
    fn step(&self, x: usize, y: usize, direction: GridAction) -> GridState {
        let (dx, dy) = match direction {
            GridAction::North => (0, 1),
            GridAction::South => (0, -1),
            GridAction::West => (-1, 0),
            GridAction::East => (1, 0),
            GridAction::Exit => (0, 0),
        };
        let (nx, ny) = (x as isize + dx, y as isize + dy);
        if self.is_allowed(nx, ny) {
            GridState::Cell {
                x: nx as usize,
                y: ny as usize,
            }
        } else {
            GridState::Cell { x, y }
        }
    }

    fn exit_reward(&self, state: &GridState) -> Option<f64> {
        match *state {
            GridState::Cell { x, y } => match self.cells.get(x)?.get(y)? {
                GridCell::Exit(reward) => Some(*reward),
                _ => None,
            },
            GridState::Terminal => None,
        }
    }

    /// The classic 4x3 grid: +1 and -1 exits, one wall.
    pub fn book_grid() -> Self {
        use GridCell::{Empty as E, Exit as X, Start as S, Wall as W};
        Self::from_layout(vec![
            vec![E, E, E, X(1.0)],
            vec![E, W, E, X(-1.0)],
            vec![S, E, E, E],
        ])
    }

    /// A narrow bridge between a +1 and a +10 exit, lined by -100 cliffs.
    pub fn bridge_grid() -> Self {
        use GridCell::{Empty as E, Exit as X, Start as S, Wall as W};
        Self::from_layout(vec![
            vec![W, X(-100.0), X(-100.0), X(-100.0), X(-100.0), X(-100.0), W],
            vec![X(1.0), S, E, E, E, E, X(10.0)],
            vec![W, X(-100.0), X(-100.0), X(-100.0), X(-100.0), X(-100.0), W],
        ])
    }

    /// A +10 exit reachable along a -100 cliff or by a longer safe path.
    pub fn cliff_grid() -> Self {
        use GridCell::{Empty as E, Exit as X, Start as S};
        Self::from_layout(vec![
            vec![E, E, E, E, E],
            vec![S, E, E, E, X(10.0)],
            vec![X(-100.0); 5],
        ])
    }

    /// Close +1 and distant +10 exits above a row of -10 cliffs.
    pub fn discount_grid() -> Self {
        use GridCell::{Empty as E, Exit as X, Start as S, Wall as W};
        Self::from_layout(vec![
            vec![E, E, E, E, E],
            vec![E, W, E, E, E],
            vec![E, W, X(1.0), W, X(10.0)],
            vec![S, E, E, E, E],
            vec![X(-10.0); 5],
        ])
    }

    /// A small maze with a single +1 exit.
    pub fn maze_grid() -> Self {
        use GridCell::{Empty as E, Exit as X, Start as S, Wall as W};
        Self::from_layout(vec![
            vec![E, E, E, X(1.0)],
            vec![W, W, E, W],
            vec![E, W, E, E],
            vec![E, W, W, E],
            vec![S, E, E, E],
        ])
    }

    /// Transposes rectangular, non-empty rows (top to bottom) into
    /// `cells[x][y]`.
    fn from_layout(rows: Vec<Vec<GridCell>>) -> Self {
        let height = rows.len();
        let width = rows[0].len();
        let cells = (0..width)
            .map(|x| (0..height).map(|y| rows[height - 1 - y][x]).collect())
            .collect();
        Self {
            cells,
            width,
            height,
            noise: 0.2,
            living_reward: 0.0,
        }
    }
}

fn parse_cell(token: &str) -> Result<GridCell> {
    match token {
        "#" => Ok(GridCell::Wall),
        "S" => Ok(GridCell::Start),
        "." => Ok(GridCell::Empty),
        _ => token
            .parse::<f64>()
            .map(GridCell::Exit)
            .map_err(|_| Error::InvalidGrid(format!("unknown cell '{}'", token))),
    }
}

impl MarkovDecisionProcess for GridWorld {
    type State = GridState;
    type Action = GridAction;

    /// The terminal state first, then every non-wall cell column by column.
    fn states(&self) -> Vec<GridState> {
        std::iter::once(GridState::Terminal)
            .chain(
                self.cells_iter()
                    .filter(|&(_, _, cell)| cell != GridCell::Wall)
                    .map(|(x, y, _)| GridState::Cell { x, y }),
            )
            .collect()
    }

    fn possible_actions(&self, state: &GridState) -> Vec<GridAction> {
        match state {
            GridState::Terminal => Vec::new(),
            _ if self.exit_reward(state).is_some() => vec![GridAction::Exit],
            _ => MOVES.to_vec(),
        }
    }

    fn transition_states_and_probs(
        &self,
        state: &GridState,
        action: &GridAction,
    ) -> Vec<(GridState, f64)> {
        let (x, y) = match *state {
            GridState::Cell { x, y } => (x, y),
            GridState::Terminal => return Vec::new(),
        };

        if self.exit_reward(state).is_some() {
            return match action {
                GridAction::Exit => vec![(GridState::Terminal, 1.0)],
                _ => Vec::new(),
            };
        }

        let (left, right) = match action {
            GridAction::North | GridAction::South => (GridAction::West, GridAction::East),
            GridAction::West | GridAction::East => (GridAction::North, GridAction::South),
            GridAction::Exit => return Vec::new(),
        };
        let slip = self.noise / 2.0;
        let outcomes = [
            (self.step(x, y, *action), 1.0 - self.noise),
            (self.step(x, y, left), slip),
            (self.step(x, y, right), slip),
        ];

        // Bouncing off walls can land several outcomes on the same cell.
        let mut merged: Vec<(GridState, f64)> = Vec::with_capacity(outcomes.len());
        for (next_state, prob) in outcomes {
            match merged.iter_mut().find(|(s, _)| *s == next_state) {
                Some((_, p)) => *p += prob,
                None => merged.push((next_state, prob)),
            }
        }
        merged
    }

    /// Exit cells pay their reward, every other move pays the living reward.
    fn reward(&self, state: &GridState, _action: &GridAction, _next_state: &GridState) -> f64 {
        match state {
            GridState::Terminal => 0.0,
            _ => self.exit_reward(state).unwrap_or(self.living_reward),
        }
    }

    fn is_terminal(&self, state: &GridState) -> bool {
        *state == GridState::Terminal
    }
}
